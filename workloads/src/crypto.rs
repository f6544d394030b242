use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use anyhow::anyhow;
use arena_core::{BenchRegistry, HostValue, RegistryError, Suite};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::pattern_buffer;

pub const HASH_ROUNDS: usize = 500;
pub const CIPHER_ROUNDS: usize = 500;
pub const PAYLOAD_LEN: usize = 10_000;
pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
/// GCM appends a 16-byte authentication tag to every sealed message.
pub const TAG_LEN: usize = 16;

/// Key and nonce for the cipher workload.
#[derive(Clone)]
pub struct KeyMaterial {
    pub key: [u8; KEY_LEN],
    pub nonce: [u8; NONCE_LEN],
}

impl KeyMaterial {
    /// Draw fresh key material from the operating system.
    pub fn from_os_rng() -> anyhow::Result<Self> {
        let mut key = [0u8; KEY_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|e| anyhow!("os entropy unavailable for key: {e}"))?;
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| anyhow!("os entropy unavailable for nonce: {e}"))?;
        Ok(Self { key, nonce })
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial").finish_non_exhaustive()
    }
}

/// SHA-256 hashing and AES-256-GCM sealing.
///
/// Key material is drawn when the suite registers, so a missing entropy
/// source fails registry construction instead of the first call.
#[derive(Debug, Default)]
pub struct CryptoSuite {
    material: Option<KeyMaterial>,
}

impl CryptoSuite {
    pub fn new() -> Self {
        Self { material: None }
    }

    /// Use fixed key material instead of the OS generator.
    pub fn with_key_material(material: KeyMaterial) -> Self {
        Self {
            material: Some(material),
        }
    }

    fn init_error(&self, source: anyhow::Error) -> RegistryError {
        RegistryError::SuiteInit {
            suite: self.name().to_string(),
            source,
        }
    }
}

impl Suite for CryptoSuite {
    fn name(&self) -> &str {
        "crypto"
    }

    fn description(&self) -> &str {
        "repeated hashing and authenticated encryption"
    }

    fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError> {
        let hash_input = pattern_buffer(PAYLOAD_LEN);
        registry.register("sha256", move || {
            hash_rounds(&hash_input, HASH_ROUNDS);
            Ok(HostValue::Nil)
        })?;

        let material = match &self.material {
            Some(material) => material.clone(),
            None => KeyMaterial::from_os_rng().map_err(|e| self.init_error(e))?,
        };
        let sealer = Sealer::new(&material).map_err(|e| self.init_error(e))?;
        debug!(target: "arena::workload", suite = self.name(), "cipher initialized");
        let plaintext = pattern_buffer(PAYLOAD_LEN);
        registry.register("aesEncrypt", move || {
            sealer.seal_rounds(&plaintext, CIPHER_ROUNDS)?;
            Ok(HostValue::Nil)
        })?;
        Ok(())
    }
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Hash `data` `rounds` times; returns the last digest.
pub fn hash_rounds(data: &[u8], rounds: usize) -> [u8; 32] {
    let mut digest = [0u8; 32];
    for _ in 0..rounds {
        digest = sha256(std::hint::black_box(data));
    }
    digest
}

/// Initialized AES-256-GCM cipher with a fixed nonce.
pub struct Sealer {
    cipher: Aes256Gcm,
    nonce: [u8; NONCE_LEN],
}

impl Sealer {
    pub fn new(material: &KeyMaterial) -> anyhow::Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(&material.key)
            .map_err(|_| anyhow!("invalid AES-256 key length"))?;
        Ok(Self {
            cipher,
            nonce: material.nonce,
        })
    }

    /// Ciphertext followed by the authentication tag.
    pub fn seal(&self, plaintext: &[u8]) -> anyhow::Result<Vec<u8>> {
        self.cipher
            .encrypt(Nonce::from_slice(&self.nonce), plaintext)
            .map_err(|e| anyhow!("seal failed: {e}"))
    }

    pub fn open(&self, sealed: &[u8]) -> anyhow::Result<Vec<u8>> {
        self.cipher
            .decrypt(Nonce::from_slice(&self.nonce), sealed)
            .map_err(|e| anyhow!("open failed: {e}"))
    }

    /// Seal `plaintext` `rounds` times, returning the last ciphertext.
    pub fn seal_rounds(&self, plaintext: &[u8], rounds: usize) -> anyhow::Result<Vec<u8>> {
        let mut sealed = Vec::new();
        for _ in 0..rounds {
            sealed = self.seal(plaintext)?;
        }
        Ok(sealed)
    }
}
