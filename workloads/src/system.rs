use anyhow::Context;
use arena_core::{BenchRegistry, HostValue, RegistryError, Suite};
use flate2::{Compression, write::GzEncoder};
use std::io::Write;

use crate::pattern_buffer;

pub const COMPRESSION_ROUNDS: usize = 50;
pub const COMPRESSION_INPUT_LEN: usize = 10_000;

/// Stream compression.
#[derive(Debug, Default)]
pub struct SystemSuite;

impl SystemSuite {
    pub fn new() -> Self {
        Self
    }
}

impl Suite for SystemSuite {
    fn name(&self) -> &str {
        "system"
    }

    fn description(&self) -> &str {
        "gzip stream compression"
    }

    fn register(&self, registry: &mut BenchRegistry) -> Result<(), RegistryError> {
        let input = pattern_buffer(COMPRESSION_INPUT_LEN);
        registry.register("compression", move || {
            for _ in 0..COMPRESSION_ROUNDS {
                gzip(&input)?;
            }
            Ok(HostValue::Nil)
        })?;
        Ok(())
    }
}

/// Gzip `data` at the default level into a fresh buffer.
pub fn gzip(data: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data).context("gzip write failed")?;
    encoder.finish().context("gzip finish failed")
}
