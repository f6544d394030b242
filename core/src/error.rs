use std::path::PathBuf;
use thiserror::Error;

/// Failures while populating a [`crate::BenchRegistry`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Names are unique across entries and aliases; the first registration wins.
    #[error("benchmark '{0}' is already registered")]
    Duplicate(String),

    #[error("alias '{alias}' points at unknown benchmark '{target}'")]
    DanglingAlias { alias: String, target: String },

    #[error("benchmark name must not be empty")]
    EmptyName,

    /// Suite setup failed (e.g. cipher construction). Fatal at startup.
    #[error("suite '{suite}' failed to initialize: {source}")]
    SuiteInit {
        suite: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Failures surfaced to the host by [`crate::Dispatcher::dispatch`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("benchmark '{0}' not found")]
    NotFound(String),

    #[error("benchmark '{name}' failed: {source}")]
    Workload {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    /// Status code returned through the C ABI.
    pub fn status_code(&self) -> i32 {
        match self {
            DispatchError::NotFound(_) => -1,
            DispatchError::Workload { .. } => -2,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read run plan {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse run plan as {format}: {message}")]
    Parse { format: &'static str, message: String },

    #[error("invalid run plan: {0}")]
    Invalid(String),
}
