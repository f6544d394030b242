//! Run plans: which benchmarks to time and how often.
//!
//! A plan can be written as JSON, YAML or TOML. The format is picked from the
//! file extension and otherwise sniffed from the content.

use crate::error::ConfigError;
use crate::registry::BenchRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ITERATIONS: usize = 10;
pub const DEFAULT_WARMUP: usize = 1;
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub fn label(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }

    /// Guess the format of `input` when no extension is available.
    pub fn detect(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            return Format::Json;
        }
        let looks_like_toml = trimmed.lines().any(|line| {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                return false;
            }
            (line.starts_with('[') && line.ends_with(']'))
                || line
                    .split_once('=')
                    .is_some_and(|(key, _)| !key.trim().is_empty() && !key.contains(':'))
        });
        if looks_like_toml { Format::Toml } else { Format::Yaml }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunPlan {
    /// Names to run; empty means every host-facing benchmark.
    pub benchmarks: Vec<String>,
    pub iterations: usize,
    pub warmup: usize,
    pub output_dir: Option<PathBuf>,
    pub history_limit: usize,
    pub notes: Option<String>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            benchmarks: Vec::new(),
            iterations: DEFAULT_ITERATIONS,
            warmup: DEFAULT_WARMUP,
            output_dir: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            notes: None,
        }
    }
}

impl RunPlan {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let format = Format::from_path(path).unwrap_or_else(|| Format::detect(&text));
        Self::parse(&text, format)
    }

    pub fn parse(input: &str, format: Format) -> Result<Self, ConfigError> {
        let parse_err = |message: String| ConfigError::Parse {
            format: format.label(),
            message,
        };
        let plan: RunPlan = match format {
            Format::Json => serde_json::from_str(input).map_err(|e| parse_err(e.to_string()))?,
            Format::Yaml => {
                if input.trim().is_empty() {
                    RunPlan::default()
                } else {
                    serde_yaml::from_str(input).map_err(|e| parse_err(e.to_string()))?
                }
            }
            Format::Toml => toml::from_str(input).map_err(|e| parse_err(e.to_string()))?,
        };
        plan.validate()?;
        Ok(plan)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::Invalid("iterations must be at least 1".to_string()));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be at least 1".to_string()));
        }
        if let Some(blank) = self.benchmarks.iter().find(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("blank benchmark name {:?}", blank)));
        }
        Ok(())
    }

    /// Names this plan runs against `registry`. Unknown names are kept so the
    /// dispatcher reports them as lookup failures.
    pub fn resolve_benchmarks(&self, registry: &BenchRegistry) -> Vec<String> {
        if self.benchmarks.is_empty() {
            registry.benchmarks().into_iter().map(str::to_string).collect()
        } else {
            self.benchmarks.clone()
        }
    }
}
