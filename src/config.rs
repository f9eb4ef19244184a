//! Rule threshold configuration (Sprint 5)
//!
//! Thresholds load from a TOML file and can be overridden per-field from the
//! command line. A threshold of 0 disables the corresponding rule.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Numbers the magic-number rule always accepts, before user additions.
pub const BASE_IGNORE_NUMBERS: [f64; 9] = [
    16.0, 32.0, 64.0, 128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0,
];

pub const DEFAULT_MAX_BODY_LINES: u32 = 16;
pub const DEFAULT_MAX_PARAMS: u32 = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Maximum function body length in lines before `too_long_func_body`.
    pub max_body_lines: u32,
    /// Maximum parameter count before `too_many_params_in_func`.
    pub max_params: u32,
    /// Extra numbers accepted by `magic_number_usage`.
    pub ignore_numbers: Vec<f64>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            max_body_lines: DEFAULT_MAX_BODY_LINES,
            max_params: DEFAULT_MAX_PARAMS,
            ignore_numbers: Vec::new(),
        }
    }
}

impl LintConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
