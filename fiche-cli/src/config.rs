//! Optional TOML configuration
//!
//! ```toml
//! compression_level = 9
//!
//! [limits]
//! max_json_chars = 5000
//! advisory_wrapper_chars = 3000
//! ```

use fiche_codec::{DecodeOptions, EncodeOptions};
use fiche_format::Limits;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("compression_level must be between 0 and 9 (got {0})")]
    CompressionLevel(u32),
}

/// Settings overriding the built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub compression_level: Option<u32>,
    pub limits: Limits,
}

impl Config {
    /// Load the file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.check()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn check(&self) -> Result<(), ConfigError> {
        match self.compression_level {
            Some(level) if level > 9 => Err(ConfigError::CompressionLevel(level)),
            _ => Ok(()),
        }
    }

    pub fn encode_options(&self) -> EncodeOptions {
        let mut opts = EncodeOptions {
            limits: self.limits.clone(),
            ..EncodeOptions::default()
        };
        if let Some(level) = self.compression_level {
            opts.compression_level = level;
        }
        opts
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            limits: self.limits.clone(),
        }
    }
}
