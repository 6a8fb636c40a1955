//! Session and batch configuration, loaded from `gachi.toml`

use crate::dictionary::Framework;
use crate::parser::Dialect;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "gachi.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Options for one transpiler session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranspilerOptions {
    /// Selects the framework identifiers and classifier rules
    pub framework: Framework,
    /// Keep comments in the output
    pub preserve_comments: bool,
    /// Annotate operators that cannot be substituted in place
    pub strict_mode: bool,
    /// Put a decorative phrase before functions and classes
    pub add_random_quotes: bool,
    /// Seed for the phrase picker; unseeded sessions use entropy
    pub quote_seed: Option<u64>,
    /// Grammar for parsing; sniffed from the source when unset
    pub dialect: Option<Dialect>,
}

impl Default for TranspilerOptions {
    fn default() -> Self {
        TranspilerOptions {
            framework: Framework::None,
            preserve_comments: true,
            strict_mode: false,
            add_random_quotes: false,
            quote_seed: None,
            dialect: None,
        }
    }
}

impl TranspilerOptions {
    pub fn with_framework(mut self, framework: Framework) -> Self {
        self.framework = framework;
        self
    }
}

/// Options for batch file processing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingOptions {
    /// Mirror outputs under this directory instead of next to the inputs
    pub output_dir: Option<PathBuf>,
    /// Worker threads; defaults to the number of CPUs
    pub concurrency: Option<usize>,
    /// Extra directory or file names to skip while walking
    pub exclude: Vec<String>,
    pub verbose: bool,
}

/// Contents of `gachi.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub transpiler: TranspilerOptions,
    #[serde(default)]
    pub processing: ProcessingOptions,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Self::from_toml(&content)
    }

    /// Find `gachi.toml` in `start` or its ancestors
    pub fn discover(start: impl AsRef<Path>) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        for dir in start.as_ref().ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((candidate, config)));
            }
        }
        debug!("no configuration file found, using defaults");
        Ok(None)
    }
}
