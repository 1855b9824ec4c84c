//! Settings read from `ywprov.toml`.
//!
//! ```toml
//! [extract]
//! language = "python"
//!
//! [prov]
//! prefix = "yw"
//! namespace = "http://yesworkflow.org/0000/"
//! format = "dot"
//! ```
//!
//! Every key is optional. Command-line flags take precedence over the file.

use crate::graph::qname::{DEFAULT_NAMESPACE, DEFAULT_PREFIX};
use crate::graph::Namespace;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "ywprov.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub extract: ExtractConfig,
    pub prov: ProvConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Comment syntax for stdin and unrecognised file extensions.
    pub language: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            language: "python".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvConfig {
    pub prefix: String,
    pub namespace: String,
    pub format: String,
}

impl Default for ProvConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            format: "dot".to_string(),
        }
    }
}

impl Config {
    /// Load `path`, or `ywprov.toml` from the working directory when no path
    /// is given. A missing default file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::new(&self.prov.prefix, &self.prov.namespace)
    }
}
