//! Configuration loading for wheelhouse.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults,
//! 2. an optional configuration file (TOML, YAML or JSON, picked by extension),
//! 3. environment variables prefixed with `WHEELHOUSE_`, with nested keys
//!    separated by `__` (e.g. `WHEELHOUSE_DATABASE__MAX_CONNECTIONS=8`).
//!
//! ```toml
//! [database]
//! path = "/var/lib/wheelhouse/wheelhouse.db"
//! max_connections = 5
//!
//! [build]
//! abis = ["cp35m", "cp36m", "cp37m"]
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use wheelhouse_build::UNIVERSAL_ABI;

pub const ENV_PREFIX: &str = "WHEELHOUSE_";
const DATABASE_FILENAME: &str = "wheelhouse.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Location of the SQLite database; defaults to the platform data
    /// directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Upper bound on pooled connections; the ledger picks its own default
    /// when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}
impl DatabaseConfig {
    /// The configured database path, or `wheelhouse.db` in the platform data
    /// directory.
    pub fn location(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let dirs = ProjectDirs::from("", "", "wheelhouse").ok_or_raise(|| ErrorKind::NoDataDirectory)?;
        Ok(dirs.data_dir().join(DATABASE_FILENAME))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// ABIs registered by `wheelhouse init`.
    #[serde(default)]
    pub abis: Vec<String>,
}

impl Config {
    /// Load and validate the configuration, reading `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::extract(Self::figment(path)?)
    }

    /// Build the layered figment without extracting it.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.display().to_string()));
            }
            tracing::debug!(path = %path.display(), "Reading configuration file");
            let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
            figment = match extension.to_ascii_lowercase().as_str() {
                "toml" => figment.merge(Toml::file_exact(path)),
                "yaml" | "yml" => figment.merge(Yaml::file_exact(path)),
                "json" => figment.merge(Json::file_exact(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.display().to_string())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract a configuration from a figment and validate it.
    pub fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == Some(0) {
            exn::bail!(invalid("database.max_connections", "must be at least 1"));
        }
        let mut seen = HashSet::new();
        for abi in &self.build.abis {
            if abi.is_empty() {
                exn::bail!(invalid("build.abis", "ABI tags cannot be empty"));
            }
            if abi == UNIVERSAL_ABI {
                exn::bail!(invalid("build.abis", "'none' marks universal wheels and is not a build target"));
            }
            if !seen.insert(abi.as_str()) {
                exn::bail!(ErrorKind::Invalid { field: "build.abis", reason: format!("duplicate ABI tag '{abi}'") });
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ErrorKind {
    ErrorKind::Invalid { field, reason: reason.to_string() }
}
