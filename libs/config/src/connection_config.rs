//! Connection Configuration Module
//!
//! Loads the settings a connection hands to every message it creates:
//! body compression and codec limits. Sources, later ones winning:
//!
//! 1. Built-in defaults ([`crate::defaults`])
//! 2. Optional TOML file
//! 3. `OPENWIRE_<SECTION>__<FIELD>` environment variables
//!
//! ```toml
//! [compression]
//! use_compression = true
//! level = 6
//!
//! [codec]
//! max_nesting_depth = 32
//! ```

use crate::defaults;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use openwire_codec::{CompressionPolicy, DecodeLimits};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Settings shared by all messages of a connection
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ConnectionConfig {
    pub compression: CompressionConfig,
    pub codec: CodecConfig,
}

/// Body compression settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CompressionConfig {
    pub use_compression: bool,
    /// zlib level 0-9, or -1 for the library default
    pub level: i32,
}

/// Primitive codec limits
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CodecConfig {
    pub max_nesting_depth: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            use_compression: defaults::compression::USE_COMPRESSION,
            level: defaults::compression::LEVEL,
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: defaults::codec::MAX_NESTING_DEPTH,
        }
    }
}

impl ConnectionConfig {
    /// Load from an optional TOML file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_environment(path, Self::environment())
    }

    /// `OPENWIRE_<SECTION>__<FIELD>` override source
    fn environment() -> Environment {
        Environment::with_prefix(defaults::ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_environment(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading connection config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(environment);

        let config: Self = builder
            .build()
            .context("Failed to build connection configuration")?
            .try_deserialize()
            .context("Failed to deserialize connection configuration")?;

        config.validate()?;
        debug!(?config, "connection config loaded");
        Ok(config)
    }

    /// Parse a TOML document, without environment overrides
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse connection configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize connection configuration")
    }

    pub fn validate(&self) -> Result<()> {
        let level = self.compression.level;
        if !(defaults::compression::MIN_LEVEL..=defaults::compression::MAX_LEVEL).contains(&level) {
            bail!(
                "compression.level {} out of range {}..={}",
                level,
                defaults::compression::MIN_LEVEL,
                defaults::compression::MAX_LEVEL
            );
        }
        if self.codec.max_nesting_depth == 0 {
            bail!("codec.max_nesting_depth must be at least 1");
        }
        Ok(())
    }

    /// Policy injected into messages created on this connection
    pub fn compression_policy(&self) -> CompressionPolicy {
        CompressionPolicy {
            use_compression: self.compression.use_compression,
            level: self.compression.level,
        }
    }

    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_depth: self.codec.max_nesting_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::default();
        assert!(!config.compression.use_compression);
        assert_eq!(config.compression.level, -1);
        assert_eq!(config.compression_policy(), CompressionPolicy::disabled());
        assert_eq!(config.decode_limits(), DecodeLimits::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("openwire.toml");

        let config_content = r#"
[compression]
use_compression = true
level = 6
"#;

        fs::write(&config_path, config_content).unwrap();

        let config = ConnectionConfig::load(Some(&config_path)).unwrap();
        assert!(config.compression.use_compression);
        assert_eq!(config.compression.level, 6);
        assert_eq!(config.compression_policy(), CompressionPolicy::enabled(6));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let result = ConnectionConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    fn environment_of(vars: &[(&str, &str)]) -> Environment {
        let source: config_crate::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConnectionConfig::environment().source(Some(source))
    }

    #[test]
    fn test_environment_override() {
        let env = environment_of(&[
            ("OPENWIRE_CODEC__MAX_NESTING_DEPTH", "12"),
            ("OPENWIRE_COMPRESSION__USE_COMPRESSION", "true"),
            ("UNRELATED_CODEC__MAX_NESTING_DEPTH", "3"),
        ]);
        let config = ConnectionConfig::load_with_environment(None, env).unwrap();
        assert_eq!(config.codec.max_nesting_depth, 12);
        assert_eq!(config.decode_limits().max_depth, 12);
        assert!(config.compression.use_compression);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("openwire.toml");
        fs::write(&config_path, "[compression]\nlevel = 6\n").unwrap();

        let env = environment_of(&[("OPENWIRE_COMPRESSION__LEVEL", "2")]);
        let config = ConnectionConfig::load_with_environment(Some(&config_path), env).unwrap();
        assert_eq!(config.compression.level, 2);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConnectionConfig::from_toml_str("[codec]\nmax_nesting_depth = 8\n").unwrap();
        assert_eq!(config.codec.max_nesting_depth, 8);
        assert!(!config.compression.use_compression);
    }

    #[test]
    fn test_rejects_bad_level() {
        let err = ConnectionConfig::from_toml_str("[compression]\nlevel = 12\n").unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(ConnectionConfig::from_toml_str("[compression]\nlevel = -2\n").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ConnectionConfig::default();
        config.compression.use_compression = true;
        config.compression.level = 9;
        let text = config.to_toml_string().unwrap();
        assert_eq!(ConnectionConfig::from_toml_str(&text).unwrap(), config);
    }
}
