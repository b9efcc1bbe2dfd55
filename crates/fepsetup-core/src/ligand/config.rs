use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_NAME_TAG: &str = "ofe-name";
pub const DEFAULT_VERSION_TAG: &str = "ofe-version";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Controls which property tags carry a ligand's identity metadata.
///
/// The defaults match the tags written by the rest of the toolchain, so a
/// custom configuration is only needed to read or write foreign conventions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// Tag holding the resolved display name.
    pub name_tag: String,
    /// Tag stamped with `version` on every constructed ligand.
    pub version_tag: String,
    /// Value written to `version_tag`.
    pub version: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name_tag: DEFAULT_NAME_TAG.to_string(),
            version_tag: DEFAULT_VERSION_TAG.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

fn validate_tag(name: &'static str, tag: &str) -> Result<(), ConfigError> {
    let reason = if tag.is_empty() {
        "tag must not be empty"
    } else if tag.contains(['<', '>']) {
        "tag must not contain angle brackets"
    } else if tag.contains(['\n', '\r']) {
        "tag must fit on one line"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidParameter {
        name,
        reason: reason.to_string(),
    })
}

impl IdentityConfig {
    pub fn builder() -> IdentityConfigBuilder {
        IdentityConfigBuilder::new()
    }

    /// Checks that both tags can be written as SDF data item headers and that
    /// they do not collide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tag("name_tag", &self.name_tag)?;
        validate_tag("version_tag", &self.version_tag)?;
        if self.name_tag == self.version_tag {
            return Err(ConfigError::InvalidParameter {
                name: "version_tag",
                reason: format!("collides with name_tag '{}'", self.name_tag),
            });
        }
        if self.version.is_empty() || self.version.contains(['\n', '\r']) {
            return Err(ConfigError::InvalidParameter {
                name: "version",
                reason: "version must be a single non-empty line".to_string(),
            });
        }
        Ok(())
    }

    /// Parses and validates a configuration from TOML text. Missing keys
    /// keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads and validates a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Default)]
pub struct IdentityConfigBuilder {
    name_tag: Option<String>,
    version_tag: Option<String>,
    version: Option<String>,
}

impl IdentityConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_tag(mut self, tag: &str) -> Self {
        self.name_tag = Some(tag.to_string());
        self
    }

    pub fn version_tag(mut self, tag: &str) -> Self {
        self.version_tag = Some(tag.to_string());
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Builds the configuration, falling back to defaults for unset fields.
    pub fn build(self) -> Result<IdentityConfig, ConfigError> {
        let defaults = IdentityConfig::default();
        let config = IdentityConfig {
            name_tag: self.name_tag.unwrap_or(defaults.name_tag),
            version_tag: self.version_tag.unwrap_or(defaults.version_tag),
            version: self.version.unwrap_or(defaults.version),
        };
        config.validate()?;
        Ok(config)
    }
}
