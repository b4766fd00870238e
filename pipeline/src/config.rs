//! Pipeline configuration.

use std::path::{Path, PathBuf};

use docgraph_core::ValidationPolicy;
use docgraph_extract::ExtractorConfig;
use docgraph_layout::LayoutConfig;
use docgraph_synth::ModelConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Environment variable holding the model credential.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable overriding the model name.
pub const ENV_MODEL: &str = "DOCGRAPH_MODEL";

/// Environment variable overriding the model API root.
pub const ENV_BASE_URL: &str = "DOCGRAPH_BASE_URL";

/// Everything the orchestrator needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model credential. Usually supplied through `OPENAI_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Extraction settings.
    pub extract: ExtractorConfig,

    /// Model endpoint settings.
    pub model: ModelConfig,

    /// Layout geometry.
    pub layout: LayoutConfig,

    /// Validation applied between synthesis and layout.
    pub validation: ValidationPolicy,
}

impl PipelineConfig {
    /// `<config dir>/docgraph/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docgraph").join("config.toml"))
    }

    /// Load from `path`, or from [`PipelineConfig::default_path`] when it
    /// exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            self.model.model = model;
        }
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.model.base_url = url;
        }
    }

    /// Set the credential.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model configuration.
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Set the layout configuration.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set the validation policy.
    pub fn with_validation(mut self, policy: ValidationPolicy) -> Self {
        self.validation = policy;
        self
    }
}
