//! Configuration loading and validation for ragchat.
//!
//! Loads configuration from a TOML file with environment variable
//! overrides. Validates all settings — including the prompt template
//! slots — at startup, so a malformed template can never surface as a
//! per-request failure.

use std::path::{Path, PathBuf};

use ragchat_core::template::PromptTemplate;
use serde::{Deserialize, Serialize};

/// The root configuration structure.
///
/// Maps directly to `ragchat.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Number of exchange-pairs retained in the conversation window
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,

    /// Number of passages requested per retrieval
    #[serde(default = "default_retrieval_count")]
    pub retrieval_count: usize,

    /// Ollama collaborator endpoints (generation + embeddings)
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Qdrant collaborator endpoint (vector search)
    #[serde(default)]
    pub qdrant: QdrantConfig,

    /// Prompt template slots
    #[serde(default)]
    pub template: TemplateConfig,
}

fn default_max_context_length() -> usize {
    5
}
fn default_retrieval_count() -> usize {
    3
}

/// Ollama endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Model used for generation
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Model used for query embeddings
    #[serde(default = "default_ollama_model")]
    pub embedding_model: String,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".into()
}
fn default_ollama_model() -> String {
    "llama3".into()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
            embedding_model: default_ollama_model(),
        }
    }
}

/// Qdrant endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Base URL of the Qdrant server
    #[serde(default = "default_qdrant_url")]
    pub base_url: String,

    /// Collection searched for passages
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_qdrant_url() -> String {
    "http://localhost:6333".into()
}
fn default_collection() -> String {
    "rag".into()
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            base_url: default_qdrant_url(),
            collection: default_collection(),
        }
    }
}

/// The four prompt template slots as configured.
///
/// Defaults mirror [`PromptTemplate::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_system_message")]
    pub system_message: String,

    #[serde(default = "default_context_format")]
    pub context_format: String,

    #[serde(default = "default_relevant_info_format")]
    pub relevant_info_format: String,

    #[serde(default = "default_user_query_format")]
    pub user_query_format: String,
}

fn default_system_message() -> String {
    PromptTemplate::default().system_message
}
fn default_context_format() -> String {
    PromptTemplate::default().context_format
}
fn default_relevant_info_format() -> String {
    PromptTemplate::default().relevant_info_format
}
fn default_user_query_format() -> String {
    PromptTemplate::default().user_query_format
}

impl Default for TemplateConfig {
    fn default() -> Self {
        let t = PromptTemplate::default();
        Self {
            system_message: t.system_message,
            context_format: t.context_format,
            relevant_info_format: t.relevant_info_format,
            user_query_format: t.user_query_format,
        }
    }
}

impl TemplateConfig {
    /// Convert into the validated domain template.
    pub fn to_template(&self) -> Result<PromptTemplate, ConfigError> {
        let template = PromptTemplate {
            system_message: self.system_message.clone(),
            context_format: self.context_format.clone(),
            relevant_info_format: self.relevant_info_format.clone(),
            user_query_format: self.user_query_format.clone(),
        };
        template
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        Ok(template)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_context_length: default_max_context_length(),
            retrieval_count: default_retrieval_count(),
            ollama: OllamaConfig::default(),
            qdrant: QdrantConfig::default(),
            template: TemplateConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (`./ragchat.toml`).
    ///
    /// Environment variable overrides (highest priority):
    /// - `RAGCHAT_OLLAMA_URL`
    /// - `RAGCHAT_MODEL`
    /// - `RAGCHAT_QDRANT_URL`
    /// - `RAGCHAT_COLLECTION`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(Path::new("ragchat.toml"))?;

        if let Ok(url) = std::env::var("RAGCHAT_OLLAMA_URL") {
            config.ollama.base_url = url;
        }
        if let Ok(model) = std::env::var("RAGCHAT_MODEL") {
            config.ollama.model = model;
        }
        if let Ok(url) = std::env::var("RAGCHAT_QDRANT_URL") {
            config.qdrant.base_url = url;
        }
        if let Ok(collection) = std::env::var("RAGCHAT_COLLECTION") {
            config.qdrant.collection = collection;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_context_length == 0 {
            return Err(ConfigError::ValidationError(
                "max_context_length must be at least 1 pair".into(),
            ));
        }

        if self.retrieval_count == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval_count must be at least 1".into(),
            ));
        }

        // Fails fast on a template slot missing its insertion point.
        self.template.to_template()?;

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.max_context_length, 5);
        assert_eq!(config.retrieval_count, 3);
        assert_eq!(config.qdrant.collection, "rag");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.max_context_length, config.max_context_length);
        assert_eq!(parsed.ollama.base_url, config.ollama.base_url);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/ragchat.toml")).unwrap();
        assert_eq!(config.max_context_length, 5);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let toml_str = r#"
max_context_length = 2

[qdrant]
collection = "healthcare"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_context_length, 2);
        assert_eq!(config.qdrant.collection, "healthcare");
        assert_eq!(config.retrieval_count, 3);
        assert_eq!(config.ollama.model, "llama3");
    }

    #[test]
    fn zero_context_length_rejected() {
        let config = AppConfig {
            max_context_length: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn template_without_query_placeholder_rejected_at_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[template]
user_query_format = "Assistant Response:"
"#
        )
        .unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("user_query_format"));
    }

    #[test]
    fn template_config_converts_to_domain_template() {
        let template = TemplateConfig::default().to_template().unwrap();
        assert!(template.context_format.contains("Previous conversation:"));
        assert!(template.user_query_format.contains("{}"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("max_context_length"));
        assert!(toml_str.contains("llama3"));
    }
}
