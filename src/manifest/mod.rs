//! Model manifest: the declarative description of named models and the
//! connections that serve them.
//!
//! A manifest maps a logical model name (what application code asks for,
//! e.g. `"text-generator"`) to a concrete source model on an
//! OpenAI-compatible endpoint:
//!
//! ```yaml
//! connections:
//!   openai:
//!     base_url: https://api.openai.com/v1
//!     api_key_env: OPENAI_API_KEY
//! models:
//!   text-generator:
//!     source_model: gpt-4o-mini
//!     connection: openai
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`loader`] | Manifest discovery (explicit path, env var, working dir, embedded default) |

pub mod loader;

pub use loader::ManifestLoader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default chat-completions path appended to a connection's base URL.
pub const DEFAULT_CHAT_PATH: &str = "/chat/completions";

/// Manifest error types
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to load manifest from {path}: {reason}{}", .hint.as_ref().map(|h| format!("\n Hint: {}", h)).unwrap_or_default())]
    LoadError {
        path: String,
        reason: String,
        hint: Option<String>,
    },

    #[error("Manifest validation failed: {0}")]
    ValidationError(String),

    #[error("Model '{model}' refers to undeclared connection '{connection}'")]
    MissingConnection { model: String, connection: String },

    #[error("YAML syntax error: {0}")]
    YamlError(String),
}

/// Top-level manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelManifest {
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
    #[serde(default)]
    pub models: HashMap<String, ModelConfig>,
}

/// How to reach an OpenAI-compatible endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub base_url: String,
    /// Name of the environment variable holding the bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Whole-request timeout. Unset means the transport never times out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// A logical model bound to a source model on a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub source_model: String,
    pub connection: String,
    #[serde(default = "default_chat_path")]
    pub path: String,
}

fn default_chat_path() -> String {
    DEFAULT_CHAT_PATH.to_string()
}

impl ModelManifest {
    /// Parse and validate a manifest from YAML (JSON is accepted as well).
    pub fn from_yaml_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: ModelManifest =
            serde_yaml::from_str(content).map_err(|e| ManifestError::YamlError(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Structural checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (name, conn) in &self.connections {
            if conn.base_url.trim().is_empty() {
                return Err(ManifestError::ValidationError(format!(
                    "connection '{}' has an empty base_url",
                    name
                )));
            }
        }
        for (name, model) in &self.models {
            if model.source_model.trim().is_empty() {
                return Err(ManifestError::ValidationError(format!(
                    "model '{}' has an empty source_model",
                    name
                )));
            }
            if !self.connections.contains_key(&model.connection) {
                return Err(ManifestError::MissingConnection {
                    model: name.clone(),
                    connection: model.connection.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }

    pub fn connection(&self, name: &str) -> Option<&ConnectionConfig> {
        self.connections.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = ModelManifest::from_yaml_str(
            r#"
connections:
  local:
    base_url: http://localhost:11434/v1
models:
  text-generator:
    source_model: llama3
    connection: local
"#,
        )
        .unwrap();

        let model = manifest.model("text-generator").unwrap();
        assert_eq!(model.source_model, "llama3");
        assert_eq!(model.path, DEFAULT_CHAT_PATH);

        let conn = manifest.connection("local").unwrap();
        assert!(conn.api_key_env.is_none());
        assert!(conn.timeout_secs.is_none());
    }

    #[test]
    fn test_missing_connection_rejected() {
        let err = ModelManifest::from_yaml_str(
            r#"
models:
  text-generator:
    source_model: gpt-4o-mini
    connection: nowhere
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::MissingConnection { .. }));
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = ModelManifest::from_yaml_str(
            r#"
connections:
  broken:
    base_url: "  "
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::ValidationError(_)));
    }

    #[test]
    fn test_invalid_yaml_reported() {
        let err = ModelManifest::from_yaml_str("models: [unclosed").unwrap_err();
        assert!(matches!(err, ManifestError::YamlError(_)));
    }
}
