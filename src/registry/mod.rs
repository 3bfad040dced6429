//! Model registry: resolves a logical model name to a chat-model handle.
//!
//! [`ManifestRegistry`] resolves names through a [`ModelManifest`], reading the
//! connection's credential from the environment at resolution time.

use crate::client::{ChatModel, OpenAiChatModel};
use crate::error::{Error, ErrorContext};
use crate::manifest::{ManifestError, ModelManifest};
use crate::transport::HttpTransport;
use crate::Result;

/// Resolve-by-name capability.
pub trait ModelRegistry {
    type Model: ChatModel;

    /// Look up `name`; unknown names fail with [`Error::UnknownModel`].
    fn get_model(&self, name: &str) -> Result<Self::Model>;
}

/// Registry backed by a model manifest.
#[derive(Debug, Clone)]
pub struct ManifestRegistry {
    manifest: ModelManifest,
    base_url_override: Option<String>,
}

impl ManifestRegistry {
    pub fn new(manifest: ModelManifest) -> Self {
        Self {
            manifest,
            base_url_override: None,
        }
    }

    /// Send every request to `base_url` instead of the connection's own.
    ///
    /// Primarily for pointing at a local or mock server.
    pub fn with_base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn manifest(&self) -> &ModelManifest {
        &self.manifest
    }

    fn api_key_for(&self, connection_name: &str, env_var: Option<&str>) -> Result<Option<String>> {
        let Some(var) = env_var else {
            return Ok(None);
        };
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Some(key)),
            _ => Err(Error::configuration_with_context(
                format!("credential variable {} is not set", var),
                ErrorContext::new()
                    .with_field_path(format!("connections.{}.api_key_env", connection_name))
                    .with_source("manifest_registry"),
            )),
        }
    }
}

impl ModelRegistry for ManifestRegistry {
    type Model = OpenAiChatModel;

    fn get_model(&self, name: &str) -> Result<OpenAiChatModel> {
        let model = self
            .manifest
            .model(name)
            .ok_or_else(|| Error::unknown_model(name))?;

        let connection = self.manifest.connection(&model.connection).ok_or_else(|| {
            Error::Manifest(ManifestError::MissingConnection {
                model: name.to_string(),
                connection: model.connection.clone(),
            })
        })?;

        let api_key = self.api_key_for(&model.connection, connection.api_key_env.as_deref())?;

        let transport = match &self.base_url_override {
            Some(base_url) => {
                let mut conn = connection.clone();
                conn.base_url = base_url.clone();
                HttpTransport::new(&conn, api_key)?
            }
            None => HttpTransport::new(connection, api_key)?,
        };

        tracing::debug!(
            model = %name,
            source_model = %model.source_model,
            base_url = %transport.base_url(),
            "resolved model"
        );
        Ok(OpenAiChatModel::new(
            name,
            model.source_model.clone(),
            model.path.clone(),
            transport,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(api_key_env: Option<&str>) -> ModelManifest {
        let key_line = api_key_env
            .map(|v| format!("    api_key_env: {}\n", v))
            .unwrap_or_default();
        ModelManifest::from_yaml_str(&format!(
            "connections:\n  local:\n    base_url: http://127.0.0.1:9/v1\n{}models:\n  text-generator:\n    source_model: tiny\n    connection: local\n",
            key_line
        ))
        .unwrap()
    }

    #[test]
    fn test_resolves_known_model() {
        let registry = ManifestRegistry::new(manifest(None));
        let model = registry.get_model("text-generator").unwrap();
        assert_eq!(model.name(), "text-generator");
        assert_eq!(model.source_model(), "tiny");
        assert_eq!(model.endpoint(), "http://127.0.0.1:9/v1/chat/completions");
    }

    #[test]
    fn test_unknown_model() {
        let registry = ManifestRegistry::new(manifest(None));
        let err = registry.get_model("summarizer").err().unwrap();
        assert!(matches!(err, Error::UnknownModel { ref name } if name == "summarizer"));
        assert!(err.to_string().contains("unknown model"));
    }

    #[test]
    fn test_missing_credential_is_configuration_error() {
        let registry =
            ManifestRegistry::new(manifest(Some("KG_EXTRACT_TEST_SURELY_UNSET_API_KEY")));
        let err = registry.get_model("text-generator").err().unwrap();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("connections.local.api_key_env")
        );
    }

    #[test]
    fn test_base_url_override() {
        let registry =
            ManifestRegistry::new(manifest(None)).with_base_url_override("http://localhost:4010/");
        let model = registry.get_model("text-generator").unwrap();
        assert_eq!(model.endpoint(), "http://localhost:4010/chat/completions");
    }

    #[test]
    fn test_create_input_preserves_order() {
        let registry = ManifestRegistry::new(manifest(None));
        let model = registry.get_model("text-generator").unwrap();
        let input = model
            .create_input(vec![
                crate::types::ChatMessage::system("first"),
                crate::types::ChatMessage::user("second"),
            ])
            .unwrap();
        assert_eq!(input.model, "tiny");
        assert_eq!(input.messages[0].content, "first");
        assert_eq!(input.messages[1].content, "second");
        assert!(model.create_input(vec![]).is_err());
    }
}
