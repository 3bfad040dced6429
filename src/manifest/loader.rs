//! Manifest discovery with local files and an embedded fallback

use super::{ManifestError, ModelManifest};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit manifest file.
pub const MANIFEST_ENV: &str = "KG_EXTRACT_MANIFEST";

/// Manifest file name looked up in the search directory.
pub const MANIFEST_FILE_NAME: &str = "kg-extract.yaml";

const EMBEDDED_MANIFEST: &str = include_str!("../../manifests/default.yaml");

/// Loads a [`ModelManifest`], trying in order:
/// 1. an explicit path set with [`ManifestLoader::with_path`]
/// 2. the file named by `KG_EXTRACT_MANIFEST`
/// 3. `kg-extract.yaml` in the search directory (the working directory by default)
/// 4. the embedded default manifest
pub struct ManifestLoader {
    path: Option<PathBuf>,
    search_dir: PathBuf,
    use_env: bool,
}

impl ManifestLoader {
    pub fn new() -> Self {
        Self {
            path: None,
            search_dir: PathBuf::from("."),
            use_env: true,
        }
    }

    /// Load exactly this file; missing or invalid files are errors.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Directory searched for `kg-extract.yaml`.
    pub fn with_search_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.search_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Skip the `KG_EXTRACT_MANIFEST` lookup.
    pub fn ignore_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub async fn load(&self) -> Result<ModelManifest, ManifestError> {
        if let Some(ref path) = self.path {
            return Self::load_from_file(path).await;
        }

        if self.use_env {
            if let Ok(path) = std::env::var(MANIFEST_ENV) {
                if !path.trim().is_empty() {
                    return Self::load_from_file(Path::new(&path)).await;
                }
            }
        }

        let local = self.search_dir.join(MANIFEST_FILE_NAME);
        if local.exists() {
            return Self::load_from_file(&local).await;
        }

        tracing::debug!("no manifest file found, using embedded default");
        Self::embedded()
    }

    /// The manifest compiled into the binary.
    pub fn embedded() -> Result<ModelManifest, ManifestError> {
        ModelManifest::from_yaml_str(EMBEDDED_MANIFEST)
    }

    async fn load_from_file(path: &Path) -> Result<ModelManifest, ManifestError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ManifestError::LoadError {
                path: path.to_string_lossy().to_string(),
                reason: e.to_string(),
                hint: Some("Check that the file exists and is readable UTF-8.".to_string()),
            })?;

        tracing::debug!(path = %path.display(), "loading model manifest");
        ModelManifest::from_yaml_str(&content).map_err(|e| match e {
            ManifestError::YamlError(reason) => ManifestError::LoadError {
                path: path.to_string_lossy().to_string(),
                reason,
                hint: None,
            },
            other => other,
        })
    }
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_manifest_declares_text_generator() {
        let manifest = ManifestLoader::embedded().unwrap();
        let model = manifest.model("text-generator").unwrap();
        let conn = manifest.connection(&model.connection).unwrap();
        assert_eq!(conn.api_key_env.as_deref(), Some("OPENAI_API_KEY"));
        assert!(conn.base_url.starts_with("https://"));
    }

    #[tokio::test]
    async fn test_search_dir_file_preferred_over_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            "connections:\n  local:\n    base_url: http://127.0.0.1:8080/v1\nmodels:\n  text-generator:\n    source_model: tiny\n    connection: local\n",
        )
        .unwrap();

        let manifest = ManifestLoader::new()
            .ignore_env()
            .with_search_dir(dir.path())
            .load()
            .await
            .unwrap();
        assert_eq!(manifest.model("text-generator").unwrap().source_model, "tiny");
    }

    #[tokio::test]
    async fn test_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = ManifestLoader::new()
            .ignore_env()
            .with_search_dir(dir.path())
            .load()
            .await
            .unwrap();
        assert_eq!(manifest, ManifestLoader::embedded().unwrap());
    }

    #[tokio::test]
    async fn test_explicit_missing_path_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ManifestLoader::new()
            .with_path(dir.path().join("absent.yaml"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, ManifestError::LoadError { .. }));
    }
}
