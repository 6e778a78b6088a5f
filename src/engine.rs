//! Engine facade: wires configuration, pipeline, and selector behind one
//! entry point.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::EngineConfig;
use crate::model::ConfigOverrides;
use crate::pipeline::{GenerationPipeline, PipelineResult};
use crate::selector::{Match, ModelSelector, TextEmbedder};
use crate::{PromptMeshError, Result};

/// The promptmesh engine: retrieve saved assets by description, generate
/// new ones through the worker pipeline, and maintain the asset catalog.
///
/// The engine assumes at most one in-flight pipeline invocation per
/// caller and does not serialize catalog mutations across processes;
/// last write wins.
pub struct Engine {
    config: EngineConfig,
    pipeline: GenerationPipeline,
    selector: ModelSelector,
}

impl Engine {
    /// Create a builder for configuring an engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Find the saved asset best matching `text` (Retrieve mode).
    pub fn retrieve(&mut self, text: &str) -> Result<Match> {
        self.selector.search(text)
    }

    /// Retrieve with an explicit similarity floor.
    pub fn retrieve_with_threshold(&mut self, text: &str, threshold: f32) -> Result<Match> {
        self.selector.search_with_threshold(text, threshold)
    }

    /// Generate a new asset from `text` (Generate mode).
    pub fn generate(
        &self,
        text: &str,
        model_name: &str,
        overrides: &ConfigOverrides,
    ) -> Result<PipelineResult> {
        self.pipeline.generate(text, model_name, overrides)
    }

    /// Transcribe a recorded audio file to text.
    pub fn transcribe(&self, audio_path: &Path) -> Result<String> {
        self.pipeline.transcribe(audio_path)
    }

    /// Save a generated or imported asset: copy it into the user asset
    /// directory and register its description in the catalog.
    pub fn save_asset(
        &mut self,
        source: &Path,
        filename: &str,
        description: &str,
    ) -> Result<PathBuf> {
        if filename.trim().is_empty() {
            return Err(PromptMeshError::InvalidInput(
                "filename must not be empty".to_string(),
            ));
        }
        if description.trim().is_empty() {
            return Err(PromptMeshError::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }

        let dest = self.config.assets.user_dir.join(filename);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &dest)?;
        self.selector.add(filename, description.trim())?;
        info!(filename, dest = %dest.display(), "asset saved");
        Ok(dest)
    }

    /// Delete a saved asset: remove the file from the user asset
    /// directory (if present) and deregister it from the catalog.
    ///
    /// Returns whether an asset file was actually removed. Bundled assets
    /// are never deleted, and an entry that lives only in the bundled
    /// catalog cannot be tombstoned: the user layer only adds or shadows
    /// keys, so the entry reappears in the merged catalog the next time
    /// it is loaded.
    pub fn delete_asset(&mut self, filename: &str) -> Result<bool> {
        let path = self.config.assets.user_dir.join(filename);
        let existed = path.is_file();
        if existed {
            fs::remove_file(&path)?;
            info!(filename, "asset file deleted");
        }
        self.selector.remove(filename)?;
        Ok(existed)
    }

    /// The merged asset catalog (filename → description).
    pub fn catalog(&self) -> &crate::catalog::Catalog {
        self.selector.catalog()
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Builder for configuring engine instances.
pub struct EngineBuilder {
    config: Option<EngineConfig>,
    embedder: Option<Box<dyn TextEmbedder>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            embedder: None,
        }
    }

    /// Use an explicit configuration instead of the defaults.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom embedding backend.
    pub fn embedder(mut self, embedder: Box<dyn TextEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Build the engine. Without an explicit embedder the default local
    /// model is loaded (requires the `local-embeddings` feature).
    pub fn build(self) -> Result<Engine> {
        let config = self.config.unwrap_or_default();
        let pipeline = GenerationPipeline::new(&config);

        let selector = match self.embedder {
            Some(embedder) => ModelSelector::new(&config, embedder)?,
            #[cfg(feature = "local-embeddings")]
            None => ModelSelector::with_local_embedder(&config)?,
            #[cfg(not(feature = "local-embeddings"))]
            None => {
                return Err(PromptMeshError::Configuration(
                    "no embedder configured and the local-embeddings feature is disabled"
                        .to_string(),
                ));
            }
        };

        Ok(Engine {
            config,
            pipeline,
            selector,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
