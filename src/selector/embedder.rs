//! Description embedding: trait seam plus a local fastembed-backed
//! implementation.

use crate::Result;

/// Produces a fixed-length vector for a description string.
///
/// The selector owns an embedder behind this trait so tests can supply a
/// deterministic stub instead of loading a real model.
pub trait TextEmbedder: Send {
    /// Embed a single text.
    fn embed(&mut self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts. The default embeds sequentially; backends
    /// with real batching should override.
    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Cosine similarity of two vectors. Zero when either vector has zero
/// magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(feature = "local-embeddings")]
pub use local::{FastEmbedder, LocalEmbeddingModel};

#[cfg(feature = "local-embeddings")]
mod local {
    use super::TextEmbedder;
    use crate::{PromptMeshError, Result};

    /// Supported local embedding models.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum LocalEmbeddingModel {
        /// all-MiniLM-L6-v2 (384 dims, fast, good quality). The default.
        #[default]
        AllMiniLmL6V2,
        /// BGE-small-en (384 dims, strong retrieval).
        BgeSmallEn,
    }

    impl LocalEmbeddingModel {
        /// Get the model name for display.
        pub fn name(&self) -> &'static str {
            match self {
                Self::AllMiniLmL6V2 => "all-MiniLM-L6-v2",
                Self::BgeSmallEn => "BGE-small-en",
            }
        }

        /// Get the embedding dimensions.
        pub fn dimensions(&self) -> usize {
            384
        }
    }

    impl From<LocalEmbeddingModel> for fastembed::EmbeddingModel {
        fn from(model: LocalEmbeddingModel) -> Self {
            match model {
                LocalEmbeddingModel::AllMiniLmL6V2 => fastembed::EmbeddingModel::AllMiniLML6V2,
                LocalEmbeddingModel::BgeSmallEn => fastembed::EmbeddingModel::BGESmallENV15,
            }
        }
    }

    /// Local embedding backend using fastembed-rs.
    pub struct FastEmbedder {
        model: fastembed::TextEmbedding,
    }

    impl FastEmbedder {
        /// Create a backend with the specified model.
        ///
        /// Downloads the model if not cached locally. The cache directory
        /// is `$PROMPTMESH_CACHE_DIR`, falling back to the platform cache
        /// dir under `promptmesh/models`.
        pub fn new(model: LocalEmbeddingModel) -> Result<Self> {
            let cache_dir = std::env::var("PROMPTMESH_CACHE_DIR")
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::cache_dir()
                        .unwrap_or_else(|| std::path::PathBuf::from(".cache"))
                        .join("promptmesh")
                        .join("models")
                });

            let options = fastembed::InitOptions::new(model.into())
                .with_show_download_progress(true)
                .with_cache_dir(cache_dir);

            let model_instance = fastembed::TextEmbedding::try_new(options).map_err(|e| {
                PromptMeshError::Configuration(format!("Failed to load embedding model: {}", e))
            })?;

            Ok(Self {
                model: model_instance,
            })
        }
    }

    impl TextEmbedder for FastEmbedder {
        fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
            let vectors = self
                .model
                .embed(vec![text.to_string()], None)
                .map_err(|e| PromptMeshError::Embedding(format!("Embedding failed: {}", e)))?;
            vectors
                .into_iter()
                .next()
                .ok_or_else(|| PromptMeshError::Embedding("No embedding returned".to_string()))
        }

        fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            let texts_owned: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
            self.model
                .embed(texts_owned, None)
                .map_err(|e| PromptMeshError::Embedding(format!("Batch embedding failed: {}", e)))
        }
    }
}
