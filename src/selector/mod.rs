//! Semantic retrieval over the saved-asset catalog.
//!
//! The selector keeps an in-memory embedding per catalog description and
//! answers nearest-neighbor queries by cosine similarity. Embeddings are a
//! derived, disposable cache over the catalog — never persisted, recomputed
//! from the catalog text at construction and after every mutation. The
//! full rebuild-on-write is deliberate: catalogs are tens to low hundreds
//! of entries, and exact index/catalog consistency is worth more than
//! incremental update cost.

mod embedder;

pub use embedder::{cosine_similarity, TextEmbedder};

#[cfg(feature = "local-embeddings")]
pub use embedder::{FastEmbedder, LocalEmbeddingModel};

use std::path::PathBuf;

use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogStore};
use crate::config::EngineConfig;
use crate::telemetry;
use crate::Result;

/// Similarity floor below which a query has no match.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;

/// Outcome of a retrieval query. A miss is a normal result, not an error:
/// `path` is `None` and `score` is the best similarity seen (0.0 for an
/// empty catalog or a stale entry).
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub path: Option<PathBuf>,
    pub score: f32,
}

/// Embedding-based retrieval index over the asset catalog.
pub struct ModelSelector {
    store: CatalogStore,
    user_asset_dir: PathBuf,
    bundled_asset_dir: PathBuf,
    embedder: Box<dyn TextEmbedder>,
    catalog: Catalog,
    // Parallel to catalog iteration order (stable: BTreeMap).
    embeddings: Vec<Vec<f32>>,
}

impl ModelSelector {
    /// Build a selector over the catalog described by `config`, embedding
    /// every description up front.
    pub fn new(config: &EngineConfig, embedder: Box<dyn TextEmbedder>) -> Result<Self> {
        let store = CatalogStore::new(config);
        let catalog = store.load();
        let mut selector = Self {
            store,
            user_asset_dir: config.assets.user_dir.clone(),
            bundled_asset_dir: config.assets.bundled_dir.clone(),
            embedder,
            catalog,
            embeddings: Vec::new(),
        };
        selector.embeddings =
            Self::embed_catalog(selector.embedder.as_mut(), &selector.catalog)?;
        debug!(entries = selector.catalog.len(), "embedding index built");
        Ok(selector)
    }

    /// Build a selector with the default local embedding model.
    #[cfg(feature = "local-embeddings")]
    pub fn with_local_embedder(config: &EngineConfig) -> Result<Self> {
        let embedder = FastEmbedder::new(LocalEmbeddingModel::default())?;
        Self::new(config, Box::new(embedder))
    }

    /// Find the best-matching saved asset for `query` at the default
    /// threshold.
    pub fn search(&mut self, query: &str) -> Result<Match> {
        self.search_with_threshold(query, DEFAULT_SCORE_THRESHOLD)
    }

    /// Find the best-matching saved asset for `query`.
    ///
    /// `threshold` is a similarity floor, not a rank cutoff. Ties at the
    /// maximum break by catalog order (first encountered wins). A winning
    /// entry whose file no longer exists in either asset directory is a
    /// stale entry and reports `(None, 0.0)`.
    pub fn search_with_threshold(&mut self, query: &str, threshold: f32) -> Result<Match> {
        if self.catalog.is_empty() {
            return Ok(self.record_query(Match {
                path: None,
                score: 0.0,
            }));
        }

        let query_embedding = self.embedder.embed(query)?;

        let mut best_score = f32::NEG_INFINITY;
        let mut best_filename: Option<&str> = None;
        for (filename, embedding) in self.catalog.keys().zip(&self.embeddings) {
            let score = cosine_similarity(&query_embedding, embedding);
            if score > best_score {
                best_score = score;
                best_filename = Some(filename);
            }
        }

        if best_score < threshold {
            debug!(query, best_score, threshold, "no catalog entry above threshold");
            return Ok(self.record_query(Match {
                path: None,
                score: best_score,
            }));
        }

        // Unreachable for a non-empty catalog, but don't panic on it.
        let Some(filename) = best_filename else {
            return Ok(self.record_query(Match {
                path: None,
                score: 0.0,
            }));
        };

        let resolved = self.resolve_asset_path(filename);
        let matched = match resolved {
            Some(path) => {
                debug!(query, filename, best_score, "retrieval hit");
                Match {
                    path: Some(path),
                    score: best_score,
                }
            }
            None => {
                // Stale catalog entry: treated as no match, not an error.
                debug!(query, filename, "catalog entry has no asset file");
                Match {
                    path: None,
                    score: 0.0,
                }
            }
        };
        Ok(self.record_query(matched))
    }

    /// Insert or overwrite a catalog entry, persist, and rebuild the
    /// index. On failure the previous catalog and index are left intact.
    pub fn add(&mut self, filename: impl Into<String>, description: impl Into<String>) -> Result<()> {
        let filename = filename.into();
        let mut next = self.catalog.clone();
        next.insert(filename.clone(), description.into());
        self.commit(next)?;
        info!(filename = %filename, "added catalog entry");
        Ok(())
    }

    /// Delete a catalog entry if present, persist, and rebuild the index.
    /// A no-op for an absent filename; on failure the previous catalog
    /// and index are left intact.
    pub fn remove(&mut self, filename: &str) -> Result<()> {
        if !self.catalog.contains_key(filename) {
            return Ok(());
        }
        let mut next = self.catalog.clone();
        next.remove(filename);
        self.commit(next)?;
        info!(filename, "removed catalog entry");
        Ok(())
    }

    /// The current merged catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve a catalog filename to a concrete asset path: writable/user
    /// directory first, then the bundled directory.
    fn resolve_asset_path(&self, filename: &str) -> Option<PathBuf> {
        let user_path = self.user_asset_dir.join(filename);
        if user_path.is_file() {
            return Some(user_path);
        }
        let bundled_path = self.bundled_asset_dir.join(filename);
        if bundled_path.is_file() {
            return Some(bundled_path);
        }
        None
    }

    /// Persist `next` and swap it in together with freshly computed
    /// embeddings. Embedding and persisting both happen before the swap,
    /// so an error on either leaves the current catalog and index
    /// untouched and mutually consistent.
    fn commit(&mut self, next: Catalog) -> Result<()> {
        let embeddings = Self::embed_catalog(self.embedder.as_mut(), &next)?;
        self.store.save(&next)?;
        self.catalog = next;
        self.embeddings = embeddings;
        metrics::counter!(telemetry::INDEX_REBUILDS_TOTAL).increment(1);
        debug!(entries = self.catalog.len(), "embedding index rebuilt");
        Ok(())
    }

    /// Embed every description in `catalog`, in catalog order.
    fn embed_catalog(
        embedder: &mut dyn TextEmbedder,
        catalog: &Catalog,
    ) -> Result<Vec<Vec<f32>>> {
        let descriptions: Vec<&str> = catalog.values().map(String::as_str).collect();
        if descriptions.is_empty() {
            Ok(Vec::new())
        } else {
            embedder.embed_batch(&descriptions)
        }
    }

    fn record_query(&self, matched: Match) -> Match {
        let status = if matched.path.is_some() { "hit" } else { "miss" };
        metrics::counter!(telemetry::RETRIEVAL_QUERIES_TOTAL, "status" => status).increment(1);
        matched
    }
}
