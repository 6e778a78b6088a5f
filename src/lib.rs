//! Promptmesh - text-to-3D asset engine
//!
//! This crate turns a natural-language description of an object into a
//! displayable 3D asset, either by retrieving a previously saved asset
//! via semantic similarity or by generating a new one through a chain of
//! external generative workers (text → image → 3D mesh). The workers are
//! opaque subprocesses spoken to over a file-based JSON contract; the GUI,
//! audio capture, and viewer are external collaborators that call into
//! this crate and render its results.
//!
//! # Retrieve Example
//!
//! ```rust,no_run
//! use promptmesh::Engine;
//!
//! fn main() -> promptmesh::Result<()> {
//!     let mut engine = Engine::builder().build()?;
//!
//!     let matched = engine.retrieve("a blue sphere")?;
//!     match matched.path {
//!         Some(path) => println!("load {} (score {:.2})", path.display(), matched.score),
//!         None => println!("no saved asset matches"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Generate Example
//!
//! ```rust,no_run
//! use promptmesh::{ConfigOverrides, Engine};
//!
//! fn main() -> promptmesh::Result<()> {
//!     let engine = Engine::builder().build()?;
//!
//!     let result = engine.generate(
//!         "a red chair",
//!         "flux_1_schnell",
//!         &ConfigOverrides::default().seed(42),
//!     )?;
//!     println!("mesh at {}", result.model.display());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
mod engine;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod selector;
pub mod stage;
pub mod telemetry;

// Re-export main types at crate root
pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder};
pub use error::{PromptMeshError, Result};
pub use model::{resolve, ConfigOverrides, ModelConfig, ModelKind, KNOWN_MODELS};
pub use pipeline::{GenerationPipeline, PipelineResult};
pub use selector::{Match, ModelSelector, TextEmbedder, DEFAULT_SCORE_THRESHOLD};
pub use stage::{StageRunner, Worker};

// Re-export the local embedding backend when the feature is enabled
#[cfg(feature = "local-embeddings")]
pub use selector::{FastEmbedder, LocalEmbeddingModel};
