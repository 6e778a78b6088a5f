//! The generation pipeline: prompt → image → 3D mesh.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::config::EngineConfig;
use crate::model::{self, ConfigOverrides};
use crate::stage::{
    DiffuseRequest, MeshRequest, StageRunner, TranscribeRequest, Worker,
};
use crate::telemetry;
use crate::{PromptMeshError, Result};

/// Result of one successful pipeline run. Owned transiently by the
/// caller; nothing here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    /// The prompt the asset was generated from.
    pub text: String,
    /// The intermediate image artifact.
    pub image: PathBuf,
    /// The final 3D asset.
    pub model: PathBuf,
}

/// Sequences the two generative stages (diffuse → generate-3d) through
/// the stage runner.
///
/// Stages are strictly ordered: mesh reconstruction never starts before
/// the image artifact is confirmed present on disk. Any stage failure
/// aborts the run immediately with a single terminal error; nothing is
/// retried. Each run uses its own temporary files, so independent runs do
/// not interfere — but there is no internal concurrency within one run.
#[derive(Debug, Clone)]
pub struct GenerationPipeline {
    runner: StageRunner,
}

impl GenerationPipeline {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            runner: StageRunner::new(config),
        }
    }

    /// Generate a 3D asset from `text` using the named diffusion model.
    ///
    /// Resolves the effective model configuration (kind defaults overlaid
    /// with `overrides`), runs the diffusion worker, verifies the image
    /// artifact exists, runs the 3D-reconstruction worker, and verifies
    /// the mesh artifact exists. The existence checks are mandatory: a
    /// worker may exit 0 while having silently failed to write anything.
    pub fn generate(
        &self,
        text: &str,
        model_name: &str,
        overrides: &ConfigOverrides,
    ) -> Result<PipelineResult> {
        let result = self.generate_inner(text, model_name, overrides);
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::PIPELINE_RUNS_TOTAL, "status" => status).increment(1);
        result
    }

    #[instrument(skip(self, overrides), fields(model = model_name))]
    fn generate_inner(
        &self,
        text: &str,
        model_name: &str,
        overrides: &ConfigOverrides,
    ) -> Result<PipelineResult> {
        if text.trim().is_empty() {
            return Err(PromptMeshError::InvalidInput(
                "prompt must not be empty".to_string(),
            ));
        }

        let config = model::resolve(model_name, overrides);
        info!(?config, "starting generation");

        let diffused = self.runner.run(&DiffuseRequest {
            prompt: text.to_string(),
            model_name: model_name.to_string(),
            steps: config.steps,
            guidance_scale: config.guidance_scale,
            seed: config.seed,
            negative_prompt: config.negative_prompt,
            max_sequence_length: config.max_sequence_length,
        })?;
        Self::verify_artifact(Worker::Diffuse, &diffused.image_path)?;
        info!(image = %diffused.image_path.display(), "image artifact ready");

        let meshed = self.runner.run(&MeshRequest {
            image_path: diffused.image_path.clone(),
        })?;
        Self::verify_artifact(Worker::GenerateMesh, &meshed.model_path)?;
        info!(model = %meshed.model_path.display(), "mesh artifact ready");

        Ok(PipelineResult {
            text: text.to_string(),
            image: diffused.image_path,
            model: meshed.model_path,
        })
    }

    /// Transcribe an audio file through the transcription worker.
    ///
    /// An empty transcription is a contract violation: downstream has
    /// nothing to retrieve or generate from.
    #[instrument(skip(self))]
    pub fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let response = self.runner.run(&TranscribeRequest {
            audio_path: audio_path.to_path_buf(),
        })?;
        let text = response.transcription.trim().to_string();
        if text.is_empty() {
            return Err(PromptMeshError::StageContract {
                worker: Worker::Transcribe,
                detail: "empty transcription".to_string(),
            });
        }
        info!(text = %text, "transcription complete");
        Ok(text)
    }

    /// A stage claiming success must leave a real artifact on disk.
    fn verify_artifact(worker: Worker, path: &Path) -> Result<()> {
        if path.is_file() {
            return Ok(());
        }
        Err(PromptMeshError::StageContract {
            worker,
            detail: format!("artifact does not exist: {}", path.display()),
        })
    }
}
