//! Blocking execution of a single stage worker process.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::telemetry;
use crate::{PromptMeshError, Result};

use super::types::StageRequest;
use super::Worker;

/// Executes one external worker process per call, enforcing the file-based
/// IPC contract.
///
/// The request and response files live in a scoped temporary directory
/// that is removed on every exit path, including spawn failure; nothing is
/// ever left in the caller's working directory. The call blocks until the
/// worker exits. Failures are never retried here — retry policy, if any,
/// belongs to the caller.
#[derive(Debug, Clone)]
pub struct StageRunner {
    transcribe_bin: PathBuf,
    diffuse_bin: PathBuf,
    generate_mesh_bin: PathBuf,
}

impl StageRunner {
    /// Create a runner with worker binary paths taken from the config.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            transcribe_bin: config.transcribe_bin(),
            diffuse_bin: config.diffuse_bin(),
            generate_mesh_bin: config.generate_mesh_bin(),
        }
    }

    fn worker_bin(&self, worker: Worker) -> &PathBuf {
        match worker {
            Worker::Transcribe => &self.transcribe_bin,
            Worker::Diffuse => &self.diffuse_bin,
            Worker::GenerateMesh => &self.generate_mesh_bin,
        }
    }

    /// Run one worker invocation: serialize the request, spawn the worker
    /// with `<input> <output>`, wait for exit, and classify the outcome.
    ///
    /// - Nonzero exit → [`PromptMeshError::StageExecution`]; the response
    ///   file is not trusted.
    /// - Exit 0 with an `"error"` envelope → [`PromptMeshError::StageReported`].
    /// - Exit 0 with a missing/malformed success payload →
    ///   [`PromptMeshError::StageContract`].
    pub fn run<R: StageRequest>(&self, request: &R) -> Result<R::Response> {
        let worker = R::WORKER;
        let started = Instant::now();
        let result = self.run_inner(worker, request);
        Self::record_stage(worker, started, result.is_ok());
        result
    }

    fn run_inner<R: StageRequest>(&self, worker: Worker, request: &R) -> Result<R::Response> {
        let bin = self.worker_bin(worker);
        let dir = tempfile::tempdir()?;
        let input_path = dir.path().join("request.json");
        let output_path = dir.path().join("response.json");

        fs::write(&input_path, serde_json::to_vec(request)?)?;

        debug!(%worker, bin = %bin.display(), "invoking stage worker");
        let status = Command::new(bin)
            .arg(&input_path)
            .arg(&output_path)
            .status()
            .map_err(|source| PromptMeshError::Spawn { worker, source })?;

        if !status.success() {
            warn!(%worker, code = ?status.code(), "stage worker exited nonzero");
            return Err(PromptMeshError::StageExecution {
                worker,
                code: status.code(),
            });
        }

        let raw = fs::read_to_string(&output_path).map_err(|e| PromptMeshError::StageContract {
            worker,
            detail: format!("response file unreadable: {e}"),
        })?;
        let envelope: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| PromptMeshError::StageContract {
                worker,
                detail: format!("response is not valid JSON: {e}"),
            })?;

        if let Some(message) = envelope.get("error") {
            let message = message
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| message.to_string());
            return Err(PromptMeshError::StageReported { worker, message });
        }

        serde_json::from_value(envelope).map_err(|e| PromptMeshError::StageContract {
            worker,
            detail: format!("missing or malformed success payload: {e}"),
        })
    }

    /// Record stage outcome metrics (counter + histogram).
    fn record_stage(worker: Worker, started: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::STAGE_RUNS_TOTAL,
            "worker" => worker.name(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::STAGE_DURATION_SECONDS,
            "worker" => worker.name(),
        )
        .record(started.elapsed().as_secs_f64());
    }
}
