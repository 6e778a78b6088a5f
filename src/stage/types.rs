//! Typed request/response records for each stage worker.
//!
//! The wire format is a flat JSON object per worker. Optional request
//! fields are omitted entirely rather than sent as null, so a worker's
//! own defaulting applies. Unknown keys in a request are the worker's
//! business to ignore, not ours to strip.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::Worker;

/// A request that can be dispatched to a stage worker.
///
/// Ties together the worker identity and the response record the worker
/// must produce, so [`StageRunner::run`](super::StageRunner::run) is typed
/// end to end.
pub trait StageRequest: Serialize {
    /// The success payload this worker writes on exit 0.
    type Response: DeserializeOwned;

    /// The worker this request is addressed to.
    const WORKER: Worker;
}

/// Request for the transcription worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeRequest {
    pub audio_path: PathBuf,
}

/// Success payload of the transcription worker.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscribeResponse {
    pub transcription: String,
}

impl StageRequest for TranscribeRequest {
    type Response = TranscribeResponse;
    const WORKER: Worker = Worker::Transcribe;
}

/// Request for the diffusion worker.
///
/// `prompt` and `model_name` are required by the worker contract; the
/// remaining fields are the resolved generation parameters flattened in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffuseRequest {
    pub prompt: String,
    pub model_name: String,
    pub steps: u32,
    pub guidance_scale: f32,
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sequence_length: Option<u32>,
}

/// Success payload of the diffusion worker.
#[derive(Debug, Clone, Deserialize)]
pub struct DiffuseResponse {
    pub image_path: PathBuf,
}

impl StageRequest for DiffuseRequest {
    type Response = DiffuseResponse;
    const WORKER: Worker = Worker::Diffuse;
}

/// Request for the 3D-reconstruction worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshRequest {
    pub image_path: PathBuf,
}

/// Success payload of the 3D-reconstruction worker.
#[derive(Debug, Clone, Deserialize)]
pub struct MeshResponse {
    pub model_path: PathBuf,
}

impl StageRequest for MeshRequest {
    type Response = MeshResponse;
    const WORKER: Worker = Worker::GenerateMesh;
}
