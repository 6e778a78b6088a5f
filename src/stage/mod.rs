//! Stage workers and the file-based IPC contract.
//!
//! Each pipeline stage is backed by one external worker process. A worker
//! is invoked with exactly two positional arguments — the path of a JSON
//! request file and the path of a JSON response file it must create. Exit
//! code 0 means the response file is authoritative; nonzero means failure
//! regardless of the response file's contents.
//!
//! This module is the only place untyped JSON is touched: requests and
//! responses cross the wire as the closed record types in [`types`], and
//! the runner inspects the raw response envelope for an `"error"` key
//! before deserializing the success payload.

mod runner;
pub mod types;

pub use runner::StageRunner;
pub use types::{
    DiffuseRequest, DiffuseResponse, MeshRequest, MeshResponse, StageRequest, TranscribeRequest,
    TranscribeResponse,
};

/// Identity of an external stage worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Worker {
    /// Speech-to-text (audio file → transcription).
    Transcribe,
    /// Text-to-image diffusion (prompt → image file).
    Diffuse,
    /// Image-to-mesh reconstruction (image file → 3D asset file).
    GenerateMesh,
}

impl Worker {
    /// Stable worker name, used in error messages and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transcribe => "transcribe",
            Self::Diffuse => "diffuse",
            Self::GenerateMesh => "generate-3d",
        }
    }
}

impl std::fmt::Display for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
