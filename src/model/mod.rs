//! Diffusion model classification and per-model configuration resolution.

mod kind;
mod resolve;

pub use kind::ModelKind;
pub use resolve::{resolve, ConfigOverrides, ModelConfig};

/// Diffusion model names the application ships presets for.
///
/// Any other name resolves to [`ModelKind::Generic`] defaults; this list
/// only feeds UI surfaces such as the CLI.
pub const KNOWN_MODELS: &[&str] = &[
    "onnx-stable-diffusion-2-1",
    "flux_1_schnell",
    "LCM_Dreamshaper_v7",
];
