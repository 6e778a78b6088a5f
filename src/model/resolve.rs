//! Effective per-model configuration: kind defaults overlaid with user
//! overrides.

use serde::{Deserialize, Serialize};

use super::ModelKind;

/// Effective generation parameters for one named model.
///
/// Always contains `steps`, `guidance_scale`, and `seed`.
/// `max_sequence_length` defaults on only for the sequence-sensitive kind;
/// `negative_prompt` is present only if non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub steps: u32,
    pub guidance_scale: f32,
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sequence_length: Option<u32>,
}

impl ModelConfig {
    /// Kind-specific defaults.
    fn defaults(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Fast => Self {
                steps: 4,
                guidance_scale: 0.0,
                seed: 0,
                negative_prompt: None,
                max_sequence_length: Some(256),
            },
            ModelKind::Moderate => Self {
                steps: 8,
                guidance_scale: 1.5,
                seed: 0,
                negative_prompt: None,
                max_sequence_length: None,
            },
            ModelKind::Generic => Self {
                steps: 20,
                guidance_scale: 1.5,
                seed: 0,
                negative_prompt: None,
                max_sequence_length: None,
            },
        }
    }
}

/// User overrides for generation parameters (all optional).
///
/// An absent (`None`) field never clears a default — overrides only
/// replace values they actually carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sequence_length: Option<u32>,
}

impl ConfigOverrides {
    pub fn steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn guidance_scale(mut self, scale: f32) -> Self {
        self.guidance_scale = Some(scale);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn negative_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(prompt.into());
        self
    }

    pub fn max_sequence_length(mut self, len: u32) -> Self {
        self.max_sequence_length = Some(len);
        self
    }
}

/// Compute the effective configuration for `model_name`.
///
/// Classifies the name into a [`ModelKind`], takes that kind's defaults,
/// and overlays `overrides` field by field. A whitespace-only
/// `negative_prompt` is dropped rather than forwarded.
pub fn resolve(model_name: &str, overrides: &ConfigOverrides) -> ModelConfig {
    let kind = ModelKind::classify(model_name);
    let mut config = ModelConfig::defaults(kind);

    if let Some(steps) = overrides.steps {
        config.steps = steps;
    }
    if let Some(scale) = overrides.guidance_scale {
        config.guidance_scale = scale;
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    if let Some(prompt) = &overrides.negative_prompt {
        let trimmed = prompt.trim();
        if !trimmed.is_empty() {
            config.negative_prompt = Some(trimmed.to_string());
        }
    }
    if let Some(len) = overrides.max_sequence_length {
        config.max_sequence_length = Some(len);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_defaults() {
        let config = resolve("flux_1_schnell", &ConfigOverrides::default());
        assert_eq!(config.steps, 4);
        assert_eq!(config.guidance_scale, 0.0);
        assert_eq!(config.seed, 0);
        assert_eq!(config.max_sequence_length, Some(256));
        assert_eq!(config.negative_prompt, None);
    }

    #[test]
    fn moderate_defaults() {
        let config = resolve("LCM_Dreamshaper_v7", &ConfigOverrides::default());
        assert_eq!(config.steps, 8);
        assert_eq!(config.guidance_scale, 1.5);
        assert_eq!(config.max_sequence_length, None);
    }

    #[test]
    fn generic_defaults() {
        let config = resolve("onnx-stable-diffusion-2-1", &ConfigOverrides::default());
        assert_eq!(config.steps, 20);
        assert_eq!(config.guidance_scale, 1.5);
        assert_eq!(config.max_sequence_length, None);
    }

    #[test]
    fn override_replaces_single_field_only() {
        let config = resolve("flux_1_schnell", &ConfigOverrides::default().steps(8));
        assert_eq!(config.steps, 8);
        // Everything else unchanged
        assert_eq!(config.guidance_scale, 0.0);
        assert_eq!(config.seed, 0);
        assert_eq!(config.max_sequence_length, Some(256));
    }

    #[test]
    fn absent_override_never_clears_a_default() {
        let empty = resolve("flux_1_schnell", &ConfigOverrides::default());
        let explicit_none = resolve(
            "flux_1_schnell",
            &ConfigOverrides {
                steps: None,
                ..Default::default()
            },
        );
        assert_eq!(empty, explicit_none);
    }

    #[test]
    fn blank_negative_prompt_is_dropped() {
        let config = resolve(
            "LCM_Dreamshaper_v7",
            &ConfigOverrides::default().negative_prompt("   "),
        );
        assert_eq!(config.negative_prompt, None);

        let config = resolve(
            "LCM_Dreamshaper_v7",
            &ConfigOverrides::default().negative_prompt("  blurry, low quality "),
        );
        assert_eq!(
            config.negative_prompt.as_deref(),
            Some("blurry, low quality")
        );
    }

    #[test]
    fn explicit_sequence_length_passes_through_on_any_kind() {
        // Non-Fast kinds get no default, but an explicit override is the
        // caller's to make; the worker ignores keys it does not consume.
        let config = resolve(
            "onnx-stable-diffusion-2-1",
            &ConfigOverrides::default().max_sequence_length(512),
        );
        assert_eq!(config.max_sequence_length, Some(512));
    }
}
