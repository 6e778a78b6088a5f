//! Model kind classification.

/// Closed set of diffusion model kinds, classified from the model name.
///
/// Classification is a pure function of the name string — no I/O, no
/// registry lookup. Each kind carries its own generation defaults (see
/// [`resolve`](super::resolve)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Few-step, zero-guidance distilled models (FLUX.1-schnell family).
    /// The only kind that is sequence-length sensitive.
    Fast,
    /// Latent-consistency models: moderate steps, low guidance.
    Moderate,
    /// Everything else: conventional diffusion defaults.
    Generic,
}

impl ModelKind {
    /// Classify a model name into its kind.
    pub fn classify(model_name: &str) -> Self {
        let name = model_name.to_ascii_lowercase();
        if name.contains("flux") {
            Self::Fast
        } else if name.contains("lcm") {
            Self::Moderate
        } else {
            Self::Generic
        }
    }

    /// Whether this kind's worker consumes `max_sequence_length`.
    pub fn is_sequence_sensitive(&self) -> bool {
        matches!(self, Self::Fast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_names_classify_fast() {
        assert_eq!(ModelKind::classify("flux_1_schnell"), ModelKind::Fast);
        assert_eq!(ModelKind::classify("FLUX.1-dev"), ModelKind::Fast);
    }

    #[test]
    fn lcm_names_classify_moderate() {
        assert_eq!(ModelKind::classify("LCM_Dreamshaper_v7"), ModelKind::Moderate);
        assert_eq!(ModelKind::classify("my-lcm-variant"), ModelKind::Moderate);
    }

    #[test]
    fn other_names_classify_generic() {
        assert_eq!(
            ModelKind::classify("onnx-stable-diffusion-2-1"),
            ModelKind::Generic
        );
        assert_eq!(ModelKind::classify(""), ModelKind::Generic);
    }

    #[test]
    fn only_fast_is_sequence_sensitive() {
        assert!(ModelKind::Fast.is_sequence_sensitive());
        assert!(!ModelKind::Moderate.is_sequence_sensitive());
        assert!(!ModelKind::Generic.is_sequence_sensitive());
    }
}
