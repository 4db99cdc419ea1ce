//! Translation options.

use crate::TargetType;

/// Knobs for a pipeline run.
///
/// Defaults match the observed product behavior: unknown types fall back to
/// the native `int`, and the instance parameter is named `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Integer type substituted for source types outside the vocabulary.
    pub fallback_int: TargetType,
    /// Name of the explicit instance parameter in emitted functions.
    pub instance_param: String,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the fallback integer type.
    pub fn with_fallback_int(mut self, ty: TargetType) -> Self {
        self.fallback_int = ty;
        self
    }

    /// Override the instance parameter name.
    pub fn with_instance_param(mut self, name: impl Into<String>) -> Self {
        self.instance_param = name.into();
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            fallback_int: TargetType::Int,
            instance_param: "self".to_string(),
        }
    }
}
