use thiserror::Error;

/// Top-level error type for track generation.
#[derive(Debug, Error)]
pub enum TrackgenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors raised while validating configuration or loading assets.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("invalid cross-section profile: {0}")]
    InvalidProfile(String),
}

/// Errors raised by the point generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("could not satisfy point constraints after {attempts} attempts")]
    ConstraintsUnsatisfied { attempts: usize },
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),

    #[error("tessellation failed: {0}")]
    Failed(String),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for results using [`TrackgenError`].
pub type Result<T> = std::result::Result<T, TrackgenError>;
