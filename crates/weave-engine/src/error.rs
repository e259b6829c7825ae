use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rope needs at least {required} nodes for {strategy} resampling, got {nodes}")]
    TooFewNodes {
        nodes: usize,
        required: usize,
        strategy: &'static str,
    },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("tube needs at least 3 radial segments, got {0}")]
    TooFewRadialSegments(usize),

    #[error("curve needs at least 2 samples, got {0}")]
    TooFewSamples(usize),

    #[error("layer {name:?} has {actual} pixels, expected {width}x{height}")]
    PixelCount {
        name: String,
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("expected {expected} RGBA8 bytes, got {actual}")]
    ByteCount { expected: usize, actual: usize },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by thread motion requests.
#[derive(Debug, Error)]
pub enum ThreadError {
    #[error("tip speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),

    #[error("tip target is not finite: {0:?}")]
    InvalidTarget(glam::Vec3),
}

/// Reject anything that is not a strictly positive, finite number.
pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

/// Reject values outside an inclusive range (NaN included).
pub(crate) fn ensure_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, min, max })
    }
}
