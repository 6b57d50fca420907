//! Error taxonomy for the gauge engine.
//!
//! Every fallible operation returns [`GaugeError`]. Errors are raised at the call
//! that violates a contract and propagate straight to the caller; nothing in the
//! engine retries or substitutes a fallback.
//!
//! Value-level clamping (timeline progress, needle position) is designed behavior
//! and never produces an error.

use thiserror::Error;

/// Errors produced by the gauge engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaugeError {
    /// A numeric argument was non-finite or outside its allowed domain.
    #[error("invalid numeric input for `{name}`: {value}")]
    InvalidNumericInput { name: &'static str, value: f64 },

    /// Range bounds were non-finite or not strictly ordered.
    #[error("invalid range: min {min} must be finite and strictly below max {max}")]
    InvalidRange { min: f64, max: f64 },

    /// Tick generator options were rejected.
    #[error("invalid tick options: {reason}")]
    InvalidTickOptions { reason: String },

    /// Trend calculator options were rejected.
    #[error("invalid trend options: {reason}")]
    InvalidTrendOptions { reason: String },

    /// A drawing surface (or its 2D context) could not be created.
    #[error("surface unavailable: {reason}")]
    SurfaceUnavailable { reason: String },

    /// An extension with this id is already registered.
    #[error("duplicate extension id `{id}`")]
    DuplicateExtensionId { id: String },

    /// Extensions must be registered under a non-empty id.
    #[error("extension id must not be empty")]
    EmptyExtensionId,

    /// Offscreen buffer keys must be non-empty and refer to an existing buffer when blitting.
    #[error("invalid buffer key {key:?}")]
    BufferKeyInvalid { key: String },

    /// Surface dimensions must both be positive.
    #[error("invalid surface dimensions {width}x{height}")]
    DimensionInvalid { width: u32, height: u32 },

    /// Easing name did not match any built-in curve.
    #[error("unknown easing `{name}`")]
    UnknownEasing { name: String },

    /// Readout precision above the supported maximum.
    #[error("decimals {decimals} exceeds the maximum of {max}")]
    InvalidDecimals { decimals: usize, max: usize },

    /// Formatted text did not fit its fixed-capacity buffer.
    #[error("text does not fit in {capacity} bytes")]
    TextOverflow { capacity: usize },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = GaugeError> = core::result::Result<T, E>;

/// Reject non-finite numbers with [`GaugeError::InvalidNumericInput`].
#[inline]
pub(crate) fn ensure_finite(
    name: &'static str,
    value: f64,
) -> Result<f64> {
    if value.is_finite() { Ok(value) } else { Err(GaugeError::InvalidNumericInput { name, value }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite_accepts_numbers() {
        assert_eq!(ensure_finite("value", 12.5), Ok(12.5));
        assert_eq!(ensure_finite("value", -0.0), Ok(-0.0));
    }

    #[test]
    fn test_ensure_finite_rejects_nan_and_infinity() {
        assert!(matches!(
            ensure_finite("radius", f64::INFINITY),
            Err(GaugeError::InvalidNumericInput { name: "radius", .. })
        ));
        assert!(ensure_finite("radius", f64::NAN).is_err(), "NaN must be rejected");
    }

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = GaugeError::DuplicateExtensionId { id: "redline".into() };
        assert_eq!(err.to_string(), "duplicate extension id `redline`");

        let err = GaugeError::DimensionInvalid { width: 0, height: 10 };
        assert_eq!(err.to_string(), "invalid surface dimensions 0x10");
    }
}
