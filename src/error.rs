//! Error types
//!
//! Shading itself never fails: degeneracies are absorbed by clamps and
//! epsilon floors. Errors only come from rejecting configuration.

/// Errors produced when validating renderer configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// Shadow map resolution is zero or larger than the supported maximum.
    #[error("shadow map resolution must be in 1..={max}, got {resolution}")]
    InvalidShadowResolution { resolution: u32, max: u32 },

    /// PCF radius would produce an unreasonably large kernel.
    #[error("pcf radius must be <= {max}, got {radius}")]
    InvalidPcfRadius { radius: u32, max: u32 },

    /// A bias or threshold was negative or not finite.
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidScalar { name: &'static str, value: f32 },

    /// Area light grid must have at least one sample per side.
    #[error("area light grid must be in 1..={max}, got {grid}")]
    InvalidAreaGrid { grid: u32, max: u32 },

    /// Render target dimensions must be non-zero.
    #[error("frame size must be non-zero, got {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },
}

/// Result alias for fallible configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Reject values that are negative, NaN or infinite.
pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidScalar { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative() {
        assert!(non_negative("bias", 0.0).is_ok());
        assert!(non_negative("bias", 0.5).is_ok());
        assert_eq!(
            non_negative("bias", -1.0),
            Err(Error::InvalidScalar {
                name: "bias",
                value: -1.0
            })
        );
        assert!(non_negative("bias", f32::NAN).is_err());
        assert!(non_negative("bias", f32::INFINITY).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidShadowResolution {
            resolution: 0,
            max: 8192,
        };
        assert_eq!(
            err.to_string(),
            "shadow map resolution must be in 1..=8192, got 0"
        );
    }
}
