//! Error type shared by the filters.

use thiserror::Error;

/// Errors reported by the blur and compositing entry points.
///
/// Degenerate geometry (zero sizes, zero radii) is not an error; those calls
/// return `Ok(())` without touching the buffer.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FilterError {
    /// The pixel slice does not hold exactly `width * height` RGBA32 pixels.
    #[error("buffer of {len} bytes does not match {width}x{height} RGBA32 pixels")]
    InvalidDimensions {
        width: usize,
        height: usize,
        len: usize,
    },
    /// A standard deviation was negative, infinite or NaN.
    #[error("invalid standard deviation {0}")]
    InvalidStdDeviation(f64),
    /// A blit source rectangle reaches outside its image.
    #[error("source rectangle {width}x{height} at ({x}, {y}) lies outside the image")]
    SourceOutOfBounds {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Check that `len` bytes hold exactly `width * height` RGBA32 pixels.
pub(crate) fn check_rgba32_len(width: usize, height: usize, len: usize) -> Result<(), FilterError> {
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4));
    if expected == Some(len) {
        Ok(())
    } else {
        Err(FilterError::InvalidDimensions { width, height, len })
    }
}
