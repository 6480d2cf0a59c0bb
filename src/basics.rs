//! Foundation types and numeric helpers.
//!
//! Rectangles, rounding, and the saturating 8-bit store that every filter in
//! this crate funnels its results through.

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Floor a double to the nearest integer toward negative infinity.
#[inline]
pub fn ifloor(v: f64) -> i32 {
    let i = v as i32;
    i - (i as f64 > v) as i32
}

/// Ceiling of a double as a signed integer.
#[inline]
pub fn iceil(v: f64) -> i32 {
    v.ceil() as i32
}

// ============================================================================
// Saturating storage
// ============================================================================

/// Store a channel value into 8 bits.
///
/// Truncates toward zero and clamps to `[0, 255]`; NaN stores as 0.
/// Intermediate arithmetic stays wide (integer sums or `f64`) and only the
/// final write goes through this function.
#[inline]
pub fn saturate_u8(v: f64) -> u8 {
    if v >= 255.0 {
        255
    } else if v > 0.0 {
        v as u8
    } else {
        0
    }
}

/// Integer flavour of [`saturate_u8`] for running window sums.
#[inline]
pub fn saturate_u8_from_sum(v: u64) -> u8 {
    v.min(255) as u8
}

// ============================================================================
// Cover (anti-aliasing) constants
// ============================================================================

/// The type used for coverage values when blending.
pub type CoverType = u8;

pub const COVER_FULL: CoverType = 255;

// ============================================================================
// Rect
// ============================================================================

/// A rectangle defined by two corner points.
///
/// Integer rectangles are inclusive on both corners (pixel boxes); floating
/// point rectangles describe geometry and are half-open on `x2`/`y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy + PartialOrd> Rect<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Clip this rectangle to the intersection with `r`.
    /// Returns `true` if the result is a valid (non-empty) rectangle.
    pub fn clip(&mut self, r: &Self) -> bool {
        if self.x2 > r.x2 {
            self.x2 = r.x2;
        }
        if self.y2 > r.y2 {
            self.y2 = r.y2;
        }
        if self.x1 < r.x1 {
            self.x1 = r.x1;
        }
        if self.y1 < r.y1 {
            self.y1 = r.y1;
        }
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Returns `true` if the rectangle is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }
}

impl Rect<f64> {
    /// Build a geometric rectangle from origin and size, the way drawing
    /// APIs take their arguments.
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Integer pixel box whose pixel centers fall inside this rectangle.
    /// The result is invalid (`x1 > x2`) when no center is covered.
    pub fn pixel_box(&self) -> RectI {
        RectI::new(
            iceil(self.x1 - 0.5),
            iceil(self.y1 - 0.5),
            iceil(self.x2 - 0.5) - 1,
            iceil(self.y2 - 0.5) - 1,
        )
    }
}

/// Compute the intersection of two rectangles.
pub fn intersect_rectangles<T: Copy + PartialOrd>(r1: &Rect<T>, r2: &Rect<T>) -> Rect<T> {
    let mut r = *r1;
    r.clip(r2);
    r
}

/// Rectangle with `i32` coordinates.
pub type RectI = Rect<i32>;
/// Rectangle with `f64` coordinates.
pub type RectD = Rect<f64>;

// ============================================================================
// Tests
// ============================================================================
