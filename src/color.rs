//! Color type and 8-bit channel arithmetic.
//!
//! `Rgba8` is a non-premultiplied RGBA pixel with u8 components, laid out in
//! memory as R, G, B, A, the order used by every buffer in this crate.

use crate::basics::CoverType;

/// RGBA component order: R=0, G=1, B=2, A=3
pub struct OrderRgba;
impl OrderRgba {
    pub const R: usize = 0;
    pub const G: usize = 1;
    pub const B: usize = 2;
    pub const A: usize = 3;
    pub const N: usize = 4;
}

// ============================================================================
// Rgba8 (8-bit per channel)
// ============================================================================

/// RGBA color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BASE_SHIFT: u32 = 8;
    pub const BASE_SCALE: u32 = 1 << Self::BASE_SHIFT;
    pub const BASE_MASK: u32 = Self::BASE_SCALE - 1;
    pub const BASE_MSB: u32 = 1 << (Self::BASE_SHIFT - 1);

    pub fn new(r: u32, g: u32, b: u32, a: u32) -> Self {
        Self {
            r: r as u8,
            g: g as u8,
            b: b as u8,
            a: a as u8,
        }
    }

    pub fn new_opaque(r: u32, g: u32, b: u32) -> Self {
        Self::new(r, g, b, Self::BASE_MASK)
    }

    /// Read a pixel from the first four bytes of `p`.
    #[inline]
    pub fn from_slice(p: &[u8]) -> Self {
        Self {
            r: p[OrderRgba::R],
            g: p[OrderRgba::G],
            b: p[OrderRgba::B],
            a: p[OrderRgba::A],
        }
    }

    /// Write this pixel into the first four bytes of `p`.
    #[inline]
    pub fn write_to(&self, p: &mut [u8]) {
        p[OrderRgba::R] = self.r;
        p[OrderRgba::G] = self.g;
        p[OrderRgba::B] = self.b;
        p[OrderRgba::A] = self.a;
    }

    /// Fixed-point multiply, exact over u8.
    /// `(a * b + 128) >> 8`, with rounding correction.
    #[inline]
    pub fn multiply(a: u8, b: u8) -> u8 {
        let t: u32 = a as u32 * b as u32 + Self::BASE_MSB;
        (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT) as u8
    }

    /// Multiply a color component by a cover.
    #[inline]
    pub fn mult_cover(a: u8, b: CoverType) -> u8 {
        Self::multiply(a, b)
    }

    /// Interpolate p to q by a.
    #[inline]
    pub fn lerp(p: u8, q: u8, a: u8) -> u8 {
        let t = (q as i32 - p as i32) * a as i32 + Self::BASE_MSB as i32 - (p > q) as i32;
        (p as i32 + (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT)) as u8
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_round_trip() {
        let mut buf = [0u8; 8];
        let c = Rgba8::new(10, 20, 30, 40);
        c.write_to(&mut buf[4..]);
        assert_eq!(buf, [0, 0, 0, 0, 10, 20, 30, 40]);
        assert_eq!(Rgba8::from_slice(&buf[4..]), c);
    }

    #[test]
    fn test_new_opaque() {
        assert_eq!(Rgba8::new_opaque(1, 2, 3), Rgba8::new(1, 2, 3, 255));
        assert_eq!(Rgba8::mult_cover(255, 128), 128);
    }

    #[test]
    fn test_multiply() {
        assert_eq!(Rgba8::multiply(255, 255), 255);
        assert_eq!(Rgba8::multiply(255, 0), 0);
        assert_eq!(Rgba8::multiply(128, 255), 128);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(Rgba8::lerp(0, 255, 0), 0);
        assert_eq!(Rgba8::lerp(0, 255, 255), 255);
        assert_eq!(Rgba8::lerp(100, 200, 128), 150);
        assert_eq!(Rgba8::lerp(200, 100, 255), 100);
    }
}
