//! RGBA pixel format with alpha blending.
//!
//! Reads and writes RGBA32 pixels (4 bytes per pixel, non-premultiplied
//! alpha) in a [`RowAccessor`], blending with the `Rgba8` fixed-point
//! helpers.
//!
//! Provides the `PixelFormat` trait and `PixfmtRgba32` concrete implementation.

use crate::basics::CoverType;
use crate::color::Rgba8;
use crate::rendering_buffer::RowAccessor;

// ============================================================================
// PixelFormat trait
// ============================================================================

/// Trait for pixel formats that can read and blend colors.
///
/// Coordinates are not checked here; the renderer clips before calling in.
pub trait PixelFormat {
    type ColorType;

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Blend a single pixel at (x, y) with color `c` and coverage `cover`.
    fn blend_pixel(&mut self, x: i32, y: i32, c: &Self::ColorType, cover: CoverType);

    /// Get the pixel color at (x, y).
    fn pixel(&self, x: i32, y: i32) -> Self::ColorType;
}

// ============================================================================
// PixfmtRgba32: non-premultiplied RGBA, 8 bits per channel
// ============================================================================

/// Pixel format for non-premultiplied RGBA32 (4 bytes per pixel).
/// Component order: R=0, G=1, B=2, A=3.
pub struct PixfmtRgba32<'a> {
    rbuf: RowAccessor<'a>,
}

const BPP: usize = 4; // bytes per pixel

impl<'a> PixfmtRgba32<'a> {
    pub fn new(rbuf: RowAccessor<'a>) -> Self {
        Self { rbuf }
    }

    /// The underlying buffer.
    pub fn rbuf(&self) -> &RowAccessor<'a> {
        &self.rbuf
    }

    #[inline]
    fn pix_mut(&mut self, x: i32, y: i32) -> &mut [u8] {
        let off = x as usize * BPP;
        &mut self.rbuf.row_slice_mut(y as u32)[off..off + BPP]
    }

    /// Overwrite a single pixel.
    #[inline]
    fn copy_pixel(&mut self, x: i32, y: i32, c: &Rgba8) {
        c.write_to(self.pix_mut(x, y));
    }

    /// Blend a single pixel (internal helper, no bounds checking).
    #[inline]
    fn blend_pix(p: &mut [u8], cr: u8, cg: u8, cb: u8, alpha: u8) {
        p[0] = Rgba8::lerp(p[0], cr, alpha);
        p[1] = Rgba8::lerp(p[1], cg, alpha);
        p[2] = Rgba8::lerp(p[2], cb, alpha);
        p[3] = Rgba8::lerp(p[3], 255, alpha);
    }
}

impl<'a> PixelFormat for PixfmtRgba32<'a> {
    type ColorType = Rgba8;

    fn width(&self) -> u32 {
        self.rbuf.width()
    }

    fn height(&self) -> u32 {
        self.rbuf.height()
    }

    fn pixel(&self, x: i32, y: i32) -> Rgba8 {
        let off = x as usize * BPP;
        Rgba8::from_slice(&self.rbuf.row_slice(y as u32)[off..off + BPP])
    }

    fn blend_pixel(&mut self, x: i32, y: i32, c: &Rgba8, cover: CoverType) {
        let alpha = Rgba8::mult_cover(c.a, cover);
        if alpha == 255 {
            self.copy_pixel(x, y, &Rgba8::new_opaque(c.r as u32, c.g as u32, c.b as u32));
        } else if alpha > 0 {
            Self::blend_pix(self.pix_mut(x, y), c.r, c.g, c.b, alpha);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
