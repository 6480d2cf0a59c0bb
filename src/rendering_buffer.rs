//! Rendering buffer: row-oriented access to packed RGBA32 pixel data.
//!
//! Two views over caller-owned memory:
//!
//! - [`RowAccessor`]: exclusive, mutable view. Filters that work in place
//!   take one of these, so the buffer cannot be aliased for the duration of
//!   the call.
//! - [`ImageView`]: shared, read-only view used as a blit source.
//!
//! Both are packed (row stride is `width * 4`) and check the slice length at
//! construction.

use crate::color::Rgba8;
use crate::error::{check_rgba32_len, FilterError};

const BPP: usize = 4; // bytes per pixel

// ============================================================================
// RowAccessor
// ============================================================================

/// Mutable row accessor over a packed RGBA32 buffer.
pub struct RowAccessor<'a> {
    buf: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> RowAccessor<'a> {
    /// Attach to a buffer of exactly `width * height * 4` bytes.
    pub fn new(buf: &'a mut [u8], width: u32, height: u32) -> Result<Self, FilterError> {
        check_rgba32_len(width as usize, height as usize, buf.len())?;
        Ok(Self { buf, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * BPP
    }

    /// The whole buffer.
    pub fn buf(&self) -> &[u8] {
        &*self.buf
    }

    /// The whole buffer, mutably.
    pub fn buf_mut(&mut self) -> &mut [u8] {
        &mut *self.buf
    }

    /// Get a safe immutable slice for row `y`.
    pub fn row_slice(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride = self.stride();
        let start = y as usize * stride;
        &self.buf[start..start + stride]
    }

    /// Get a safe mutable slice for row `y`.
    pub fn row_slice_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.buf[start..start + stride]
    }
}

// ============================================================================
// ImageView
// ============================================================================

/// Read-only view over a packed RGBA32 image.
#[derive(Clone, Copy)]
pub struct ImageView<'a> {
    buf: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> ImageView<'a> {
    /// Attach to a buffer of exactly `width * height * 4` bytes.
    pub fn new(buf: &'a [u8], width: u32, height: u32) -> Result<Self, FilterError> {
        check_rgba32_len(width as usize, height as usize, buf.len())?;
        Ok(Self { buf, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.width as usize * BPP
    }

    pub fn row_slice(&self, y: u32) -> &'a [u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride = self.stride();
        let start = y as usize * stride;
        &self.buf[start..start + stride]
    }

    /// Pixel at (x, y). Both coordinates must be in range.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let off = x as usize * BPP;
        Rgba8::from_slice(&self.row_slice(y)[off..off + BPP])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        let mut buf = vec![0u8; 2 * 3 * 4];
        assert!(RowAccessor::new(&mut buf, 2, 3).is_ok());
        assert!(RowAccessor::new(&mut buf, 3, 3).is_err());
        assert!(ImageView::new(&buf, 2, 3).is_ok());
        assert!(ImageView::new(&buf[1..], 2, 3).is_err());
    }

    #[test]
    fn test_row_slices() {
        let mut buf: Vec<u8> = (0..24).collect();
        let mut ra = RowAccessor::new(&mut buf, 2, 3).unwrap();
        assert_eq!(ra.stride(), 8);
        assert_eq!(ra.row_slice(1), &[8, 9, 10, 11, 12, 13, 14, 15]);
        ra.row_slice_mut(2)[0] = 99;
        assert_eq!(ra.buf()[16], 99);
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bounds() {
        let mut buf = vec![0u8; 16];
        let ra = RowAccessor::new(&mut buf, 2, 2).unwrap();
        ra.row_slice(2);
    }

    #[test]
    fn test_view_pixel() {
        let mut buf = vec![0u8; 2 * 2 * 4];
        buf[12..16].copy_from_slice(&[1, 2, 3, 4]);
        let view = ImageView::new(&buf, 2, 2).unwrap();
        assert_eq!(view.row_slice(1), &buf[8..]);
        assert_eq!(view.pixel(1, 1), Rgba8::new(1, 2, 3, 4));
        assert_eq!(view.pixel(0, 0), Rgba8::default());
    }
}
