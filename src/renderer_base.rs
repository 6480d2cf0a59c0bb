//! Base renderer with clipping.
//!
//! Wraps a pixel format with a clip rectangle and a stack of saved clip
//! rectangles, so every drawing operation is bounded by the current clip.
//! This is the in-memory drawing surface the tile filler draws through.

use log::warn;

use crate::basics::{ifloor, intersect_rectangles, RectD, RectI, COVER_FULL};
use crate::color::Rgba8;
use crate::error::FilterError;
use crate::pixfmt_rgba::PixelFormat;
use crate::rendering_buffer::ImageView;
use crate::tile_filler::{ClipSurface, TileSurface};

// ============================================================================
// RendererBase: clip-and-delegate renderer
// ============================================================================

/// Base renderer that clips all operations to a rectangle before delegating
/// to the underlying pixel format.
pub struct RendererBase<PF: PixelFormat> {
    ren: PF,
    clip_box: RectI,
    saved_clips: Vec<RectI>,
}

impl<PF: PixelFormat> RendererBase<PF> {
    /// Create a new renderer wrapping the given pixel format.
    /// The clip box is initialized to the full buffer extent.
    pub fn new(ren: PF) -> Self {
        let w = ren.width() as i32;
        let h = ren.height() as i32;
        Self {
            ren,
            clip_box: RectI::new(0, 0, w - 1, h - 1),
            saved_clips: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.ren.width()
    }
    pub fn height(&self) -> u32 {
        self.ren.height()
    }

    fn bounds(&self) -> RectI {
        RectI::new(
            0,
            0,
            self.ren.width() as i32 - 1,
            self.ren.height() as i32 - 1,
        )
    }

    /// Reset clipping to the full buffer.
    fn reset_clipping(&mut self) {
        self.clip_box = self.bounds();
    }

    /// Save the current clip box and narrow it to the pixels whose centers
    /// lie inside `rect`.
    pub fn push_clip(&mut self, rect: &RectD) {
        self.saved_clips.push(self.clip_box);
        let mut cb = intersect_rectangles(&self.clip_box, &rect.pixel_box());
        if !cb.is_valid() {
            warn!("clip {:?} leaves no visible pixels", rect);
            cb = RectI::new(1, 1, 0, 0);
        }
        self.clip_box = cb;
    }

    /// Restore the clip box saved by the matching [`push_clip`](Self::push_clip).
    pub fn pop_clip(&mut self) {
        match self.saved_clips.pop() {
            Some(cb) => self.clip_box = cb,
            None => {
                warn!("pop_clip without a saved clip; resetting to full buffer");
                self.reset_clipping();
            }
        }
    }

    /// Number of clip boxes currently saved.
    pub fn clip_depth(&self) -> usize {
        self.saved_clips.len()
    }

    pub fn clip_box(&self) -> &RectI {
        &self.clip_box
    }

    #[inline]
    pub fn inbox(&self, x: i32, y: i32) -> bool {
        x >= self.clip_box.x1
            && y >= self.clip_box.y1
            && x <= self.clip_box.x2
            && y <= self.clip_box.y2
    }

    /// Get a reference to the underlying pixel format.
    pub fn ren(&self) -> &PF {
        &self.ren
    }

    /// Get the pixel at (x, y), or default if outside clip.
    pub fn pixel(&self, x: i32, y: i32) -> PF::ColorType
    where
        PF::ColorType: Default,
    {
        if self.inbox(x, y) {
            self.ren.pixel(x, y)
        } else {
            PF::ColorType::default()
        }
    }
}

impl<PF: PixelFormat<ColorType = Rgba8>> RendererBase<PF> {
    /// Draw the `src` part of `image` scaled into `dst`, sampling the
    /// nearest source pixel and blending it over the destination. Only
    /// pixels inside the clip box are touched.
    ///
    /// Empty source or destination rectangles draw nothing. A source
    /// rectangle reaching outside the image is an error.
    pub fn blit_image(
        &mut self,
        image: &ImageView<'_>,
        src: &RectD,
        dst: &RectD,
    ) -> Result<(), FilterError> {
        if !(src.width() > 0.0 && src.height() > 0.0 && dst.width() > 0.0 && dst.height() > 0.0) {
            return Ok(());
        }
        if src.x1 < 0.0
            || src.y1 < 0.0
            || src.x2 > image.width() as f64
            || src.y2 > image.height() as f64
        {
            return Err(FilterError::SourceOutOfBounds {
                x: src.x1,
                y: src.y1,
                width: src.width(),
                height: src.height(),
            });
        }

        let mut target = dst.pixel_box();
        if !target.clip(&self.clip_box) {
            return Ok(());
        }

        let sx_max = (src.x2.ceil() as i32 - 1).max(0) as u32;
        let sy_max = (src.y2.ceil() as i32 - 1).max(0) as u32;
        let scale_x = src.width() / dst.width();
        let scale_y = src.height() / dst.height();

        for y in target.y1..=target.y2 {
            let v = src.y1 + (y as f64 + 0.5 - dst.y1) * scale_y;
            let sy = (ifloor(v).max(0) as u32).min(sy_max);
            for x in target.x1..=target.x2 {
                let u = src.x1 + (x as f64 + 0.5 - dst.x1) * scale_x;
                let sx = (ifloor(u).max(0) as u32).min(sx_max);
                let c = image.pixel(sx, sy);
                self.ren.blend_pixel(x, y, &c, COVER_FULL);
            }
        }
        Ok(())
    }
}

impl<PF: PixelFormat> ClipSurface for RendererBase<PF> {
    fn push_clip(&mut self, rect: &RectD) {
        RendererBase::push_clip(self, rect);
    }

    fn pop_clip(&mut self) {
        RendererBase::pop_clip(self);
    }
}

impl<'i, PF: PixelFormat<ColorType = Rgba8>> TileSurface<ImageView<'i>> for RendererBase<PF> {
    type Error = FilterError;

    fn draw_image(
        &mut self,
        image: &ImageView<'i>,
        src: &RectD,
        dst: &RectD,
    ) -> Result<(), FilterError> {
        self.blit_image(image, src, dst)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixfmt_rgba::PixfmtRgba32;
    use crate::rendering_buffer::RowAccessor;

    const BPP: usize = 4;

    fn make_renderer(buf: &mut [u8], w: u32, h: u32) -> RendererBase<PixfmtRgba32<'_>> {
        RendererBase::new(PixfmtRgba32::new(RowAccessor::new(buf, w, h).unwrap()))
    }

    fn checker() -> Vec<u8> {
        // 2x2: red, green / blue, white
        vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ]
    }

    #[test]
    fn test_new() {
        let mut buf = vec![0u8; 100 * 80 * BPP];
        let ren = make_renderer(&mut buf, 100, 80);
        assert_eq!(ren.width(), 100);
        assert_eq!(ren.height(), 80);
        assert_eq!(*ren.clip_box(), RectI::new(0, 0, 99, 79));
    }

    #[test]
    fn test_pixel_outside_clip() {
        let src_data = vec![255u8; 2 * 2 * BPP];
        let image = ImageView::new(&src_data, 2, 2).unwrap();
        let mut buf = vec![0u8; 4 * 4 * BPP];
        let mut ren = make_renderer(&mut buf, 4, 4);
        ren.blit_image(
            &image,
            &RectD::from_xywh(0.0, 0.0, 2.0, 2.0),
            &RectD::from_xywh(0.0, 0.0, 4.0, 4.0),
        )
        .unwrap();
        let white = Rgba8::new(255, 255, 255, 255);
        assert_eq!(ren.pixel(3, 3), white);
        ren.push_clip(&RectD::from_xywh(0.0, 0.0, 2.0, 2.0));
        assert!(ren.inbox(1, 1));
        assert!(!ren.inbox(2, 1));
        // Readback is clipped too
        assert_eq!(ren.pixel(3, 3), Rgba8::default());
        assert_eq!(ren.pixel(-1, 0), Rgba8::default());
        assert_eq!(ren.ren().pixel(3, 3), white);
    }

    #[test]
    fn test_unbalanced_pop_resets_clip() {
        let mut buf = vec![0u8; 5 * 3 * BPP];
        let mut ren = make_renderer(&mut buf, 5, 3);
        ren.pop_clip();
        assert_eq!(*ren.clip_box(), RectI::new(0, 0, 4, 2));
        assert_eq!(ren.clip_depth(), 0);
    }

    #[test]
    fn test_push_pop_clip() {
        let mut buf = vec![0u8; 20 * 20 * BPP];
        let mut ren = make_renderer(&mut buf, 20, 20);
        ren.push_clip(&RectD::from_xywh(2.0, 3.0, 5.0, 4.0));
        assert_eq!(*ren.clip_box(), RectI::new(2, 3, 6, 6));
        ren.push_clip(&RectD::from_xywh(5.0, 0.0, 100.0, 100.0));
        assert_eq!(*ren.clip_box(), RectI::new(5, 3, 6, 6));
        assert_eq!(ren.clip_depth(), 2);
        ren.pop_clip();
        assert_eq!(*ren.clip_box(), RectI::new(2, 3, 6, 6));
        ren.pop_clip();
        assert_eq!(*ren.clip_box(), RectI::new(0, 0, 19, 19));
        assert_eq!(ren.clip_depth(), 0);
    }

    #[test]
    fn test_push_empty_clip() {
        let mut buf = vec![0u8; 4 * 4 * BPP];
        let mut ren = make_renderer(&mut buf, 4, 4);
        ren.push_clip(&RectD::from_xywh(10.0, 10.0, 2.0, 2.0));
        assert!(!ren.clip_box().is_valid());
        let src_data = vec![255u8; BPP];
        let image = ImageView::new(&src_data, 1, 1).unwrap();
        ren.blit_image(
            &image,
            &RectD::from_xywh(0.0, 0.0, 1.0, 1.0),
            &RectD::from_xywh(0.0, 0.0, 4.0, 4.0),
        )
        .unwrap();
        ren.pop_clip();
        assert!(ren.ren().rbuf().buf().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_blit_identity() {
        let src_data = checker();
        let image = ImageView::new(&src_data, 2, 2).unwrap();
        let mut buf = vec![0u8; 4 * 4 * BPP];
        let mut ren = make_renderer(&mut buf, 4, 4);
        ren.blit_image(
            &image,
            &RectD::from_xywh(0.0, 0.0, 2.0, 2.0),
            &RectD::from_xywh(1.0, 1.0, 2.0, 2.0),
        )
        .unwrap();
        assert_eq!(ren.pixel(1, 1), Rgba8::new(255, 0, 0, 255));
        assert_eq!(ren.pixel(2, 1), Rgba8::new(0, 255, 0, 255));
        assert_eq!(ren.pixel(1, 2), Rgba8::new(0, 0, 255, 255));
        assert_eq!(ren.pixel(2, 2), Rgba8::new(255, 255, 255, 255));
        assert_eq!(ren.pixel(0, 0), Rgba8::default());
        assert_eq!(ren.pixel(3, 3), Rgba8::default());
    }

    #[test]
    fn test_blit_scaled_sub_rect() {
        let src_data = checker();
        let image = ImageView::new(&src_data, 2, 2).unwrap();
        let mut buf = vec![0u8; 4 * 4 * BPP];
        let mut ren = make_renderer(&mut buf, 4, 4);
        // Right column (green over white) stretched over the whole surface
        ren.blit_image(
            &image,
            &RectD::from_xywh(1.0, 0.0, 1.0, 2.0),
            &RectD::from_xywh(0.0, 0.0, 4.0, 4.0),
        )
        .unwrap();
        for x in 0..4 {
            assert_eq!(ren.pixel(x, 0), Rgba8::new(0, 255, 0, 255));
            assert_eq!(ren.pixel(x, 1), Rgba8::new(0, 255, 0, 255));
            assert_eq!(ren.pixel(x, 2), Rgba8::new(255, 255, 255, 255));
            assert_eq!(ren.pixel(x, 3), Rgba8::new(255, 255, 255, 255));
        }
    }

    #[test]
    fn test_blit_respects_clip() {
        let src_data = vec![255u8; 2 * 2 * BPP];
        let image = ImageView::new(&src_data, 2, 2).unwrap();
        let mut buf = vec![0u8; 4 * 4 * BPP];
        let mut ren = make_renderer(&mut buf, 4, 4);
        ren.push_clip(&RectD::from_xywh(0.0, 0.0, 1.0, 4.0));
        ren.blit_image(
            &image,
            &RectD::from_xywh(0.0, 0.0, 2.0, 2.0),
            &RectD::from_xywh(0.0, 0.0, 4.0, 4.0),
        )
        .unwrap();
        ren.pop_clip();
        assert_eq!(ren.pixel(0, 3), Rgba8::new(255, 255, 255, 255));
        assert_eq!(ren.pixel(1, 0), Rgba8::default());
    }

    #[test]
    fn test_blit_source_out_of_bounds() {
        let src_data = checker();
        let image = ImageView::new(&src_data, 2, 2).unwrap();
        let mut buf = vec![0u8; 4 * 4 * BPP];
        let mut ren = make_renderer(&mut buf, 4, 4);
        let r = ren.blit_image(
            &image,
            &RectD::from_xywh(1.0, 1.0, 2.0, 2.0),
            &RectD::from_xywh(0.0, 0.0, 4.0, 4.0),
        );
        assert!(matches!(r, Err(FilterError::SourceOutOfBounds { .. })));
    }

    #[test]
    fn test_blit_empty_rects() {
        let src_data = checker();
        let image = ImageView::new(&src_data, 2, 2).unwrap();
        let mut buf = vec![0u8; 4 * 4 * BPP];
        let mut ren = make_renderer(&mut buf, 4, 4);
        ren.blit_image(
            &image,
            &RectD::from_xywh(0.0, 0.0, 0.0, 2.0),
            &RectD::from_xywh(0.0, 0.0, 4.0, 4.0),
        )
        .unwrap();
        ren.blit_image(
            &image,
            &RectD::from_xywh(0.0, 0.0, 2.0, 2.0),
            &RectD::from_xywh(0.0, 0.0, 4.0, -1.0),
        )
        .unwrap();
        assert!(ren.ren().rbuf().buf().iter().all(|&b| b == 0));
    }
}
