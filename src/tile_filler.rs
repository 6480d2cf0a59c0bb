//! Repeating tile fill.
//!
//! Fills a destination rectangle by blitting one source sub-rectangle over
//! and over on a grid of tiles anchored at a tile origin. The drawing
//! surface is abstract: anything that can push and pop a clip and draw a
//! scaled image can be tiled into. [`RendererBase`](crate::renderer_base::RendererBase)
//! is the in-memory implementation.

use core::ops::{Deref, DerefMut};

use log::{debug, warn};

use crate::basics::RectD;

// ============================================================================
// Surface capability
// ============================================================================

/// A surface with a stack of clip regions.
pub trait ClipSurface {
    /// Restrict drawing to `rect` (intersected with the current clip),
    /// remembering the previous clip.
    fn push_clip(&mut self, rect: &RectD);

    /// Restore the clip saved by the matching `push_clip`.
    fn pop_clip(&mut self);
}

/// A clipped surface that can draw images of type `I`.
pub trait TileSurface<I: ?Sized>: ClipSurface {
    type Error;

    /// Draw the `src` part of `image` scaled into `dst`.
    fn draw_image(&mut self, image: &I, src: &RectD, dst: &RectD) -> Result<(), Self::Error>;
}

/// Clip pushed on a surface for the lifetime of the guard.
///
/// The clip is popped when the guard is dropped, including when drawing
/// through it bails out early with an error.
pub struct ClipScope<'s, S: ClipSurface + ?Sized> {
    surface: &'s mut S,
}

impl<'s, S: ClipSurface + ?Sized> ClipScope<'s, S> {
    pub fn new(surface: &'s mut S, rect: &RectD) -> Self {
        surface.push_clip(rect);
        Self { surface }
    }
}

impl<S: ClipSurface + ?Sized> Deref for ClipScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: ClipSurface + ?Sized> DerefMut for ClipScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: ClipSurface + ?Sized> Drop for ClipScope<'_, S> {
    fn drop(&mut self) {
        self.surface.pop_clip();
    }
}

// ============================================================================
// Tile index ranges
// ============================================================================

/// Inclusive range of tile indices along one axis for tiles of size `bw`
/// anchored at `b`, covering `[0, w]`.
///
/// The start is the tile at or before the left edge, folded into
/// `(-bw, 0]` by the floating point remainder, so a fractional `b` yields a
/// fractional start index. The end is `ceil((w - b) / bw)`.
pub fn tile_range(b: f64, bw: f64, w: f64) -> (f64, f64) {
    let start = ((b % bw) - bw) % bw;
    let end = ((w - b) / bw).ceil();
    (start, end)
}

/// Number of indices `start, start + 1, ...` that do not exceed `end`, or
/// `None` when the count does not fit in a `u64` (or the range is NaN).
fn range_len(start: f64, end: f64) -> Option<u64> {
    if end < start {
        return Some(0);
    }
    let span = (end - start).floor();
    if span < u64::MAX as f64 {
        Some(span as u64 + 1)
    } else {
        None
    }
}

/// Which inputs the vertical tile range is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowRange {
    /// Rows reuse the horizontal range (`tile_x`, `tile_w`, dest width).
    /// Tall destinations may be left partly uncovered.
    #[default]
    MirrorColumns,
    /// Rows use their own inputs (`tile_y`, `tile_h`, dest height).
    Independent,
}

// ============================================================================
// TileSpec
// ============================================================================

/// One tile fill: where to draw, what to repeat, and the tile grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSpec {
    /// Destination rectangle; drawing is clipped to it.
    pub dest: RectD,
    /// Part of the image repeated in every tile.
    pub src: RectD,
    /// Grid origin (top-left corner of tile `(0, 0)`).
    pub tile_x: f64,
    pub tile_y: f64,
    /// Tile size.
    pub tile_w: f64,
    pub tile_h: f64,
    pub row_range: RowRange,
}

impl TileSpec {
    pub fn new(dest: RectD, src: RectD, tile_x: f64, tile_y: f64, tile_w: f64, tile_h: f64) -> Self {
        Self {
            dest,
            src,
            tile_x,
            tile_y,
            tile_w,
            tile_h,
            row_range: RowRange::default(),
        }
    }

    pub fn with_row_range(mut self, row_range: RowRange) -> Self {
        self.row_range = row_range;
        self
    }

    /// Zero (or NaN) tile sizes draw nothing.
    pub fn is_empty(&self) -> bool {
        !(self.tile_w != 0.0 && self.tile_h != 0.0)
    }

    /// Inclusive column index range.
    pub fn columns(&self) -> (f64, f64) {
        tile_range(self.tile_x, self.tile_w, self.dest.width())
    }

    /// Inclusive row index range.
    pub fn rows(&self) -> (f64, f64) {
        match self.row_range {
            RowRange::MirrorColumns => self.columns(),
            RowRange::Independent => tile_range(self.tile_y, self.tile_h, self.dest.height()),
        }
    }

    /// Destination rectangle of tile `(i, j)`.
    pub fn placement(&self, i: f64, j: f64) -> RectD {
        RectD::from_xywh(
            self.tile_x + i * self.tile_w,
            self.tile_y + j * self.tile_h,
            self.tile_w,
            self.tile_h,
        )
    }

    /// Number of tile columns and rows, or `None` when either count is
    /// unbounded.
    pub fn grid_size(&self) -> Option<(u64, u64)> {
        if self.is_empty() {
            return Some((0, 0));
        }
        let (i0, i1) = self.columns();
        let (j0, j1) = self.rows();
        Some((range_len(i0, i1)?, range_len(j0, j1)?))
    }

    /// Every tile placement, column by column. Empty when the grid is
    /// unbounded.
    pub fn placements(&self) -> impl Iterator<Item = RectD> + '_ {
        let (cols, rows) = self.grid_size().unwrap_or((0, 0));
        let (i0, j0) = (self.columns().0, self.rows().0);
        (0..cols).flat_map(move |ci| {
            (0..rows).map(move |cj| self.placement(i0 + ci as f64, j0 + cj as f64))
        })
    }

    /// Draw every tile of this fill onto `surface`, clipped to `dest`.
    ///
    /// The clip is restored before returning, also when a blit fails; the
    /// first failing blit's error is returned and no further tiles are
    /// drawn.
    pub fn fill<I, S>(&self, surface: &mut S, image: &I) -> Result<(), S::Error>
    where
        I: ?Sized,
        S: TileSurface<I> + ?Sized,
    {
        if self.is_empty() {
            return Ok(());
        }
        let (i0, i1) = self.columns();
        let (j0, j1) = self.rows();
        let Some((cols, rows)) = self.grid_size() else {
            warn!(
                "unbounded tile range columns {}..={} rows {}..={}; nothing drawn",
                i0, i1, j0, j1
            );
            return Ok(());
        };
        debug!(
            "fill_tile columns {}..={} rows {}..={} ({} tiles, {:?})",
            i0,
            i1,
            j0,
            j1,
            cols.saturating_mul(rows),
            self.row_range
        );

        let mut scope = ClipScope::new(surface, &self.dest);
        for dst in self.placements() {
            scope.draw_image(image, &self.src, &dst)?;
        }
        Ok(())
    }
}

/// Fill `(x, y, w, h)` with copies of the `(cx, cy, cw, ch)` part of
/// `image`, drawn as `bw` x `bh` tiles on a grid whose origin is `(bx, by)`.
///
/// Rows use the column range (see [`RowRange::MirrorColumns`]); build a
/// [`TileSpec`] to choose otherwise.
#[allow(clippy::too_many_arguments)]
pub fn fill_tile<I, S>(
    surface: &mut S,
    image: &I,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    cx: f64,
    cy: f64,
    cw: f64,
    ch: f64,
    bx: f64,
    by: f64,
    bw: f64,
    bh: f64,
) -> Result<(), S::Error>
where
    I: ?Sized,
    S: TileSurface<I> + ?Sized,
{
    TileSpec::new(
        RectD::from_xywh(x, y, w, h),
        RectD::from_xywh(cx, cy, cw, ch),
        bx,
        by,
        bw,
        bh,
    )
    .fill(surface, image)
}

// ============================================================================
// Tests
// ============================================================================
