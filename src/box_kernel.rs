//! Box kernel sizing for the three-pass Gaussian approximation.
//!
//! SVG 1.1 (§15.17, `feGaussianBlur`) allows a Gaussian of standard deviation
//! `s` to be approximated by three successive box blurs of width
//! `d = floor(s * 3 * sqrt(2 * PI) / 4 + 0.5)`. For odd `d` all three boxes
//! are centered; for even `d` the first box leans left, the second leans
//! right, and the third is centered on a window of `d + 1`.

use std::f64::consts::PI;

/// Box width approximating a Gaussian with the given standard deviation.
///
/// Zero means "no blur on this axis". Negative and NaN inputs give 0.
pub fn box_kernel_size(std_dev: f64) -> usize {
    let d = (std_dev * 3.0 * (2.0 * PI).sqrt() / 4.0 + 0.5).floor();
    if d >= 1.0 {
        d as usize
    } else {
        0
    }
}

// ============================================================================
// BoxWindow
// ============================================================================

/// Extent of one box window around the output sample: `left` samples
/// before it and `right` samples after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxWindow {
    pub left: usize,
    pub right: usize,
}

#[allow(clippy::len_without_is_empty)]
impl BoxWindow {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// Number of samples averaged by this window.
    pub fn len(&self) -> usize {
        self.left + self.right + 1
    }
}

// ============================================================================
// Pass table
// ============================================================================

/// One of the three box passes, named after how an even kernel is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurPass {
    /// Even kernels take one extra sample on the left.
    Leading,
    /// Even kernels take one extra sample on the right.
    Trailing,
    /// Even kernels grow to `size + 1`, centered.
    Centered,
}

/// The pass order of the three-box approximation.
pub const BLUR_PASSES: [BlurPass; 3] = [BlurPass::Leading, BlurPass::Trailing, BlurPass::Centered];

impl BlurPass {
    /// Window for a kernel of `size` on this pass, or `None` when the axis
    /// is not blurred (`size == 0`) and only transposes.
    pub fn window(self, size: usize) -> Option<BoxWindow> {
        if size == 0 {
            return None;
        }
        let half = size / 2;
        let window = if size % 2 == 1 {
            BoxWindow::new(half, half)
        } else {
            match self {
                BlurPass::Leading => BoxWindow::new(half, half - 1),
                BlurPass::Trailing => BoxWindow::new(half - 1, half),
                BlurPass::Centered => BoxWindow::new(half, half),
            }
        };
        Some(window)
    }
}
