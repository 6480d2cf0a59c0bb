//! Approximate Gaussian blur in the manner of SVG `feGaussianBlur`.
//!
//! Three box passes per axis (see [`crate::box_kernel`]) stand in for a true
//! Gaussian. Every pass is a [`convolve_line`] over one axis group that
//! writes its result transposed; axis group X reads the caller's buffer and
//! writes the scratch buffer, axis group Y reads the scratch buffer and
//! writes back. After each pass the buffer is therefore in its original
//! orientation again, whichever axes actually blurred.
//!
//! The caller's buffer is borrowed exclusively for the whole call and is
//! not reentrant; one scratch buffer of the same size lives for the call.

use log::{debug, trace};

use crate::box_kernel::{box_kernel_size, BLUR_PASSES};
use crate::convolve::convolve_line;
pub use crate::convolve::EdgeMode;
use crate::error::{check_rgba32_len, FilterError};
use crate::rendering_buffer::RowAccessor;
use crate::transpose::transpose_rgba32;

// ============================================================================
// Buffer slots and axis groups
// ============================================================================

/// The two buffers a blur alternates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferSlot {
    /// The caller's pixels.
    Source,
    /// Call-scoped buffer of the same size.
    Scratch,
}

/// Which buffer an axis group reads, which it writes, and the row shape it
/// sees in its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisGroup {
    pub input: BufferSlot,
    pub output: BufferSlot,
    /// Kernel size along this group's rows; zero transposes instead.
    pub kernel_size: usize,
    /// Row length of the input, in pixels.
    pub width: usize,
    /// Number of input rows.
    pub height: usize,
}

/// Axis groups in processing order. Group Y consumes what group X just
/// wrote, so the order is fixed.
pub fn axis_groups(width: usize, height: usize, kernel_x: usize, kernel_y: usize) -> [AxisGroup; 2] {
    [
        AxisGroup {
            input: BufferSlot::Source,
            output: BufferSlot::Scratch,
            kernel_size: kernel_x,
            width,
            height,
        },
        AxisGroup {
            input: BufferSlot::Scratch,
            output: BufferSlot::Source,
            kernel_size: kernel_y,
            width: height,
            height: width,
        },
    ]
}

fn slots<'b>(
    source: &'b mut [u8],
    scratch: &'b mut [u8],
    input: BufferSlot,
) -> (&'b [u8], &'b mut [u8]) {
    match input {
        BufferSlot::Source => (&*source, scratch),
        BufferSlot::Scratch => (&*scratch, source),
    }
}

// ============================================================================
// GaussianBlur
// ============================================================================

/// Blur configuration: standard deviation per axis and edge handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBlur {
    std_dev_x: f64,
    std_dev_y: f64,
    edge_mode: EdgeMode,
}

impl GaussianBlur {
    pub fn new(std_dev_x: f64, std_dev_y: f64) -> Self {
        Self {
            std_dev_x,
            std_dev_y,
            edge_mode: EdgeMode::None,
        }
    }

    /// Same standard deviation on both axes.
    pub fn uniform(std_dev: f64) -> Self {
        Self::new(std_dev, std_dev)
    }

    pub fn with_edge_mode(mut self, edge_mode: EdgeMode) -> Self {
        self.edge_mode = edge_mode;
        self
    }

    pub fn std_dev_x(&self) -> f64 {
        self.std_dev_x
    }

    pub fn std_dev_y(&self) -> f64 {
        self.std_dev_y
    }

    pub fn edge_mode(&self) -> EdgeMode {
        self.edge_mode
    }

    /// Box kernel sizes `(x, y)` derived from the standard deviations.
    pub fn kernel_sizes(&self) -> (usize, usize) {
        (box_kernel_size(self.std_dev_x), box_kernel_size(self.std_dev_y))
    }

    /// `true` when both kernels are empty and the blur leaves pixels alone.
    pub fn is_noop(&self) -> bool {
        self.kernel_sizes() == (0, 0)
    }

    fn validate(&self) -> Result<(), FilterError> {
        for s in [self.std_dev_x, self.std_dev_y] {
            if !s.is_finite() || s < 0.0 {
                return Err(FilterError::InvalidStdDeviation(s));
            }
        }
        Ok(())
    }

    /// Blur the pixels behind `rbuf` in place.
    pub fn apply(&self, rbuf: &mut RowAccessor<'_>) -> Result<(), FilterError> {
        let w = rbuf.width() as usize;
        let h = rbuf.height() as usize;
        self.apply_to_slice(rbuf.buf_mut(), w, h)
    }

    /// Blur a packed RGBA32 slice of `width * height` pixels in place.
    pub fn apply_to_slice(
        &self,
        buf: &mut [u8],
        width: usize,
        height: usize,
    ) -> Result<(), FilterError> {
        self.validate()?;
        if width == 0 || height == 0 {
            return Ok(());
        }
        check_rgba32_len(width, height, buf.len())?;

        let (kernel_x, kernel_y) = self.kernel_sizes();
        if kernel_x == 0 && kernel_y == 0 {
            return Ok(());
        }
        debug!(
            "gaussian blur {}x{}: std_dev ({}, {}), kernel ({}, {}), {:?}",
            width, height, self.std_dev_x, self.std_dev_y, kernel_x, kernel_y, self.edge_mode
        );

        let mut scratch = vec![0u8; buf.len()];
        let groups = axis_groups(width, height, kernel_x, kernel_y);

        for pass in BLUR_PASSES {
            for group in &groups {
                let (input, output) = slots(&mut *buf, &mut scratch, group.input);
                match pass.window(group.kernel_size) {
                    Some(window) => {
                        trace!("{:?} pass, {:?} -> {:?}: {:?}", pass, group.input, group.output, window);
                        convolve_line(input, output, group.width, group.height, window, self.edge_mode)?;
                    }
                    None => {
                        trace!("{:?} pass, {:?} -> {:?}: transpose", pass, group.input, group.output);
                        transpose_rgba32(input, output, group.width, group.height)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self::uniform(0.0)
    }
}

/// Blur a packed RGBA32 buffer in place with standard deviations
/// `radius_x` and `radius_y` and transparent edges.
///
/// Zero width, zero height, or radii too small to produce a kernel leave the
/// buffer untouched.
pub fn fe_gaussian_blur(
    buf: &mut [u8],
    width: usize,
    height: usize,
    radius_x: f64,
    radius_y: f64,
) -> Result<(), FilterError> {
    GaussianBlur::new(radius_x, radius_y).apply_to_slice(buf, width, height)
}

// ============================================================================
// Tests
// ============================================================================
