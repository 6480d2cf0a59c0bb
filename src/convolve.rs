//! One directional box-blur pass fused with a transpose.
//!
//! Each input row is widened by the window's left and right extents, the
//! color of fully transparent samples is filled in from their opaque
//! neighbours, and a running per-channel sum slides across the row. Results
//! are written transposed (input row `i`, column `j` goes to output row `j`,
//! column `i`), so the next pass reads the other axis as rows.

use crate::basics::{saturate_u8, saturate_u8_from_sum};
use crate::box_kernel::BoxWindow;
use crate::color::OrderRgba;
use crate::error::{check_rgba32_len, FilterError};

const BPP: usize = OrderRgba::N;
const COLOR_CHANNELS: usize = 3;

// ============================================================================
// EdgeMode
// ============================================================================

/// How samples beyond the ends of a row are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Transparent black. Their color channels are still extrapolated from
    /// the nearest opaque sample, so only alpha fades at the edges.
    #[default]
    None,
    /// Copies of the first and last pixel of the row, alpha included.
    Duplicate,
}

// ============================================================================
// Transparent run interpolation
// ============================================================================

#[inline]
fn is_transparent(line: &[u8], k: usize) -> bool {
    line[k * BPP + OrderRgba::A] == 0
}

fn fill_color(line: &mut [u8], from: usize, to: usize, color: [u8; COLOR_CHANNELS]) {
    for px in line[from * BPP..to * BPP].chunks_exact_mut(BPP) {
        px[..COLOR_CHANNELS].copy_from_slice(&color);
    }
}

fn color_at(line: &[u8], k: usize) -> [u8; COLOR_CHANNELS] {
    let off = k * BPP;
    [line[off], line[off + 1], line[off + 2]]
}

/// Give fully transparent samples of an RGBA32 `line` a color, leaving
/// their alpha at zero:
///
/// - a run before the first visible sample takes that sample's color,
/// - a run after the last visible sample takes that sample's color,
/// - a run between two visible samples is linearly interpolated between
///   their colors by position.
///
/// Averaging then never pulls the zero color channels of invisible samples
/// into visible ones, which would darken soft edges. A line with no visible
/// sample is left untouched.
pub fn interpolate_transparent_runs(line: &mut [u8]) {
    let n = line.len() / BPP;
    let Some(first) = (0..n).find(|&k| !is_transparent(line, k)) else {
        return;
    };
    fill_color(line, 0, first, color_at(line, first));

    let mut start = first;
    loop {
        match (start + 1..n).find(|&k| !is_transparent(line, k)) {
            None => {
                fill_color(line, start + 1, n, color_at(line, start));
                break;
            }
            Some(end) => {
                let span = end - start;
                if span > 1 {
                    let c1 = color_at(line, start);
                    let c2 = color_at(line, end);
                    for k in start + 1..end {
                        let t = (k - start) as f64;
                        let off = k * BPP;
                        for c in 0..COLOR_CHANNELS {
                            let v = (c1[c] as f64 * (span as f64 - t) + c2[c] as f64 * t)
                                / span as f64;
                            line[off + c] = saturate_u8(v);
                        }
                    }
                }
                start = end;
            }
        }
    }
}

// ============================================================================
// Convolution
// ============================================================================

/// Box-blur each of the `height` rows of `width` pixels in `input` with
/// `window`, writing the transposed result to `output`.
///
/// `input` holds `width * height` pixels; so does `output`, laid out as
/// `height` columns by `width` rows.
pub fn convolve_line(
    input: &[u8],
    output: &mut [u8],
    width: usize,
    height: usize,
    window: BoxWindow,
    edge_mode: EdgeMode,
) -> Result<(), FilterError> {
    check_rgba32_len(width, height, input.len())?;
    check_rgba32_len(height, width, output.len())?;
    if width == 0 || height == 0 {
        return Ok(());
    }

    let extra = window.left + window.right;
    let len = window.len() as u64;
    let row_bytes = width * BPP;
    let lead = window.left * BPP;
    let mut line = vec![0u8; (width + extra) * BPP];

    for (i, row) in input.chunks_exact(row_bytes).enumerate() {
        line.fill(0);
        line[lead..lead + row_bytes].copy_from_slice(row);
        if edge_mode == EdgeMode::Duplicate {
            let (head, tail) = line.split_at_mut(lead);
            for px in head.chunks_exact_mut(BPP) {
                px.copy_from_slice(&row[..BPP]);
            }
            for px in tail[row_bytes..].chunks_exact_mut(BPP) {
                px.copy_from_slice(&row[row_bytes - BPP..]);
            }
        }
        interpolate_transparent_runs(&mut line);

        let mut sum = [0u64; BPP];
        for px in line[..extra * BPP].chunks_exact(BPP) {
            for c in 0..BPP {
                sum[c] += px[c] as u64;
            }
        }

        for j in 0..width {
            let incoming = (j + extra) * BPP;
            for c in 0..BPP {
                sum[c] += line[incoming + c] as u64;
            }

            let dst = (j * height + i) * BPP;
            for c in 0..BPP {
                output[dst + c] = saturate_u8_from_sum(sum[c] / len);
            }

            let outgoing = j * BPP;
            for c in 0..BPP {
                sum[c] -= line[outgoing + c] as u64;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pixels: &[[u8; 4]]) -> Vec<u8> {
        pixels.iter().flatten().copied().collect()
    }

    #[test]
    fn test_interpolate_between_opaque() {
        let mut line = row(&[[255, 0, 0, 255], [0; 4], [0; 4], [0, 0, 255, 255]]);
        interpolate_transparent_runs(&mut line);
        assert_eq!(
            line,
            row(&[
                [255, 0, 0, 255],
                [170, 0, 85, 0],
                [85, 0, 170, 0],
                [0, 0, 255, 255]
            ])
        );
    }

    #[test]
    fn test_interpolate_extrapolates_edges() {
        let mut line = row(&[[0; 4], [0; 4], [10, 20, 30, 40], [0; 4]]);
        interpolate_transparent_runs(&mut line);
        assert_eq!(
            line,
            row(&[[10, 20, 30, 0], [10, 20, 30, 0], [10, 20, 30, 40], [10, 20, 30, 0]])
        );
    }

    #[test]
    fn test_interpolate_adjacent_opaque_untouched() {
        let original = row(&[[1, 2, 3, 4], [5, 6, 7, 8], [0, 0, 0, 0], [9, 9, 9, 9]]);
        let mut line = original.clone();
        interpolate_transparent_runs(&mut line);
        // A single transparent sample sits exactly halfway
        assert_eq!(&line[..8], &original[..8]);
        assert_eq!(&line[8..12], &[7, 7, 8, 0]);
        assert_eq!(&line[12..], &original[12..]);
    }

    #[test]
    fn test_interpolate_fully_transparent_line() {
        let original = row(&[[200, 100, 50, 0], [1, 2, 3, 0]]);
        let mut line = original.clone();
        interpolate_transparent_runs(&mut line);
        assert_eq!(line, original);
    }

    #[test]
    fn test_identity_window_only_transposes_visible_pixels() {
        // 2x2: top row opaque red/green, bottom row opaque blue/white
        let input = row(&[
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [255, 255, 255, 255],
        ]);
        let mut output = vec![0u8; input.len()];
        convolve_line(&input, &mut output, 2, 2, BoxWindow::new(0, 0), EdgeMode::None).unwrap();
        assert_eq!(
            output,
            row(&[
                [255, 0, 0, 255],
                [0, 0, 255, 255],
                [0, 255, 0, 255],
                [255, 255, 255, 255],
            ])
        );
    }

    #[test]
    fn test_edge_fade_with_transparent_edges() {
        let input = row(&[[255, 0, 0, 255]; 4]);
        let mut output = vec![0u8; input.len()];
        convolve_line(&input, &mut output, 4, 1, BoxWindow::new(1, 0), EdgeMode::None).unwrap();
        // Left-leaning window reaches one sample past the left edge
        assert_eq!(
            output,
            row(&[[255, 0, 0, 127], [255, 0, 0, 255], [255, 0, 0, 255], [255, 0, 0, 255]])
        );
    }

    #[test]
    fn test_duplicate_edges_keep_uniform_row() {
        let input = row(&[[255, 0, 0, 255]; 4]);
        let mut output = vec![0u8; input.len()];
        convolve_line(&input, &mut output, 4, 1, BoxWindow::new(2, 2), EdgeMode::Duplicate).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_box_average() {
        let input = row(&[[0, 0, 0, 255], [90, 90, 90, 255], [0, 0, 0, 255]]);
        let mut output = vec![0u8; input.len()];
        convolve_line(&input, &mut output, 3, 1, BoxWindow::new(1, 1), EdgeMode::Duplicate).unwrap();
        assert_eq!(
            output,
            row(&[[30, 30, 30, 255], [30, 30, 30, 255], [30, 30, 30, 255]])
        );
    }

    #[test]
    fn test_window_wider_than_row() {
        let input = row(&[[100, 100, 100, 255], [200, 200, 200, 255]]);
        let mut output = vec![0u8; input.len()];
        convolve_line(&input, &mut output, 2, 1, BoxWindow::new(3, 3), EdgeMode::Duplicate).unwrap();
        // Window of 7: pixel 0 sees 4x100 + 3x200, pixel 1 sees 3x100 + 4x200
        assert_eq!(output, row(&[[142, 142, 142, 255], [157, 157, 157, 255]]));
    }

    #[test]
    fn test_degenerate_sizes() {
        let mut output: [u8; 0] = [];
        assert!(convolve_line(&[], &mut output, 0, 3, BoxWindow::new(1, 1), EdgeMode::None).is_ok());
        assert!(convolve_line(&[], &mut output, 3, 0, BoxWindow::new(1, 1), EdgeMode::None).is_ok());
    }

    #[test]
    fn test_rejects_mismatched_buffers() {
        let input = vec![0u8; 16];
        let mut output = vec![0u8; 8];
        assert!(
            convolve_line(&input, &mut output, 2, 2, BoxWindow::new(0, 0), EdgeMode::None).is_err()
        );
    }
}
