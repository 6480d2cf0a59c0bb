//! RGBA32 matrix transpose.
//!
//! Swaps the x and y axes of a packed pixel buffer. The blur uses this in
//! place of a convolution on any axis whose kernel size is zero, so the
//! buffer orientation stays in step with the blurred axis.

use crate::error::{check_rgba32_len, FilterError};

const BPP: usize = 4;

/// Relocate every pixel of the `width` x `height` `input` to the
/// `height` x `width` `output`: input row `i`, column `j` lands on output
/// row `j`, column `i`. No blending.
pub fn transpose_rgba32(
    input: &[u8],
    output: &mut [u8],
    width: usize,
    height: usize,
) -> Result<(), FilterError> {
    check_rgba32_len(width, height, input.len())?;
    check_rgba32_len(height, width, output.len())?;
    if width == 0 || height == 0 {
        return Ok(());
    }

    for (i, row) in input.chunks_exact(width * BPP).enumerate() {
        for (j, px) in row.chunks_exact(BPP).enumerate() {
            let dst = (j * height + i) * BPP;
            output[dst..dst + BPP].copy_from_slice(px);
        }
    }
    Ok(())
}
