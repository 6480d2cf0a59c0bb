//! # fe-filters
//!
//! SVG `feGaussianBlur` and repeating texture fills for packed RGBA32 pixel
//! buffers, in pure Rust.
//!
//! - Three-pass box blur approximating a Gaussian, run separately along
//!   each axis and fused with a transpose so every pass reads rows
//! - Transparent-run color interpolation to avoid dark fringes at soft edges
//! - Configurable edge handling (`EdgeMode`)
//! - Tile fill of a rectangle through an abstract clipped drawing surface
//! - A small in-memory surface (pixel format + clipping renderer) to draw on
//!
//! ## Architecture
//!
//! The blur runs as a fixed schedule:
//!
//! 1. **Kernel sizing**: a standard deviation becomes a box width
//! 2. **Pass table**: leading, trailing, then centered windows
//! 3. **Axis groups**: rows of the source into the scratch buffer, then
//!    rows of the scratch buffer back into the source
//! 4. **Convolution**: running box sum per row, written transposed
//!
//! The library does not install a logger; it reports through the `log`
//! facade.

// Foundation types
pub mod basics;
pub mod color;
pub mod error;
pub mod rendering_buffer;

// Blur
pub mod box_kernel;
pub mod convolve;
pub mod fe_gaussian_blur;
pub mod transpose;

// Drawing surface and tiling
pub mod pixfmt_rgba;
pub mod renderer_base;
pub mod tile_filler;

pub use error::FilterError;
pub use fe_gaussian_blur::{fe_gaussian_blur, EdgeMode, GaussianBlur};
pub use tile_filler::{fill_tile, ClipSurface, TileSpec, TileSurface};
