//! # Rasterflow Graphics
//!
//! A tile-based software triangle rasterizer. Indexed triangle meshes go in,
//! a color + depth image comes out, using only CPU SIMD.
//!
//! ## Buffer layout
//!
//! The output image is a grid of 32x32 pixel tiles stored contiguously, each
//! tile a grid of 2x2 pixel blocks (one 16-byte SIMD batch per block). The
//! block shape matches the four SIMD lanes of `rasterflow-core`, so every
//! inner-loop load and store moves exactly one block. Tiles on the right and
//! bottom edges carry undefined padding when the resolution does not divide
//! by 32.
//!
//! ## Cooperative splits
//!
//! Every operation — [`clear_color`], [`clear_depth`], [`rasterize`],
//! [`blit`] — takes a [`Split`]. A split owns the tiles whose index is
//! congruent to `split.index()` modulo `split.count()`, so N callers can
//! process one frame concurrently without any locking: their writes are
//! disjoint by construction. [`WorkerPool::scatter`](parallel::WorkerPool)
//! runs one operation across all splits of a persistent pool and returns
//! when the whole frame phase is done.
//!
//! ```no_run
//! use rasterflow_graphics::{
//!     clear_color, clear_depth, rasterize, required_bytes, RasterFlags,
//!     RasterInput, RasterState, RasterTarget, Split,
//! };
//!
//! let mut memory = vec![0u8; required_bytes(1280, 720, true, true)];
//! let target = RasterTarget::new(1280, 720, &mut memory, true, true).unwrap();
//!
//! clear_color(&target, [0.0; 4], Split::SINGLE);
//! clear_depth(&target, 0.0, Split::SINGLE);
//!
//! let state = RasterState {
//!     target: &target,
//!     flags: RasterFlags::COLOR_WRITE | RasterFlags::DEPTH_WRITE | RasterFlags::DEPTH_TEST,
//! };
//! let inputs: Vec<RasterInput> = Vec::new(); // draw calls for this frame
//! rasterize(&state, &inputs, Split::SINGLE);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod parallel;
pub mod raster;
mod split;
mod target;

pub use raster::blit::{blit, DisplayView};
pub use raster::clear::{clear_color, clear_depth};
pub use raster::{rasterize, RasterFlags, RasterInput, RasterState};
pub use split::Split;
pub use target::{
    required_bytes, Error, RasterTarget, BLOCK_SIZE, COLOR_BLOCK_BYTES, COLOR_TILE_BYTES,
    DEPTH_BLOCK_BYTES, DEPTH_TILE_BYTES, TILE_SIZE,
};
