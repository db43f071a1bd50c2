//! Triangle rasterization: draw-call types and the tile dispatcher.

pub mod blit;
pub mod clear;
mod kernel;

use bitflags::bitflags;

use crate::split::Split;
use crate::target::{tiles_across, tiles_down, RasterTarget, COLOR_TILE_BYTES, DEPTH_TILE_BYTES};
use kernel::rasterize_tile;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-submission pipeline switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct RasterFlags: u32 {
        /// Write covered pixels to the color plane.
        const COLOR_WRITE = 1 << 0;
        /// Write passing fragments to the depth plane.
        const DEPTH_WRITE = 1 << 1;
        /// Discard fragments that fail the depth comparison.
        const DEPTH_TEST = 1 << 2;
    }
}

/// One draw call: an indexed triangle list with per-vertex attributes.
///
/// The transform is row-major and applied as `v * M` with `w = 1`. Colors
/// and texcoords are optional; their presence selects a different kernel
/// specialization. Texcoords are accepted but not yet sampled.
#[derive(Clone, Copy, Debug)]
pub struct RasterInput<'a> {
    /// Row-vector transform applied to every position.
    pub transform: [[f32; 4]; 4],
    /// Vertex positions, `xyz` each.
    pub vertices: &'a [[f32; 3]],
    /// Optional vertex colors, `rgba` in `[0, 1]` each.
    pub colors: Option<&'a [[f32; 4]]>,
    /// Optional vertex texture coordinates.
    pub texcoords: Option<&'a [[f32; 2]]>,
    /// Three vertex indices per triangle, counter-clockwise in a y-up world.
    pub indices: &'a [[u16; 3]],
}

/// One rasterization submission: a target plus pipeline switches.
#[derive(Clone, Copy, Debug)]
pub struct RasterState<'a, 'm> {
    /// The image to render into.
    pub target: &'a RasterTarget<'m>,
    /// Pipeline switches for every draw in the submission.
    pub flags: RasterFlags,
}

/// Per-tile arguments threaded through a kernel invocation.
pub(crate) struct TileArgs {
    pub tile_x: u32,
    pub tile_y: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Base of this tile's color storage; null when color is off.
    pub color: *mut u8,
    /// Base of this tile's depth storage; null when depth is off.
    pub depth: *mut u8,
}

type TileKernel = unsafe fn(&TileArgs, &RasterInput);

// One monomorphized kernel per pipeline state, indexed by
// [VertexColor << 4 | DiffuseMap << 3 | DepthTest << 2 | DepthWrite << 1 | ColorWrite].
// The three low bits are the stable `RasterFlags` values.
static PIPELINE: [TileKernel; 32] = [
    rasterize_tile::<false, false, false, false, false>,
    rasterize_tile::<true, false, false, false, false>,
    rasterize_tile::<false, true, false, false, false>,
    rasterize_tile::<true, true, false, false, false>,
    rasterize_tile::<false, false, true, false, false>,
    rasterize_tile::<true, false, true, false, false>,
    rasterize_tile::<false, true, true, false, false>,
    rasterize_tile::<true, true, true, false, false>,
    rasterize_tile::<false, false, false, true, false>,
    rasterize_tile::<true, false, false, true, false>,
    rasterize_tile::<false, true, false, true, false>,
    rasterize_tile::<true, true, false, true, false>,
    rasterize_tile::<false, false, true, true, false>,
    rasterize_tile::<true, false, true, true, false>,
    rasterize_tile::<false, true, true, true, false>,
    rasterize_tile::<true, true, true, true, false>,
    rasterize_tile::<false, false, false, false, true>,
    rasterize_tile::<true, false, false, false, true>,
    rasterize_tile::<false, true, false, false, true>,
    rasterize_tile::<true, true, false, false, true>,
    rasterize_tile::<false, false, true, false, true>,
    rasterize_tile::<true, false, true, false, true>,
    rasterize_tile::<false, true, true, false, true>,
    rasterize_tile::<true, true, true, false, true>,
    rasterize_tile::<false, false, false, true, true>,
    rasterize_tile::<true, false, false, true, true>,
    rasterize_tile::<false, true, false, true, true>,
    rasterize_tile::<true, true, false, true, true>,
    rasterize_tile::<false, false, true, true, true>,
    rasterize_tile::<true, false, true, true, true>,
    rasterize_tile::<false, true, true, true, true>,
    rasterize_tile::<true, true, true, true, true>,
];

/// Rasterize a list of draw calls into the split's tiles.
///
/// Draws are processed in submission order within every tile, so depth
/// testing composes across draws. Flags that name a missing plane are
/// masked off rather than reported. Concurrent callers must use disjoint
/// split indices over the same count.
pub fn rasterize(state: &RasterState, inputs: &[RasterInput], split: Split) {
    let target = state.target;
    let mut flags = state.flags;

    let color_base = target.color_ptr();
    let depth_base = target.depth_ptr();
    if color_base.is_null() {
        flags.remove(RasterFlags::COLOR_WRITE);
    }
    if depth_base.is_null() {
        flags.remove(RasterFlags::DEPTH_WRITE | RasterFlags::DEPTH_TEST);
    }

    let screen_width = target.width();
    let screen_height = target.height();
    let x_tiles = tiles_across(screen_width);
    let tile_count = x_tiles * tiles_down(screen_height);

    for input in inputs {
        let mut key = flags.bits() & 7;
        if input.texcoords.is_some() {
            key |= 1 << 3;
        }
        if input.colors.is_some() {
            key |= 1 << 4;
        }
        let tile_kernel = PIPELINE[key as usize];

        for t in split.tiles(tile_count) {
            let args = TileArgs {
                tile_x: t % x_tiles,
                tile_y: t / x_tiles,
                screen_width,
                screen_height,
                color: if color_base.is_null() {
                    core::ptr::null_mut()
                } else {
                    // Safety: tile t lies inside the color plane.
                    unsafe { color_base.add(t as usize * COLOR_TILE_BYTES) }
                },
                depth: if depth_base.is_null() {
                    core::ptr::null_mut()
                } else {
                    // Safety: tile t lies inside the depth plane.
                    unsafe { depth_base.add(t as usize * DEPTH_TILE_BYTES) }
                },
            };
            // Safety: the kernel writes only within this tile's storage, and
            // the split contract keeps concurrent callers on disjoint tiles.
            unsafe { tile_kernel(&args, input) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_key_tracks_flags_and_attributes() {
        let flags = RasterFlags::COLOR_WRITE | RasterFlags::DEPTH_TEST;
        assert_eq!(flags.bits() & 7, 0b101);

        // Attribute presence adds the high bits.
        let with_colors = (flags.bits() & 7) | 1 << 4;
        assert_eq!(with_colors, 0b10101);
    }
}
