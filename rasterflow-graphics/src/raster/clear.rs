//! Tile clears: one splat store per 2x2 block.

use rasterflow_core::I32x4;

use crate::split::Split;
use crate::target::{
    RasterTarget, BLOCKS_PER_TILE, COLOR_BLOCK_BYTES, COLOR_TILE_BYTES, DEPTH_BLOCK_BYTES,
    DEPTH_TILE_BYTES,
};

/// Fill the split's color tiles with a constant.
///
/// Channels are `[0, 1]` floats, scaled by 255 and truncated into a packed
/// `[R, G, B, A]` word. Padding tiles beyond the visible rectangle are
/// cleared too; they must stay legally addressable.
pub fn clear_color(target: &RasterTarget, rgba: [f32; 4], split: Split) {
    let base = target.color_ptr();
    if base.is_null() {
        return;
    }

    let packed = (rgba[0] * 255.0) as u8 as u32
        | ((rgba[1] * 255.0) as u8 as u32) << 8
        | ((rgba[2] * 255.0) as u8 as u32) << 16
        | ((rgba[3] * 255.0) as u8 as u32) << 24;
    let cv = I32x4::splat(packed as i32);

    for t in split.tiles(target.tile_count()) {
        // Safety: tile t lies inside the color plane; stores stay within it.
        unsafe {
            let mut out = base.add(t as usize * COLOR_TILE_BYTES);
            for _ in 0..BLOCKS_PER_TILE {
                cv.store(out);
                out = out.add(COLOR_BLOCK_BYTES);
            }
        }
    }
}

/// Fill the split's depth tiles with a constant.
///
/// `depth` is a unit float scaled to the unsigned 24-bit range; the stencil
/// byte clears to zero.
pub fn clear_depth(target: &RasterTarget, depth: f32, split: Split) {
    let base = target.depth_ptr();
    if base.is_null() {
        return;
    }

    let cv = I32x4::splat((depth * 0xFFFFFF as f32) as u32 as i32);

    for t in split.tiles(target.tile_count()) {
        // Safety: tile t lies inside the depth plane; stores stay within it.
        unsafe {
            let mut out = base.add(t as usize * DEPTH_TILE_BYTES);
            for _ in 0..BLOCKS_PER_TILE {
                cv.store(out);
                out = out.add(DEPTH_BLOCK_BYTES);
            }
        }
    }
}
