//! The per-tile triangle kernel.
//!
//! One monomorphized instance exists for every combination of the five
//! pipeline switches, so the block loop carries no pipeline branches; the
//! dispatcher pays a single indirect call per draw per tile. `DIFFUSE_MAP`
//! selects its own instances but sampling is not implemented yet; textured
//! draws rasterize as if untextured.
//!
//! Geometry convention: indices wind counter-clockwise in a y-up world. The
//! kernel flips y into image space (y down) during the transform, which
//! mirrors the winding, so vertex fetch swaps the last two corners to keep
//! the signed area of front faces positive.
//!
//! Fill rule: a pixel is covered when `e0 | e1 | e2 > 0`, i.e. no edge value
//! is negative. There is no top-left tie bias; pixels exactly on an edge
//! shared by two triangles may be written by both or by neither.

use rasterflow_core::{F32x4, I32x4};

use super::{RasterInput, TileArgs};
use crate::target::{
    BLOCK_SIZE, COLOR_BLOCK_BYTES, COLOR_TILE_PITCH, DEPTH_BLOCK_BYTES, DEPTH_TILE_PITCH,
    TILE_SIZE,
};

/// Sub-pixel precision: 4 fractional bits, unit = 1/16 pixel.
const PIXEL_FRAC_BITS: i32 = 4;
const PIXEL_FRAC_UNIT: i32 = 1 << PIXEL_FRAC_BITS;

/// Depth quantization scale: unsigned-normalized 24-bit.
const DEPTH_SCALE: f32 = 0xFFFFFF as f32;

/// Rasterize every triangle of `input` that touches this tile.
///
/// # Safety
/// `args.color` must point at this tile's color storage when `COLOR_WRITE`
/// is set, and `args.depth` at its depth storage when `DEPTH_WRITE` or
/// `DEPTH_TEST` is set; both 16-byte aligned with full-tile extent.
pub(crate) unsafe fn rasterize_tile<
    const COLOR_WRITE: bool,
    const DEPTH_WRITE: bool,
    const DEPTH_TEST: bool,
    const DIFFUSE_MAP: bool,
    const VERTEX_COLOR: bool,
>(
    args: &TileArgs,
    input: &RasterInput,
) {
    let needs_depth = DEPTH_WRITE || DEPTH_TEST;

    // Row-vector transform; negating the y row points the image y axis down.
    let m0 = F32x4::from_array(input.transform[0]);
    let m1 = -F32x4::from_array(input.transform[1]);
    let m2 = F32x4::from_array(input.transform[2]);
    let m3 = F32x4::from_array(input.transform[3]);

    // Screen space is centered: pixel coordinates run -w/2..w/2, -h/2..h/2.
    let scx = (args.screen_width / 2) as i32;
    let scy = (args.screen_height / 2) as i32;
    let sx = (args.tile_x * TILE_SIZE) as i32;
    let sy = (args.tile_y * TILE_SIZE) as i32;

    let tile_min_x = sx - scx;
    let tile_min_y = sy - scy;
    let tile_max_x = (sx + TILE_SIZE as i32 - scx).min(scx - 1);
    let tile_max_y = (sy + TILE_SIZE as i32 - scy).min(scy - 1);

    let xscale = (scx << PIXEL_FRAC_BITS) as f32;
    let yscale = (scy << PIXEL_FRAC_BITS) as f32;

    let colors = input.colors.unwrap_or(&[]);

    for tri in input.indices {
        // Fetch in (0, 2, 1) order: the image-space y flip mirrors the
        // winding, and the swap restores a positive area for front faces.
        let idx = [tri[0] as usize, tri[2] as usize, tri[1] as usize];

        let mut v = [[0.0f32; 4]; 3];
        let mut c = [[0.0f32; 4]; 3];
        for i in 0..3 {
            let p = input.vertices[idx[i]];
            let mut pos = m0 * F32x4::splat(p[0]);
            pos = pos + m1 * F32x4::splat(p[1]);
            pos = pos + m2 * F32x4::splat(p[2]);
            pos = pos + m3;
            v[i] = pos.to_array();

            if VERTEX_COLOR {
                c[i] = colors[idx[i]];
            }
        }

        // Whole-triangle rejection at the near and far planes; there is no
        // clipping subdivision.
        if v[0][2] < 0.0 || v[1][2] < 0.0 || v[2][2] < 0.0 {
            continue;
        }
        if v[0][2] > v[0][3] || v[1][2] > v[1][3] || v[2][2] > v[2][3] {
            continue;
        }

        // Project to fixed-point screen coordinates.
        let coord = [
            [
                (v[0][0] * xscale / v[0][3]) as i32,
                (v[0][1] * yscale / v[0][3]) as i32,
            ],
            [
                (v[1][0] * xscale / v[1][3]) as i32,
                (v[1][1] * yscale / v[1][3]) as i32,
            ],
            [
                (v[2][0] * xscale / v[2][3]) as i32,
                (v[2][1] * yscale / v[2][3]) as i32,
            ],
        ];

        let coord21x = coord[2][0] - coord[1][0];
        let coord21y = coord[2][1] - coord[1][1];
        let coord02x = coord[0][0] - coord[2][0];
        let coord02y = coord[0][1] - coord[2][1];

        // Twice the signed area; non-positive means back-facing or degenerate.
        let triarea_x2 = -((coord02x * coord21y) >> PIXEL_FRAC_BITS)
            + ((coord02y * coord21x) >> PIXEL_FRAC_BITS);
        if triarea_x2 < 0 {
            continue;
        }

        // Pixel-space bounding box.
        let bb_min_x =
            (coord[0][0].min(coord[1][0]).min(coord[2][0]) + (PIXEL_FRAC_UNIT - 1)) >> PIXEL_FRAC_BITS;
        let bb_min_y =
            (coord[0][1].min(coord[1][1]).min(coord[2][1]) + (PIXEL_FRAC_UNIT - 1)) >> PIXEL_FRAC_BITS;
        let bb_max_x =
            (coord[0][0].max(coord[1][0]).max(coord[2][0]) + (PIXEL_FRAC_UNIT - 1)) >> PIXEL_FRAC_BITS;
        let bb_max_y =
            (coord[0][1].max(coord[1][1]).max(coord[2][1]) + (PIXEL_FRAC_UNIT - 1)) >> PIXEL_FRAC_BITS;

        // Skip triangles that miss this tile entirely.
        if bb_min_x > tile_max_x || bb_min_y > tile_max_y {
            continue;
        }
        if bb_max_x < tile_min_x || bb_max_y < tile_min_y {
            continue;
        }

        // Clip to the tile and round outward to the 2x2 block grid. Min
        // before max: a tile rectangle emptied by the screen clamp (odd
        // resolutions lose their center-offset last column) must collapse
        // the walk to zero blocks, not invert it.
        let block_mask = !(BLOCK_SIZE as i32 - 1);
        let bx0 = bb_min_x.min(tile_max_x).max(tile_min_x) & block_mask;
        let by0 = bb_min_y.min(tile_max_y).max(tile_min_y) & block_mask;
        let bx1 =
            ((bb_max_x + 1).min(tile_max_x).max(tile_min_x) + (BLOCK_SIZE as i32 - 1)) & block_mask;
        let by1 =
            ((bb_max_y + 1).min(tile_max_y).max(tile_min_y) + (BLOCK_SIZE as i32 - 1)) & block_mask;

        // Integer edge functions sampled at the four pixels of the first
        // block; the half-step shift moves the sample off the pixel grid.
        let offset_x = I32x4::splat(bx0) + I32x4::from_array([0, 1, 0, 1]);
        let offset_y = I32x4::splat(by0) + I32x4::from_array([0, 0, 1, 1]);

        let mut e_xstep = [
            I32x4::splat(-coord21y),
            I32x4::splat(-coord02y),
            I32x4::splat(coord[0][1] - coord[1][1]),
        ];
        let mut e_ystep = [
            I32x4::splat(coord21x),
            I32x4::splat(coord02x),
            I32x4::splat(coord[1][0] - coord[0][0]),
        ];

        let mut e_row = [I32x4::default(); 3];
        e_row[0] = I32x4::splat(
            ((coord21x * -coord[1][1]) >> PIXEL_FRAC_BITS)
                - ((coord21y * -coord[1][0]) >> PIXEL_FRAC_BITS),
        ) + offset_x * e_xstep[0]
            + offset_y * e_ystep[0]
            - e_xstep[0].sra(1)
            - e_ystep[0].sra(1);
        e_row[1] = I32x4::splat(
            ((coord02x * -coord[2][1]) >> PIXEL_FRAC_BITS)
                - ((coord02y * -coord[2][0]) >> PIXEL_FRAC_BITS),
        ) + offset_x * e_xstep[1]
            + offset_y * e_ystep[1]
            - e_xstep[1].sra(1)
            - e_ystep[1].sra(1);

        // From here on one step is one 2x2 block.
        for k in 0..3 {
            e_xstep[k] = e_xstep[k] << 1;
            e_ystep[k] = e_ystep[k] << 1;
        }

        // The three edge values sum to the area, so the last one is free.
        e_row[2] = I32x4::splat(triarea_x2) - e_row[0] - e_row[1];

        // Normalized barycentric rows and steps for attribute interpolation.
        let inv_area = I32x4::splat(triarea_x2).to_f32().recip();
        let bary_row = [e_row[1].to_f32() * inv_area, e_row[2].to_f32() * inv_area];
        let bary_xstep = [
            e_xstep[1].to_f32() * inv_area,
            e_xstep[2].to_f32() * inv_area,
        ];
        let bary_ystep = [
            e_ystep[1].to_f32() * inv_area,
            e_ystep[2].to_f32() * inv_area,
        ];

        // 1/w interpolates linearly in screen space.
        let inv_w0 = F32x4::splat(v[0][3]).recip();
        let inv_w1 = F32x4::splat(v[1][3]).recip();
        let inv_w2 = F32x4::splat(v[2][3]).recip();
        let inv_w10 = inv_w1 - inv_w0;
        let inv_w20 = inv_w2 - inv_w0;
        let mut inv_w_row = inv_w0 + inv_w10 * bary_row[0] + inv_w20 * bary_row[1];
        let inv_w_xstep = inv_w10 * bary_xstep[0] + inv_w20 * bary_xstep[1];
        let inv_w_ystep = inv_w10 * bary_ystep[0] + inv_w20 * bary_ystep[1];

        // So does z/w.
        let (mut z_row, z_xstep, z_ystep) = if needs_depth {
            let z0 = F32x4::splat(v[0][2]) * inv_w0;
            let z10 = F32x4::splat(v[1][2]) * inv_w1 - z0;
            let z20 = F32x4::splat(v[2][2]) * inv_w2 - z0;
            (
                z0 + z10 * bary_row[0] + z20 * bary_row[1],
                z10 * bary_xstep[0] + z20 * bary_xstep[1],
                z10 * bary_ystep[0] + z20 * bary_ystep[1],
            )
        } else {
            (F32x4::default(), F32x4::default(), F32x4::default())
        };

        // And color/w, one channel at a time.
        let (mut pc_row, pc_xstep, pc_ystep) = if COLOR_WRITE && VERTEX_COLOR {
            let mut row = [F32x4::default(); 3];
            let mut xstep = [F32x4::default(); 3];
            let mut ystep = [F32x4::default(); 3];
            for ch in 0..3 {
                let a0 = F32x4::splat(c[0][ch]) * inv_w0;
                let a10 = F32x4::splat(c[1][ch]) * inv_w1 - a0;
                let a20 = F32x4::splat(c[2][ch]) * inv_w2 - a0;
                row[ch] = a0 + a10 * bary_row[0] + a20 * bary_row[1];
                xstep[ch] = a10 * bary_xstep[0] + a20 * bary_xstep[1];
                ystep[ch] = a10 * bary_ystep[0] + a20 * bary_ystep[1];
            }
            (row, xstep, ystep)
        } else {
            (
                [F32x4::default(); 3],
                [F32x4::default(); 3],
                [F32x4::default(); 3],
            )
        };

        // Clipped bounds in block units, relative to the tile origin.
        let tile_bx0 = (bx0 - tile_min_x) / BLOCK_SIZE as i32;
        let tile_by0 = (by0 - tile_min_y) / BLOCK_SIZE as i32;
        let xcount = ((bx1 - tile_min_x) / BLOCK_SIZE as i32 - tile_bx0) as u32;
        let ycount = ((by1 - tile_min_y) / BLOCK_SIZE as i32 - tile_by0) as u32;

        let mut out_color_row = if COLOR_WRITE {
            // Safety: block coordinates were clipped to this tile.
            unsafe {
                args.color
                    .add(tile_by0 as usize * COLOR_TILE_PITCH + tile_bx0 as usize * COLOR_BLOCK_BYTES)
            }
        } else {
            core::ptr::null_mut()
        };
        let mut out_depth_row = if needs_depth {
            // Safety: block coordinates were clipped to this tile.
            unsafe {
                args.depth
                    .add(tile_by0 as usize * DEPTH_TILE_PITCH + tile_bx0 as usize * DEPTH_BLOCK_BYTES)
            }
        } else {
            core::ptr::null_mut()
        };

        for _ in 0..ycount {
            let mut out_color = out_color_row;
            let mut out_depth = out_depth_row;
            let mut e = e_row;
            let mut inv_w = inv_w_row;
            let mut z = z_row;
            let mut pc = pc_row;

            for _ in 0..xcount {
                'block: {
                    // Sign-bit trick: the OR is negative or zero unless every
                    // edge value is non-negative with at least one positive.
                    let mut mask = (e[0] | e[1] | e[2]).cmp_gt(I32x4::splat(0));
                    if !mask.any() {
                        break 'block;
                    }

                    if needs_depth {
                        // Safety: the block lies inside this tile's depth storage.
                        let old_z = unsafe { I32x4::load(out_depth) };
                        let new_z = (z * F32x4::splat(DEPTH_SCALE)).to_i32_round();

                        if DEPTH_TEST {
                            // Reversed depth: greater is nearer, so a fragment
                            // must strictly exceed the stored value to land.
                            mask = mask & new_z.cmp_gt(old_z);
                            if !mask.any() {
                                break 'block;
                            }
                        }

                        if DEPTH_WRITE {
                            // Safety: as above.
                            unsafe { I32x4::select(mask, new_z, old_z).store(out_depth) };
                        }
                    }

                    if COLOR_WRITE {
                        // Safety: the block lies inside this tile's color storage.
                        let old_color = unsafe { I32x4::load(out_color) };

                        let new_color = if VERTEX_COLOR {
                            // Perspective recovery: color = (color/w) * w.
                            let w = inv_w.recip();
                            let scale = F32x4::splat(255.0);
                            let r = (pc[0] * w * scale).to_i32_round();
                            let g = (pc[1] * w * scale).to_i32_round();
                            let b = (pc[2] * w * scale).to_i32_round();
                            r | (g << 8) | (b << 16)
                        } else {
                            // All-ones mask lanes double as opaque white.
                            mask
                        };

                        // Safety: as above.
                        unsafe { I32x4::select(mask, new_color, old_color).store(out_color) };
                    }
                }

                if COLOR_WRITE {
                    out_color = unsafe { out_color.add(COLOR_BLOCK_BYTES) };
                }
                if needs_depth {
                    out_depth = unsafe { out_depth.add(DEPTH_BLOCK_BYTES) };
                }
                for k in 0..3 {
                    e[k] = e[k] + e_xstep[k];
                }
                inv_w = inv_w + inv_w_xstep;
                if needs_depth {
                    z = z + z_xstep;
                }
                if COLOR_WRITE && VERTEX_COLOR {
                    for ch in 0..3 {
                        pc[ch] = pc[ch] + pc_xstep[ch];
                    }
                }
            }

            if COLOR_WRITE {
                out_color_row = unsafe { out_color_row.add(COLOR_TILE_PITCH) };
            }
            if needs_depth {
                out_depth_row = unsafe { out_depth_row.add(DEPTH_TILE_PITCH) };
            }
            for k in 0..3 {
                e_row[k] = e_row[k] + e_ystep[k];
            }
            inv_w_row = inv_w_row + inv_w_ystep;
            if needs_depth {
                z_row = z_row + z_ystep;
            }
            if COLOR_WRITE && VERTEX_COLOR {
                for ch in 0..3 {
                    pc_row[ch] = pc_row[ch] + pc_ystep[ch];
                }
            }
        }
    }
}
