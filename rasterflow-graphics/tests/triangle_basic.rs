//! Single-triangle kernel behavior: coverage, culling and bounds.

mod common;

use common::identity;
use rasterflow_graphics::{
    clear_color, rasterize, required_bytes, RasterFlags, RasterInput, RasterState, RasterTarget,
    Split,
};

const WHITE: u32 = 0xFFFFFFFF;
const CLEAR: u32 = 0;

fn draw_one<'a>(
    target: &RasterTarget,
    vertices: &'a [[f32; 3]],
    indices: &'a [[u16; 3]],
    colors: Option<&'a [[f32; 4]]>,
    flags: RasterFlags,
) {
    let input = RasterInput {
        transform: identity(),
        vertices,
        colors,
        texcoords: None,
        indices,
    };
    let state = RasterState { target, flags };
    rasterize(&state, &[input], Split::SINGLE);
}

#[test]
fn white_triangle_covers_its_interior() {
    let mut memory = vec![0u8; required_bytes(8, 8, true, false)];
    let target = RasterTarget::new(8, 8, &mut memory, true, false).unwrap();
    clear_color(&target, [0.0; 4], Split::SINGLE);

    // Counter-clockwise, y-up: apex at the top of the image.
    let vertices = [[-1.0, -1.0, 0.5], [1.0, -1.0, 0.5], [0.0, 1.0, 0.5]];
    draw_one(&target, &vertices, &[[0, 1, 2]], None, RasterFlags::COLOR_WRITE);

    // Without vertex colors covered pixels are opaque white.
    for &(x, y) in &[(4, 4), (3, 5), (4, 6)] {
        assert_eq!(target.color_at(x, y), Some(WHITE), "inside ({x},{y})");
    }
    for &(x, y) in &[(0, 0), (7, 0), (0, 7)] {
        assert_eq!(target.color_at(x, y), Some(CLEAR), "outside ({x},{y})");
    }
}

#[test]
fn reversed_winding_is_culled() {
    let mut memory = vec![0u8; required_bytes(8, 8, true, false)];
    let target = RasterTarget::new(8, 8, &mut memory, true, false).unwrap();
    clear_color(&target, [0.0; 4], Split::SINGLE);

    let vertices = [[-1.0, -1.0, 0.5], [1.0, -1.0, 0.5], [0.0, 1.0, 0.5]];
    draw_one(&target, &vertices, &[[0, 2, 1]], None, RasterFlags::COLOR_WRITE);

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(target.color_at(x, y), Some(CLEAR), "pixel ({x},{y})");
        }
    }
}

#[test]
fn near_plane_straddlers_are_dropped_whole() {
    let mut memory = vec![0u8; required_bytes(8, 8, true, false)];
    let target = RasterTarget::new(8, 8, &mut memory, true, false).unwrap();
    clear_color(&target, [0.0; 4], Split::SINGLE);

    // One vertex behind the near plane rejects the whole triangle.
    let vertices = [[-1.0, -1.0, -0.1], [1.0, -1.0, 0.5], [0.0, 1.0, 0.5]];
    draw_one(&target, &vertices, &[[0, 1, 2]], None, RasterFlags::COLOR_WRITE);

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(target.color_at(x, y), Some(CLEAR), "pixel ({x},{y})");
        }
    }
}

#[test]
fn far_overshoot_is_dropped_whole() {
    let mut memory = vec![0u8; required_bytes(8, 8, true, false)];
    let target = RasterTarget::new(8, 8, &mut memory, true, false).unwrap();
    clear_color(&target, [0.0; 4], Split::SINGLE);

    // z > w on one vertex.
    let vertices = [[-1.0, -1.0, 0.5], [1.0, -1.0, 1.5], [0.0, 1.0, 0.5]];
    draw_one(&target, &vertices, &[[0, 1, 2]], None, RasterFlags::COLOR_WRITE);

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(target.color_at(x, y), Some(CLEAR), "pixel ({x},{y})");
        }
    }
}

#[test]
fn writes_stay_inside_the_bounding_box() {
    let mut memory = vec![0u8; required_bytes(16, 16, true, false)];
    let target = RasterTarget::new(16, 16, &mut memory, true, false).unwrap();
    clear_color(&target, [0.0; 4], Split::SINGLE);

    // A small centered triangle: clip space [-0.5, 0.5].
    let vertices = [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.0, 0.5, 0.5]];
    draw_one(&target, &vertices, &[[0, 1, 2]], None, RasterFlags::COLOR_WRITE);

    let mut covered = 0;
    for y in 0..16 {
        for x in 0..16 {
            if target.color_at(x, y) == Some(WHITE) {
                covered += 1;
                // Clip-space [-0.5, 0.5] is pixel range [4, 12); one block
                // of slack for the 2x2 walk granularity.
                assert!((3..13).contains(&x), "x {x} outside bbox");
                assert!((3..13).contains(&y), "y {y} outside bbox");
            }
        }
    }
    assert!(covered > 4, "triangle should cover a handful of pixels");
}

#[test]
fn missing_planes_mask_their_flags() {
    // Color-only target rendered with all flags set: depth test and write
    // are masked off instead of faulting.
    let mut memory = vec![0u8; required_bytes(8, 8, true, false)];
    let target = RasterTarget::new(8, 8, &mut memory, true, false).unwrap();
    clear_color(&target, [0.0; 4], Split::SINGLE);

    let vertices = [[-1.0, -1.0, 0.5], [1.0, -1.0, 0.5], [0.0, 1.0, 0.5]];
    draw_one(
        &target,
        &vertices,
        &[[0, 1, 2]],
        None,
        RasterFlags::COLOR_WRITE | RasterFlags::DEPTH_WRITE | RasterFlags::DEPTH_TEST,
    );

    assert_eq!(target.color_at(4, 4), Some(WHITE));
}

#[test]
fn texcoords_route_through_the_textured_kernels() {
    // Texture sampling is unimplemented; the textured specializations must
    // still rasterize geometry identically.
    let mut memory = vec![0u8; required_bytes(8, 8, true, false)];
    let target = RasterTarget::new(8, 8, &mut memory, true, false).unwrap();
    clear_color(&target, [0.0; 4], Split::SINGLE);

    let vertices = [[-1.0, -1.0, 0.5], [1.0, -1.0, 0.5], [0.0, 1.0, 0.5]];
    let texcoords = [[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]];
    let input = RasterInput {
        transform: identity(),
        vertices: &vertices,
        colors: None,
        texcoords: Some(&texcoords),
        indices: &[[0, 1, 2]],
    };
    let state = RasterState {
        target: &target,
        flags: RasterFlags::COLOR_WRITE,
    };
    rasterize(&state, &[input], Split::SINGLE);

    assert_eq!(target.color_at(4, 4), Some(WHITE));
    assert_eq!(target.color_at(0, 0), Some(CLEAR));
}

#[test]
fn degenerate_triangles_cover_nothing() {
    let mut memory = vec![0u8; required_bytes(8, 8, true, false)];
    let target = RasterTarget::new(8, 8, &mut memory, true, false).unwrap();
    clear_color(&target, [0.0; 4], Split::SINGLE);

    // All three corners collinear.
    let vertices = [[-1.0, -1.0, 0.5], [0.0, 0.0, 0.5], [1.0, 1.0, 0.5]];
    draw_one(&target, &vertices, &[[0, 1, 2]], None, RasterFlags::COLOR_WRITE);

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(target.color_at(x, y), Some(CLEAR), "pixel ({x},{y})");
        }
    }
}
