//! Resolve to the display surface: channel order, coverage and parity.

mod common;

use common::AlignedBuf;
use rasterflow_graphics::{
    blit, clear_color, required_bytes, DisplayView, RasterTarget, Split,
};

#[test]
fn blit_swaps_red_and_blue() {
    // Internal bytes [0x11, 0x22, 0x33, 0x00] must land as [0x33, 0x22,
    // 0x11, 0x00] on the display.
    let mut memory = vec![0u8; required_bytes(4, 2, true, false)];
    let target = RasterTarget::new(4, 2, &mut memory, true, false).unwrap();
    clear_color(
        &target,
        [0x11 as f32 / 255.0, 0x22 as f32 / 255.0, 0x33 as f32 / 255.0, 0.0],
        Split::SINGLE,
    );

    let pitch = 16u32;
    let mut surface = AlignedBuf::new((2 * pitch) as usize);
    {
        let display = DisplayView::new(surface.as_mut_slice(), 4, 2, pitch);
        blit(&display, &target, Split::SINGLE);
    }

    for y in 0..2 {
        for x in 0..4 {
            let bytes = surface.display_pixel(pitch, x, y).to_le_bytes();
            assert_eq!(bytes, [0x33, 0x22, 0x11, 0x00], "pixel ({x},{y})");
        }
    }
}

#[test]
fn clear_then_blit_fills_the_display() {
    // Odd-but-legal resolution: not a multiple of the tile size.
    let width = 48u32;
    let height = 40u32;
    let mut memory = vec![0u8; required_bytes(width, height, true, false)];
    let target = RasterTarget::new(width, height, &mut memory, true, false).unwrap();
    clear_color(&target, [0.25, 0.5, 0.75, 1.0], Split::SINGLE);

    let pitch = width * 4;
    let mut surface = AlignedBuf::new((height * pitch) as usize);
    {
        let display = DisplayView::new(surface.as_mut_slice(), width, height, pitch);
        blit(&display, &target, Split::SINGLE);
    }

    // Truncated channel scaling: 63, 127, 191, 255; B leads on the display.
    let expected = [191u8, 127, 63, 255];
    for y in 0..height {
        for x in 0..width {
            assert_eq!(
                surface.display_pixel(pitch, x, y).to_le_bytes(),
                expected,
                "pixel ({x},{y})"
            );
        }
    }
}

#[test]
fn blit_respects_a_padded_pitch() {
    let width = 8u32;
    let height = 4u32;
    let pitch = 64u32; // wider than the row, 16-byte aligned

    let mut memory = vec![0u8; required_bytes(width, height, true, false)];
    let target = RasterTarget::new(width, height, &mut memory, true, false).unwrap();
    clear_color(&target, [1.0, 0.0, 0.0, 0.0], Split::SINGLE);

    let mut surface = AlignedBuf::new((height * pitch) as usize);
    {
        let display = DisplayView::new(surface.as_mut_slice(), width, height, pitch);
        blit(&display, &target, Split::SINGLE);
    }

    // Red pixels inside the row, untouched zeros in the pitch padding.
    for y in 0..height {
        assert_eq!(
            surface.display_pixel(pitch, 0, y).to_le_bytes(),
            [0, 0, 255, 0]
        );
        assert_eq!(
            surface.display_pixel(pitch, width - 1, y).to_le_bytes(),
            [0, 0, 255, 0]
        );
        let beyond = (y * pitch + width * 4) as usize;
        assert_eq!(surface.as_slice()[beyond], 0, "row {y} padding");
    }
}

#[test]
fn split_blits_compose_to_the_single_blit() {
    let width = 96u32;
    let height = 64u32;
    let mut memory = vec![0u8; required_bytes(width, height, true, false)];
    let target = RasterTarget::new(width, height, &mut memory, true, false).unwrap();
    clear_color(&target, [0.9, 0.1, 0.4, 0.2], Split::SINGLE);

    let pitch = width * 4;
    let render = |count: u32| -> Vec<u8> {
        let mut surface = AlignedBuf::new((height * pitch) as usize);
        {
            let display = DisplayView::new(surface.as_mut_slice(), width, height, pitch);
            for index in 0..count {
                blit(&display, &target, Split::new(index, count));
            }
        }
        surface.as_slice().to_vec()
    };

    let reference = render(1);
    for count in [2u32, 3, 6] {
        assert_eq!(render(count), reference, "count {count}");
    }
}
