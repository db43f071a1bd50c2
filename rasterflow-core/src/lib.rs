//! # Rasterflow Core
//!
//! A four-lane SIMD batch layer for software rasterization.
//!
//! The rasterizer's buffers are laid out in 2x2 pixel blocks, so every
//! backend exposes exactly four 32-bit lanes: lane order is
//! `[(0,0), (1,0), (0,1), (1,1)]` within a block. [`F32x4`] carries
//! interpolants, [`I32x4`] carries edge values, packed pixels and depth
//! words. The concrete implementation is chosen per target architecture
//! (SSE2 on x86_64, NEON on aarch64, a portable array fallback elsewhere);
//! all three expose the same API so callers never see `cfg` boundaries.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod backends;

// Select backend based on target architecture.
#[cfg(target_arch = "x86_64")]
pub use backends::x86::{F32x4, I32x4};

#[cfg(target_arch = "aarch64")]
pub use backends::arm::{F32x4, I32x4};

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub use backends::scalar::{F32x4, I32x4};

/// The number of 32-bit lanes in a batch: one 2x2 pixel block.
pub const LANES: usize = 4;

/// Required alignment (in bytes) for batch loads and stores.
pub const BATCH_ALIGN: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32x4_roundtrip() {
        let v = F32x4::from_array([1.0, -2.5, 0.0, 4.25]);
        assert_eq!(v.to_array(), [1.0, -2.5, 0.0, 4.25]);
    }

    #[test]
    fn f32x4_arithmetic() {
        let a = F32x4::from_array([1.0, 2.0, 3.0, 4.0]);
        let b = F32x4::splat(2.0);
        assert_eq!((a + b).to_array(), [3.0, 4.0, 5.0, 6.0]);
        assert_eq!((a - b).to_array(), [-1.0, 0.0, 1.0, 2.0]);
        assert_eq!((a * b).to_array(), [2.0, 4.0, 6.0, 8.0]);
        assert_eq!((-a).to_array(), [-1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn f32x4_recip_is_close() {
        let v = F32x4::from_array([1.0, 2.0, 4.0, 8.0]);
        let r = v.recip().to_array();
        for (got, want) in r.iter().zip([1.0f32, 0.5, 0.25, 0.125]) {
            // Hardware reciprocal approximations guarantee ~12 bits.
            assert!(libm::fabsf(got - want) <= want * 1.0e-3);
        }
    }

    #[test]
    fn f32x4_round_ties_even() {
        let v = F32x4::from_array([0.5, 1.5, 2.4, -0.5]);
        assert_eq!(v.to_i32_round().to_array(), [0, 2, 2, 0]);
    }

    #[test]
    fn i32x4_arithmetic_and_shifts() {
        let a = I32x4::from_array([1, -2, 3, -4]);
        let b = I32x4::splat(3);
        assert_eq!((a + b).to_array(), [4, 1, 6, -1]);
        assert_eq!((a - b).to_array(), [-2, -5, 0, -7]);
        assert_eq!((a * b).to_array(), [3, -6, 9, -12]);
        assert_eq!((a << 1).to_array(), [2, -4, 6, -8]);
        assert_eq!(a.sra(1).to_array(), [0, -1, 1, -2]);
        assert_eq!(
            (I32x4::splat(0x00FF0000) >> 16).to_array(),
            [0x00FF; 4]
        );
    }

    #[test]
    fn i32x4_masks() {
        let a = I32x4::from_array([5, 0, -3, 7]);
        let mask = a.cmp_gt(I32x4::splat(0));
        assert_eq!(mask.to_array(), [-1, 0, 0, -1]);
        assert!(mask.any());
        assert!(!I32x4::splat(0).any());

        let t = I32x4::splat(1);
        let f = I32x4::splat(9);
        assert_eq!(I32x4::select(mask, t, f).to_array(), [1, 9, 9, 1]);
        assert_eq!(t.and_not(mask).to_array(), [0, 1, 1, 0]);
    }

    #[test]
    fn i32x4_interleave_64bit_halves() {
        let a = I32x4::from_array([1, 2, 3, 4]);
        let b = I32x4::from_array([5, 6, 7, 8]);
        assert_eq!(a.interleave_lo64(b).to_array(), [1, 2, 5, 6]);
        assert_eq!(a.interleave_hi64(b).to_array(), [3, 4, 7, 8]);
    }

    #[test]
    fn i32x4_aligned_memory_roundtrip() {
        #[repr(align(16))]
        struct Aligned([u8; 16]);

        let mut mem = Aligned([0u8; 16]);
        let v = I32x4::from_array([0x11223344, -1, 0, 0x7FFFFFFF]);
        unsafe {
            v.store(mem.0.as_mut_ptr());
            assert_eq!(I32x4::load(mem.0.as_ptr()).to_array(), v.to_array());
            v.store_stream(mem.0.as_mut_ptr());
            assert_eq!(I32x4::load(mem.0.as_ptr()).to_array(), v.to_array());
        }
    }

    #[test]
    fn conversions() {
        let i = I32x4::from_array([0, 255, -16, 1000]);
        assert_eq!(i.to_f32().to_array(), [0.0, 255.0, -16.0, 1000.0]);
    }
}
