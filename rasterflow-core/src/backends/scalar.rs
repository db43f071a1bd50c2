//! Portable fallback backend: four lanes emulated with plain arrays.
//!
//! Slow, but keeps the 2x2 block layout byte-identical to the SIMD
//! backends so buffers render the same on every target.

use core::fmt::{Debug, Formatter};
use core::ops::{Add, BitAnd, BitOr, Mul, Neg, Shl, Shr, Sub};

// ============================================================================
// F32x4
// ============================================================================

/// Four-lane f32 batch.
#[derive(Copy, Clone, Default)]
#[repr(transparent)]
pub struct F32x4([f32; 4]);

impl Debug for F32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x4({:?})", self.0)
    }
}

impl F32x4 {
    /// Splat a scalar across all lanes.
    #[inline(always)]
    pub fn splat(val: f32) -> Self {
        Self([val; 4])
    }

    /// Build a batch from lanes in memory order.
    #[inline(always)]
    pub fn from_array(v: [f32; 4]) -> Self {
        Self(v)
    }

    /// Extract lanes in memory order.
    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        self.0
    }

    /// Per-lane reciprocal.
    #[inline(always)]
    pub fn recip(self) -> Self {
        Self(self.0.map(|v| 1.0 / v))
    }

    /// Convert to i32 lanes, rounding to nearest even.
    #[inline(always)]
    pub fn to_i32_round(self) -> I32x4 {
        I32x4(self.0.map(|v| libm::rintf(v) as i32))
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] * rhs.0[i]))
    }
}

impl Neg for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.map(|v| -v))
    }
}

// ============================================================================
// I32x4
// ============================================================================

/// Four-lane i32 batch: edge values, packed pixels, depth words and masks.
#[derive(Copy, Clone, Default)]
#[repr(transparent)]
pub struct I32x4([i32; 4]);

impl Debug for I32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "I32x4({:?})", self.0)
    }
}

impl I32x4 {
    /// Splat a scalar across all lanes.
    #[inline(always)]
    pub fn splat(val: i32) -> Self {
        Self([val; 4])
    }

    /// Build a batch from lanes in memory order.
    #[inline(always)]
    pub fn from_array(v: [i32; 4]) -> Self {
        Self(v)
    }

    /// Extract lanes in memory order.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 4] {
        self.0
    }

    /// Load 16 bytes.
    ///
    /// # Safety
    /// `ptr` must be valid for 16 bytes of reads and 16-byte aligned.
    #[inline(always)]
    pub unsafe fn load(ptr: *const u8) -> Self {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { Self(core::ptr::read(ptr as *const [i32; 4])) }
    }

    /// Store 16 bytes.
    ///
    /// # Safety
    /// `ptr` must be valid for 16 bytes of writes and 16-byte aligned.
    #[inline(always)]
    pub unsafe fn store(self, ptr: *mut u8) {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { core::ptr::write(ptr as *mut [i32; 4], self.0) }
    }

    /// Store 16 bytes; no non-temporal hint on this backend.
    ///
    /// # Safety
    /// `ptr` must be valid for 16 bytes of writes and 16-byte aligned.
    #[inline(always)]
    pub unsafe fn store_stream(self, ptr: *mut u8) {
        unsafe { self.store(ptr) }
    }

    /// `self & !rhs` per lane.
    #[inline(always)]
    pub fn and_not(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] & !rhs.0[i]))
    }

    /// Arithmetic right shift by a variable count.
    #[inline(always)]
    pub fn sra(self, n: u32) -> Self {
        Self(self.0.map(|v| v >> n))
    }

    /// Per-lane `self > rhs` as an all-ones/all-zeros mask.
    #[inline(always)]
    pub fn cmp_gt(self, rhs: Self) -> Self {
        Self(core::array::from_fn(
            |i| if self.0[i] > rhs.0[i] { -1 } else { 0 },
        ))
    }

    /// Lane-wise merge: mask lanes of all-ones take `if_true`.
    #[inline(always)]
    pub fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
        (if_true & mask) | if_false.and_not(mask)
    }

    /// True when any bit in any lane is set.
    #[inline(always)]
    pub fn any(self) -> bool {
        self.0.iter().any(|&v| v != 0)
    }

    /// Interleave the low 64-bit halves: `[a0, a1, b0, b1]`.
    #[inline(always)]
    pub fn interleave_lo64(self, rhs: Self) -> Self {
        Self([self.0[0], self.0[1], rhs.0[0], rhs.0[1]])
    }

    /// Interleave the high 64-bit halves: `[a2, a3, b2, b3]`.
    #[inline(always)]
    pub fn interleave_hi64(self, rhs: Self) -> Self {
        Self([self.0[2], self.0[3], rhs.0[2], rhs.0[3]])
    }

    /// Convert lanes to f32.
    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        F32x4(self.0.map(|v| v as f32))
    }
}

impl Add for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].wrapping_add(rhs.0[i])))
    }
}

impl Sub for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].wrapping_sub(rhs.0[i])))
    }
}

impl Mul for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i].wrapping_mul(rhs.0[i])))
    }
}

impl BitAnd for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] & rhs.0[i]))
    }
}

impl BitOr for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|i| self.0[i] | rhs.0[i]))
    }
}

impl Shl<u32> for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn shl(self, rhs: u32) -> Self {
        Self(self.0.map(|v| ((v as u32) << rhs) as i32))
    }
}

impl Shr<u32> for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn shr(self, rhs: u32) -> Self {
        // Logical shift, matching the SIMD backends.
        Self(self.0.map(|v| ((v as u32) >> rhs) as i32))
    }
}
