//! aarch64 backend (NEON, baseline for the architecture).

use core::arch::aarch64::*;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, BitAnd, BitOr, Mul, Neg, Shl, Shr, Sub};

// ============================================================================
// F32x4
// ============================================================================

/// Four-lane f32 batch.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(float32x4_t);

impl Default for F32x4 {
    #[inline(always)]
    fn default() -> Self {
        unsafe { Self(vdupq_n_f32(0.0)) }
    }
}

impl Debug for F32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x4({:?})", self.to_array())
    }
}

impl F32x4 {
    /// Splat a scalar across all lanes.
    #[inline(always)]
    pub fn splat(val: f32) -> Self {
        unsafe { Self(vdupq_n_f32(val)) }
    }

    /// Build a batch from lanes in memory order.
    #[inline(always)]
    pub fn from_array(v: [f32; 4]) -> Self {
        unsafe { Self(vld1q_f32(v.as_ptr())) }
    }

    /// Extract lanes in memory order.
    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { vst1q_f32(out.as_mut_ptr(), self.0) };
        out
    }

    /// Per-lane reciprocal approximation.
    ///
    /// `vrecpe` alone gives ~8 bits; one Newton-Raphson refinement brings it
    /// in line with the x86 `rcpps` estimate.
    #[inline(always)]
    pub fn recip(self) -> Self {
        unsafe {
            let est = vrecpeq_f32(self.0);
            Self(vmulq_f32(vrecpsq_f32(self.0, est), est))
        }
    }

    /// Convert to i32 lanes, rounding to nearest even.
    #[inline(always)]
    pub fn to_i32_round(self) -> I32x4 {
        unsafe { I32x4(vcvtnq_s32_f32(self.0)) }
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(vaddq_f32(self.0, rhs.0)) }
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(vsubq_f32(self.0, rhs.0)) }
    }
}

impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(vmulq_f32(self.0, rhs.0)) }
    }
}

impl Neg for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        unsafe { Self(vnegq_f32(self.0)) }
    }
}

// ============================================================================
// I32x4
// ============================================================================

/// Four-lane i32 batch: edge values, packed pixels, depth words and masks.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x4(int32x4_t);

impl Default for I32x4 {
    #[inline(always)]
    fn default() -> Self {
        unsafe { Self(vdupq_n_s32(0)) }
    }
}

impl Debug for I32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "I32x4({:?})", self.to_array())
    }
}

impl I32x4 {
    /// Splat a scalar across all lanes.
    #[inline(always)]
    pub fn splat(val: i32) -> Self {
        unsafe { Self(vdupq_n_s32(val)) }
    }

    /// Build a batch from lanes in memory order.
    #[inline(always)]
    pub fn from_array(v: [i32; 4]) -> Self {
        unsafe { Self(vld1q_s32(v.as_ptr())) }
    }

    /// Extract lanes in memory order.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 4] {
        let mut out = [0i32; 4];
        unsafe { vst1q_s32(out.as_mut_ptr(), self.0) };
        out
    }

    /// Load 16 bytes.
    ///
    /// # Safety
    /// `ptr` must be valid for 16 bytes of reads and 16-byte aligned.
    #[inline(always)]
    pub unsafe fn load(ptr: *const u8) -> Self {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { Self(vld1q_s32(ptr as *const i32)) }
    }

    /// Store 16 bytes.
    ///
    /// # Safety
    /// `ptr` must be valid for 16 bytes of writes and 16-byte aligned.
    #[inline(always)]
    pub unsafe fn store(self, ptr: *mut u8) {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { vst1q_s32(ptr as *mut i32, self.0) }
    }

    /// Store 16 bytes. NEON has no non-temporal hint; plain store.
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
        unsafe { Self(vbicq_s32(self.0, rhs.0)) }
    }

    /// Arithmetic right shift by a variable count.
    #[inline(always)]
    pub fn sra(self, n: u32) -> Self {
        // A negative shift count on a signed vector shifts right.
        unsafe { Self(vshlq_s32(self.0, vdupq_n_s32(-(n as i32)))) }
    }

    /// Per-lane `self > rhs` as an all-ones/all-zeros mask.
    #[inline(always)]
    pub fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(vreinterpretq_s32_u32(vcgtq_s32(self.0, rhs.0))) }
    }

    /// Lane-wise merge: mask lanes of all-ones take `if_true`.
    #[inline(always)]
    pub fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
        unsafe {
            Self(vbslq_s32(
                vreinterpretq_u32_s32(mask.0),
                if_true.0,
                if_false.0,
            ))
        }
    }

    /// True when any bit in any lane is set.
    #[inline(always)]
    pub fn any(self) -> bool {
        unsafe { vmaxvq_u32(vreinterpretq_u32_s32(self.0)) != 0 }
    }

    /// Interleave the low 64-bit halves: `[a0, a1, b0, b1]`.
    #[inline(always)]
    pub fn interleave_lo64(self, rhs: Self) -> Self {
        unsafe {
            Self(vreinterpretq_s32_u64(vzip1q_u64(
                vreinterpretq_u64_s32(self.0),
                vreinterpretq_u64_s32(rhs.0),
            )))
        }
    }

    /// Interleave the high 64-bit halves: `[a2, a3, b2, b3]`.
    #[inline(always)]
    pub fn interleave_hi64(self, rhs: Self) -> Self {
        unsafe {
            Self(vreinterpretq_s32_u64(vzip2q_u64(
                vreinterpretq_u64_s32(self.0),
                vreinterpretq_u64_s32(rhs.0),
            )))
        }
    }

    /// Convert lanes to f32.
    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        unsafe { F32x4(vcvtq_f32_s32(self.0)) }
    }
}

impl Add for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(vaddq_s32(self.0, rhs.0)) }
    }
}

impl Sub for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(vsubq_s32(self.0, rhs.0)) }
    }
}

impl Mul for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(vmulq_s32(self.0, rhs.0)) }
    }
}

impl BitAnd for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(vandq_s32(self.0, rhs.0)) }
    }
}

impl BitOr for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(vorrq_s32(self.0, rhs.0)) }
    }
}

impl Shl<u32> for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn shl(self, rhs: u32) -> Self {
        unsafe { Self(vshlq_s32(self.0, vdupq_n_s32(rhs as i32))) }
    }
}

impl Shr<u32> for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn shr(self, rhs: u32) -> Self {
        // Logical shift: reinterpret as unsigned lanes first.
        unsafe {
            Self(vreinterpretq_s32_u32(vshlq_u32(
                vreinterpretq_u32_s32(self.0),
                vdupq_n_s32(-(rhs as i32)),
            )))
        }
    }
}
