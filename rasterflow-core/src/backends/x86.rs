//! x86_64 backend (SSE2, baseline for the architecture).

use core::arch::x86_64::*;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, BitAnd, BitOr, Mul, Neg, Shl, Shr, Sub};

// ============================================================================
// F32x4
// ============================================================================

/// Four-lane f32 batch.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(__m128);

impl Default for F32x4 {
    #[inline(always)]
    fn default() -> Self {
        unsafe { Self(_mm_setzero_ps()) }
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
        unsafe { Self(_mm_set1_ps(val)) }
    }

    /// Build a batch from lanes in memory order.
    #[inline(always)]
    pub fn from_array(v: [f32; 4]) -> Self {
        unsafe { Self(_mm_loadu_ps(v.as_ptr())) }
    }

    /// Extract lanes in memory order.
    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) };
        out
    }

    /// Per-lane reciprocal approximation (`rcpps`, ~12 significant bits).
    #[inline(always)]
    pub fn recip(self) -> Self {
        unsafe { Self(_mm_rcp_ps(self.0)) }
    }

    /// Convert to i32 lanes, rounding to nearest even (`cvtps2dq`).
    #[inline(always)]
    pub fn to_i32_round(self) -> I32x4 {
        unsafe { I32x4(_mm_cvtps_epi32(self.0)) }
    }
}

impl Add for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_ps(self.0, rhs.0)) }
    }
}

impl Sub for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_ps(self.0, rhs.0)) }
    }
}

impl Mul for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm_mul_ps(self.0, rhs.0)) }
    }
}

impl Neg for F32x4 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        // Flip the sign bit of every lane.
        unsafe { Self(_mm_xor_ps(self.0, _mm_set1_ps(-0.0))) }
    }
}

// ============================================================================
// I32x4
// ============================================================================

/// Four-lane i32 batch: edge values, packed pixels, depth words and masks.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct I32x4(__m128i);

impl Default for I32x4 {
    #[inline(always)]
    fn default() -> Self {
        unsafe { Self(_mm_setzero_si128()) }
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
        unsafe { Self(_mm_set1_epi32(val)) }
    }

    /// Build a batch from lanes in memory order.
    #[inline(always)]
    pub fn from_array(v: [i32; 4]) -> Self {
        unsafe { Self(_mm_loadu_si128(v.as_ptr() as *const __m128i)) }
    }

    /// Extract lanes in memory order.
    #[inline(always)]
    pub fn to_array(self) -> [i32; 4] {
        let mut out = [0i32; 4];
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0) };
        out
    }

    /// Load 16 bytes.
    ///
    /// # Safety
    /// `ptr` must be valid for 16 bytes of reads and 16-byte aligned.
    #[inline(always)]
    pub unsafe fn load(ptr: *const u8) -> Self {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { Self(_mm_load_si128(ptr as *const __m128i)) }
    }

    /// Store 16 bytes.
    ///
    /// # Safety
    /// `ptr` must be valid for 16 bytes of writes and 16-byte aligned.
    #[inline(always)]
    pub unsafe fn store(self, ptr: *mut u8) {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { _mm_store_si128(ptr as *mut __m128i, self.0) }
    }

    /// Store 16 bytes with a non-temporal hint, bypassing the cache.
    ///
    /// # Safety
    /// `ptr` must be valid for 16 bytes of writes and 16-byte aligned.
    #[inline(always)]
    pub unsafe fn store_stream(self, ptr: *mut u8) {
        debug_assert_eq!(ptr as usize % 16, 0);
        unsafe { _mm_stream_si128(ptr as *mut __m128i, self.0) }
    }

    /// `self & !rhs` per lane.
    #[inline(always)]
    pub fn and_not(self, rhs: Self) -> Self {
        // andnot(a, b) computes !a & b.
        unsafe { Self(_mm_andnot_si128(rhs.0, self.0)) }
    }

    /// Arithmetic right shift by a variable count.
    #[inline(always)]
    pub fn sra(self, n: u32) -> Self {
        unsafe { Self(_mm_sra_epi32(self.0, _mm_cvtsi32_si128(n as i32))) }
    }

    /// Per-lane `self > rhs` as an all-ones/all-zeros mask.
    #[inline(always)]
    pub fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpgt_epi32(self.0, rhs.0)) }
    }

    /// Lane-wise merge: mask lanes of all-ones take `if_true`.
    #[inline(always)]
    pub fn select(mask: Self, if_true: Self, if_false: Self) -> Self {
        unsafe {
            Self(_mm_or_si128(
                _mm_and_si128(mask.0, if_true.0),
                _mm_andnot_si128(mask.0, if_false.0),
            ))
        }
    }

    /// True when any bit in any lane is set.
    #[inline(always)]
    pub fn any(self) -> bool {
        unsafe {
            let zero = _mm_setzero_si128();
            _mm_movemask_epi8(_mm_cmpeq_epi32(self.0, zero)) != 0xFFFF
        }
    }

    /// Interleave the low 64-bit halves: `[a0, a1, b0, b1]`.
    #[inline(always)]
    pub fn interleave_lo64(self, rhs: Self) -> Self {
        unsafe { Self(_mm_unpacklo_epi64(self.0, rhs.0)) }
    }

    /// Interleave the high 64-bit halves: `[a2, a3, b2, b3]`.
    #[inline(always)]
    pub fn interleave_hi64(self, rhs: Self) -> Self {
        unsafe { Self(_mm_unpackhi_epi64(self.0, rhs.0)) }
    }

    /// Convert lanes to f32.
    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        unsafe { F32x4(_mm_cvtepi32_ps(self.0)) }
    }
}

impl Add for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_epi32(self.0, rhs.0)) }
    }
}

impl Sub for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_epi32(self.0, rhs.0)) }
    }
}

impl Mul for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        // SSE2 has no 32-bit lane multiply; widen even/odd lane pairs with
        // pmuludq and knit the low halves back together. The low 32 bits of
        // the product are identical for signed and unsigned operands.
        unsafe {
            let lo = _mm_mul_epu32(self.0, rhs.0);
            // _MM_SHUFFLE is not yet usable as a const fn on stable; inline
            // the immediates it would compute: _MM_SHUFFLE(1,3,1,1) = 0x75,
            // _MM_SHUFFLE(0,0,2,0) = 0x08.
            let hi = _mm_mul_epu32(
                _mm_shuffle_epi32::<0x75>(self.0),
                _mm_shuffle_epi32::<0x75>(rhs.0),
            );
            Self(_mm_unpacklo_epi32(
                _mm_shuffle_epi32::<0x08>(lo),
                _mm_shuffle_epi32::<0x08>(hi),
            ))
        }
    }
}

impl BitAnd for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        unsafe { Self(_mm_and_si128(self.0, rhs.0)) }
    }
}

impl BitOr for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_or_si128(self.0, rhs.0)) }
    }
}

impl Shl<u32> for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn shl(self, rhs: u32) -> Self {
        unsafe { Self(_mm_sll_epi32(self.0, _mm_cvtsi32_si128(rhs as i32))) }
    }
}

impl Shr<u32> for I32x4 {
    type Output = Self;
    #[inline(always)]
    fn shr(self, rhs: u32) -> Self {
        unsafe { Self(_mm_srl_epi32(self.0, _mm_cvtsi32_si128(rhs as i32))) }
    }
}
