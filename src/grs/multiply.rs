// tilefloat: a micro-float FMA tile reference model
// grs/multiply.rs
//
// BF16 x BF16 -> FP32 multiply with explicit GRS bookkeeping.

use crate::grs::mantissa::{assemble_fp32, finalize, round_q, Fp32Fields};
use crate::util::shift_right_grs_n;

const BF16_BIAS: i32 = 127;

/// Upper bound on the GRS-accumulating right shift used to align an
/// underflowing product into the 25-bit `Q` word. The padded product
/// (a 16-bit mantissa product left-padded by 9 fraction bits) occupies
/// at most 25 bits, so a shift of 25 already drives it to zero; two
/// further shifts flush the trailing guard/round bits into sticky.
/// Two canonicalized BF16 operands (stored exponent 1..254, or a
/// canonicalized subnormal down to about -6) can demand an exponent
/// delta far larger than this bound — every one of those collapses to
/// the same all-zero, no-round-up outcome as a shift of exactly this
/// bound, i.e. a genuine FP32 underflow to zero, so the raw shift is
/// clamped here rather than asserted against it.
const UNDERFLOW_SHIFT_BOUND: u32 = 27;

/// Multiplies two BF16 operands (each the high half of an FP32 word,
/// carried here as [`Fp32Fields`] from [`crate::grs::mantissa::split_bf16`])
/// and returns the raw FP32 bit pattern of the product.
pub fn multiply(a: Fp32Fields, b: Fp32Fields) -> u32 {
    let sign = a.sign ^ b.sign;
    let a_man7 = (a.man >> 16) & 0x7f;
    let b_man7 = (b.man >> 16) & 0x7f;

    if is_nan(a) || is_nan(b) {
        return nan();
    }
    let a_zero = a.exp == 0 && a_man7 == 0;
    let b_zero = b.exp == 0 && b_man7 == 0;
    if (a_zero && is_inf(b)) || (b_zero && is_inf(a)) {
        return nan();
    }
    if is_inf(a) || is_inf(b) {
        return assemble_fp32(sign, 255, 0);
    }
    if a_zero || b_zero {
        return assemble_fp32(sign, 0, 0);
    }

    let (a_exp, a_man7) = canonicalize(a.exp, a_man7);
    let (b_exp, b_man7) = canonicalize(b.exp, b_man7);

    let word_a = 0x80 | a_man7;
    let word_b = 0x80 | b_man7;
    let p_q = u32::from(word_a) * u32::from(word_b); // 16-bit product, 2 integer bits
    let mut p_exp = a_exp + b_exp - BF16_BIAS;

    let mut q25 = p_q << 9; // pad the 14 fraction bits out to 23
    let mut grd = false;
    let mut rnd = false;
    let mut stk = false;

    if p_exp <= 0 {
        let shift = u32::try_from(1 - p_exp)
            .expect("exponent delta fits in u32")
            .min(UNDERFLOW_SHIFT_BOUND);
        let (shifted, g, r, s) =
            shift_right_grs_n(u64::from(q25), grd, rnd, stk, shift, UNDERFLOW_SHIFT_BOUND);
        q25 = shifted as u32;
        grd = g;
        rnd = r;
        stk = s;
        p_exp = 1;
    }

    // "2.x product": the prefix still has its top bit set after padding.
    if (q25 >> 24) & 1 != 0 {
        let (shifted, g, r, s) = shift_right_grs_n(u64::from(q25), grd, rnd, stk, 1, 1);
        q25 = shifted as u32;
        grd = g;
        rnd = r;
        stk = s;
        p_exp += 1;
    }

    let exp = u32::try_from(p_exp).expect("exponent non-negative after normalization");
    let (exp, q25) = round_q(exp, q25, grd, rnd, stk);
    let (exp, man) = finalize(exp, q25);
    assemble_fp32(sign, exp, man)
}

fn is_nan(f: Fp32Fields) -> bool {
    f.exp == 0xff && (f.man >> 16) & 0x7f != 0
}

fn is_inf(f: Fp32Fields) -> bool {
    f.exp == 0xff && (f.man >> 16) & 0x7f == 0
}

fn nan() -> u32 {
    assemble_fp32(false, 0xff, 1 << 22)
}

/// Left-shifts a subnormal BF16 mantissa until its implicit leading bit
/// (bit 6 of the 7-bit field) appears, decrementing the exponent by the
/// total shift. Returns the already-normal `(exp, man)` pair with the
/// leading bit dropped (implicit), matching a genuinely normal operand's
/// shape so the rest of the pipeline treats both uniformly.
fn canonicalize(exp: u32, man7: u32) -> (i32, u32) {
    if exp != 0 {
        return (exp as i32, man7);
    }
    if man7 == 0 {
        return (1, 0); // zero handled by caller, but keep this total
    }
    let mut shift = 0u32;
    let mut m = man7 & 0x7f;
    while m & 0x40 == 0 {
        m = (m << 1) & 0x7f;
        shift += 1;
    }
    let new_man = (m << 1) & 0x7f;
    (1 - (shift as i32 + 1), new_man)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grs::mantissa::split_bf16;

    fn bf16(bits: u16) -> Fp32Fields {
        split_bf16(bits)
    }

    #[test]
    fn one_times_one_is_one() {
        let a = bf16(0x3f80); // 1.0
        let b = bf16(0x3f80);
        assert_eq!(multiply(a, b), 0x3f80_0000);
    }

    #[test]
    fn two_times_three_is_six() {
        let a = bf16(0x4000); // 2.0
        let b = bf16(0x4040); // 3.0
        assert_eq!(multiply(a, b), 0x40c0_0000); // 6.0 in FP32
    }

    #[test]
    fn sign_is_xor() {
        let a = bf16(0xbf80); // -1.0
        let b = bf16(0x3f80); // 1.0
        let bits = multiply(a, b);
        assert_eq!(bits >> 31, 1);
    }

    #[test]
    fn zero_times_infinity_is_nan() {
        let a = bf16(0x0000);
        let b = bf16(0x7f80); // +inf
        let bits = multiply(a, b);
        assert_eq!(bits >> 23 & 0xff, 0xff);
        assert_ne!(bits & 0x7f_ffff, 0);
    }

    #[test]
    fn infinity_times_finite_is_infinity() {
        let a = bf16(0x7f80);
        let b = bf16(0x3f80);
        assert_eq!(multiply(a, b), 0x7f80_0000);
    }

    #[test]
    fn zero_times_finite_is_zero() {
        let a = bf16(0x0000);
        let b = bf16(0x4000);
        assert_eq!(multiply(a, b), 0x0000_0000);
    }

    #[test]
    fn canonicalizes_subnormal_operand() {
        // smallest BF16 subnormal, man7=1: value = 2^-126 * 2^-7 = 2^-133,
        // representable as an FP32 subnormal (min ~2^-149).
        let a = bf16(0x0001);
        let b = bf16(0x3f80); // 1.0
        let bits = multiply(a, b);
        assert_eq!(bits, 0x0001_0000);
    }

    #[test]
    fn smallest_normal_squared_underflows_to_zero_without_panicking() {
        // 2^-126 * 2^-126 = 2^-252, far below FP32's smallest subnormal
        // (~2^-149): the required alignment shift vastly exceeds the
        // width of the Q word and must collapse to +0, not assert.
        let a = bf16(0x0080);
        let b = bf16(0x0080);
        assert_eq!(multiply(a, b), 0x0000_0000);
    }

    #[test]
    fn deeply_underflowing_subnormal_product_is_zero() {
        // two smallest BF16 subnormals: 2^-133 * 2^-133 = 2^-266.
        let a = bf16(0x0001);
        let b = bf16(0x0001);
        assert_eq!(multiply(a, b), 0x0000_0000);
    }
}
