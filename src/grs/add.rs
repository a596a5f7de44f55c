// tilefloat: a micro-float FMA tile reference model
// grs/add.rs
//
// FP32 + FP32 -> FP32 add with explicit GRS bookkeeping.

use crate::grs::mantissa::{assemble_fp32, build_q, finalize, round_q, Fp32Fields};
use crate::util::shift_right_grs_n;

const ALIGN_SHIFT_BOUND: u32 = 26;
const NORMALIZE_SHIFT_BOUND: u32 = 30;

/// Adds two FP32 operands, returning the raw FP32 bit pattern of the sum.
pub fn add(a: Fp32Fields, b: Fp32Fields) -> u32 {
    if is_nan(a) || is_nan(b) {
        return nan();
    }
    let a_inf = is_inf(a);
    let b_inf = is_inf(b);
    if a_inf && b_inf {
        return if a.sign == b.sign {
            assemble_fp32(a.sign, 0xff, 0)
        } else {
            nan()
        };
    }
    if a_inf {
        return assemble_fp32(a.sign, 0xff, 0);
    }
    if b_inf {
        return assemble_fp32(b.sign, 0xff, 0);
    }
    let a_zero = a.exp == 0 && a.man == 0;
    let b_zero = b.exp == 0 && b.man == 0;
    if a_zero && b_zero {
        return assemble_fp32(a.sign && b.sign, 0, 0);
    }
    if a_zero {
        return assemble_fp32(b.sign, b.exp, b.man);
    }
    if b_zero {
        return assemble_fp32(a.sign, a.exp, a.man);
    }

    // Ensure |a| >= |b|: (exp, man) orders magnitude correctly for any
    // two non-negative, non-NaN, non-infinite fields.
    let (a, b) = if (a.exp, a.man) < (b.exp, b.man) { (b, a) } else { (a, b) };

    let a_eff = a.exp.max(1);
    let b_eff = b.exp.max(1);
    let shift = a_eff.saturating_sub(b_eff).min(ALIGN_SHIFT_BOUND);

    let a_q = u64::from(build_q(a.exp, a.man));
    let b_q_raw = u64::from(build_q(b.exp, b.man));
    let (b_q, mut grd, mut rnd, mut stk) =
        shift_right_grs_n(b_q_raw, false, false, false, shift, ALIGN_SHIFT_BOUND);

    let mut exp = a_eff;

    let (mut q25, carried) = if a.sign == b.sign {
        let sum = a_q + b_q;
        if sum & (1 << 24) != 0 {
            let (q, g, r, s) = shift_right_grs_n(sum, grd, rnd, stk, 1, 1);
            grd = g;
            rnd = r;
            stk = s;
            (q, true)
        } else {
            (sum, false)
        }
    } else {
        // a_Q||000 - b_Q||grd,rnd,stk, then re-split the low 3 bits as the new GRS.
        let minuend = (a_q << 3) | 0b000;
        let subtrahend = (b_q << 3) | (u64::from(grd) << 2) | (u64::from(rnd) << 1) | u64::from(stk);
        let diff = minuend.checked_sub(subtrahend).expect("|a| >= |b| after alignment");
        grd = diff & 0b100 != 0;
        rnd = diff & 0b010 != 0;
        stk = diff & 0b001 != 0;
        (diff >> 3, false)
    };
    if carried {
        exp += 1;
    }

    if exp >= 255 {
        return assemble_fp32(a.sign, 255, 0);
    }

    // Left-normalize until the implicit leading bit (Q[1], bit 23) is set
    // or the exponent bottoms out at 1 (a genuine subnormal result).
    // Exact cancellation (`q25 == 0` with nothing left in the GRS bits
    // either) never finds a leading bit and is handled separately: the
    // result is a true zero. A `q25 == 0` with a nonzero GRS bit is not
    // exact zero, just a result too small for the current exponent; the
    // loop below pulls those bits back in as it shifts left.
    if q25 == 0 && !grd && !rnd && !stk {
        exp = 0;
    } else {
        let mut iterations = 0;
        while (q25 >> 23) & 1 == 0 && exp > 1 {
            q25 = (q25 << 1) | u64::from(grd);
            grd = rnd;
            rnd = stk;
            stk = false;
            exp -= 1;
            iterations += 1;
            assert!(iterations <= NORMALIZE_SHIFT_BOUND, "left-normalize shift count exceeded bound");
        }
    }

    let (exp, q25) = round_q(exp, q25 as u32, grd, rnd, stk);
    let (exp, man) = finalize(exp, q25);
    let sign = if exp == 0 && man == 0 { false } else { a.sign };
    assemble_fp32(sign, exp, man)
}

fn is_nan(f: Fp32Fields) -> bool {
    f.exp == 0xff && f.man != 0
}

fn is_inf(f: Fp32Fields) -> bool {
    f.exp == 0xff && f.man == 0
}

fn nan() -> u32 {
    assemble_fp32(false, 0xff, 1 << 22)
}
