// tilefloat: a micro-float FMA tile reference model
// codec/round.rs
//
// Real number to (sign, exp, man) bits, round-to-nearest-ties-to-even.

use crate::codec::decode::decode;
use crate::format::Format;

/// Rounds `x` to the nearest representable value of `format`,
/// round-to-nearest-ties-to-even, and returns its raw bit pattern.
///
/// Handles sign, NaN, overflow (saturating to MAX below the exact
/// `MAX + 2^(bias - man_bits - 1)` halfway point and only then rolling
/// over to infinity), and underflow as special cases, then falls back to
/// the bit-by-bit nearest search for everything else.
pub fn encode(format: Format, x: f64) -> u32 {
    let d = format.descriptor();
    let sign: u32 = u32::from(x < 0.0);

    if x.is_nan() {
        return u32::from(format.canonical_nan());
    }

    let ax = x.abs();

    if format.has_infinity() {
        let half_ulp = 2f64.powi(d.bias - d.man_bits as i32 - 1);
        let overflow_to_inf = d.max_finite + half_ulp;
        if ax >= overflow_to_inf {
            return u32::from(format.positive_infinity()) | (sign << (d.exp_bits + d.man_bits));
        }
        if ax > d.max_finite {
            return max_finite_bits(&d, sign);
        }
    } else if ax >= d.max_finite {
        // E4M3: saturate to the largest finite pattern, (sign, 1111, 110).
        let man = ((1u32 << d.man_bits) - 1) - 1;
        let exp = d.max_exp_field();
        return (sign << (d.exp_bits + d.man_bits)) | (exp << d.man_bits) | man;
    }

    let half_min = d.min_positive / 2.0;
    if ax <= half_min {
        return sign << (d.exp_bits + d.man_bits); // +0, sign forced to 0 per spec
    }
    if ax <= d.min_positive {
        return (sign << (d.exp_bits + d.man_bits)) | 1; // smallest subnormal, input sign
    }

    bit_search(format, x, sign)
}

fn max_finite_bits(d: &crate::format::FormatDescriptor, sign: u32) -> u32 {
    let exp = d.max_exp_field() - 1;
    let man = (1u32 << d.man_bits) - 1;
    (sign << (d.exp_bits + d.man_bits)) | (exp << d.man_bits) | man
}

/// Bit-by-bit nearest search: at each remaining bit position, compare
/// the two candidate completions
/// (`low` with the trial bit 0 and the rest 1s, `high` with the trial
/// bit 1 and the rest 0s) by distance to `x`, deciding ties-to-even on
/// the final bit.
fn bit_search(format: Format, x: f64, sign: u32) -> u32 {
    let d = format.descriptor();
    let total = d.exp_bits + d.man_bits;
    let width = format.width();

    let mut val: u32 = sign;
    for i in 1..=total {
        let remaining_after = total - i;
        let low_prefix = val << 1;
        let high_prefix = (val << 1) | 1;
        let ones = if remaining_after == 0 {
            0
        } else {
            (1u32 << remaining_after) - 1
        };
        let low_full = (low_prefix << remaining_after) | ones;
        let high_full = high_prefix << remaining_after;
        debug_assert!(low_full < (1 << width) && high_full < (1 << width));

        let low_diff = (x - decode(format, low_full)).abs();
        let high_val = decode(format, high_full);
        let high_diff = (x - high_val).abs();

        let take_high = if high_val.is_nan() {
            false
        } else if low_diff == high_diff {
            i != total
        } else {
            high_diff < low_diff
        };

        val = if take_high { high_prefix } else { low_prefix };
    }
    val
}
