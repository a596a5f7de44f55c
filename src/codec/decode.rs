// tilefloat: a micro-float FMA tile reference model
// codec/decode.rs
//
// (sign, exp, man) bits to real number, honoring format-specific specials.

use crate::format::Format;

/// Decodes a raw bit pattern (held in the low `format.width()` bits of
/// `bits`) into its real value.
///
/// NaN decodes to `f64::NAN`; infinity (FP16/E5M2 only) to `f64::INFINITY`
/// or `f64::NEG_INFINITY`. E4M3 has a single NaN encoding and otherwise
/// treats every `exp == all-ones` pattern as finite (`0x7e` decodes to
/// the finite value `448`, not infinity).
pub fn decode(format: Format, bits: u32) -> f64 {
    let d = format.descriptor();
    let man_mask = (1u32 << d.man_bits) - 1;
    let exp_mask = (1u32 << d.exp_bits) - 1;

    let sign_bit = (bits >> (d.exp_bits + d.man_bits)) & 1;
    let exp_field = (bits >> d.man_bits) & exp_mask;
    let man_field = bits & man_mask;

    let s: f64 = if sign_bit == 1 { -1.0 } else { 1.0 };
    let m = f64::from(man_field) / f64::from(1u32 << d.man_bits);

    if d.exp_bits == 5 {
        if exp_field == exp_mask {
            return if man_field == 0 {
                s * f64::INFINITY
            } else {
                f64::NAN
            };
        }
    } else {
        debug_assert_eq!(d.exp_bits, 4, "only FP16/E5M2 (5-bit) or E4M3 (4-bit) exponents");
        if exp_field == exp_mask && man_field == man_mask {
            return f64::NAN;
        }
    }

    if exp_field == 0 {
        // Subnormal (or zero when `m == 0`): exponent pinned to the
        // smallest normal exponent `1 - bias`, implicit leading digit 0.
        s * 2f64.powi(1 - d.bias) * m
    } else {
        // Normal: exponent `E - bias`, implicit leading digit 1.
        let e = i32::try_from(exp_field).expect("exponent field fits in i32") - d.bias;
        s * 2f64.powi(e) * (1.0 + m)
    }
}
