// tilefloat: a micro-float FMA tile reference model
// fma.rs
//
// The FP8 x FP8 + FP16 fused multiply-add primitive.

use crate::codec::decode::decode;
use crate::codec::round::encode;
use crate::format::Format;

/// Fused multiply-add over the tile's narrow formats.
///
/// `a_format`/`b_format` are each [`Format::E5M2`] or [`Format::E4M3`];
/// `a_bits`/`b_bits` their raw encodings. `c_bits` is the FP16 accumulator
/// to add, or `None` to treat it as `+0`. `half` selects the rounding
/// target for the final add: FP16 when `false`, E5M2 when `true` (used
/// by the tile's C-E5 readout path).
///
/// `p = round_FP16(A.f * B.f)`, then `r = round_to(p.f + C.f)`. Two
/// roundings, not one fused step, because the tile's hardware
/// accumulator is itself FP16-wide between blocks.
pub fn fma(
    a_format: Format,
    a_bits: u32,
    b_format: Format,
    b_bits: u32,
    c_bits: Option<u16>,
    half: bool,
) -> u32 {
    tracing::trace_span!("fma", ?a_format, a_bits, ?b_format, b_bits, ?c_bits, half).in_scope(|| {
        let a = decode(a_format, a_bits);
        let b = decode(b_format, b_bits);

        let product = multiply_with_nan_rules(a, b);
        let p_bits = encode(Format::Fp16, product);
        let p = decode(Format::Fp16, p_bits);

        let c = c_bits.map_or(0.0, |bits| decode(Format::Fp16, u32::from(bits)));
        let sum = p + c;

        let target = if half { Format::E5M2 } else { Format::Fp16 };
        encode(target, sum)
    })
}

/// `a * b`, except `0 * inf` (either order) is NaN rather than the IEEE
/// default, so the rest of the pipeline only ever sees NaN or finite.
fn multiply_with_nan_rules(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if (a == 0.0 && b.is_infinite()) || (b == 0.0 && a.is_infinite()) {
        return f64::NAN;
    }
    a * b
}
