/*!
Bit-exact encode/decode/round for FP16, E5M2, and E4M3.

The decoder and rounder both stay on fixed-width integers and `f64`;
see [`crate::bits`] for the text-boundary (hex/binary string)
conversions.
*/

pub mod decode;
pub mod round;

mod cache;

use crate::bits::{Fp16Bits, Fp8Bits};
use crate::format::Format;

pub use cache::encode_fp8_cached;

/// Decodes an FP16 bit pattern to its real value.
pub fn decode_fp16(bits: Fp16Bits) -> f64 {
    decode::decode(Format::Fp16, u32::from(bits.bits()))
}

/// Rounds `x` to the nearest FP16 value (ties-to-even) and encodes it.
pub fn encode_fp16(x: f64) -> Fp16Bits {
    Fp16Bits(round::encode(Format::Fp16, x) as u16)
}

/// Decodes an 8-bit FP8 pattern (`format` must be [`Format::E5M2`] or
/// [`Format::E4M3`]) to its real value.
pub fn decode_fp8(format: Format, bits: Fp8Bits) -> f64 {
    assert_ne!(format, Format::Fp16, "decode_fp8 is only for 8-bit formats");
    decode::decode(format, u32::from(bits.bits()))
}

/// Rounds `x` to the nearest value of an 8-bit format (ties-to-even) and
/// encodes it.
pub fn encode_fp8(format: Format, x: f64) -> Fp8Bits {
    assert_ne!(format, Format::Fp16, "encode_fp8 is only for 8-bit formats");
    Fp8Bits(round::encode(format, x) as u8)
}
