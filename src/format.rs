// tilefloat: a micro-float FMA tile reference model
// format.rs
//
// Per-format constants: exponent width, mantissa width, bias, MAX, MIN.
// Three instances: FP16, E5M2, E4M3.

/// One of the three binary floating-point formats this crate models.
///
/// Kept as a fieldless sum type dispatched on an explicit parameter
/// rather than as a trait hierarchy: every format shares the same shape
/// (`sign`, `exp`, `man`) and differs only in widths and a few special
/// cases, which [`FormatDescriptor`] carries as plain data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// IEEE 754 half precision: 1 sign, 5 exponent, 10 mantissa.
    Fp16,
    /// 8-bit float: 1 sign, 5 exponent, 2 mantissa, bias 15.
    E5M2,
    /// 8-bit float: 1 sign, 4 exponent, 3 mantissa, bias 7, no infinity.
    E4M3,
}

/// Immutable per-format constants.
///
/// `bias = 2^(exp_bits - 1) - 1`. `max_finite` and `min_positive` are
/// cached as `f64` since every format here fits losslessly in `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormatDescriptor {
    pub format: Format,
    /// Width of the exponent field, in bits.
    pub exp_bits: u32,
    /// Width of the mantissa field, in bits.
    pub man_bits: u32,
    /// Exponent bias.
    pub bias: i32,
    /// Largest representable finite magnitude.
    pub max_finite: f64,
    /// Smallest representable positive magnitude (the smallest subnormal).
    pub min_positive: f64,
}

impl Format {
    /// Returns this format's immutable descriptor.
    pub const fn descriptor(self) -> FormatDescriptor {
        match self {
            Format::Fp16 => FormatDescriptor {
                format: self,
                exp_bits: 5,
                man_bits: 10,
                bias: 15,
                max_finite: 65504.0,
                min_positive: MIN_FP16,
            },
            Format::E5M2 => FormatDescriptor {
                format: self,
                exp_bits: 5,
                man_bits: 2,
                bias: 15,
                max_finite: 57344.0,
                min_positive: MIN_E5M2,
            },
            Format::E4M3 => FormatDescriptor {
                format: self,
                exp_bits: 4,
                man_bits: 3,
                bias: 7,
                max_finite: 448.0,
                min_positive: MIN_E4M3,
            },
        }
    }

    /// Total encoded bit width: `1 + exp_bits + man_bits`.
    pub const fn width(self) -> u32 {
        1 + self.descriptor().exp_bits + self.descriptor().man_bits
    }

    /// `true` for the two formats with an infinity encoding (FP16, E5M2).
    pub const fn has_infinity(self) -> bool {
        matches!(self, Format::Fp16 | Format::E5M2)
    }

    /// Canonical NaN bit pattern for this format.
    pub const fn canonical_nan(self) -> u16 {
        match self {
            Format::Fp16 => 0x7fff,
            Format::E5M2 => 0x7f,
            Format::E4M3 => 0x7f,
        }
    }

    /// Positive-infinity bit pattern (FP16/E5M2 only; panics otherwise).
    pub const fn positive_infinity(self) -> u16 {
        match self {
            Format::Fp16 => 0x7c00,
            Format::E5M2 => 0x7c,
            Format::E4M3 => panic!("E4M3 has no infinity encoding"),
        }
    }

    /// `E4M3`'s saturating finite-MAX bit pattern (`0x7e`, value 448).
    pub const fn e4m3_saturated_max() -> u16 {
        0x7e
    }
}

impl FormatDescriptor {
    /// `2^(exp_bits-1) - 1`, re-derived from `exp_bits` as a sanity check
    /// on the literal `bias` field above.
    pub const fn bias_from_width(&self) -> i32 {
        (1i32 << (self.exp_bits - 1)) - 1
    }

    /// The largest encodable exponent field value, `2^exp_bits - 1`
    /// (all-ones).
    pub const fn max_exp_field(&self) -> u32 {
        (1u32 << self.exp_bits) - 1
    }
}

const MIN_FP16: f64 = 1.0 / 16_777_216.0; // 2^-24
const MIN_E5M2: f64 = 1.0 / 65_536.0; // 2^-16
const MIN_E4M3: f64 = 1.0 / 512.0; // 2^-9

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_matches_width_derivation() {
        for format in [Format::Fp16, Format::E5M2, Format::E4M3] {
            let d = format.descriptor();
            assert_eq!(d.bias, d.bias_from_width());
        }
    }

    #[test]
    fn fp16_constants() {
        let d = Format::Fp16.descriptor();
        assert_eq!(d.exp_bits, 5);
        assert_eq!(d.man_bits, 10);
        assert_eq!(d.bias, 15);
        assert_eq!(d.max_finite, 65504.0);
        assert_eq!(d.min_positive, 2f64.powi(-24));
        assert_eq!(Format::Fp16.width(), 16);
    }

    #[test]
    fn e5m2_constants() {
        let d = Format::E5M2.descriptor();
        assert_eq!(d.exp_bits, 5);
        assert_eq!(d.man_bits, 2);
        assert_eq!(d.bias, 15);
        assert_eq!(d.max_finite, 57344.0);
        assert_eq!(d.min_positive, 2f64.powi(-16));
        assert_eq!(Format::E5M2.width(), 8);
    }

    #[test]
    fn e4m3_constants() {
        let d = Format::E4M3.descriptor();
        assert_eq!(d.exp_bits, 4);
        assert_eq!(d.man_bits, 3);
        assert_eq!(d.bias, 7);
        assert_eq!(d.max_finite, 448.0);
        assert_eq!(d.min_positive, 2f64.powi(-9));
        assert_eq!(Format::E4M3.width(), 8);
        assert!(!Format::E4M3.has_infinity());
    }

    #[test]
    fn canonical_specials() {
        assert_eq!(Format::Fp16.canonical_nan(), 0x7fff);
        assert_eq!(Format::Fp16.positive_infinity(), 0x7c00);
        assert_eq!(Format::E5M2.canonical_nan(), 0x7f);
        assert_eq!(Format::E5M2.positive_infinity(), 0x7c);
        assert_eq!(Format::E4M3.canonical_nan(), 0x7f);
        assert_eq!(Format::e4m3_saturated_max(), 0x7e);
    }
}
