//! Property-based tests (spec.md §8 properties 1, 2, 4, 6, 7), driven by
//! `proptest` over generated code points and blocks rather than fixed
//! tables. The exhaustive unit tests in `codec::round` already cover the
//! full 8-bit/16-bit code spaces directly; these complement them by
//! exercising the tile's stateful protocol and the FMA NaN rule under
//! randomized inputs.

use proptest::prelude::*;

use tilefloat::codec::decode::decode;
use tilefloat::codec::round::encode;
use tilefloat::fma::fma;
use tilefloat::tile::{Block, Tile};
use tilefloat::Format;

proptest! {
    /// Property 1 (round-trip): `encode(decode(x)) == x` for every
    /// non-NaN FP16 code, with negative zero canonicalizing to `+0`.
    #[test]
    fn fp16_round_trip(bits in 0u32..=0xffff) {
        let v = decode(Format::Fp16, bits);
        prop_assume!(!v.is_nan());
        let re = encode(Format::Fp16, v);
        if v == 0.0 {
            prop_assert_eq!(re, 0);
        } else {
            prop_assert_eq!(re, bits);
        }
    }

    /// Property 1 for the 8-bit formats.
    #[test]
    fn fp8_round_trip(format in prop_oneof![Just(Format::E5M2), Just(Format::E4M3)], bits in 0u32..256) {
        let v = decode(format, bits);
        prop_assume!(!v.is_nan());
        let re = encode(format, v);
        if v == 0.0 {
            prop_assert_eq!(re, 0);
        } else {
            prop_assert_eq!(re, bits);
        }
    }

    /// Property 2 (ordering/tie-break): the midpoint between two adjacent
    /// finite E5M2 codes rounds to even, and nudging the midpoint either
    /// way by epsilon rounds to the corresponding neighbor.
    #[test]
    fn e5m2_adjacent_midpoint_ties_to_even(bits in 1u32..0x7b) {
        let h = decode(Format::E5M2, bits);
        let g = decode(Format::E5M2, bits + 1);
        prop_assume!(h.is_finite() && g.is_finite() && h > 0.0);
        let mid = (h + g) / 2.0;
        let eps = (g - h) * 1e-6;
        prop_assert_eq!(encode(Format::E5M2, mid) & 1, 0);
        prop_assert_eq!(encode(Format::E5M2, mid + eps), bits + 1);
        prop_assert_eq!(encode(Format::E5M2, mid - eps), bits);
    }

    /// Property 2 for E4M3: same midpoint/tie-break shape, restricted to
    /// stay clear of the single NaN code (`0x7f`) and its saturated-MAX
    /// neighbor's infinity-less boundary.
    #[test]
    fn e4m3_adjacent_midpoint_ties_to_even(bits in 1u32..0x7e) {
        let h = decode(Format::E4M3, bits);
        let g = decode(Format::E4M3, bits + 1);
        prop_assume!(h.is_finite() && g.is_finite() && h > 0.0);
        let mid = (h + g) / 2.0;
        let eps = (g - h) * 1e-6;
        prop_assert_eq!(encode(Format::E4M3, mid) & 1, 0);
        prop_assert_eq!(encode(Format::E4M3, mid + eps), bits + 1);
        prop_assert_eq!(encode(Format::E4M3, mid - eps), bits);
    }

    /// Property 4: `FMA(0, inf, C) == NaN` for any FP16 accumulator `C`.
    #[test]
    fn fma_zero_times_infinity_is_always_nan(c_bits in any::<u16>()) {
        let zero = encode(Format::E5M2, 0.0) as u32;
        let inf = encode(Format::E5M2, f64::INFINITY) as u32;
        let result = fma(Format::E5M2, zero, Format::E5M2, inf, Some(c_bits), false);
        prop_assert_eq!(result, Format::Fp16.canonical_nan() as u32);
    }

    /// Property 6: after `Tile::reset`, the next emitted block is all
    /// zero no matter what is fed in alongside the reset.
    #[test]
    fn tile_reset_output_is_zero_regardless_of_input(
        col in any::<u16>(), row in any::<u16>(), col_ctrl in any::<u8>(), row_ctrl in any::<u8>()
    ) {
        let mut tile = Tile::reset();
        let out = tile.step(Block { col, row, col_ctrl: col_ctrl & 0xf, row_ctrl: row_ctrl & 0xf });
        prop_assert_eq!(out, Block::default());
    }

    /// Property 7: a passthrough block's `(col_out, row_out)` equals the
    /// previous block's `(col_in, row_in)`, delayed by one block.
    #[test]
    fn tile_passthrough_delays_by_one_block(
        first_col in any::<u16>(), first_row in any::<u16>(),
        second_col in any::<u16>(), second_row in any::<u16>(),
    ) {
        let mut tile = Tile::reset();
        let first = Block { col: first_col, row: first_row, col_ctrl: 0, row_ctrl: 0 };
        tile.step(first);

        let second = Block { col: second_col, row: second_row, col_ctrl: 0, row_ctrl: 0 };
        let out = tile.step(second);
        prop_assert_eq!(out.col, first_col);
        prop_assert_eq!(out.row, first_row);
    }
}
