// tilefloat: a micro-float FMA tile reference model
// tile/state.rs
//
// The tile's sequential state machine: four FP16 accumulators, stepped
// one block at a time.

use crate::codec::round::encode;
use crate::fma::fma;
use crate::format::Format;
use crate::tile::protocol::{decode_address, Address, Block};

/// The tile's accumulator state. `reset()` gives the post-`rst_n=0`
/// state; [`Tile::step`] advances one block at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// FP16 bit patterns for `C0..C3`.
    c: [u16; 4],
    /// The previous block's inputs, echoed to the outputs with a
    /// one-block delay unless a read-side address operation overrides
    /// them.
    prev_in: Block,
}

impl Tile {
    /// `rst_n=0`: zeros every accumulator; the next output block is all
    /// zeros regardless of what's fed in alongside the reset.
    pub fn reset() -> Self {
        Tile { c: [0; 4], prev_in: Block::default() }
    }

    /// Advances the tile by one block, returning the block emitted on
    /// this step (the *previous* block's inputs, delayed, unless this
    /// block's address overrides the readout).
    pub fn step(&mut self, block_in: Block) -> Block {
        let span = tracing::trace_span!(
            "tile_step",
            col = block_in.col,
            row = block_in.row,
            col_ctrl = block_in.col_ctrl,
            row_ctrl = block_in.row_ctrl
        );
        let _enter = span.enter();

        let address = decode_address(block_in.col_ctrl, block_in.row_ctrl);
        let mut block_out = Block {
            col: self.prev_in.col,
            row: self.prev_in.row,
            col_ctrl: self.prev_in.col_ctrl,
            row_ctrl: self.prev_in.row_ctrl,
        };

        match address {
            Address::Passthrough => {}
            Address::Ab { a_format, b_format } => self.step_ab(block_in, a_format, b_format),
            Address::CE5 => self.read_ce5(&mut block_out),
            Address::CLow => self.read_write_pair(block_in, &mut block_out, 0, 1),
            Address::CHigh => self.read_write_pair(block_in, &mut block_out, 2, 3),
        }

        self.prev_in = block_in;
        block_out
    }

    fn step_ab(&mut self, block_in: Block, a_format: Format, b_format: Format) {
        let a0 = u32::from((block_in.col >> 8) as u8);
        let a1 = u32::from((block_in.col & 0xff) as u8);
        let b0 = u32::from((block_in.row >> 8) as u8);
        let b1 = u32::from((block_in.row & 0xff) as u8);

        self.c[0] = fma(a_format, a0, b_format, b0, Some(self.c[0]), false) as u16;
        self.c[1] = fma(a_format, a1, b_format, b0, Some(self.c[1]), false) as u16;
        self.c[2] = fma(a_format, a0, b_format, b1, Some(self.c[2]), false) as u16;
        self.c[3] = fma(a_format, a1, b_format, b1, Some(self.c[3]), false) as u16;
    }

    fn read_ce5(&self, block_out: &mut Block) {
        let e5 = |bits: u16| -> u16 {
            let real = crate::codec::decode::decode(Format::Fp16, u32::from(bits));
            encode(Format::E5M2, real) as u16
        };
        block_out.col = (e5(self.c[0]) << 8) | e5(self.c[1]);
        block_out.row = (e5(self.c[2]) << 8) | e5(self.c[3]);
    }

    fn read_write_pair(&mut self, block_in: Block, block_out: &mut Block, lo: usize, hi: usize) {
        block_out.col = self.c[lo];
        block_out.row = self.c[hi];
        self.c[lo] = block_in.col;
        self.c[hi] = block_in.row;
    }
}
