/*!
The 2x2 systolic tile: a block-oriented state machine driven by a
narrow nibble-serial wire protocol, accumulating four FP16 products per
block through [`crate::fma::fma`].
*/

pub mod protocol;
pub mod state;

pub use protocol::{Address, Block, Cycle};
pub use state::Tile;
