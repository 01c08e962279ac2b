//! Engine module: the 4x4 board, the line reducer, directional moves, tile
//! spawning and the terminal check.
//!
//! - `Board` is the value type with useful methods.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - Internals live in submodules to keep things tidy.

mod error;
mod ops;
mod spawn;
pub mod state;

pub use error::{EngineError, ParseMoveError};
pub use ops::{
    apply_move, has_valid_moves, is_game_over, reduce_line, shift, LineReduction, MoveResult,
};
pub use spawn::{spawn_value, try_spawn};
pub use state::{Board, Line, Move, Score, Tile, MAX_TILE, SIZE};
