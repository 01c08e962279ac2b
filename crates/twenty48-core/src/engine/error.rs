use thiserror::Error;

use super::state::Tile;

/// Recoverable engine conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The spawner was asked to place a tile on a board with no empty cell.
    #[error("no empty cell to spawn a tile into")]
    NoEmptyCell,
    /// A cell that is neither 0 nor a power of two in `2..=MAX_TILE`.
    #[error("invalid tile {value} at ({row}, {col}): expected 0 or a power of two up to 2^17")]
    InvalidTile { value: Tile, row: usize, col: usize },
}

/// Input token that does not name one of the four directions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid direction `{0}` (expected up, down, left or right)")]
pub struct ParseMoveError(pub String);
