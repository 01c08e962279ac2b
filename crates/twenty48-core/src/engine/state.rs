use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::error::{EngineError, ParseMoveError};
use super::{ops, spawn};
use serde::{Deserialize, Serialize};

/// Board side length. Fixed for the lifetime of every board.
pub const SIZE: usize = 4;

/// A tile value: 0 for empty, otherwise a power of two (2, 4, 8, ...).
pub type Tile = u32;
/// Largest tile `from_rows` accepts: the highest a 4x4 game can build from spawns.
/// Merges of board tiles at or below it stay far from `u32` overflow.
pub const MAX_TILE: Tile = 1 << 17;
/// One row or column, read in slide order.
pub type Line = [Tile; SIZE];
pub type Score = u64;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

/// Accepts direction names plus the usual wasd / vi keys, case-insensitive.
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" => Ok(Move::Up),
            "down" | "s" | "j" => Ok(Move::Down),
            "left" | "a" | "h" => Ok(Move::Left),
            "right" | "d" | "l" => Ok(Move::Right),
            other => Err(ParseMoveError(other.to_string())),
        }
    }
}

/// 4x4 2048 board stored row-major as tile values.
///
/// Equality is element-wise over all 16 cells. Boards are small `Copy`
/// values: every operation returns a new board and never mutates its input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "[[Tile; SIZE]; SIZE]", into = "[[Tile; SIZE]; SIZE]")]
pub struct Board(pub(crate) [[Tile; SIZE]; SIZE]);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// Construct a `Board` from explicit rows.
    ///
    /// Panics if any cell is neither 0 nor a power of two in `2..=MAX_TILE`.
    /// Use [`Board::try_from_rows`] for untrusted input.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    /// let b = Board::from_rows([[2, 0, 0, 2], [0; 4], [0; 4], [0, 0, 4, 0]]);
    /// assert_eq!(b.cell(3, 2), 4);
    /// ```
    pub fn from_rows(rows: [[Tile; SIZE]; SIZE]) -> Self {
        match Self::try_from_rows(rows) {
            Ok(board) => board,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible `from_rows`: reports the first cell that is not a valid tile.
    pub fn try_from_rows(rows: [[Tile; SIZE]; SIZE]) -> Result<Self, EngineError> {
        for (row, cells) in rows.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                let valid =
                    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two());
                if !valid {
                    return Err(EngineError::InvalidTile { value, row, col });
                }
            }
        }
        Ok(Board(rows))
    }

    /// Borrow the rows of this board.
    #[inline]
    pub fn rows(&self) -> &[[Tile; SIZE]; SIZE] {
        &self.0
    }

    /// Consume this `Board`, returning its rows.
    #[inline]
    pub fn into_rows(self) -> [[Tile; SIZE]; SIZE] {
        self.0
    }

    /// Value at `(row, col)`; 0 when empty.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Tile {
        self.0[row][col]
    }

    /// Swap rows and columns. Applying it twice yields the original board.
    pub fn transpose(self) -> Self {
        let mut out = [[0; SIZE]; SIZE];
        for (r, row) in self.0.iter().enumerate() {
            for (c, &val) in row.iter().enumerate() {
                out[c][r] = val;
            }
        }
        Board(out)
    }

    /// Slide/merge tiles in `dir` and report the score earned and whether anything moved.
    ///
    /// ```
    /// use twenty48_core::engine::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 4, 4], [0; 4], [0; 4], [0; 4]]);
    /// let r = b.apply(Move::Right);
    /// assert_eq!(r.board.rows()[0], [0, 0, 4, 8]);
    /// assert_eq!(r.score_delta, 12);
    /// assert!(r.changed);
    /// ```
    #[inline]
    pub fn apply(self, dir: Move) -> ops::MoveResult {
        ops::apply_move(self, dir)
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    #[inline]
    pub fn shift(self, dir: Move) -> Self {
        ops::shift(self, dir)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty slot, using the provided RNG.
    ///
    /// Fails with [`EngineError::NoEmptyCell`] on a full board.
    #[inline]
    pub fn try_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Self, EngineError> {
        spawn::try_spawn(self, rng)
    }

    /// Like `try_random_tile`, but a full board comes back unchanged.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use twenty48_core::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        spawn::try_spawn(self, rng).unwrap_or(self)
    }

    /// A fresh starting board: empty plus two random tiles.
    pub fn seeded<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Board::EMPTY.with_random_tile(rng).with_random_tile(rng)
    }

    /// Perform a move, then insert a random tile if the move changed the board.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> Self {
        let moved = self.shift(direction);
        if moved != self {
            moved.with_random_tile(rng)
        } else {
            self
        }
    }

    /// Return true if at least one direction would change the board.
    #[inline]
    pub fn has_valid_moves(self) -> bool {
        ops::has_valid_moves(self)
    }

    /// Return true if no legal moves remain.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    /// // An empty cell always leaves room to slide.
    /// assert!(!Board::EMPTY.is_game_over());
    /// let stuck = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    /// assert!(stuck.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(self) -> bool {
        ops::is_game_over(self)
    }

    /// Return the highest tile value (e.g., 2048) present on the board, 0 when empty.
    pub fn highest_tile(self) -> Tile {
        self.tiles().max().unwrap_or(0)
    }

    /// Count the number of empty cells on the board.
    pub fn count_empty(self) -> usize {
        self.tiles().filter(|&t| t == 0).count()
    }

    /// Coordinates `(row, col)` of every empty cell, row-major.
    pub fn empty_cells(self) -> Vec<(usize, usize)> {
        self.tiles()
            .enumerate()
            .filter(|&(_, t)| t == 0)
            .map(|(idx, _)| (idx / SIZE, idx % SIZE))
            .collect()
    }

    /// Sum of all tile values.
    pub fn sum(self) -> Score {
        self.tiles().map(Score::from).sum()
    }

    /// Iterate over tile values in row-major order.
    #[inline]
    pub fn tiles(self) -> TilesIter {
        TilesIter { board: self, idx: 0 }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Board").field(&self.0).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let cells: Vec<String> = row.iter().map(|&t| format_val(t)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<[[Tile; SIZE]; SIZE]> for Board {
    type Error = EngineError;

    fn try_from(rows: [[Tile; SIZE]; SIZE]) -> Result<Self, Self::Error> {
        Board::try_from_rows(rows)
    }
}

impl From<Board> for [[Tile; SIZE]; SIZE] {
    fn from(board: Board) -> Self {
        board.0
    }
}

/// Iterator over board tiles in row-major order.
pub struct TilesIter {
    board: Board,
    idx: usize,
}

impl Iterator for TilesIter {
    type Item = Tile;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= SIZE * SIZE {
            return None;
        }
        let t = self.board.0[self.idx / SIZE][self.idx % SIZE];
        self.idx += 1;
        Some(t)
    }
}

impl IntoIterator for Board {
    type Item = Tile;
    type IntoIter = TilesIter;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}

// Centered in a 7-column cell; blank for empty.
fn format_val(val: Tile) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{:^7}", x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let b = Board::from_rows([[2, 4, 8, 16], [0, 0, 0, 0], [0, 2, 0, 0], [0, 0, 0, 4]]);
        let t = b.transpose();
        assert_eq!(t.rows()[0], [2, 0, 0, 0]);
        assert_eq!(t.rows()[1], [4, 0, 2, 0]);
        assert_eq!(t.rows()[3], [16, 0, 0, 4]);
        assert_eq!(t.transpose(), b);
    }

    #[test]
    #[should_panic(expected = "invalid tile 3")]
    fn from_rows_rejects_non_power_of_two() {
        let _ = Board::from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
    }

    #[test]
    #[should_panic(expected = "invalid tile 1")]
    fn from_rows_rejects_one() {
        let _ = Board::from_rows([[0; 4], [0, 1, 0, 0], [0; 4], [0; 4]]);
    }

    #[test]
    #[should_panic(expected = "invalid tile 262144")]
    fn from_rows_rejects_tiles_above_the_cap() {
        let _ = Board::from_rows([[MAX_TILE << 1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
    }

    #[test]
    fn largest_tiles_merge_without_overflow() {
        let b = Board::from_rows([[MAX_TILE, MAX_TILE, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let r = b.apply(Move::Left);
        assert_eq!(r.board.rows()[0], [MAX_TILE * 2, 0, 0, 0]);
        assert_eq!(r.score_delta, Score::from(MAX_TILE) * 2);
    }

    #[test]
    fn try_from_rows_reports_the_bad_cell() {
        let err = Board::try_from_rows([[0; 4], [0; 4], [0, 0, 0, 1 << 31], [0; 4]]).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTile {
                value: 1 << 31,
                row: 2,
                col: 3
            }
        );
        assert!(Board::try_from([[0; 4]; 4]).is_ok());
    }

    #[test]
    fn deserialize_validates_tiles() {
        let json = "[[2,0,0,0],[0,0,0,0],[0,0,4,0],[0,0,0,0]]";
        let b: Board = serde_json::from_str(json).unwrap();
        assert_eq!(b.cell(2, 2), 4);
        assert_eq!(serde_json::to_string(&b).unwrap(), json);

        let bad = "[[3,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]]";
        let err = serde_json::from_str::<Board>(bad).unwrap_err();
        assert!(err.to_string().contains("invalid tile 3"), "{err}");
    }

    #[test]
    fn counts_and_sums() {
        let b = Board::from_rows([[2, 0, 0, 0], [0, 4, 0, 0], [0, 0, 2048, 0], [0; 4]]);
        assert_eq!(b.count_empty(), 13);
        assert_eq!(b.highest_tile(), 2048);
        assert_eq!(b.sum(), 2054);
        assert_eq!(b.empty_cells().len(), 13);
        assert!(!b.empty_cells().contains(&(2, 2)));
        assert_eq!(Board::EMPTY.highest_tile(), 0);
    }

    #[test]
    fn parse_moves() {
        assert_eq!("Up".parse::<Move>().unwrap(), Move::Up);
        assert_eq!(" s ".parse::<Move>().unwrap(), Move::Down);
        assert_eq!("h".parse::<Move>().unwrap(), Move::Left);
        assert_eq!("RIGHT".parse::<Move>().unwrap(), Move::Right);
        let err = "sideways".parse::<Move>().unwrap_err();
        assert_eq!(err, ParseMoveError("sideways".into()));
    }

    #[test]
    fn display_blanks_empty_cells() {
        let b = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 1024]]);
        let text = b.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "   2   |       |       |       ");
        assert_eq!(lines[6], "       |       |       | 1024  ");
    }
}
