use super::state::{Board, Line, Move, Score, SIZE};

/// Result of collapsing one line toward index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineReduction {
    pub line: Line,
    pub score_delta: Score,
}

/// Result of applying one directional move to a whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub board: Board,
    pub score_delta: Score,
    /// True iff `board` differs from the input in at least one cell.
    pub changed: bool,
}

/// Slide all tiles toward index 0 and merge equal neighbours once each.
///
/// A tile produced by a merge never merges again in the same call, so
/// `[2, 2, 4, 0]` becomes `[4, 4, 0, 0]` and not `[8, 0, 0, 0]`.
pub fn reduce_line(line: Line) -> LineReduction {
    let mut compact = [0; SIZE];
    let mut len = 0;
    for val in line.into_iter().filter(|&v| v != 0) {
        compact[len] = val;
        len += 1;
    }

    let mut out = [0; SIZE];
    let mut score_delta = 0;
    let (mut read, mut write) = (0, 0);
    while read < len {
        if read + 1 < len && compact[read] == compact[read + 1] {
            let merged = compact[read] * 2;
            out[write] = merged;
            score_delta += Score::from(merged);
            read += 2;
        } else {
            out[write] = compact[read];
            read += 1;
        }
        write += 1;
    }
    LineReduction {
        line: out,
        score_delta,
    }
}

fn reduce_line_reversed(mut line: Line) -> LineReduction {
    line.reverse();
    let mut reduced = reduce_line(line);
    reduced.line.reverse();
    reduced
}

/// Slide/merge tiles in the given direction and report the score earned. No randomness.
///
/// Up and Down run the row algorithms on the transposed board and transpose back.
pub fn apply_move(board: Board, direction: Move) -> MoveResult {
    let (moved, score_delta) = match direction {
        Move::Left => reduce_rows(board, reduce_line),
        Move::Right => reduce_rows(board, reduce_line_reversed),
        Move::Up => {
            let (b, s) = reduce_rows(board.transpose(), reduce_line);
            (b.transpose(), s)
        }
        Move::Down => {
            let (b, s) = reduce_rows(board.transpose(), reduce_line_reversed);
            (b.transpose(), s)
        }
    };
    MoveResult {
        board: moved,
        score_delta,
        changed: moved != board,
    }
}

/// Slide/merge tiles in the given direction, discarding the score. No randomness.
pub fn shift(board: Board, direction: Move) -> Board {
    apply_move(board, direction).board
}

fn reduce_rows(board: Board, reducer: fn(Line) -> LineReduction) -> (Board, Score) {
    let mut rows = board.0;
    let mut total = 0;
    for row in rows.iter_mut() {
        let reduced = reducer(*row);
        *row = reduced.line;
        total += reduced.score_delta;
    }
    (Board(rows), total)
}

/// True if some direction would change the board.
///
/// Only local adjacency matters: a move changes the board iff a tile can
/// slide into an empty cell or merge with an equal right/down neighbour.
pub fn has_valid_moves(board: Board) -> bool {
    let cells = &board.0;
    for r in 0..SIZE {
        for c in 0..SIZE {
            let val = cells[r][c];
            if val == 0 {
                return true;
            }
            if c + 1 < SIZE && cells[r][c + 1] == val {
                return true;
            }
            if r + 1 < SIZE && cells[r + 1][c] == val {
                return true;
            }
        }
    }
    false
}

/// True if no move in any direction changes the board.
pub fn is_game_over(board: Board) -> bool {
    !has_valid_moves(board)
}
