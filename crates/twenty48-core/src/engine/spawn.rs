use rand::Rng;

use super::error::EngineError;
use super::state::{Board, Tile};

/// Draw the value of a new tile: 2 with probability 0.9, otherwise 4.
pub fn spawn_value<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 {
        2
    } else {
        4
    }
}

/// Place a new tile on a uniformly chosen empty cell of a copy of `board`.
///
/// The input is never modified. A full board yields [`EngineError::NoEmptyCell`]
/// and consumes no randomness.
pub fn try_spawn<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Result<Board, EngineError> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return Err(EngineError::NoEmptyCell);
    }
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let mut rows = board.0;
    rows[row][col] = spawn_value(rng);
    Ok(Board(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FULL: [[Tile; 4]; 4] = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];

    #[test]
    fn it_test_insert_random_tile() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = Board::EMPTY;
        for _ in 0..16 {
            game = try_spawn(game, &mut rng).unwrap();
        }
        assert_eq!(game.count_empty(), 0);
        assert!(game.tiles().all(|t| t == 2 || t == 4));
    }

    #[test]
    fn full_board_is_reported_and_unchanged() {
        let mut rng = StdRng::seed_from_u64(5);
        let full = Board::from_rows(FULL);
        assert_eq!(try_spawn(full, &mut rng), Err(EngineError::NoEmptyCell));
        assert_eq!(full.with_random_tile(&mut rng), full);
    }

    #[test]
    fn single_empty_cell_is_always_filled() {
        let mut rows = FULL;
        rows[2][1] = 0;
        let board = Board::from_rows(rows);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let spawned = try_spawn(board, &mut rng).unwrap();
            assert!(spawned.cell(2, 1) == 2 || spawned.cell(2, 1) == 4);
            assert_eq!(spawned.count_empty(), 0);
            // Input is left untouched.
            assert_eq!(board.cell(2, 1), 0);
        }
    }

    #[test]
    fn two_to_four_split_is_ninety_ten() {
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 20_000;
        let fours = (0..trials).filter(|_| spawn_value(&mut rng) == 4).count();
        let ratio = fours as f64 / trials as f64;
        assert!((0.085..0.115).contains(&ratio), "ratio of fours was {ratio}");
    }

    #[test]
    fn seeded_board_has_two_tiles() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = Board::seeded(&mut rng);
        assert_eq!(b.count_empty(), 14);
        let mut again = StdRng::seed_from_u64(1);
        assert_eq!(Board::seeded(&mut again), b);
    }
}
