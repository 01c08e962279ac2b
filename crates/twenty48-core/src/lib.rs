//! twenty48-core: the pure 2048 rules.
//!
//! This crate provides:
//! - A `Board` value type (4x4 tile values, 0 = empty) with ergonomic methods
//! - The line reducer and the four-direction move engine built on it
//! - Random tile spawning against any caller-supplied `Rng`
//! - The terminal detector (`has_valid_moves` / `is_game_over`)
//!
//! Quick start:
//! ```
//! use twenty48_core::engine::{Board, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = Board::seeded(&mut rng);
//! assert_eq!(b0.count_empty(), 14);
//!
//! let result = b0.apply(Move::Left);
//! // Merging keeps the tile total; the score counts each merged tile.
//! assert_eq!(result.board.sum(), b0.sum());
//!
//! let pair = Board::from_rows([[8, 8, 0, 0], [0; 4], [0; 4], [0; 4]]);
//! assert_eq!(pair.apply(Move::Left).score_delta, 16);
//! ```
//!
//! Nothing here performs I/O. Randomness only enters through the `Rng` you
//! pass in, so seeded runs are fully reproducible.
//!
pub mod engine;
