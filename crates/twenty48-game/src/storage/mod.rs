//! Persistence contract for the high score and the ranking, plus the
//! implementations the binary can pick from.

mod error;
mod memory;
mod sqlite;
mod write_behind;

pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use write_behind::WriteBehind;

use twenty48_core::engine::Score;

use crate::ranking::RankingEntry;

/// Store for the persisted high score and top-5 ranking.
///
/// `ranking` always returns at most five entries sorted by descending score,
/// ties in insertion order. `insert_ranking_entry` applies insert, sort and
/// eviction as one atomic step and returns the resulting ranking.
pub trait ScoreStore: Send {
    /// Stored high score, 0 when none was ever saved.
    fn high_score(&self) -> Result<Score>;

    /// Overwrite the stored high score.
    fn set_high_score(&mut self, score: Score) -> Result<()>;

    fn ranking(&self) -> Result<Vec<RankingEntry>>;

    fn insert_ranking_entry(&mut self, name: &str, score: Score) -> Result<Vec<RankingEntry>>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn high_score(&self) -> Result<Score> {
        (**self).high_score()
    }

    fn set_high_score(&mut self, score: Score) -> Result<()> {
        (**self).set_high_score(score)
    }

    fn ranking(&self) -> Result<Vec<RankingEntry>> {
        (**self).ranking()
    }

    fn insert_ranking_entry(&mut self, name: &str, score: Score) -> Result<Vec<RankingEntry>> {
        (**self).insert_ranking_entry(name, score)
    }
}
