//! In-memory ScoreStore implementation for tests and throwaway runs.

use twenty48_core::engine::Score;

use super::{Result, ScoreStore};
use crate::ranking::{self, RankingEntry};

/// Keeps the high score and ranking for the lifetime of the value.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    high_score: Score,
    ranking: Vec<RankingEntry>,
    next_id: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            high_score: 0,
            ranking: Vec::new(),
            next_id: 1,
        }
    }
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a previously saved high score and ranking.
    pub fn with_state(high_score: Score, mut entries: Vec<RankingEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(ranking::RANKING_CAPACITY);
        let next_id = ranking::next_id(&entries);
        Self {
            high_score,
            ranking: entries,
            next_id,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn high_score(&self) -> Result<Score> {
        Ok(self.high_score)
    }

    fn set_high_score(&mut self, score: Score) -> Result<()> {
        self.high_score = score;
        Ok(())
    }

    fn ranking(&self) -> Result<Vec<RankingEntry>> {
        Ok(self.ranking.clone())
    }

    fn insert_ranking_entry(&mut self, name: &str, score: Score) -> Result<Vec<RankingEntry>> {
        let entry = RankingEntry {
            id: self.next_id,
            name: name.to_string(),
            score,
        };
        self.next_id += 1;
        ranking::insert_capped(&mut self.ranking, entry);
        Ok(self.ranking.clone())
    }
}
