use log::{debug, info, warn};
use rand::Rng;
use thiserror::Error;
use twenty48_core::engine::{Board, Move, Score};

use crate::config;
use crate::ranking::{self, RankingEntry};
use crate::storage::ScoreStore;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// No move can change the board. `qualifies` is fixed when the game ends.
    GameOver { qualifies: bool },
}

/// Outcome of one directional input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// The move did not change the board; nothing happened.
    Unchanged,
    Moved { score_delta: Score },
    /// The move was applied and left no valid moves.
    GameOver { score_delta: Score, qualifies: bool },
}

/// Snapshot handed to the presentation layer after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub board: Board,
    pub score: Score,
    pub high_score: Score,
    pub is_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the game is over; save your ranking or start a new game")]
    GameOver,
    #[error("the game is still in progress")]
    NotOver,
    #[error("a score of {0} does not make the top 5")]
    NotQualified(Score),
}

/// Single-player 2048 game: board, score, high score and ranking.
///
/// All gameplay state lives here and is only changed by `apply`,
/// `save_ranking` and `reset`. Store failures are logged and never abort a
/// call; the in-memory value is kept instead.
pub struct GameSession<S, R> {
    store: S,
    rng: R,
    names: config::Ranking,
    board: Board,
    score: Score,
    high_score: Score,
    ranking: Vec<RankingEntry>,
    phase: Phase,
    moves: u64,
}

impl<S: ScoreStore, R: Rng> GameSession<S, R> {
    /// Load the high score and ranking from `store`, then start a fresh game.
    pub fn new(store: S, mut rng: R, names: config::Ranking) -> Self {
        let high_score = store.high_score().unwrap_or_else(|err| {
            warn!("could not load high score, starting from 0: {err}");
            0
        });
        let ranking = store.ranking().unwrap_or_else(|err| {
            warn!("could not load ranking, starting empty: {err}");
            Vec::new()
        });
        let board = Board::seeded(&mut rng);
        info!(
            "session started: high score {high_score}, {} ranking entries",
            ranking.len()
        );
        Self {
            store,
            rng,
            names,
            board,
            score: 0,
            high_score,
            ranking,
            phase: Phase::Playing,
            moves: 0,
        }
    }

    /// Apply one swipe.
    ///
    /// A move that changes nothing is a no-op. Otherwise a tile is spawned,
    /// the score grows by the merge delta, a new high score is persisted and
    /// the game ends if no move remains.
    pub fn apply(&mut self, direction: Move) -> Result<Turn, SessionError> {
        if let Phase::GameOver { .. } = self.phase {
            return Err(SessionError::GameOver);
        }
        let result = self.board.apply(direction);
        if !result.changed {
            debug!("{direction} left the board unchanged");
            return Ok(Turn::Unchanged);
        }

        self.board = match result.board.try_random_tile(&mut self.rng) {
            Ok(board) => board,
            Err(err) => {
                warn!("{err} after moving {direction}");
                result.board
            }
        };
        self.score += result.score_delta;
        self.moves += 1;
        if self.score > self.high_score {
            self.high_score = self.score;
            if let Err(err) = self.store.set_high_score(self.high_score) {
                warn!("failed to persist high score {}: {err}", self.high_score);
            }
        }

        if self.board.is_game_over() {
            let qualifies = ranking::qualifies(&self.ranking, self.score);
            self.phase = Phase::GameOver { qualifies };
            info!(
                "game over after {} moves: score {}, top 5: {qualifies}",
                self.moves, self.score
            );
            return Ok(Turn::GameOver {
                score_delta: result.score_delta,
                qualifies,
            });
        }
        Ok(Turn::Moved {
            score_delta: result.score_delta,
        })
    }

    /// Record the finished game in the ranking under `name`, then start a new game.
    ///
    /// Only valid after a game over whose score qualifies.
    pub fn save_ranking(&mut self, name: &str) -> Result<(), SessionError> {
        match self.phase {
            Phase::Playing => return Err(SessionError::NotOver),
            Phase::GameOver { qualifies: false } => {
                return Err(SessionError::NotQualified(self.score))
            }
            Phase::GameOver { qualifies: true } => {}
        }
        let name = ranking::normalize_name(name, &self.names.default_name, self.names.max_name_len);
        match self.store.insert_ranking_entry(&name, self.score) {
            Ok(stored) => self.ranking = stored,
            Err(err) => {
                warn!("failed to persist ranking entry {name:?} ({}): {err}", self.score);
                let entry = RankingEntry {
                    id: ranking::next_id(&self.ranking),
                    name,
                    score: self.score,
                };
                ranking::insert_capped(&mut self.ranking, entry);
            }
        }
        self.reset();
        Ok(())
    }

    /// Drop the current game and start a fresh one. The ranking is untouched.
    pub fn reset(&mut self) {
        self.board = Board::seeded(&mut self.rng);
        self.score = 0;
        self.moves = 0;
        self.phase = Phase::Playing;
        debug!("new game started");
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            board: self.board,
            score: self.score,
            high_score: self.high_score,
            is_over: self.is_over(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    pub fn ranking(&self) -> &[RankingEntry] {
        &self.ranking
    }

    /// Number of board-changing moves in the current game.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn force(&mut self, board: Board, score: Score) {
        self.board = board;
        self.score = score;
    }
}
