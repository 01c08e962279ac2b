use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use log::{debug, warn};
use tokio::sync::mpsc;
use twenty48_core::engine::Score;

use super::{Result, ScoreStore, StorageError};
use crate::ranking::{self, RankingEntry};

/// Write request handed to the background writer.
#[derive(Debug)]
enum Write {
    HighScore(Score),
    Ranking { name: String, score: Score },
}

#[derive(Debug, Default)]
struct Cache {
    high_score: Score,
    ranking: Vec<RankingEntry>,
}

/// Fire-and-forget wrapper around another store.
///
/// Reads are answered from a cache filled when the wrapper is spawned. Writes
/// update the cache immediately and are queued to a dedicated writer thread
/// that owns the inner store. After each ranking write the cache is replaced
/// with the ranking the inner store reports, so ids converge on the stored ones.
/// Writer failures are logged and leave the cache as it was.
///
/// Dropping the wrapper drains the queue and joins the writer.
pub struct WriteBehind {
    cache: Arc<Mutex<Cache>>,
    tx: Option<mpsc::UnboundedSender<Write>>,
    worker: Option<JoinHandle<()>>,
}

impl WriteBehind {
    /// Load the current state from `store`, then move it onto the writer thread.
    ///
    /// Unreadable values start the cache at 0 or an empty ranking; only
    /// failing to start the thread is an error.
    pub fn spawn<S: ScoreStore + 'static>(mut store: S) -> Result<Self> {
        let high_score = store.high_score().unwrap_or_else(|err| {
            warn!("could not load high score, caching 0: {err}");
            0
        });
        let ranking = store.ranking().unwrap_or_else(|err| {
            warn!("could not load ranking, caching none: {err}");
            Vec::new()
        });
        let cache = Arc::new(Mutex::new(Cache {
            high_score,
            ranking,
        }));
        let (tx, mut rx) = mpsc::unbounded_channel::<Write>();
        let shared = cache.clone();
        let worker = std::thread::Builder::new()
            .name("score-writer".into())
            .spawn(move || {
                while let Some(write) = rx.blocking_recv() {
                    apply_write(&mut store, &shared, write);
                }
                debug!("score writer drained, exiting");
            })?;
        Ok(Self {
            cache,
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    fn send(&self, write: Write) -> Result<()> {
        self.tx
            .as_ref()
            .ok_or(StorageError::WriterStopped)?
            .send(write)
            .map_err(|_| StorageError::WriterStopped)
    }

    fn with_cache<T>(&self, f: impl FnOnce(&mut Cache) -> T) -> Result<T> {
        let mut cache = self.cache.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(f(&mut cache))
    }

    /// Stop accepting writes, flush the queue and wait for the writer.
    pub fn shutdown(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("score writer panicked; pending writes may be lost");
            }
        }
    }
}

fn apply_write<S: ScoreStore>(store: &mut S, cache: &Mutex<Cache>, write: Write) {
    match write {
        Write::HighScore(score) => {
            if let Err(err) = store.set_high_score(score) {
                warn!("failed to persist high score {score}: {err}");
            }
        }
        Write::Ranking { name, score } => match store.insert_ranking_entry(&name, score) {
            Ok(stored) => match cache.lock() {
                Ok(mut cache) => cache.ranking = stored,
                Err(_) => warn!("score cache lock poisoned; keeping provisional ranking"),
            },
            Err(err) => warn!("failed to persist ranking entry {name:?} ({score}): {err}"),
        },
    }
}

impl ScoreStore for WriteBehind {
    fn high_score(&self) -> Result<Score> {
        self.with_cache(|c| c.high_score)
    }

    fn set_high_score(&mut self, score: Score) -> Result<()> {
        self.with_cache(|c| c.high_score = score)?;
        self.send(Write::HighScore(score))
    }

    fn ranking(&self) -> Result<Vec<RankingEntry>> {
        self.with_cache(|c| c.ranking.clone())
    }

    fn insert_ranking_entry(&mut self, name: &str, score: Score) -> Result<Vec<RankingEntry>> {
        let provisional = self.with_cache(|c| {
            let entry = RankingEntry {
                id: ranking::next_id(&c.ranking),
                name: name.to_string(),
                score,
            };
            ranking::insert_capped(&mut c.ranking, entry);
            c.ranking.clone()
        })?;
        self.send(Write::Ranking {
            name: name.to_string(),
            score,
        })?;
        Ok(provisional)
    }
}

impl Drop for WriteBehind {
    fn drop(&mut self) {
        self.shutdown();
    }
}
