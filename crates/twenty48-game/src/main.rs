use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use twenty48_game::config::{self, Config};
use twenty48_game::session::GameSession;
use twenty48_game::storage::{MemoryStore, ScoreStore, SqliteStore, WriteBehind};
use twenty48_game::terminal;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Play 2048 in the terminal with a persisted high score and top-5 ranking"
)]
struct Args {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,
    /// SQLite database for the high score and ranking
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,
    /// Seed tile spawning for a reproducible game
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Keep scores in memory only
    #[arg(long)]
    memory: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => Config::from_toml(path)
            .map_err(|e| anyhow!("failed to load config {}: {e}", path.display()))?,
        None => Config::default(),
    };
    if let Some(db) = args.db {
        cfg.storage.db_path = db;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.storage.memory |= args.memory;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log.level.as_str())).init();

    let rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let store = open_store(&cfg.storage);
    let mut session = GameSession::new(store, rng, cfg.ranking.clone());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    terminal::run(&mut session, stdin.lock(), &mut stdout).context("terminal I/O failed")?;
    info!("bye");
    Ok(())
}

/// Pick the store described by `storage`. An unusable database or writer
/// degrades to an in-memory store so the game stays playable.
fn open_store(storage: &config::Storage) -> Box<dyn ScoreStore> {
    if storage.memory {
        info!("scores kept in memory only");
        return Box::new(MemoryStore::new());
    }
    let sqlite = match SqliteStore::open(&storage.db_path) {
        Ok(store) => store,
        Err(err) => {
            warn!(
                "cannot open {}: {err}; scores will not be saved",
                storage.db_path.display()
            );
            return Box::new(MemoryStore::new());
        }
    };
    info!("using score database {}", storage.db_path.display());
    if !storage.write_behind {
        return Box::new(sqlite);
    }
    match WriteBehind::spawn(sqlite) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!("failed to start score writer: {err}; scores will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}
