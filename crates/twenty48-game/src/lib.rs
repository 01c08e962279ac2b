//! twenty48-game: a playable 2048 session on top of `twenty48-core`.
//!
//! - `session`: the state machine (Playing / GameOver), scoring and persistence triggers
//! - `ranking`: top-5 leaderboard policy (qualification, capped insert, names)
//! - `storage`: the high score / ranking store contract plus SQLite, in-memory
//!   and write-behind implementations
//! - `config`: TOML configuration
//! - `terminal`: line-oriented front end used by the `twenty48` binary

pub mod config;
pub mod ranking;
pub mod session;
pub mod storage;
pub mod terminal;
