use std::io::Read;
use std::path::PathBuf;

use crate::ranking;

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Config {
    /// Seed for tile spawning. When omitted the RNG is seeded from entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ranking: Ranking,
    #[serde(default)]
    pub log: Log,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Storage {
    /// SQLite database holding the high score and the ranking.
    #[serde(default = "defaults::db_path")]
    pub db_path: PathBuf,
    /// Queue writes on a background thread instead of blocking the game loop.
    #[serde(default = "defaults::write_behind")]
    pub write_behind: bool,
    /// Keep everything in memory; nothing survives the process.
    #[serde(default)]
    pub memory: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Ranking {
    /// Name stored when the player leaves the prompt blank.
    #[serde(default = "defaults::default_name")]
    pub default_name: String,
    /// Names longer than this many characters are truncated.
    #[serde(default = "defaults::max_name_len")]
    pub max_name_len: usize,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Log {
    /// env_logger filter used when `RUST_LOG` is unset, e.g. "warn", "debug".
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            db_path: defaults::db_path(),
            write_behind: defaults::write_behind(),
            memory: false,
        }
    }
}

impl Default for Ranking {
    fn default() -> Self {
        Self {
            default_name: defaults::default_name(),
            max_name_len: defaults::max_name_len(),
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let cfg: Self = toml::from_str(contents)?;
        Ok(cfg)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn db_path() -> PathBuf { PathBuf::from("twenty48.db") }
    pub fn write_behind() -> bool { true }
    pub fn default_name() -> String { super::ranking::DEFAULT_PLAYER_NAME.to_string() }
    pub fn max_name_len() -> usize { super::ranking::DEFAULT_MAX_NAME_LEN }
    pub fn log_level() -> String { "warn".to_string() }
}
