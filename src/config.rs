use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub game: GameConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Word list file; the bundled list is used when unset
    pub word_list_path: Option<String>,
    /// Seed for reproducible boards
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    pub channel_id: String,
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format '{}', expected text or json", other),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup, so tests need not touch the
    /// process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let game = GameConfig {
            word_list_path: lookup("WORD_LIST_PATH").filter(|path| !path.trim().is_empty()),
            seed: lookup("GAME_SEED")
                .map(|seed| seed.trim().parse())
                .transpose()
                .context("GAME_SEED must be a number")?,
        };

        let console = ConsoleConfig {
            channel_id: lookup("CHANNEL_ID").unwrap_or_else(|| "console".to_string()),
            output: lookup("OUTPUT_FORMAT")
                .unwrap_or_else(|| "text".to_string())
                .parse()
                .context("OUTPUT_FORMAT must be text or json")?,
        };

        Ok(Config { game, console })
    }
}
