use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_ROUND_DELAY_MS: u64 = 1000;

fn default_round_delay_ms() -> u64 {
    DEFAULT_ROUND_DELAY_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BattleConfig {
    /// Pause after each round so a viewer can follow along. Zero disables it.
    #[serde(default = "default_round_delay_ms")]
    pub round_delay_ms: u64,
    /// `None` lets a battle run until someone falls, however long that takes.
    #[serde(default)]
    pub max_rounds: Option<u32>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            round_delay_ms: DEFAULT_ROUND_DELAY_MS,
            max_rounds: None,
        }
    }
}

impl BattleConfig {
    /// No pacing, no cap.
    pub fn headless() -> Self {
        Self {
            round_delay_ms: 0,
            max_rounds: None,
        }
    }

    pub fn round_delay(&self) -> Duration {
        Duration::from_millis(self.round_delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ArenaConfig {
    #[serde(default)]
    pub battle: BattleConfig,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub autobots: Option<PathBuf>,
    #[serde(default)]
    pub decepticons: Option<PathBuf>,
}

/// Parse an arena config; `.yaml`/`.yml` files are YAML, anything else JSON.
pub fn parse_config(text: &str, path: &Path) -> Result<ArenaConfig> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let cfg = if is_yaml {
        serde_yaml::from_str(text)
            .with_context(|| format!("failed to parse config YAML: {}", path.display()))?
    } else {
        serde_json::from_str(text)
            .with_context(|| format!("failed to parse config JSON: {}", path.display()))?
    };
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<ArenaConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&text, path)
}
