//! Tunable consensus constants. Grouped into a single `Config` so tests can
//! exercise non-default parameters without touching process globals.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of blocks between difficulty retarget checks.
    pub adjustment_interval: u64,
    /// Target seconds per block over one adjustment window.
    pub target_block_time: i64,
    /// Maximum difficulty change applied per retarget, in either direction.
    pub max_step: u8,
    /// How far into the future (relative to `SIM_TIME`) a block timestamp may be.
    pub future_drift: i64,
    /// Gap between parent and child timestamps above which a warning is logged.
    /// Advisory only; never rejects a block.
    pub max_time_jump: i64,
    /// Coinbase reward paid to the miner of each block.
    pub mining_reward: u64,
    /// Difficulty used for genesis and for the first `adjustment_interval` blocks.
    pub default_difficulty: u8,
    /// Maximum number of non-coinbase transactions selected into an assembled block.
    pub max_txs_per_block: usize,
    /// Per-tick probability that a simulated node attempts `try_mine`.
    /// Governs the network simulator's step loop only; irrelevant to validity.
    pub mining_probability: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            adjustment_interval: 3,
            target_block_time: 2,
            max_step: 1,
            future_drift: 36,
            max_time_jump: 6,
            mining_reward: 50,
            default_difficulty: 2,
            max_txs_per_block: 5,
            mining_probability: 0.3,
        }
    }
}

impl Config {
    /// Loads a TOML override file at `path`, falling back to
    /// [`Config::default`] if `path` is `None`, absent, or fails to parse.
    /// Ambient convenience for the demo binary only — consensus code always
    /// takes an explicit `&Config` value, never a hidden global.
    #[must_use]
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        let result = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .build()
            .and_then(config::Config::try_deserialize);

        match result {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load config override, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_tunables() {
        let config = Config::default();
        assert_eq!(config.adjustment_interval, 3);
        assert_eq!(config.target_block_time, 2);
        assert_eq!(config.max_step, 1);
        assert_eq!(config.future_drift, 36);
        assert_eq!(config.max_time_jump, 6);
        assert_eq!(config.mining_reward, 50);
        assert_eq!(config.default_difficulty, 2);
        assert_eq!(config.max_txs_per_block, 5);
    }

    #[test]
    fn missing_override_path_falls_back_to_defaults() {
        assert_eq!(Config::load_or_default(None), Config::default());
    }

    #[test]
    fn nonexistent_override_file_falls_back_to_defaults() {
        let path = Path::new("/nonexistent/forge-chain-config-override.toml");
        assert_eq!(Config::load_or_default(Some(path)), Config::default());
    }

    #[test]
    fn override_file_replaces_every_tunable() {
        let dir = std::env::temp_dir();
        let path = dir.join("forge-chain-config-override-test.toml");
        std::fs::write(
            &path,
            r#"
            adjustment_interval = 5
            target_block_time = 10
            max_step = 2
            future_drift = 100
            max_time_jump = 20
            mining_reward = 25
            default_difficulty = 3
            max_txs_per_block = 8
            mining_probability = 0.5
            "#,
        )
        .unwrap();

        let loaded = Config::load_or_default(Some(&path));
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.adjustment_interval, 5);
        assert_eq!(loaded.target_block_time, 10);
        assert_eq!(loaded.mining_reward, 25);
        assert_eq!(loaded.default_difficulty, 3);
    }
}
