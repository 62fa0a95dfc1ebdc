//! Game tuning, loadable from JSON. Every field has a default so partial
//! files are accepted.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::scoreboard::{
    DEFAULT_BET, DEFAULT_MAXIMUM_BET, DEFAULT_MINIMUM_BET, DEFAULT_STARTING_MONEY,
};
use crate::win::CategoryWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub min_bet: u64,
    pub max_bet: u64,
    pub step: u64,
    pub initial_bet: u64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_bet: 5,
            max_bet: 60,
            step: 5,
            initial_bet: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_money: u64,
    pub initial_bet: u64,
    pub minimum_bet: u64,
    pub maximum_bet: u64,
    pub selector: SelectorConfig,
    pub category_weights: CategoryWeights,
    pub spin_duration_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: DEFAULT_STARTING_MONEY,
            initial_bet: DEFAULT_BET,
            minimum_bet: DEFAULT_MINIMUM_BET,
            maximum_bet: DEFAULT_MAXIMUM_BET,
            selector: SelectorConfig::default(),
            category_weights: CategoryWeights::default(),
            spin_duration_ms: 1200,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.minimum_bet > self.maximum_bet {
            return Err(ConfigError::Invalid(format!(
                "minimum_bet {} exceeds maximum_bet {}",
                self.minimum_bet, self.maximum_bet
            )));
        }
        let sel = &self.selector;
        if sel.min_bet > sel.max_bet {
            return Err(ConfigError::Invalid(format!(
                "selector.min_bet {} exceeds selector.max_bet {}",
                sel.min_bet, sel.max_bet
            )));
        }
        if sel.step == 0 {
            return Err(ConfigError::Invalid("selector.step must be positive".into()));
        }
        Ok(())
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = GameConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.starting_money, 100);
        assert_eq!(cfg.selector.max_bet, 60);
    }

    #[test]
    fn partial_override() {
        let cfg = GameConfig::from_json_str(
            r#"{"starting_money": 250, "selector": {"max_bet": 100}, "category_weights": {"mega_win": 0}}"#,
        )
        .unwrap();
        assert_eq!(cfg.starting_money, 250);
        assert_eq!(cfg.selector.max_bet, 100);
        assert_eq!(cfg.selector.step, 5);
        assert_eq!(cfg.category_weights.mega_win, 0);
        assert_eq!(cfg.category_weights.small_win, 70);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = GameConfig::from_json_str(r#"{"minimum_bet": 10, "maximum_bet": 5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = GameConfig::from_json_str(r#"{"selector": {"step": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = GameConfig::from_json_str("{starting_money").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GameConfig::from_path("/nonexistent/spinboard.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/spinboard.json"));
    }
}
