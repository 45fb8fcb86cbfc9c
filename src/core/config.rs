//! Engine configuration.
//!
//! Hosts configure rule constants and command defaults at startup:
//!
//! ```
//! use keyforge_pipeline::core::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "key_cost": 7 }"#).unwrap();
//! assert_eq!(config.key_cost, 7);
//! assert_eq!(config.default_draw, 1); // unspecified fields keep defaults
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::TokenKind;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid engine configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("key cost must be positive, got {0}")]
    KeyCost(i64),
}

/// Rule constants and command defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Token kinds `/token` may set.
    pub allowed_tokens: Vec<TokenKind>,

    /// Amber spent to forge a key before modifiers.
    pub key_cost: i64,

    /// Cards drawn by `/draw` without a valid count.
    pub default_draw: u32,

    /// Cards discarded by `/discard` without a valid count.
    pub default_discard: u32,

    /// Token count set by `/token` without a valid count.
    pub default_token_count: i64,

    /// Seconds added by `/modify-clock` without a valid amount.
    pub default_clock_adjustment: i64,

    /// Seconds on each player's clock at game start.
    pub starting_clock: i64,

    /// Hand size players refill to.
    pub hand_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allowed_tokens: vec![
                TokenKind::Amber,
                TokenKind::Damage,
                TokenKind::Power,
                TokenKind::Stun,
            ],
            key_cost: 6,
            default_draw: 1,
            default_discard: 1,
            default_token_count: 1,
            default_clock_adjustment: 60,
            starting_clock: 1800,
            hand_size: 6,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.key_cost <= 0 {
            return Err(ConfigError::KeyCost(config.key_cost));
        }
        Ok(config)
    }

    /// Is `kind` settable through `/token`?
    #[must_use]
    pub fn allows_token(&self, kind: TokenKind) -> bool {
        self.allowed_tokens.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.key_cost, 6);
        assert_eq!(config.default_clock_adjustment, 60);
        assert!(config.allows_token(TokenKind::Stun));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "allowed_tokens": ["damage"] }"#).unwrap();
        assert!(config.allows_token(TokenKind::Damage));
        assert!(!config.allows_token(TokenKind::Amber));
        assert_eq!(config.key_cost, 6);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json("{ key_cost: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_key_cost() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "key_cost": 0 }"#),
            Err(ConfigError::KeyCost(0))
        ));
    }
}
