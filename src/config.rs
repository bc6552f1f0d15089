use serde::Deserialize;

use crate::decoder::MAX_DECIMALS;
use crate::error::Error;
use crate::protocols::{RAYDIUM_AMM_V4_PROGRAM_ID, SERUM_MARKET_PROGRAM_ID, validate_address};

pub const ENV_PREFIX: &str = "POOL_WATCHER_";

/// Scanner settings. Every field can be overridden with a `POOL_WATCHER_*` variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScannerConfig {
    /// Program whose pool-creation instructions are watched.
    #[serde(default = "default_amm_program_id")]
    pub amm_program_id: String,
    /// Order-book program the AMM pairs each pool with.
    #[serde(default = "default_market_program_id")]
    pub market_program_id: String,
    /// Decimals used to scale the liquidity snapshot (9 for native SOL).
    #[serde(default = "default_snapshot_decimals")]
    pub snapshot_decimals: u8,
}

fn default_amm_program_id() -> String {
    RAYDIUM_AMM_V4_PROGRAM_ID.to_string()
}

fn default_market_program_id() -> String {
    SERUM_MARKET_PROGRAM_ID.to_string()
}

fn default_snapshot_decimals() -> u8 {
    9
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            amm_program_id: default_amm_program_id(),
            market_program_id: default_market_program_id(),
            snapshot_decimals: default_snapshot_decimals(),
        }
    }
}

impl ScannerConfig {
    /// Load from the process environment, reading `.env` first when present.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit set of `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(|e| Error::Config {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("amm_program_id", &self.amm_program_id),
            ("market_program_id", &self.market_program_id),
        ] {
            validate_address(value).map_err(|reason| Error::Config {
                reason: format!("{name}: {reason}"),
            })?;
        }
        if self.snapshot_decimals > MAX_DECIMALS {
            return Err(Error::Config {
                reason: format!(
                    "snapshot_decimals: {} exceeds {MAX_DECIMALS}",
                    self.snapshot_decimals
                ),
            });
        }
        if self.amm_program_id == self.market_program_id {
            return Err(Error::Config {
                reason: "amm_program_id and market_program_id must differ".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]
mod tests {
    use super::*;

    fn var(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn defaults_when_unset() {
        let config = ScannerConfig::from_vars(vec![var("UNRELATED", "1")]).unwrap();
        assert_eq!(config, ScannerConfig::default());
        assert_eq!(config.amm_program_id, RAYDIUM_AMM_V4_PROGRAM_ID);
        assert_eq!(config.snapshot_decimals, 9);
    }

    #[test]
    fn prefixed_vars_override() {
        let program = bs58::encode([1_u8; 32]).into_string();
        let config = ScannerConfig::from_vars(vec![
            var("POOL_WATCHER_AMM_PROGRAM_ID", &program),
            var("POOL_WATCHER_SNAPSHOT_DECIMALS", "6"),
        ])
        .unwrap();
        assert_eq!(config.amm_program_id, program);
        assert_eq!(config.market_program_id, SERUM_MARKET_PROGRAM_ID);
        assert_eq!(config.snapshot_decimals, 6);
    }

    #[test]
    fn oversized_decimals_are_rejected() {
        let result = ScannerConfig::from_vars(vec![var("POOL_WATCHER_SNAPSHOT_DECIMALS", "29")]);
        let Err(Error::Config { reason }) = &result else {
            panic!("expected Config error, got {result:?}");
        };
        assert!(reason.contains("snapshot_decimals"), "{reason}");
        assert!(ScannerConfig::from_vars(vec![var("POOL_WATCHER_SNAPSHOT_DECIMALS", "28")]).is_ok());
    }

    #[test]
    fn invalid_program_id_is_config_error() {
        let result =
            ScannerConfig::from_vars(vec![var("POOL_WATCHER_MARKET_PROGRAM_ID", "short")]);
        let Err(Error::Config { reason }) = &result else {
            panic!("expected config error, got {result:?}");
        };
        assert!(reason.starts_with("market_program_id"));
    }

    #[test]
    fn bad_decimals_is_config_error() {
        let result = ScannerConfig::from_vars(vec![var("POOL_WATCHER_SNAPSHOT_DECIMALS", "nine")]);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn identical_programs_rejected() {
        let config = ScannerConfig {
            market_program_id: RAYDIUM_AMM_V4_PROGRAM_ID.to_string(),
            ..ScannerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
