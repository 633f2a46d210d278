//! Settings Loader - Environment Reading and Validation
//!
//! Reads every HYPERLIQUID_* variable exactly once, applies defaults,
//! and validates ranges with clear error messages for misconfiguration.
//! The private key is never logged - only whether one was provided.

use anyhow::{Context, Result};
use tracing::info;

use super::{Network, Settings};

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_INFO_RETRIES: u32 = 3;

/// Load and validate settings from the process environment.
///
/// # Errors
/// Returns a detailed error if:
/// - HYPERLIQUID_NETWORK is set to something other than mainnet/testnet
/// - Numeric overrides fail to parse or fall outside sane bounds
pub fn load_settings() -> Result<Settings> {
    let network = match std::env::var("HYPERLIQUID_NETWORK") {
        Ok(value) => parse_network(&value)?,
        Err(_) => Network::Testnet,
    };

    let private_key = std::env::var("HYPERLIQUID_PRIVATE_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    let timeout_ms = match std::env::var("HYPERLIQUID_TIMEOUT_MS") {
        Ok(value) => value
            .parse::<u64>()
            .context("HYPERLIQUID_TIMEOUT_MS must be an integer (milliseconds)")?,
        Err(_) => DEFAULT_TIMEOUT_MS,
    };

    let info_retries = match std::env::var("HYPERLIQUID_INFO_RETRIES") {
        Ok(value) => value
            .parse::<u32>()
            .context("HYPERLIQUID_INFO_RETRIES must be a small integer")?,
        Err(_) => DEFAULT_INFO_RETRIES,
    };

    let settings = Settings {
        network,
        private_key,
        timeout_ms,
        info_retries,
    };

    validate_settings(&settings)?;

    info!(
        network = %settings.network,
        timeout_ms = settings.timeout_ms,
        info_retries = settings.info_retries,
        key_provided = settings.private_key.is_some(),
        "Settings loaded"
    );

    Ok(settings)
}

fn parse_network(value: &str) -> Result<Network> {
    match value.trim().to_ascii_lowercase().as_str() {
        "mainnet" => Ok(Network::Mainnet),
        "testnet" | "" => Ok(Network::Testnet),
        other => anyhow::bail!(
            "HYPERLIQUID_NETWORK must be 'mainnet' or 'testnet', got {other:?}"
        ),
    }
}

/// Validate all settings parameters.
fn validate_settings(settings: &Settings) -> Result<()> {
    anyhow::ensure!(
        settings.timeout_ms >= 100 && settings.timeout_ms <= 120_000,
        "timeout must be in [100, 120000] ms, got {}",
        settings.timeout_ms
    );
    anyhow::ensure!(
        settings.info_retries <= 10,
        "info_retries must be at most 10, got {}",
        settings.info_retries
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_network_variants() {
        assert_eq!(parse_network("mainnet").unwrap(), Network::Mainnet);
        assert_eq!(parse_network("Testnet").unwrap(), Network::Testnet);
        assert_eq!(parse_network("  MAINNET ").unwrap(), Network::Mainnet);
        assert!(parse_network("devnet").is_err());
    }

    #[test]
    fn test_validate_rejects_extreme_timeout() {
        let settings = Settings {
            network: Network::Testnet,
            private_key: None,
            timeout_ms: 5,
            info_retries: 3,
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let settings = Settings {
            network: Network::Testnet,
            private_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            info_retries: DEFAULT_INFO_RETRIES,
        };
        assert!(validate_settings(&settings).is_ok());
    }
}
