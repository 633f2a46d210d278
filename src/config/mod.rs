//! Configuration Module - Environment-based Settings
//!
//! All configuration is read once at startup from the process environment
//! and frozen into an immutable `Settings` value that is passed by handle
//! into every component - nothing is read from globals afterwards.

pub mod loader;

/// Hyperliquid deployment network.
///
/// Defaults to testnet so a misconfigured process cannot touch
/// mainnet funds by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// REST API base URL for this network.
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.hyperliquid.xyz",
            Self::Testnet => "https://api.hyperliquid-testnet.xyz",
        }
    }

    pub const fn is_mainnet(self) -> bool {
        matches!(self, Self::Mainnet)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

/// Process-lifetime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Deployment network (HYPERLIQUID_NETWORK, default testnet).
    pub network: Network,
    /// Raw signing key material (HYPERLIQUID_PRIVATE_KEY). Optional:
    /// absence disables the write path but leaves reads working.
    pub private_key: Option<String>,
    /// Per-request timeout in milliseconds (HYPERLIQUID_TIMEOUT_MS).
    pub timeout_ms: u64,
    /// Retry budget for idempotent /info reads (HYPERLIQUID_INFO_RETRIES).
    /// Order submissions are never retried.
    pub info_retries: u32,
}
