//! Signing Identity - Key Resolution and Nonces
//!
//! Turns the configured hex private key into a wallet plus derived EVM
//! address, once, at startup. Resolution is pure and deterministic; a
//! missing or malformed key yields `None` and the write path stays
//! disabled for the life of the process while reads keep working
//! against a zero placeholder address.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use tracing::{error, warn};

/// Last nonce handed out, for strict monotonicity under concurrency.
static LAST_NONCE: AtomicU64 = AtomicU64::new(0);

/// Process-lifetime signing identity. Immutable after construction.
pub struct SigningIdentity {
    wallet: PrivateKeySigner,
    address: Address,
}

// Custom Debug implementation to prevent private key leakage.
impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("wallet", &"<redacted>")
            .field("address", &self.address)
            .finish()
    }
}

impl SigningIdentity {
    /// Resolve a signing identity from optional hex key material.
    ///
    /// Accepts an optional `0x` prefix and requires exactly 32 bytes of
    /// hex. Every failure path reports a configuration error to stderr
    /// and returns `None` - never a panic, and never the key itself.
    pub fn resolve(secret_hex: Option<&str>) -> Option<Self> {
        let Some(raw) = secret_hex else {
            warn!("HYPERLIQUID_PRIVATE_KEY not set - trading tools disabled");
            return None;
        };

        let normalized = raw.trim().to_ascii_lowercase();
        let digits = normalized.strip_prefix("0x").unwrap_or(&normalized);

        if digits.len() != 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            error!(
                length = digits.len(),
                "Invalid private key format (need 32 bytes of hex) - trading tools disabled"
            );
            return None;
        }

        match digits.parse::<PrivateKeySigner>() {
            Ok(wallet) => {
                let address = wallet.address();
                Some(Self { wallet, address })
            }
            Err(e) => {
                error!(error = %e, "Private key rejected by signer - trading tools disabled");
                None
            }
        }
    }

    /// Derived public address.
    pub const fn address(&self) -> Address {
        self.address
    }

    pub(crate) const fn wallet(&self) -> &PrivateKeySigner {
        &self.wallet
    }
}

/// Next exchange nonce: current Unix millis, bumped if a concurrent
/// caller already claimed this millisecond.
pub(crate) fn next_nonce() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    loop {
        let last = LAST_NONCE.load(Ordering::SeqCst);
        let candidate = now.max(last + 1);
        if LAST_NONCE
            .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "e908f86dbb4d55ac876378565aafeabc187f6690f046459397b17d9b9a19688e";

    #[test]
    fn test_resolve_valid_key_derives_stable_address() {
        let a = SigningIdentity::resolve(Some(TEST_KEY)).unwrap();
        let b = SigningIdentity::resolve(Some(&format!("0x{TEST_KEY}"))).unwrap();

        assert_eq!(a.address(), b.address());
        assert_ne!(a.address(), Address::ZERO);
    }

    #[test]
    fn test_resolve_missing_key_is_absent() {
        assert!(SigningIdentity::resolve(None).is_none());
    }

    #[test]
    fn test_resolve_rejects_wrong_length() {
        assert!(SigningIdentity::resolve(Some("deadbeef")).is_none());
        assert!(SigningIdentity::resolve(Some(&format!("{TEST_KEY}00"))).is_none());
    }

    #[test]
    fn test_resolve_rejects_non_hex() {
        let bad = format!("zz{}", &TEST_KEY[2..]);
        assert!(SigningIdentity::resolve(Some(&bad)).is_none());
    }

    #[test]
    fn test_debug_never_prints_key_material() {
        let identity = SigningIdentity::resolve(Some(TEST_KEY)).unwrap();
        let rendered = format!("{identity:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&TEST_KEY[..16]));
    }

    #[test]
    fn test_nonces_are_strictly_increasing() {
        let first = next_nonce();
        let second = next_nonce();
        let third = next_nonce();
        assert!(second > first);
        assert!(third > second);
    }
}
