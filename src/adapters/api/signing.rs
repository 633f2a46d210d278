//! L1 Action Signing
//!
//! Hyperliquid authorizes exchange actions with a two-step scheme:
//! the action is msgpack-encoded (named fields, declaration order),
//! extended with the nonce and a vault marker byte, and keccak-hashed
//! into a "connection id"; that hash is then signed as an EIP-712
//! phantom-agent struct whose `source` distinguishes mainnet ("a")
//! from testnet ("b").

use alloy::primitives::{Address, B256, PrimitiveSignature as Signature, keccak256};
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::sol_types::{SolStruct, eip712_domain};

use super::types::ActionWire;
use crate::errors::ApiError;

sol! {
    struct Agent {
        string source;
        bytes32 connectionId;
    }
}

/// Hash an action with its nonce into the signed connection id.
///
/// No vault address is ever attached here (single-account scope), so
/// the vault marker byte is always zero.
pub(crate) fn action_hash(action: &ActionWire, nonce: u64) -> Result<B256, ApiError> {
    let mut bytes =
        rmp_serde::to_vec_named(action).map_err(|e| ApiError::Signing(e.to_string()))?;
    bytes.extend(nonce.to_be_bytes());
    bytes.push(0);
    Ok(keccak256(bytes))
}

/// Sign a connection id with the phantom-agent EIP-712 envelope.
pub(crate) fn sign_l1_action(
    wallet: &PrivateKeySigner,
    connection_id: B256,
    is_mainnet: bool,
) -> Result<Signature, ApiError> {
    let source = if is_mainnet { "a" } else { "b" };
    let agent = Agent {
        source: source.to_string(),
        connectionId: connection_id,
    };

    let domain = eip712_domain! {
        name: "Exchange",
        version: "1",
        chain_id: 1337,
        verifying_contract: Address::ZERO,
    };

    let hash = agent.eip712_signing_hash(&domain);
    wallet
        .sign_hash_sync(&hash)
        .map_err(|e| ApiError::Signing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::api::types::{
        BulkCancelWire, BulkOrderWire, CancelWire, OrderTypeWire, OrderWire,
    };

    fn test_wallet() -> PrivateKeySigner {
        "e908f86dbb4d55ac876378565aafeabc187f6690f046459397b17d9b9a19688e"
            .parse()
            .unwrap()
    }

    fn sample_limit_order() -> ActionWire {
        ActionWire::Order(BulkOrderWire {
            orders: vec![OrderWire {
                asset: 1,
                is_buy: true,
                limit_px: "2000.0".to_string(),
                sz: "3.5".to_string(),
                reduce_only: false,
                order_type: OrderTypeWire::Limit {
                    tif: "Ioc".to_string(),
                },
                cloid: None,
            }],
            grouping: "na".to_string(),
        })
    }

    // Reference vectors from the upstream protocol test suite.

    #[test]
    fn test_limit_order_action_signing_vectors() {
        let wallet = test_wallet();
        let connection_id = action_hash(&sample_limit_order(), 1583838).unwrap();

        let signature = sign_l1_action(&wallet, connection_id, true).unwrap();
        assert_eq!(
            signature.to_string(),
            "0x77957e58e70f43b6b68581f2dc42011fc384538a2e5b7bf42d5b936f19fbb67360721a8598727230f67080efee48c812a6a4442013fd3b0eed509171bef9f23f1c"
        );

        let signature = sign_l1_action(&wallet, connection_id, false).unwrap();
        assert_eq!(
            signature.to_string(),
            "0xcd0925372ff1ed499e54883e9a6205ecfadec748f80ec463fe2f84f1209648776377961965cb7b12414186b1ea291e95fd512722427efcbcfb3b0b2bcd4d79d01c"
        );
    }

    #[test]
    fn test_cancel_action_signing_vectors() {
        let wallet = test_wallet();
        let action = ActionWire::Cancel(BulkCancelWire {
            cancels: vec![CancelWire {
                asset: 1,
                oid: 82382,
            }],
        });
        let connection_id = action_hash(&action, 1583838).unwrap();

        let signature = sign_l1_action(&wallet, connection_id, true).unwrap();
        assert_eq!(
            signature.to_string(),
            "0x02f76cc5b16e0810152fa0e14e7b219f49c361e3325f771544c6f54e157bf9fa17ed0afc11a98596be85d5cd9f86600aad515337318f7ab346e5ccc1b03425d51b"
        );

        let signature = sign_l1_action(&wallet, connection_id, false).unwrap();
        assert_eq!(
            signature.to_string(),
            "0x6ffebadfd48067663390962539fbde76cfa36f53be65abe2ab72c9db6d0db44457720db9d7c4860f142a484f070c84eb4b9694c3a617c83f0d698a27e55fd5e01c"
        );
    }

    #[test]
    fn test_action_hash_depends_on_nonce() {
        let action = sample_limit_order();
        let a = action_hash(&action, 1).unwrap();
        let b = action_hash(&action, 2).unwrap();
        assert_ne!(a, b);
    }
}
