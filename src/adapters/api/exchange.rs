//! Exchange Gateway - Signed Writes to POST /exchange
//!
//! Owns the symbol → asset-index map (fetched once at startup), wire
//! price/size formatting, and the sign-and-submit pipeline. Each
//! submission gets a fresh monotonic nonce and is sent exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::client::ApiClient;
use super::identity::{SigningIdentity, next_nonce};
use super::signing::{action_hash, sign_l1_action};
use super::types::{
    ActionWire, AssetMeta, BulkCancelWire, BulkOrderWire, CancelWire, ExchangePayload,
    ExchangeResponseWire, InfoRequest, Meta, OrderTypeWire, OrderWire,
};
use crate::config::Network;
use crate::errors::ApiError;
use crate::ports::{CancelTicket, ExchangeAck, LimitOrderTicket, OrderExecution};

use async_trait::async_trait;

/// Perp prices allow at most `6 - szDecimals` decimal places.
const MAX_PRICE_DECIMALS: u32 = 6;

/// Per-asset wire parameters.
#[derive(Debug, Clone, Copy)]
struct AssetInfo {
    index: u32,
    sz_decimals: u32,
}

/// Write-side gateway bound to one signing identity and network.
pub struct ExchangeGateway {
    client: Arc<ApiClient>,
    identity: Arc<SigningIdentity>,
    is_mainnet: bool,
    assets: HashMap<String, AssetInfo>,
}

impl ExchangeGateway {
    /// Fetch the perp universe and build the asset map.
    ///
    /// A failure here leaves the process running with trading disabled;
    /// the caller decides that, not this constructor.
    pub async fn connect(
        client: Arc<ApiClient>,
        identity: Arc<SigningIdentity>,
        network: Network,
    ) -> Result<Self, ApiError> {
        let meta: Meta = client.info(&InfoRequest::Meta).await?;
        let assets = index_universe(meta.universe);
        info!(
            assets = assets.len(),
            network = %network,
            "Exchange gateway connected"
        );

        Ok(Self {
            client,
            identity,
            is_mainnet: network.is_mainnet(),
            assets,
        })
    }

    fn asset(&self, symbol: &str) -> Result<AssetInfo, ApiError> {
        let key = symbol.trim().to_ascii_uppercase();
        self.assets
            .get(&key)
            .copied()
            .ok_or(ApiError::UnknownAsset(key))
    }

    /// Hash, sign, and submit one L1 action.
    async fn submit(&self, action: ActionWire) -> Result<ExchangeAck, ApiError> {
        let nonce = next_nonce();
        let connection_id = action_hash(&action, nonce)?;
        let signature = sign_l1_action(self.identity.wallet(), connection_id, self.is_mainnet)?;

        let payload = ExchangePayload {
            action: serde_json::to_value(&action)
                .map_err(|e| ApiError::Decode(format!("action encoding: {e}")))?,
            signature,
            nonce,
            vault_address: None,
        };

        let wire: ExchangeResponseWire = self.client.exchange(&payload).await?;
        Ok(wire.into())
    }
}

/// Asset index is the instrument's position in the universe array.
/// Delisted entries keep their slot but are excluded from the map so
/// orders against them fail fast as unknown assets.
fn index_universe(universe: Vec<AssetMeta>) -> HashMap<String, AssetInfo> {
    universe
        .into_iter()
        .enumerate()
        .filter(|(_, asset)| !asset.is_delisted.unwrap_or(false))
        .map(|(index, asset)| {
            (
                asset.name.to_ascii_uppercase(),
                AssetInfo {
                    index: index as u32,
                    sz_decimals: asset.sz_decimals,
                },
            )
        })
        .collect()
}

/// Format a price for the wire: 5 significant figures, then at most
/// `6 - szDecimals` decimal places, trailing zeros trimmed.
fn format_price(price: f64, sz_decimals: u32) -> String {
    if price <= 0.0 {
        return "0".to_string();
    }

    let rounded = if price >= 100_000.0 {
        price.round()
    } else {
        let magnitude = price.log10().floor() as i32;
        let factor = 10f64.powi(4 - magnitude);
        (price * factor).round() / factor
    };

    let decimals = MAX_PRICE_DECIMALS.saturating_sub(sz_decimals) as usize;
    trim_zeros(format!("{rounded:.decimals$}"))
}

/// Format a size for the wire: rounded to the asset's szDecimals.
fn format_size(size: f64, sz_decimals: u32) -> String {
    let decimals = sz_decimals as usize;
    trim_zeros(format!("{size:.decimals$}"))
}

fn trim_zeros(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

#[async_trait]
impl OrderExecution for ExchangeGateway {
    async fn place_limit(&self, ticket: &LimitOrderTicket) -> Result<ExchangeAck, ApiError> {
        let asset = self.asset(&ticket.symbol)?;

        let order = OrderWire {
            asset: asset.index,
            is_buy: ticket.is_buy,
            limit_px: format_price(ticket.limit_price, asset.sz_decimals),
            sz: format_size(ticket.size, asset.sz_decimals),
            reduce_only: ticket.reduce_only,
            order_type: OrderTypeWire::Limit {
                tif: ticket.tif.as_wire().to_string(),
            },
            cloid: ticket.cloid.clone(),
        };

        self.submit(ActionWire::Order(BulkOrderWire {
            orders: vec![order],
            grouping: "na".to_string(),
        }))
        .await
    }

    async fn cancel_orders(&self, cancels: &[CancelTicket]) -> Result<ExchangeAck, ApiError> {
        let mut wire = Vec::with_capacity(cancels.len());
        for cancel in cancels {
            let asset = self.asset(&cancel.symbol)?;
            wire.push(CancelWire {
                asset: asset.index,
                oid: cancel.order_id,
            });
        }

        self.submit(ActionWire::Cancel(BulkCancelWire { cancels: wire }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> Vec<AssetMeta> {
        vec![
            AssetMeta {
                name: "BTC".to_string(),
                sz_decimals: 5,
                is_delisted: None,
            },
            AssetMeta {
                name: "ETH".to_string(),
                sz_decimals: 4,
                is_delisted: Some(false),
            },
            AssetMeta {
                name: "OLDCOIN".to_string(),
                sz_decimals: 1,
                is_delisted: Some(true),
            },
            AssetMeta {
                name: "SOL".to_string(),
                sz_decimals: 2,
                is_delisted: None,
            },
        ]
    }

    #[test]
    fn test_index_universe_preserves_positions_and_drops_delisted() {
        let assets = index_universe(universe());

        assert_eq!(assets["BTC"].index, 0);
        assert_eq!(assets["ETH"].index, 1);
        // Delisted entry keeps slot 2 reserved.
        assert_eq!(assets["SOL"].index, 3);
        assert!(!assets.contains_key("OLDCOIN"));
    }

    #[test]
    fn test_format_price_five_significant_figures() {
        assert_eq!(format_price(43250.4, 5), "43250");
        assert_eq!(format_price(1234.5678, 4), "1234.6");
        assert_eq!(format_price(0.123456, 0), "0.12346");
    }

    #[test]
    fn test_format_price_caps_decimals_by_sz_decimals() {
        // 6 - 4 = 2 decimal places available.
        assert_eq!(format_price(0.987654, 4), "0.99");
    }

    #[test]
    fn test_format_price_large_values_round_to_integers() {
        assert_eq!(format_price(123_456.7, 0), "123457");
    }

    #[test]
    fn test_format_size_rounds_to_sz_decimals() {
        assert_eq!(format_size(3.14159, 2), "3.14");
        assert_eq!(format_size(1.0, 3), "1");
        assert_eq!(format_size(0.123456789, 5), "0.12346");
    }
}
