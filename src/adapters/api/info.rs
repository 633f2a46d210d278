//! Info Gateway - MarketData Port over POST /info
//!
//! Thin typed accessors over the read-only endpoint. Symbol lookups
//! normalize to uppercase; an absent symbol is a normal `Unknown`
//! answer while a malformed payload is a typed error. Nothing here is
//! cached - every call fetches fresh.

use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::client::ApiClient;
use super::types::{InfoRequest, Meta, OpenOrderWire};
use crate::domain::{OrderSummary, Side};
use crate::errors::ApiError;
use crate::ports::{MarketData, MidQuote};

/// Read-only gateway backed by the shared API client.
pub struct InfoGateway {
    client: Arc<ApiClient>,
}

impl InfoGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetch perp metadata (shared with the exchange gateway at startup).
    pub async fn meta(&self) -> Result<Meta, ApiError> {
        self.client.info(&InfoRequest::Meta).await
    }
}

/// Look up one symbol in a raw mid-price payload.
///
/// Kept free of I/O so the shape/parse rules are unit-testable.
pub(crate) fn extract_mid(payload: &Value, symbol: &str) -> Result<MidQuote, ApiError> {
    let Some(map) = payload.as_object() else {
        return Err(ApiError::UnexpectedShape("allMids payload is not a map"));
    };

    let normalized = symbol.trim().to_ascii_uppercase();
    let Some(entry) = map.get(&normalized) else {
        return Ok(MidQuote::Unknown);
    };

    let parsed = match entry {
        Value::String(raw) => raw.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };

    match parsed {
        Some(price) => Ok(MidQuote::Price(price)),
        None => Err(ApiError::BadPrice {
            symbol: normalized,
            raw: entry.to_string(),
        }),
    }
}

fn summarize_order(wire: OpenOrderWire) -> OrderSummary {
    OrderSummary {
        side: Side::from_wire_code(&wire.side),
        limit_price: wire.limit_px.parse().unwrap_or(0.0),
        size: wire.sz.parse().unwrap_or(0.0),
        symbol: wire.coin,
        order_id: wire.oid,
        timestamp_ms: wire.timestamp,
    }
}

#[async_trait]
impl MarketData for InfoGateway {
    async fn mid_price(&self, symbol: &str) -> Result<MidQuote, ApiError> {
        let payload: Value = self.client.info(&InfoRequest::AllMids).await?;
        let quote = extract_mid(&payload, symbol)?;
        debug!(symbol, ?quote, "Mid price lookup");
        Ok(quote)
    }

    async fn user_state(&self, address: Address) -> Result<Value, ApiError> {
        self.client
            .info(&InfoRequest::UserState { user: address })
            .await
    }

    async fn open_orders(&self, address: Address) -> Result<Vec<OrderSummary>, ApiError> {
        let orders: Vec<OpenOrderWire> = self
            .client
            .info(&InfoRequest::OpenOrders { user: address })
            .await?;
        Ok(orders.into_iter().map(summarize_order).collect())
    }

    async fn perpetual_symbols(&self) -> Result<Vec<String>, ApiError> {
        let meta = self.meta().await?;
        Ok(meta
            .universe
            .into_iter()
            .filter(|asset| !asset.is_delisted.unwrap_or(false))
            .map(|asset| asset.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extract_mid_found() {
        let payload = json!({"BTC": "43250.5", "ETH": "2280.0"});
        assert_eq!(
            extract_mid(&payload, "BTC").unwrap(),
            MidQuote::Price(43_250.5)
        );
    }

    #[test]
    fn test_extract_mid_normalizes_symbol_case() {
        let payload = json!({"SOL": "155.25"});
        assert_eq!(
            extract_mid(&payload, " sol ").unwrap(),
            MidQuote::Price(155.25)
        );
    }

    #[test]
    fn test_extract_mid_absent_symbol_is_unknown_not_error() {
        let payload = json!({"BTC": "43250.5"});
        assert_eq!(extract_mid(&payload, "DOGE").unwrap(), MidQuote::Unknown);
    }

    #[test]
    fn test_extract_mid_non_map_payload_is_shape_error() {
        for payload in [json!(["BTC", "43250.5"]), json!("oops"), json!(42)] {
            let err = extract_mid(&payload, "BTC").unwrap_err();
            assert!(matches!(err, ApiError::UnexpectedShape(_)));
        }
    }

    #[test]
    fn test_extract_mid_unparsable_entry_is_bad_price() {
        let payload = json!({"BTC": "not-a-number"});
        let err = extract_mid(&payload, "BTC").unwrap_err();
        assert!(matches!(err, ApiError::BadPrice { .. }));
    }

    #[test]
    fn test_extract_mid_accepts_numeric_entries() {
        let payload = json!({"BTC": 43250.5});
        assert_eq!(
            extract_mid(&payload, "BTC").unwrap(),
            MidQuote::Price(43_250.5)
        );
    }

    #[test]
    fn test_summarize_order_maps_side_codes() {
        let buy = summarize_order(OpenOrderWire {
            coin: "BTC".to_string(),
            limit_px: "43000.0".to_string(),
            oid: 11,
            side: "B".to_string(),
            sz: "0.5".to_string(),
            timestamp: 1_700_000_000_000,
        });
        assert_eq!(buy.side, Side::Buy);
        assert_eq!(buy.limit_price, 43_000.0);

        let sell = summarize_order(OpenOrderWire {
            coin: "ETH".to_string(),
            limit_px: "2300.0".to_string(),
            oid: 12,
            side: "A".to_string(),
            sz: "2.0".to_string(),
            timestamp: 1_700_000_000_001,
        });
        assert_eq!(sell.side, Side::Sell);
    }
}
