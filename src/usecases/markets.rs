//! Market Data Façade - Reads Reshaped for the Tool Surface
//!
//! Read-side counterpart of the trading desk. The one place where typed
//! mid-price outcomes are flattened into the numeric protocol the price
//! tool speaks: 0.0 for an unknown symbol, -1.0 for a malformed payload,
//! -2.0 for an unparsable entry. Everything else keeps typed errors.

use std::sync::Arc;

use alloy::primitives::Address;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::OrderSummary;
use crate::errors::{ApiError, TradeError};
use crate::ports::{MarketData, MidQuote};

/// Synthetic one-level book: bid/ask offset from the mid by one basis
/// point, fixed unit size. An approximation, labeled as such.
const BOOK_SPREAD: f64 = 0.0001;

/// Read-side façade. `address` is `None` when no signing identity was
/// configured; account-scoped reads are gated on it.
pub struct MarketDesk<M> {
    markets: Arc<M>,
    address: Option<Address>,
}

impl<M> MarketDesk<M>
where
    M: MarketData,
{
    pub fn new(markets: Arc<M>, address: Option<Address>) -> Self {
        Self { markets, address }
    }

    fn account(&self) -> Result<Address, TradeError> {
        self.address.ok_or(TradeError::Disabled)
    }

    /// Account snapshot, passed through without interpretation.
    pub async fn user_state(&self) -> Result<Value, TradeError> {
        let address = self.account()?;
        Ok(self.markets.user_state(address).await?)
    }

    /// Mid price flattened to the numeric tool protocol.
    ///
    /// Transport and HTTP failures still propagate as errors; only the
    /// three recoverable data conditions are encoded as sentinels.
    pub async fn mid_price_numeric(&self, symbol: &str) -> Result<f64, ApiError> {
        match self.markets.mid_price(symbol).await {
            Ok(MidQuote::Price(price)) => Ok(price),
            Ok(MidQuote::Unknown) => {
                debug!(symbol, "Symbol absent from mid map");
                Ok(0.0)
            }
            Err(ApiError::UnexpectedShape(reason)) => {
                debug!(symbol, reason, "Malformed mid map payload");
                Ok(-1.0)
            }
            Err(ApiError::BadPrice { symbol, raw }) => {
                debug!(%symbol, %raw, "Unparsable mid price entry");
                Ok(-2.0)
            }
            Err(other) => Err(other),
        }
    }

    /// Synthetic one-level order book around the current mid.
    ///
    /// The upstream surface exposes no depth here, so the book is an
    /// approximation derived from the mid price alone.
    pub async fn order_book(&self, symbol: &str) -> Result<Value, ApiError> {
        let normalized = symbol.trim().to_ascii_uppercase();

        let mid = match self.markets.mid_price(&normalized).await? {
            MidQuote::Price(mid) if mid > 0.0 => mid,
            _ => {
                return Ok(json!({
                    "error": format!("Could not retrieve market data for {normalized}.")
                }));
            }
        };

        Ok(json!({
            "symbol": normalized,
            "mid_price": mid,
            "bids": [{"price": mid * (1.0 - BOOK_SPREAD), "size": 1.0}],
            "asks": [{"price": mid * (1.0 + BOOK_SPREAD), "size": 1.0}],
            "note": "Synthetic one-level book derived from the mid price.",
        }))
    }

    /// Open orders for the configured account.
    pub async fn open_orders(&self) -> Result<Vec<OrderSummary>, TradeError> {
        let address = self.account()?;
        Ok(self.markets.open_orders(address).await?)
    }

    /// Names of all tradable perpetual instruments.
    pub async fn perpetual_markets(&self) -> Result<Vec<String>, ApiError> {
        self.markets.perpetual_symbols().await
    }
}
