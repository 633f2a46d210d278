//! Market Data Port - Read-only Exchange Queries
//!
//! Every operation is side-effect-free beyond the network call and is
//! fetched fresh on each invocation - the staleness window is zero by
//! design, so there is no caching layer behind this trait.

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::domain::OrderSummary;
use crate::errors::ApiError;

/// Outcome of a mid-price lookup.
///
/// An absent symbol is a normal answer, not an error: callers that need
/// a numeric wire protocol map `Unknown` to 0 at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MidQuote {
    /// Midpoint between best bid and best ask.
    Price(f64),
    /// Symbol has no entry in the current mid-price map.
    Unknown,
}

/// Trait for read-only market data providers.
#[async_trait]
pub trait MarketData: Send + Sync + 'static {
    /// Look up the current mid price for a symbol (normalized to
    /// uppercase before the lookup).
    ///
    /// # Errors
    /// `UnexpectedShape` if the upstream mid map is not map-shaped,
    /// `BadPrice` if the entry cannot be parsed as a number.
    async fn mid_price(&self, symbol: &str) -> Result<MidQuote, ApiError>;

    /// Account snapshot (balances, margin, positions) passed through
    /// without local interpretation.
    async fn user_state(&self, address: Address) -> Result<serde_json::Value, ApiError>;

    /// Open orders for an address, normalized to domain summaries.
    async fn open_orders(&self, address: Address) -> Result<Vec<OrderSummary>, ApiError>;

    /// Names of all tradable perpetual instruments.
    async fn perpetual_symbols(&self) -> Result<Vec<String>, ApiError>;
}
