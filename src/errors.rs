//! Fault taxonomy for upstream calls and order submission.
//!
//! `ApiError` covers everything that can go wrong talking to the exchange
//! (transport, HTTP status, payload shape, signing). `TradeError` adds the
//! façade-level rejections that never reach the network. Tool handlers catch
//! both and degrade to a structured `{"error": …}` payload; nothing past
//! startup is allowed to crash the process.

use thiserror::Error;

/// Errors from the Hyperliquid HTTP API adapters.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Network/client failure before an HTTP status was obtained.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the exchange.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Upstream returned a payload whose shape does not match the endpoint.
    #[error("unexpected upstream payload shape: {0}")]
    UnexpectedShape(&'static str),

    /// Upstream response could not be decoded into the expected type.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    /// A price value in the mid-price map could not be parsed as a number.
    #[error("unparsable price for {symbol}: {raw:?}")]
    BadPrice { symbol: String, raw: String },

    /// Symbol has no entry in the exchange asset universe.
    #[error("unknown asset: {0}")]
    UnknownAsset(String),

    /// Action hashing or ECDSA signing failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Errors surfaced by the order façade.
#[derive(Debug, Error)]
pub enum TradeError {
    /// No valid signing identity - all write operations are disabled
    /// for the lifetime of the process.
    #[error("Trading is disabled. Private key is invalid or missing.")]
    Disabled,

    /// Request failed local validation; the upstream was never contacted.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// No positive mid price is available to anchor a market order.
    #[error("Could not retrieve valid market price for {symbol}.")]
    NoMarketPrice { symbol: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}
