//! Core order domain types.
//!
//! Requests are transient — constructed per tool call, validated before any
//! upstream contact, and never persisted. Outcomes are derived entirely from
//! one upstream response and carry no lifecycle beyond the call.

use serde::{Deserialize, Serialize};

use crate::errors::TradeError;

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Map the exchange's single-letter side code: 'B' is a buy,
    /// anything else is a sell.
    pub fn from_wire_code(code: &str) -> Self {
        if code == "B" { Self::Buy } else { Self::Sell }
    }

    pub const fn from_is_buy(is_buy: bool) -> Self {
        if is_buy { Self::Buy } else { Self::Sell }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// How long an unfilled limit order remains active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-til-canceled: rests on the book until filled or cancelled.
    Gtc,
    /// Immediate-or-cancel: unfilled remainder is cancelled.
    Ioc,
    /// Add-liquidity-only: rejected instead of crossing the book.
    Alo,
}

impl TimeInForce {
    /// Wire representation expected by the exchange order payload.
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Gtc => "Gtc",
            Self::Ioc => "Ioc",
            Self::Alo => "Alo",
        }
    }
}

impl std::str::FromStr for TimeInForce {
    type Err = TradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gtc" => Ok(Self::Gtc),
            "ioc" => Ok(Self::Ioc),
            "alo" => Ok(Self::Alo),
            other => Err(TradeError::InvalidOrder(format!(
                "time_in_force must be one of Gtc, Ioc, Alo (got {other:?})"
            ))),
        }
    }
}

/// Market-intent order: filled immediately at a bounded limit price
/// derived from the current mid.
#[derive(Debug, Clone)]
pub struct MarketOrderRequest {
    pub symbol: String,
    pub is_buy: bool,
    pub size: f64,
    pub reduce_only: bool,
}

impl MarketOrderRequest {
    pub fn validate(&self) -> Result<(), TradeError> {
        ensure_symbol(&self.symbol)?;
        ensure_positive(self.size, "size")
    }
}

/// Limit order at an explicit price and time-in-force.
#[derive(Debug, Clone)]
pub struct LimitOrderRequest {
    pub symbol: String,
    pub is_buy: bool,
    pub size: f64,
    pub limit_price: f64,
    pub tif: TimeInForce,
    pub reduce_only: bool,
}

impl LimitOrderRequest {
    pub fn validate(&self) -> Result<(), TradeError> {
        ensure_symbol(&self.symbol)?;
        ensure_positive(self.size, "size")?;
        ensure_positive(self.limit_price, "limit_price")
    }
}

/// Single-order cancellation.
#[derive(Debug, Clone)]
pub struct CancelRequest {
    pub symbol: String,
    pub order_id: u64,
}

impl CancelRequest {
    pub fn validate(&self) -> Result<(), TradeError> {
        ensure_symbol(&self.symbol)?;
        if self.order_id == 0 {
            return Err(TradeError::InvalidOrder(
                "order_id must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

fn ensure_symbol(symbol: &str) -> Result<(), TradeError> {
    if symbol.trim().is_empty() {
        return Err(TradeError::InvalidOrder("symbol must not be empty".to_string()));
    }
    Ok(())
}

fn ensure_positive(value: f64, field: &str) -> Result<(), TradeError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TradeError::InvalidOrder(format!(
            "{field} must be strictly positive (got {value})"
        )));
    }
    Ok(())
}

/// Terminal status of one write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failed,
    Warning,
}

/// Result of one write operation, reshaped from the upstream response.
#[derive(Debug, Clone, Serialize)]
pub struct OrderOutcome {
    pub status: OutcomeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Upstream rejection detail, surfaced verbatim. Present when the
    /// transaction was accepted but the order itself was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_error: Option<String>,
}

impl OrderOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_status(OutcomeStatus::Success, message)
    }

    pub fn failed(exchange_error: impl Into<String>) -> Self {
        let detail = exchange_error.into();
        let mut outcome = Self::with_status(OutcomeStatus::Failed, "Order rejected by exchange.");
        outcome.exchange_error = Some(detail);
        outcome
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_status(OutcomeStatus::Warning, message)
    }

    fn with_status(status: OutcomeStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            side: None,
            size: None,
            order_id: None,
            cloid: None,
            tx_hash: None,
            exchange_error: None,
        }
    }
}

/// One open order, normalized from the exchange's open-orders listing.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub symbol: String,
    pub order_id: u64,
    pub side: Side,
    pub limit_price: f64,
    pub size: f64,
    pub timestamp_ms: u64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_side_wire_code_mapping() {
        assert_eq!(Side::from_wire_code("B"), Side::Buy);
        assert_eq!(Side::from_wire_code("A"), Side::Sell);
        assert_eq!(Side::from_wire_code("S"), Side::Sell);
        assert_eq!(Side::from_wire_code(""), Side::Sell);
    }

    #[test]
    fn test_side_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"SELL\"");
    }

    #[test]
    fn test_tif_parsing_is_case_insensitive() {
        assert_eq!(TimeInForce::from_str("GTC").unwrap(), TimeInForce::Gtc);
        assert_eq!(TimeInForce::from_str("ioc").unwrap(), TimeInForce::Ioc);
        assert_eq!(TimeInForce::from_str("Alo").unwrap(), TimeInForce::Alo);
        assert!(TimeInForce::from_str("fok").is_err());
    }

    #[test]
    fn test_market_order_rejects_non_positive_size() {
        let mut req = MarketOrderRequest {
            symbol: "BTC".to_string(),
            is_buy: true,
            size: 0.0,
            reduce_only: false,
        };
        assert!(req.validate().is_err());

        req.size = -1.5;
        assert!(req.validate().is_err());

        req.size = f64::NAN;
        assert!(req.validate().is_err());

        req.size = 0.1;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_limit_order_rejects_zero_price() {
        let req = LimitOrderRequest {
            symbol: "ETH".to_string(),
            is_buy: false,
            size: 1.0,
            limit_price: 0.0,
            tif: TimeInForce::Gtc,
            reduce_only: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_cancel_requires_positive_order_id() {
        let req = CancelRequest {
            symbol: "BTC".to_string(),
            order_id: 0,
        };
        assert!(req.validate().is_err());

        let req = CancelRequest {
            symbol: "BTC".to_string(),
            order_id: 42,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_outcome_serialization_skips_absent_fields() {
        let outcome = OrderOutcome::warning("nothing to cancel");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "warning");
        assert!(json.get("tx_hash").is_none());
        assert!(json.get("exchange_error").is_none());
    }

    #[test]
    fn test_failed_outcome_carries_exchange_error() {
        let outcome = OrderOutcome::failed("Insufficient margin");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["exchange_error"], "Insufficient margin");
    }
}
