//! Order Execution Port - Signed Exchange Writes
//!
//! Defines the trait for submitting limit orders and cancellations to
//! the exchange. Implementors own asset-index resolution, wire
//! formatting, and L1 action signing; the façade above owns validation,
//! price derivation, and response interpretation.
//!
//! Write calls are NOT idempotent and must never be retried blindly -
//! a duplicate submission is a duplicate order.

use async_trait::async_trait;

use crate::domain::TimeInForce;
use crate::errors::ApiError;

/// Fully specified limit order handed to the execution adapter.
///
/// Market intent is expressed upstream of this type: the façade derives
/// a bounding limit price and submits it as an Ioc ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitOrderTicket {
    pub symbol: String,
    pub is_buy: bool,
    pub size: f64,
    pub limit_price: f64,
    pub tif: TimeInForce,
    pub reduce_only: bool,
    /// Client order id (uuid hex) for later reconciliation.
    pub cloid: Option<String>,
}

/// One order to cancel, addressed by symbol and exchange order id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelTicket {
    pub symbol: String,
    pub order_id: u64,
}

/// Per-order status entry embedded in an exchange acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusReport {
    /// Plain acknowledgement string ("success", "waitingForFill", ...).
    Accepted(String),
    /// Order accepted and resting on the book.
    Resting { order_id: u64, cloid: Option<String> },
    /// Order filled immediately.
    Filled {
        order_id: u64,
        total_size: f64,
        avg_price: f64,
    },
    /// Transaction accepted but this order was rejected logically.
    Rejected(String),
}

/// Parsed acknowledgement of one signed exchange request.
///
/// The network call succeeding does not mean the order succeeded:
/// callers must inspect the per-order status list.
#[derive(Debug, Clone, Default)]
pub struct ExchangeAck {
    /// Top-level request status ("ok" unless the whole payload failed).
    pub ok: bool,
    /// Top-level error text when the payload itself was rejected.
    pub top_error: Option<String>,
    /// Transaction hash, when the exchange returned one.
    pub tx_hash: Option<String>,
    /// Per-order statuses in submission order.
    pub statuses: Vec<StatusReport>,
}

impl ExchangeAck {
    /// First embedded rejection, if any. Mirrors the upstream convention
    /// of reporting a logical failure in `statuses[0].error`.
    pub fn first_error(&self) -> Option<&str> {
        self.statuses.iter().find_map(|status| match status {
            StatusReport::Rejected(error) => Some(error.as_str()),
            _ => None,
        })
    }

    /// Order id of the first resting entry (order did not fully fill).
    pub fn resting_order_id(&self) -> Option<u64> {
        self.statuses.iter().find_map(|status| match status {
            StatusReport::Resting { order_id, .. } => Some(*order_id),
            _ => None,
        })
    }

    /// Fill details of the first filled entry.
    pub fn first_fill(&self) -> Option<(u64, f64, f64)> {
        self.statuses.iter().find_map(|status| match status {
            StatusReport::Filled {
                order_id,
                total_size,
                avg_price,
            } => Some((*order_id, *total_size, *avg_price)),
            _ => None,
        })
    }
}

/// Trait for signed order execution providers.
#[async_trait]
pub trait OrderExecution: Send + Sync + 'static {
    /// Submit a single limit order.
    ///
    /// # Errors
    /// Returns an error only for transport, signing, or unknown-asset
    /// failures; logical rejections come back inside the ack.
    async fn place_limit(&self, ticket: &LimitOrderTicket) -> Result<ExchangeAck, ApiError>;

    /// Submit one bulk cancellation for the given orders.
    async fn cancel_orders(&self, cancels: &[CancelTicket]) -> Result<ExchangeAck, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_skips_accepted_entries() {
        let ack = ExchangeAck {
            ok: true,
            top_error: None,
            tx_hash: None,
            statuses: vec![
                StatusReport::Accepted("success".to_string()),
                StatusReport::Rejected("Insufficient margin".to_string()),
            ],
        };
        assert_eq!(ack.first_error(), Some("Insufficient margin"));
    }

    #[test]
    fn test_resting_order_id_extraction() {
        let ack = ExchangeAck {
            ok: true,
            top_error: None,
            tx_hash: Some("0xabc".to_string()),
            statuses: vec![StatusReport::Resting {
                order_id: 77_321,
                cloid: None,
            }],
        };
        assert_eq!(ack.resting_order_id(), Some(77_321));
        assert!(ack.first_fill().is_none());
    }
}
