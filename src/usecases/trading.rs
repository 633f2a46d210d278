//! Trading Façade - Validated Writes over the Execution Port
//!
//! Every write follows the same shape: check the identity gate first
//! (a disabled process must never contact the exchange), validate the
//! request locally, derive any missing prices from fresh market data,
//! submit exactly once, and reshape the acknowledgement into a flat
//! outcome for the tool surface.

use std::sync::Arc;

use alloy::primitives::Address;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    CancelRequest, LimitOrderRequest, MarketOrderRequest, OrderOutcome, Side, TimeInForce,
};
use crate::errors::TradeError;
use crate::ports::{CancelTicket, ExchangeAck, LimitOrderTicket, MarketData, MidQuote, OrderExecution};

/// Aggressive bound applied to the mid when simulating market intent:
/// buys cap at mid * 1.05, sells floor at mid * 0.95. Wide enough to
/// cross the book, tight enough to bound slippage on a thin market.
const MARKET_SLIPPAGE: f64 = 0.05;

/// Write-side façade. `exchange` is `None` for the whole process
/// lifetime when no valid signing identity was configured.
pub struct TradingDesk<M, X> {
    markets: Arc<M>,
    exchange: Option<Arc<X>>,
    address: Address,
}

impl<M, X> TradingDesk<M, X>
where
    M: MarketData,
    X: OrderExecution,
{
    pub fn new(markets: Arc<M>, exchange: Option<Arc<X>>, address: Address) -> Self {
        Self {
            markets,
            exchange,
            address,
        }
    }

    pub fn trading_enabled(&self) -> bool {
        self.exchange.is_some()
    }

    fn armed(&self) -> Result<&Arc<X>, TradeError> {
        self.exchange.as_ref().ok_or(TradeError::Disabled)
    }

    /// Submit market intent as an aggressive Ioc limit anchored at the
    /// current mid.
    pub async fn execute_market_order(
        &self,
        request: MarketOrderRequest,
    ) -> Result<OrderOutcome, TradeError> {
        let exchange = self.armed()?;
        request.validate()?;

        let mid = match self.markets.mid_price(&request.symbol).await? {
            MidQuote::Price(mid) if mid > 0.0 => mid,
            _ => {
                return Err(TradeError::NoMarketPrice {
                    symbol: request.symbol.clone(),
                });
            }
        };

        let ticket = LimitOrderTicket {
            symbol: request.symbol.clone(),
            is_buy: request.is_buy,
            size: request.size,
            limit_price: market_limit_price(mid, request.is_buy),
            tif: TimeInForce::Ioc,
            reduce_only: request.reduce_only,
            cloid: Some(new_cloid()),
        };

        let side = Side::from_is_buy(request.is_buy);
        info!(
            symbol = %request.symbol,
            %side,
            size = request.size,
            mid,
            "Submitting market order"
        );

        let ack = exchange.place_limit(&ticket).await?;
        Ok(interpret_order_ack(ack, side, request.size, ticket.cloid))
    }

    /// Submit a limit order at the caller's explicit price.
    pub async fn place_limit_order(
        &self,
        request: LimitOrderRequest,
    ) -> Result<OrderOutcome, TradeError> {
        let exchange = self.armed()?;
        request.validate()?;

        let ticket = LimitOrderTicket {
            symbol: request.symbol.clone(),
            is_buy: request.is_buy,
            size: request.size,
            limit_price: request.limit_price,
            tif: request.tif,
            reduce_only: request.reduce_only,
            cloid: Some(new_cloid()),
        };

        let side = Side::from_is_buy(request.is_buy);
        info!(
            symbol = %request.symbol,
            %side,
            size = request.size,
            limit_price = request.limit_price,
            tif = ticket.tif.as_wire(),
            "Submitting limit order"
        );

        let ack = exchange.place_limit(&ticket).await?;
        Ok(interpret_order_ack(ack, side, request.size, ticket.cloid))
    }

    /// Cancel one order by exchange order id.
    pub async fn cancel_order_by_id(
        &self,
        request: CancelRequest,
    ) -> Result<OrderOutcome, TradeError> {
        let exchange = self.armed()?;
        request.validate()?;

        let ticket = CancelTicket {
            symbol: request.symbol.clone(),
            order_id: request.order_id,
        };
        let ack = exchange.cancel_orders(std::slice::from_ref(&ticket)).await?;

        if let Some(error) = top_failure(&ack) {
            return Ok(OrderOutcome::failed(error));
        }

        let mut outcome = OrderOutcome::success(format!(
            "Cancellation submitted for order {}.",
            request.order_id
        ));
        outcome.order_id = Some(request.order_id);
        outcome.tx_hash = ack.tx_hash;
        Ok(outcome)
    }

    /// Cancel every open order on the account in one bulk action.
    ///
    /// An empty book is a warning, not an error, and costs no exchange
    /// call at all.
    pub async fn cancel_all_orders(&self) -> Result<OrderOutcome, TradeError> {
        let exchange = self.armed()?;

        let open = self.markets.open_orders(self.address).await?;
        if open.is_empty() {
            return Ok(OrderOutcome::warning("No open orders to cancel."));
        }

        let cancels: Vec<CancelTicket> = open
            .iter()
            .map(|order| CancelTicket {
                symbol: order.symbol.clone(),
                order_id: order.order_id,
            })
            .collect();

        info!(count = cancels.len(), "Cancelling all open orders");
        let ack = exchange.cancel_orders(&cancels).await?;

        if let Some(error) = top_failure(&ack) {
            return Ok(OrderOutcome::failed(error));
        }

        if ack.tx_hash.is_none() {
            warn!("Bulk cancel acknowledged without a transaction hash");
            return Ok(OrderOutcome::warning(format!(
                "Cancellation of {} orders submitted, but no transaction hash was returned.",
                cancels.len()
            )));
        }

        let mut outcome =
            OrderOutcome::success(format!("Cancelled {} open orders.", cancels.len()));
        outcome.tx_hash = ack.tx_hash;
        Ok(outcome)
    }
}

/// Bounding limit price for simulated market intent.
pub(crate) fn market_limit_price(mid: f64, is_buy: bool) -> f64 {
    if is_buy {
        mid * (1.0 + MARKET_SLIPPAGE)
    } else {
        mid * (1.0 - MARKET_SLIPPAGE)
    }
}

/// Client order id: 128-bit hex with 0x prefix, as the exchange expects.
fn new_cloid() -> String {
    format!("0x{}", Uuid::new_v4().simple())
}

fn top_failure(ack: &ExchangeAck) -> Option<String> {
    if !ack.ok {
        return Some(
            ack.top_error
                .clone()
                .unwrap_or_else(|| "Exchange rejected the request.".to_string()),
        );
    }
    ack.first_error().map(str::to_string)
}

/// Flatten an exchange acknowledgement into one tool-facing outcome.
///
/// An HTTP 200 with an embedded `statuses[0].error` is a FAILED order;
/// the upstream detail is carried verbatim in `exchange_error`.
fn interpret_order_ack(
    ack: ExchangeAck,
    side: Side,
    size: f64,
    cloid: Option<String>,
) -> OrderOutcome {
    if let Some(error) = top_failure(&ack) {
        return OrderOutcome::failed(error);
    }

    let mut outcome = if let Some((order_id, total_size, avg_price)) = ack.first_fill() {
        let mut outcome = OrderOutcome::success(format!(
            "Order filled: {total_size} @ {avg_price}."
        ));
        outcome.order_id = Some(order_id);
        outcome
    } else if let Some(order_id) = ack.resting_order_id() {
        let mut outcome = OrderOutcome::success("Order placed and resting on the book.");
        outcome.order_id = Some(order_id);
        outcome
    } else {
        OrderOutcome::success("Order submitted.")
    };

    outcome.side = Some(side);
    outcome.size = Some(size);
    outcome.cloid = cloid;
    outcome.tx_hash = ack.tx_hash;
    outcome
}

#[cfg(test)]
mod tests {
    use crate::domain::OutcomeStatus;
    use crate::ports::StatusReport;

    use super::*;

    #[test]
    fn test_market_limit_price_bounds() {
        assert!((market_limit_price(100.0, true) - 105.0).abs() < 1e-9);
        assert!((market_limit_price(100.0, false) - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_cloid_shape() {
        let cloid = new_cloid();
        assert!(cloid.starts_with("0x"));
        assert_eq!(cloid.len(), 34);
        assert!(cloid[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_embedded_rejection_becomes_failed_outcome() {
        let ack = ExchangeAck {
            ok: true,
            top_error: None,
            tx_hash: None,
            statuses: vec![StatusReport::Rejected("Insufficient margin".to_string())],
        };
        let outcome = interpret_order_ack(ack, Side::Buy, 0.5, None);

        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(outcome.exchange_error.as_deref(), Some("Insufficient margin"));
    }

    #[test]
    fn test_resting_ack_becomes_success_with_order_id() {
        let ack = ExchangeAck {
            ok: true,
            top_error: None,
            tx_hash: Some("0xabc".to_string()),
            statuses: vec![StatusReport::Resting {
                order_id: 77_321,
                cloid: None,
            }],
        };
        let outcome = interpret_order_ack(ack, Side::Sell, 2.0, Some("0xcl".to_string()));

        assert_eq!(outcome.status, OutcomeStatus::Success);
        assert_eq!(outcome.order_id, Some(77_321));
        assert_eq!(outcome.side, Some(Side::Sell));
        assert_eq!(outcome.tx_hash.as_deref(), Some("0xabc"));
    }

    #[test]
    fn test_top_level_rejection_becomes_failed_outcome() {
        let ack = ExchangeAck {
            ok: false,
            top_error: Some("User or API Wallet does not exist.".to_string()),
            tx_hash: None,
            statuses: Vec::new(),
        };
        let outcome = interpret_order_ack(ack, Side::Buy, 1.0, None);

        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(
            outcome.exchange_error.as_deref(),
            Some("User or API Wallet does not exist.")
        );
    }
}
