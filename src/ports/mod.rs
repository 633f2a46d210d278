//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) the usecases layer depends on.
//! Adapters in `crate::adapters` provide the concrete Hyperliquid
//! implementations; tests substitute mockall doubles.

pub mod execution;
pub mod market_data;

pub use execution::{CancelTicket, ExchangeAck, LimitOrderTicket, OrderExecution, StatusReport};
pub use market_data::{MarketData, MidQuote};
