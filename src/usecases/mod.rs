//! Use Cases - Trading and Market Data Façades
//!
//! Orchestration between the tool surface and the exchange ports.
//! These types own validation, market-price derivation, disabled-state
//! short-circuiting, and response interpretation; they never touch HTTP
//! or signing directly.

pub mod markets;
pub mod trading;

pub use markets::MarketDesk;
pub use trading::TradingDesk;
