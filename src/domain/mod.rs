//! Domain layer - order requests, outcomes, and shared enums.
//!
//! Pure data and validation only; no I/O and no upstream knowledge
//! beyond the side-code convention normalized at the adapter boundary.

pub mod order;

pub use order::{
    CancelRequest, LimitOrderRequest, MarketOrderRequest, OrderOutcome, OrderSummary,
    OutcomeStatus, Side, TimeInForce,
};
