//! Hyperliquid REST API Adapter
//!
//! Everything that touches the exchange over HTTP lives here:
//! - `client` - shared reqwest wrapper (timeouts, read-only retries)
//! - `identity` - private key resolution and nonce generation
//! - `signing` - L1 action hashing and phantom-agent EIP-712 signatures
//! - `types` - wire request/response structs
//! - `info` - MarketData port implementation over POST /info
//! - `exchange` - OrderExecution port implementation over POST /exchange

pub mod client;
pub mod exchange;
pub mod identity;
pub mod info;
pub mod signing;
pub mod types;

pub use client::ApiClient;
pub use exchange::ExchangeGateway;
pub use identity::SigningIdentity;
pub use info::InfoGateway;
