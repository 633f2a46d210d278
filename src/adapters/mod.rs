//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits with concrete Hyperliquid HTTP
//! integrations: the shared REST client, the signing identity, and
//! the info/exchange gateways.

pub mod api;
