//! Hyperliquid Tools — Entry Point
//!
//! Initializes configuration, logging, the signing identity, and the
//! exchange gateways, then serves the tool protocol over stdio until
//! EOF or SIGINT.
//!
//! Wiring sequence:
//! 1. Init tracing on stderr (stdout belongs to the tool protocol)
//! 2. Load settings from env vars + validate
//! 3. Resolve signing identity (missing/bad key → reads-only mode)
//! 4. Create shared HTTP client (timeout + bounded read retries)
//! 5. Create info gateway (MarketData port)
//! 6. Connect exchange gateway (OrderExecution port, needs identity)
//! 7. Build trading/market façades and the tool router
//! 8. Serve JSON lines on stdio until EOF or SIGINT

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use hyperliquid_tools::adapters::api::{ApiClient, ExchangeGateway, InfoGateway, SigningIdentity};
use hyperliquid_tools::config::loader::load_settings;
use hyperliquid_tools::server::{ToolRouter, stdio};
use hyperliquid_tools::usecases::{MarketDesk, TradingDesk};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Structured logging on stderr only ────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    // ── 2. Load configuration from env vars ─────────────────
    let settings = load_settings().context("Failed to load configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        network = %settings.network,
        timeout_ms = settings.timeout_ms,
        "Starting Hyperliquid tool server"
    );

    // ── 3. Resolve signing identity (optional) ──────────────
    let identity = SigningIdentity::resolve(settings.private_key.as_deref()).map(Arc::new);
    let address = identity.as_ref().map(|id| id.address());

    // ── 4. Shared HTTP client ───────────────────────────────
    let client = Arc::new(ApiClient::new(&settings).context("Failed to create HTTP client")?);

    // ── 5. Info gateway (MarketData port) ───────────────────
    let info_gateway = Arc::new(InfoGateway::new(Arc::clone(&client)));

    // ── 6. Exchange gateway (OrderExecution port) ───────────
    // A startup failure here disables trading but never kills the
    // process: reads must survive a flaky exchange.
    let exchange_gateway = match &identity {
        Some(identity) => {
            match ExchangeGateway::connect(
                Arc::clone(&client),
                Arc::clone(identity),
                settings.network,
            )
            .await
            {
                Ok(gateway) => Some(Arc::new(gateway)),
                Err(e) => {
                    warn!(error = %e, "Exchange gateway unavailable - trading tools disabled");
                    None
                }
            }
        }
        None => None,
    };

    // ── 7. Façades and router ───────────────────────────────
    let trading = Arc::new(TradingDesk::new(
        Arc::clone(&info_gateway),
        exchange_gateway,
        address.unwrap_or_default(),
    ));
    let markets = Arc::new(MarketDesk::new(Arc::clone(&info_gateway), address));
    let router = ToolRouter::new(Arc::clone(&trading), markets);

    info!(
        trading_enabled = trading.trading_enabled(),
        "Tool server ready"
    );

    // ── 8. Serve stdio until EOF or SIGINT ──────────────────
    tokio::select! {
        result = stdio::serve(&router) => {
            result.context("Stdio transport failed")?;
        }
        _ = signal::ctrl_c() => {
            info!("SIGINT received, shutting down");
        }
    }

    info!("Shutdown complete");
    Ok(())
}
