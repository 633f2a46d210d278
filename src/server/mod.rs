//! Tool Surface - Catalog and Dispatch
//!
//! The outward face of the process: a fixed catalog of named tools and
//! a router that maps one invocation to one façade call. Handlers never
//! panic and never leak typed errors - every failure degrades to a
//! structured `{"error": …}` payload so the caller always gets JSON.

pub mod stdio;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::domain::{CancelRequest, LimitOrderRequest, MarketOrderRequest, TimeInForce};
use crate::errors::TradeError;
use crate::ports::{MarketData, OrderExecution};
use crate::usecases::{MarketDesk, TradingDesk};

/// One entry in the tool catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn no_args_schema() -> Value {
    json!({"type": "object", "properties": {}, "required": []})
}

fn symbol_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "symbol": {"type": "string", "description": "Perpetual symbol, e.g. BTC"}
        },
        "required": ["symbol"]
    })
}

/// The fixed tool catalog this process serves.
pub fn tool_catalog() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "get_user_state",
            description: "Account snapshot: balances, margin, and open positions.",
            input_schema: no_args_schema(),
        },
        ToolDef {
            name: "get_mid_price",
            description: "Current mid price for a symbol. Returns 0 if the symbol is \
                          unknown, -1 if the upstream payload is malformed, -2 if the \
                          price entry cannot be parsed.",
            input_schema: symbol_schema(),
        },
        ToolDef {
            name: "get_order_book",
            description: "Approximate one-level order book derived from the mid price.",
            input_schema: symbol_schema(),
        },
        ToolDef {
            name: "get_open_orders",
            description: "All open orders on the configured account.",
            input_schema: no_args_schema(),
        },
        ToolDef {
            name: "get_all_perpetual_markets",
            description: "Names of every tradable perpetual contract.",
            input_schema: no_args_schema(),
        },
        ToolDef {
            name: "execute_market_order",
            description: "Buy or sell at market, simulated as an aggressive \
                          immediate-or-cancel limit order.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "symbol": {"type": "string"},
                    "is_buy": {"type": "boolean"},
                    "size": {"type": "number", "exclusiveMinimum": 0},
                    "reduce_only": {"type": "boolean", "default": false}
                },
                "required": ["symbol", "is_buy", "size"]
            }),
        },
        ToolDef {
            name: "place_limit_order",
            description: "Place a limit order at an explicit price.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "symbol": {"type": "string"},
                    "is_buy": {"type": "boolean"},
                    "size": {"type": "number", "exclusiveMinimum": 0},
                    "limit_price": {"type": "number", "exclusiveMinimum": 0},
                    "time_in_force": {"type": "string", "enum": ["Gtc", "Ioc", "Alo"], "default": "Gtc"},
                    "reduce_only": {"type": "boolean", "default": false}
                },
                "required": ["symbol", "is_buy", "size", "limit_price"]
            }),
        },
        ToolDef {
            name: "cancel_all_orders",
            description: "Cancel every open order on the account in one bulk action.",
            input_schema: no_args_schema(),
        },
        ToolDef {
            name: "cancel_order_by_id",
            description: "Cancel one order by symbol and exchange order id.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "symbol": {"type": "string"},
                    "order_id": {"type": "integer", "minimum": 1}
                },
                "required": ["symbol", "order_id"]
            }),
        },
    ]
}

/// Routes tool invocations to the façades.
pub struct ToolRouter<M, X> {
    trading: Arc<TradingDesk<M, X>>,
    markets: Arc<MarketDesk<M>>,
}

impl<M, X> ToolRouter<M, X>
where
    M: MarketData,
    X: OrderExecution,
{
    pub fn new(trading: Arc<TradingDesk<M, X>>, markets: Arc<MarketDesk<M>>) -> Self {
        Self { trading, markets }
    }

    /// Dispatch one tool call. Always returns a JSON value; failures
    /// come back as `{"error": …}`.
    pub async fn dispatch(&self, name: &str, args: &Value) -> Value {
        debug!(tool = name, "Dispatching tool call");
        match self.call(name, args).await {
            Ok(value) => value,
            Err(message) => {
                error!(tool = name, %message, "Tool call failed");
                json!({"error": message})
            }
        }
    }

    async fn call(&self, name: &str, args: &Value) -> Result<Value, String> {
        match name {
            "get_user_state" => self.markets.user_state().await.map_err(stringify),
            "get_mid_price" => {
                let symbol = require_str(args, "symbol")?;
                let price = self
                    .markets
                    .mid_price_numeric(symbol)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(json!(price))
            }
            "get_order_book" => {
                let symbol = require_str(args, "symbol")?;
                self.markets
                    .order_book(symbol)
                    .await
                    .map_err(|e| e.to_string())
            }
            "get_open_orders" => {
                let orders = self.markets.open_orders().await.map_err(stringify)?;
                Ok(json!({
                    "status": "success",
                    "message": format!("{} open orders.", orders.len()),
                    "orders": orders,
                }))
            }
            "get_all_perpetual_markets" => {
                let contracts = self
                    .markets
                    .perpetual_markets()
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(json!({
                    "status": "success",
                    "message": format!("{} tradable perpetual contracts.", contracts.len()),
                    "perpetual_contracts": contracts,
                }))
            }
            "execute_market_order" => {
                let request = MarketOrderRequest {
                    symbol: require_str(args, "symbol")?.to_string(),
                    is_buy: require_bool(args, "is_buy")?,
                    size: require_f64(args, "size")?,
                    reduce_only: optional_bool(args, "reduce_only"),
                };
                let outcome = self
                    .trading
                    .execute_market_order(request)
                    .await
                    .map_err(stringify)?;
                serde_json::to_value(outcome).map_err(|e| e.to_string())
            }
            "place_limit_order" => {
                let tif = match args.get("time_in_force").and_then(Value::as_str) {
                    Some(raw) => raw.parse::<TimeInForce>().map_err(stringify)?,
                    None => TimeInForce::Gtc,
                };
                let request = LimitOrderRequest {
                    symbol: require_str(args, "symbol")?.to_string(),
                    is_buy: require_bool(args, "is_buy")?,
                    size: require_f64(args, "size")?,
                    limit_price: require_f64(args, "limit_price")?,
                    tif,
                    reduce_only: optional_bool(args, "reduce_only"),
                };
                let outcome = self
                    .trading
                    .place_limit_order(request)
                    .await
                    .map_err(stringify)?;
                serde_json::to_value(outcome).map_err(|e| e.to_string())
            }
            "cancel_all_orders" => {
                let outcome = self.trading.cancel_all_orders().await.map_err(stringify)?;
                serde_json::to_value(outcome).map_err(|e| e.to_string())
            }
            "cancel_order_by_id" => {
                let request = CancelRequest {
                    symbol: require_str(args, "symbol")?.to_string(),
                    order_id: require_u64(args, "order_id")?,
                };
                let outcome = self
                    .trading
                    .cancel_order_by_id(request)
                    .await
                    .map_err(stringify)?;
                serde_json::to_value(outcome).map_err(|e| e.to_string())
            }
            other => Err(format!("unknown tool: {other}")),
        }
    }
}

fn stringify(error: TradeError) -> String {
    error.to_string()
}

fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing or non-string argument: {key}"))
}

fn require_bool(args: &Value, key: &str) -> Result<bool, String> {
    args.get(key)
        .and_then(Value::as_bool)
        .ok_or_else(|| format!("missing or non-boolean argument: {key}"))
}

fn require_f64(args: &Value, key: &str) -> Result<f64, String> {
    args.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| format!("missing or non-numeric argument: {key}"))
}

fn require_u64(args: &Value, key: &str) -> Result<u64, String> {
    args.get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| format!("missing or non-integer argument: {key}"))
}

fn optional_bool(args: &Value, key: &str) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(false)
}
