//! Hyperliquid Wire Types
//!
//! Request/response structs for the `/info` and `/exchange` endpoints.
//! Exchange actions use the protocol's compact field names (`a`, `b`,
//! `p`, `s`, `r`, `t`, `c`); declaration order matters because the
//! msgpack action hash covers fields in order.

use alloy::primitives::{Address, PrimitiveSignature as Signature};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::ports::{ExchangeAck, StatusReport};

// ────────────────────────────────────────────
// /info requests and responses
// ────────────────────────────────────────────

/// Typed request bodies for POST /info.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum InfoRequest {
    /// Full mid-price map: symbol → price string.
    AllMids,
    /// User's clearinghouse state (balances, margin, positions).
    #[serde(rename = "clearinghouseState")]
    UserState { user: Address },
    /// User's open orders.
    OpenOrders { user: Address },
    /// Perp universe metadata.
    Meta,
}

/// Perp universe metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub universe: Vec<AssetMeta>,
}

/// One perpetual instrument in the universe.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMeta {
    pub name: String,
    pub sz_decimals: u32,
    #[serde(default)]
    pub is_delisted: Option<bool>,
}

/// One open order as returned by the openOrders query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrderWire {
    pub coin: String,
    pub limit_px: String,
    pub oid: u64,
    pub side: String,
    pub sz: String,
    pub timestamp: u64,
}

// ────────────────────────────────────────────
// /exchange actions
// ────────────────────────────────────────────

/// Order payload in protocol field order. Field order is part of the
/// signed action hash - do not reorder.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWire {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "b")]
    pub is_buy: bool,
    #[serde(rename = "p")]
    pub limit_px: String,
    #[serde(rename = "s")]
    pub sz: String,
    #[serde(rename = "r")]
    pub reduce_only: bool,
    #[serde(rename = "t")]
    pub order_type: OrderTypeWire,
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

/// Order type tag. Only limit orders are reachable here; market intent
/// is expressed as an aggressive Ioc limit upstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderTypeWire {
    Limit { tif: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkOrderWire {
    pub orders: Vec<OrderWire>,
    pub grouping: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelWire {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "o")]
    pub oid: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkCancelWire {
    pub cancels: Vec<CancelWire>,
}

/// Signed L1 actions supported by this adapter.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum ActionWire {
    Order(BulkOrderWire),
    Cancel(BulkCancelWire),
}

fn serialize_sig<S>(sig: &Signature, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut state = s.serialize_struct("Signature", 3)?;
    state.serialize_field("r", &sig.r())?;
    state.serialize_field("s", &sig.s())?;
    state.serialize_field("v", &(27 + sig.v() as u64))?;
    state.end()
}

/// Envelope posted to /exchange.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePayload {
    pub action: serde_json::Value,
    #[serde(serialize_with = "serialize_sig")]
    pub signature: Signature,
    pub nonce: u64,
    /// Always null here - multi-account vaults are out of scope.
    pub vault_address: Option<String>,
}

// ────────────────────────────────────────────
// /exchange responses
// ────────────────────────────────────────────

/// Raw exchange acknowledgement envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeResponseWire {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub response: Option<ResponseEnvelope>,
}

/// The `response` field is a body on success and a bare error string
/// when the whole payload was rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Body(ResponseBody),
    Message(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseData {
    #[serde(default)]
    pub statuses: Vec<StatusWire>,
}

/// Per-order status: either a bare note ("success", "waitingForFill")
/// or a detail object carrying error/resting/filled fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StatusWire {
    Note(String),
    Detail(StatusDetailWire),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusDetailWire {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub resting: Option<RestingWire>,
    #[serde(default)]
    pub filled: Option<FilledWire>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestingWire {
    pub oid: u64,
    #[serde(default)]
    pub cloid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledWire {
    pub oid: u64,
    pub total_sz: String,
    pub avg_px: String,
}

impl From<ExchangeResponseWire> for ExchangeAck {
    fn from(wire: ExchangeResponseWire) -> Self {
        let ok = wire.status.as_deref() == Some("ok");

        let (top_error, tx_hash, statuses) = match wire.response {
            Some(ResponseEnvelope::Message(message)) => (Some(message), None, Vec::new()),
            Some(ResponseEnvelope::Body(body)) => {
                let statuses = body
                    .data
                    .map(|data| data.statuses.into_iter().map(StatusReport::from).collect())
                    .unwrap_or_default();
                (None, body.hash, statuses)
            }
            None => (None, None, Vec::new()),
        };

        Self {
            ok,
            top_error,
            tx_hash,
            statuses,
        }
    }
}

impl From<StatusWire> for StatusReport {
    fn from(wire: StatusWire) -> Self {
        match wire {
            StatusWire::Note(note) => Self::Accepted(note),
            StatusWire::Detail(detail) => {
                if let Some(error) = detail.error {
                    Self::Rejected(error)
                } else if let Some(resting) = detail.resting {
                    Self::Resting {
                        order_id: resting.oid,
                        cloid: resting.cloid,
                    }
                } else if let Some(filled) = detail.filled {
                    Self::Filled {
                        order_id: filled.oid,
                        total_size: filled.total_sz.parse().unwrap_or(0.0),
                        avg_price: filled.avg_px.parse().unwrap_or(0.0),
                    }
                } else {
                    Self::Accepted("unknown".to_string())
                }
            }
        }
    }
}
