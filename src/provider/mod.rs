//! Spot-price provider wire format.
//!
//! The provider speaks JSON-RPC 2.0 over a single POST endpoint. Prices come
//! back as parallel `datum`/`wert` arrays of German-formatted strings, which
//! [`parse`] turns into a [`PriceSeries`](crate::series::PriceSeries).

#[cfg(feature = "fetch")]
pub mod client;
pub mod parse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default provider endpoint.
pub const DEFAULT_URL: &str = "https://mein.green-planet-energy.de/p2";
/// JSON-RPC method returning hourly consumption prices.
pub const PRICE_METHOD: &str = "getVerbrauchspreisUndWindsignal";
/// Request id the provider's own portal sends.
pub const DEFAULT_REQUEST_ID: u64 = 564;

/// JSON-RPC request for prices between two dates (inclusive).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    jsonrpc: &'static str,
    method: &'static str,
    params: RpcParams,
    id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct RpcParams {
    von: String,
    bis: String,
    aggregats_zeitraum: String,
    aggregats_typ: String,
    source: &'static str,
}

impl RpcRequest {
    /// Request covering `today` and the following day.
    pub fn today_and_tomorrow(today: NaiveDate, id: u64) -> Self {
        let tomorrow = today.succ_opt().unwrap_or(today);
        Self {
            jsonrpc: "2.0",
            method: PRICE_METHOD,
            params: RpcParams {
                von: today.format("%Y-%m-%d").to_string(),
                bis: tomorrow.format("%Y-%m-%d").to_string(),
                aggregats_zeitraum: String::new(),
                aggregats_typ: String::new(),
                source: "Portal",
            },
            id,
        }
    }
}

/// Top-level JSON-RPC response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcResponse {
    /// Payload; absent when the provider had nothing to return.
    #[serde(default)]
    pub result: Option<RpcResult>,
}

/// Price payload inside the response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcResult {
    /// Provider error code; 0 on success.
    #[serde(default)]
    pub error_code: i64,
    /// Provider error description.
    #[serde(default)]
    pub error_text: Option<String>,
    /// Timestamps such as `"04.08.25, 09:00 Uhr"`.
    #[serde(default)]
    pub datum: Vec<String>,
    /// Prices such as `"0,32"`, parallel to `datum`.
    #[serde(default)]
    pub wert: Vec<Value>,
}
