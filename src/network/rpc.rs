//! JSON-RPC gateway to an Ethereum-compatible node
//!
//! Blocking HTTP transport with a fixed per-request timeout. Quantities
//! travel as `0x`-prefixed hex strings in both directions.

use alloy::primitives::{Address, B256, U256};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::gateway::{CallRequest, GatewayError, LedgerGateway};
use crate::core::{ReceiptStatus, TransactionReceipt};
use crate::crypto::hash::{hash_from_hex, hash_to_hex, strip_hex_prefix};

/// JSON-RPC request envelope
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// Receipt fields we read from `eth_getTransactionReceipt`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    gas_used: String,
    status: Option<String>,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::Decode(e.to_string())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

/// Ledger gateway speaking JSON-RPC 2.0 over HTTP
pub struct JsonRpcGateway {
    http: Client,
    url: String,
    next_id: AtomicU64,
}

impl std::fmt::Debug for JsonRpcGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcGateway")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl JsonRpcGateway {
    /// Create a gateway for `url` with a fixed request timeout
    pub fn new(url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this gateway talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    fn call(&self, method: &str, params: Value) -> Result<Value, GatewayError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        log::debug!("RPC {} -> {}", method, self.url);

        let response = self.http.post(&self.url).json(&request).send()?;
        let status = response.status();
        let body = response.text()?;

        let envelope: RpcResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                GatewayError::Decode(format!("{}: {}", method, e))
            } else {
                GatewayError::Transport(format!("{} returned HTTP {}", method, status))
            }
        })?;

        unwrap_envelope(envelope)
    }
}

impl LedgerGateway for JsonRpcGateway {
    fn balance(&self, address: Address) -> Result<U256, GatewayError> {
        let result = self.call("eth_getBalance", json!([address_param(&address), "latest"]))?;
        parse_u256(&result)
    }

    fn nonce(&self, address: Address) -> Result<u64, GatewayError> {
        let result = self.call(
            "eth_getTransactionCount",
            json!([address_param(&address), "pending"]),
        )?;
        parse_u64(&result)
    }

    fn suggest_fee_price(&self) -> Result<u128, GatewayError> {
        let result = self.call("eth_gasPrice", json!([]))?;
        parse_u128(&result)
    }

    fn network_id(&self) -> Result<u64, GatewayError> {
        let result = self.call("eth_chainId", json!([]))?;
        parse_u64(&result)
    }

    fn estimate_resource_limit(&self, request: &CallRequest) -> Result<u64, GatewayError> {
        let mut call = json!({
            "from": address_param(&request.from),
            "to": address_param(&request.to),
            "value": format!("0x{:x}", request.value),
        });
        if !request.data.is_empty() {
            call["data"] = json!(format!("0x{}", hex::encode(&request.data)));
        }

        let result = self.call("eth_estimateGas", json!([call]))?;
        parse_u64(&result)
    }

    fn submit(&self, raw_transaction: &[u8]) -> Result<(), GatewayError> {
        let raw = format!("0x{}", hex::encode(raw_transaction));
        self.call("eth_sendRawTransaction", json!([raw]))?;
        Ok(())
    }

    fn receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, GatewayError> {
        let result = self.call("eth_getTransactionReceipt", json!([hash_to_hex(&hash)]))?;
        decode_receipt(result)
    }
}

fn address_param(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

fn unwrap_envelope(envelope: RpcResponse) -> Result<Value, GatewayError> {
    if let Some(error) = envelope.error {
        return Err(GatewayError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    Ok(envelope.result.unwrap_or(Value::Null))
}

fn quantity_digits(value: &Value) -> Result<&str, GatewayError> {
    let text = value
        .as_str()
        .ok_or_else(|| GatewayError::Decode(format!("expected hex quantity, got {}", value)))?;
    let digits = strip_hex_prefix(text);
    if digits.is_empty() {
        return Err(GatewayError::Decode(format!("empty quantity {:?}", text)));
    }
    Ok(digits)
}

fn parse_u64(value: &Value) -> Result<u64, GatewayError> {
    let digits = quantity_digits(value)?;
    u64::from_str_radix(digits, 16).map_err(|e| GatewayError::Decode(format!("{}: {}", digits, e)))
}

fn parse_u128(value: &Value) -> Result<u128, GatewayError> {
    let digits = quantity_digits(value)?;
    u128::from_str_radix(digits, 16)
        .map_err(|e| GatewayError::Decode(format!("{}: {}", digits, e)))
}

fn parse_u256(value: &Value) -> Result<U256, GatewayError> {
    let digits = quantity_digits(value)?;
    U256::from_str_radix(digits, 16).map_err(|e| GatewayError::Decode(format!("{}: {}", digits, e)))
}

fn decode_receipt(value: Value) -> Result<Option<TransactionReceipt>, GatewayError> {
    if value.is_null() {
        return Ok(None);
    }

    let raw: RawReceipt =
        serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))?;

    // Some nodes return a receipt shell before the block is sealed
    let Some(block_number) = raw.block_number else {
        return Ok(None);
    };

    let transaction_hash = hash_from_hex(&raw.transaction_hash)
        .ok_or_else(|| GatewayError::Decode(format!("bad hash {}", raw.transaction_hash)))?;

    let status = match raw.status.as_deref().map(strip_hex_prefix) {
        Some("1") => ReceiptStatus::Success,
        Some("0") => ReceiptStatus::Failure,
        // Pre-Byzantium receipts carry `root` and no status
        None => ReceiptStatus::Unknown,
        other => {
            return Err(GatewayError::Decode(format!(
                "unknown receipt status {:?}",
                other
            )))
        }
    };

    Ok(Some(TransactionReceipt {
        transaction_hash,
        status,
        block_number: parse_u64(&Value::String(block_number))?,
        gas_used: parse_u64(&Value::String(raw.gas_used))?,
    }))
}
