//! Error mapping and revert reason extraction
//!
//! Nodes report reverts in two shapes: ABI-encoded `Error(string)` bytes in
//! the JSON-RPC error `data` field, or a plain "execution reverted: <reason>"
//! message. Both are folded into `CallError::reason`.

use ethers::abi::{decode, ParamType};
use ethers::providers::{JsonRpcError, MiddlewareError};
use serde_json::Value;
use swap_core::CallError;

/// `bytes4(keccak256("Error(string)"))`
const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

const REVERT_PREFIX: &str = "execution reverted: ";

/// Decode an `Error(string)` revert payload
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    if data.len() < 4 || data[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    decode(&[ParamType::String], &data[4..])
        .ok()?
        .into_iter()
        .next()?
        .into_string()
}

/// Extract the reason from an "execution reverted: <reason>" message
pub fn reason_from_message(message: &str) -> Option<String> {
    message
        .find(REVERT_PREFIX)
        .map(|idx| message[idx + REVERT_PREFIX.len()..].trim().to_string())
        .filter(|reason| !reason.is_empty())
}

fn revert_data(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::String(s) => hex::decode(s.strip_prefix("0x").unwrap_or(s)).ok(),
        // Some providers nest the payload: {"data": "0x..."}
        Value::Object(map) => map.get("data").and_then(revert_data),
        _ => None,
    }
}

/// Map a JSON-RPC error response
pub fn from_json_rpc(rpc: &JsonRpcError) -> CallError {
    let reason = rpc
        .data
        .as_ref()
        .and_then(revert_data)
        .and_then(|data| decode_revert_reason(&data))
        .or_else(|| reason_from_message(&rpc.message));

    let error = CallError::new(rpc.message.clone()).with_code(rpc.code);
    match reason {
        Some(reason) => error.with_reason(reason),
        None => error,
    }
}

/// Map any middleware error
pub fn call_error<E: MiddlewareError>(err: &E) -> CallError {
    if let Some(rpc) = err.as_error_response() {
        return from_json_rpc(rpc);
    }

    let message = err.to_string();
    match reason_from_message(&message) {
        Some(reason) => CallError::new(message).with_reason(reason),
        None => CallError::new(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Token};
    use serde_json::json;

    fn revert_payload(reason: &str) -> String {
        let mut data = ERROR_STRING_SELECTOR.to_vec();
        data.extend(encode(&[Token::String(reason.to_string())]));
        format!("0x{}", hex::encode(data))
    }

    #[test]
    fn test_decode_revert_reason() {
        let payload = revert_payload("UniswapV2Router: INSUFFICIENT_OUTPUT_AMOUNT");
        let bytes = hex::decode(&payload[2..]).unwrap();
        assert_eq!(
            decode_revert_reason(&bytes).as_deref(),
            Some("UniswapV2Router: INSUFFICIENT_OUTPUT_AMOUNT")
        );
        assert_eq!(decode_revert_reason(&[0xde, 0xad]), None);
    }

    #[test]
    fn test_reason_from_message() {
        assert_eq!(
            reason_from_message("execution reverted: UniswapV2: K").as_deref(),
            Some("UniswapV2: K")
        );
        assert_eq!(reason_from_message("execution reverted"), None);
        assert_eq!(reason_from_message("nonce too low"), None);
    }

    #[test]
    fn test_json_rpc_with_revert_data() {
        let rpc = JsonRpcError {
            code: 3,
            message: "execution reverted".to_string(),
            data: Some(json!(revert_payload("UniswapV2Router: EXPIRED"))),
        };
        let err = from_json_rpc(&rpc);
        assert_eq!(err.code, Some(3));
        assert_eq!(err.reason.as_deref(), Some("UniswapV2Router: EXPIRED"));
    }

    #[test]
    fn test_json_rpc_nested_data() {
        let rpc = JsonRpcError {
            code: -32603,
            message: "Internal JSON-RPC error.".to_string(),
            data: Some(json!({ "data": revert_payload("TransferHelper: TRANSFER_FROM_FAILED") })),
        };
        let err = from_json_rpc(&rpc);
        assert_eq!(
            err.reason.as_deref(),
            Some("TransferHelper: TRANSFER_FROM_FAILED")
        );
    }

    #[test]
    fn test_json_rpc_user_rejection() {
        let rpc = JsonRpcError {
            code: 4001,
            message: "MetaMask Tx Signature: User denied transaction signature.".to_string(),
            data: None,
        };
        let err = from_json_rpc(&rpc);
        assert!(err.is_user_rejection());
        assert_eq!(err.reason, None);
    }
}
