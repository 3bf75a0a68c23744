//! Error types for meta-transaction operations

use swap_core::CallError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaTxError {
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    #[error("Failed to encode meta-transaction: {0}")]
    Encode(#[from] evm_tx::EncodeError),
    #[error("Unexpected nonce response: {0}")]
    InvalidNonce(String),
    #[error("Relay request failed: {0}")]
    Http(String),
}

impl From<MetaTxError> for CallError {
    fn from(e: MetaTxError) -> Self {
        CallError::new(e.to_string())
    }
}
