//! Error types for the swap workspace

use thiserror::Error;

use crate::constants::USER_REJECTED_CODE;

/// Errors surfaced by the swap path.
///
/// Every variant renders as a single message that can be shown to the user
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("Missing dependencies")]
    MissingDependencies,

    #[error("Invalid recipient")]
    InvalidRecipient,

    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Invalid slippage tolerance: {0} bips")]
    InvalidSlippage(u32),

    #[error("Unexpected issue with estimating the gas. Please try again.")]
    EstimationIssue,

    #[error("This transaction will not succeed either due to price movement or fee on transfer. Try increasing your slippage tolerance.")]
    SlippageExceeded,

    #[error("The transaction cannot succeed due to error: {reason}. This is probably an issue with one of the tokens you are swapping.")]
    ExecutionReverted { reason: String },

    #[error("Unexpected error. Please contact support: none of the calls threw an error")]
    NoViableCall,

    #[error("Transaction rejected.")]
    UserRejected,

    #[error("Swap failed: {message}")]
    SubmissionFailed { message: String },

    #[error("Unexpected tx response. Please try again with gasless off.")]
    MalformedRelayResponse,

    #[error("Failed to encode call: {0}")]
    Encoding(String),
}

impl SwapError {
    /// Classify a failed submission (direct or relayed).
    pub fn from_submission(error: &CallError) -> Self {
        if error.is_user_rejection() {
            Self::UserRejected
        } else {
            Self::SubmissionFailed {
                message: error.message.clone(),
            }
        }
    }

    /// Get a stable machine-friendly code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingDependencies => "missing_dependencies",
            Self::InvalidRecipient => "invalid_recipient",
            Self::InvalidTrade(_) => "invalid_trade",
            Self::InvalidSlippage(_) => "invalid_slippage",
            Self::EstimationIssue => "estimation_issue",
            Self::SlippageExceeded => "slippage_exceeded",
            Self::ExecutionReverted { .. } => "execution_reverted",
            Self::NoViableCall => "no_viable_call",
            Self::UserRejected => "user_rejected",
            Self::SubmissionFailed { .. } => "submission_failed",
            Self::MalformedRelayResponse => "malformed_relay_response",
            Self::Encoding(_) => "encoding",
        }
    }
}

/// Failure reported by the node, the wallet or the relay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CallError {
    /// JSON-RPC error code, when the failure came from a JSON-RPC endpoint
    pub code: Option<i64>,
    pub message: String,
    /// Decoded contract revert reason
    pub reason: Option<String>,
}

impl CallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            reason: None,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// User declined the request in the wallet
    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(USER_REJECTED_CODE)
    }

    /// Revert reason if decoded, otherwise the raw message
    pub fn reason_or_message(&self) -> &str {
        self.reason.as_deref().unwrap_or(&self.message)
    }
}

/// Result type alias for swap operations
pub type Result<T> = std::result::Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_maps_to_fixed_message() {
        let err = CallError::new("User denied transaction signature").with_code(4001);
        let swap_err = SwapError::from_submission(&err);
        assert_eq!(swap_err, SwapError::UserRejected);
        assert_eq!(swap_err.to_string(), "Transaction rejected.");
    }

    #[test]
    fn test_other_submission_failure_keeps_message() {
        let err = CallError::new("insufficient funds for gas").with_code(-32000);
        let swap_err = SwapError::from_submission(&err);
        assert_eq!(swap_err.to_string(), "Swap failed: insufficient funds for gas");
        assert_eq!(swap_err.error_code(), "submission_failed");
    }

    #[test]
    fn test_reason_or_message() {
        let err = CallError::new("execution reverted").with_reason("K");
        assert_eq!(err.reason_or_message(), "K");
        assert_eq!(CallError::new("boom").reason_or_message(), "boom");
    }

    #[test]
    fn test_execution_reverted_message() {
        let err = SwapError::ExecutionReverted {
            reason: "TransferHelper: TRANSFER_FROM_FAILED".into(),
        };
        assert_eq!(
            err.to_string(),
            "The transaction cannot succeed due to error: TransferHelper: TRANSFER_FROM_FAILED. This is probably an issue with one of the tokens you are swapping."
        );
    }
}
