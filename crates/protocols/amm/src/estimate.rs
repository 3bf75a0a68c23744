//! Gas Estimator / Call Selector
//!
//! Every candidate is estimated concurrently. A failed estimate is re-run as
//! an `eth_call` to recover the revert reason, which is then mapped to a
//! user-facing error.

use ethers::types::{Address, U256};
use evm_client::ChainClient;
use futures::future::join_all;
use swap_core::{CallError, SwapError};

use crate::constants::revert_reasons;
use crate::state::SwapCall;

/// Result of probing one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum EstimatedSwapCall {
    Success {
        call: SwapCall,
        /// Node estimate plus the flat buffer
        gas_estimate: U256,
    },
    Failure {
        call: SwapCall,
        error: SwapError,
    },
}

impl EstimatedSwapCall {
    pub fn call(&self) -> &SwapCall {
        match self {
            Self::Success { call, .. } | Self::Failure { call, .. } => call,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Candidate chosen for submission
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSwapCall {
    pub call: SwapCall,
    pub gas_estimate: U256,
}

/// Map a failed simulation to the message shown to the user
pub fn classify_simulation_error(error: &CallError) -> SwapError {
    let reason = error.reason_or_message();
    if revert_reasons::is_slippage_reason(reason) {
        SwapError::SlippageExceeded
    } else {
        SwapError::ExecutionReverted {
            reason: reason.to_string(),
        }
    }
}

/// Estimate one candidate, simulating it if estimation fails
pub async fn estimate_swap_call<C: ChainClient + ?Sized>(
    client: &C,
    account: Address,
    call: SwapCall,
) -> EstimatedSwapCall {
    let contract_call = match call.contract_call(account) {
        Ok(contract_call) => contract_call,
        Err(error) => return EstimatedSwapCall::Failure { call, error },
    };

    let estimate_error = match client.estimate_gas(&contract_call).await {
        Ok(estimate) => {
            return EstimatedSwapCall::Success {
                call,
                gas_estimate: evm_tx::add_estimate_buffer(estimate),
            }
        }
        Err(e) => e,
    };

    tracing::debug!(
        method = %call.parameters.method,
        error = %estimate_error,
        "Gas estimate failed, simulating"
    );

    let error = match client.call(&contract_call).await {
        Ok(result) => {
            tracing::debug!(
                method = %call.parameters.method,
                ?result,
                "Unexpected successful call after failed estimate gas"
            );
            SwapError::EstimationIssue
        }
        Err(call_error) => {
            tracing::debug!(
                method = %call.parameters.method,
                error = %call_error,
                "Call threw error"
            );
            classify_simulation_error(&call_error)
        }
    };

    EstimatedSwapCall::Failure { call, error }
}

/// Estimate all candidates concurrently, keeping candidate order
pub async fn estimate_swap_calls<C: ChainClient + ?Sized>(
    client: &C,
    account: Address,
    calls: Vec<SwapCall>,
) -> Vec<EstimatedSwapCall> {
    join_all(
        calls
            .into_iter()
            .map(|call| estimate_swap_call(client, account, call)),
    )
    .await
}

/// Pick the candidate to submit.
///
/// The first success is taken only if it is the last candidate or the next
/// candidate also succeeded. With a single candidate that is simply the first
/// success. Without a pick, the last recorded failure is surfaced.
pub fn select_swap_call(estimates: &[EstimatedSwapCall]) -> Result<SelectedSwapCall, SwapError> {
    let selected = estimates.iter().enumerate().find(|(i, estimate)| {
        estimate.is_success()
            && estimates
                .get(i + 1)
                .map_or(true, EstimatedSwapCall::is_success)
    });

    if let Some((_, EstimatedSwapCall::Success { call, gas_estimate })) = selected {
        return Ok(SelectedSwapCall {
            call: call.clone(),
            gas_estimate: *gas_estimate,
        });
    }

    let last_error = estimates.iter().rev().find_map(|estimate| match estimate {
        EstimatedSwapCall::Failure { error, .. } => Some(error.clone()),
        EstimatedSwapCall::Success { .. } => None,
    });

    Err(last_error.unwrap_or(SwapError::NoViableCall))
}
