//! Swap Callback
//!
//! Ties the call builder, estimator, and submitter together. `prepare_swap`
//! checks that everything needed for a swap is available and hands back a
//! callback that runs estimate -> select -> submit when executed.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use ethers::types::Address;
use evm_client::{ChainClient, NameResolver};
use swap_core::{Bips, ChainId, SwapError, SwapSettings, Timestamp};

use crate::activity::TransactionTracker;
use crate::estimate::{estimate_swap_calls, select_swap_call};
use crate::recipient::{resolve_recipient, RecipientStatus};
use crate::router::{build_swap_calls, transaction_deadline, SwapCallArguments};
use crate::state::{SwapCall, SwapResult, SwapStage, Trade};
use crate::submit::{GaslessSubmission, SwapSubmitter};
use crate::summary::swap_summary;

/// Wallet and chain handles available to the swap path
#[derive(Clone)]
pub struct SwapContext {
    pub client: Option<Arc<dyn ChainClient>>,
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
    /// Router of the connected chain
    pub router: Option<Address>,
    pub resolver: Option<Arc<dyn NameResolver>>,
    pub gasless: Option<GaslessSubmission>,
    pub tracker: Arc<dyn TransactionTracker>,
}

/// What the user asked for
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub trade: Option<Trade>,
    pub allowed_slippage: Bips,
    /// Address or name; `None` swaps to the sender
    pub recipient: Option<String>,
    /// Explicit absolute deadline
    pub deadline: Option<Timestamp>,
    /// Deadline offset used when no explicit deadline is set
    pub deadline_from_now: Timestamp,
}

impl SwapRequest {
    pub fn new(trade: Option<Trade>, settings: &SwapSettings) -> Self {
        Self {
            trade,
            allowed_slippage: settings.allowed_slippage_bips,
            recipient: None,
            deadline: None,
            deadline_from_now: settings.deadline_from_now_secs,
        }
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

pub enum SwapCallbackState {
    Invalid(SwapError),
    /// Recipient name lookup still pending
    Loading,
    Valid(SwapCallback),
}

impl SwapCallbackState {
    pub fn error(&self) -> Option<&SwapError> {
        match self {
            Self::Invalid(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn into_callback(self) -> Option<SwapCallback> {
        match self {
            Self::Valid(callback) => Some(callback),
            _ => None,
        }
    }
}

/// Ready-to-run swap
pub struct SwapCallback {
    client: Arc<dyn ChainClient>,
    submitter: SwapSubmitter,
    account: Address,
    calls: Vec<SwapCall>,
    summary: String,
}

impl SwapCallback {
    pub fn calls(&self) -> &[SwapCall] {
        &self.calls
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Estimate every candidate, pick one, and submit it
    pub async fn execute(&self) -> Result<SwapResult, SwapError> {
        tracing::debug!(stage = %SwapStage::Estimating, candidates = self.calls.len(), "Estimating swap calls");
        let estimates = estimate_swap_calls(self.client.as_ref(), self.account, self.calls.clone()).await;

        let selected = match select_swap_call(&estimates) {
            Ok(selected) => selected,
            Err(e) => {
                tracing::warn!(stage = %SwapStage::NoneViable, error = %e, "No viable swap call");
                return Err(e);
            }
        };
        tracing::debug!(
            stage = %SwapStage::Selected,
            method = %selected.call.parameters.method,
            gas_estimate = %selected.gas_estimate,
            "Selected swap call"
        );

        self.submitter
            .submit(self.account, &selected, self.summary.clone())
            .await
    }
}

fn unix_now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Check dependencies, resolve the recipient, and build the call candidates
pub async fn prepare_swap(context: &SwapContext, request: &SwapRequest) -> SwapCallbackState {
    let (Some(trade), Some(client), Some(account), Some(chain_id), Some(router)) = (
        request.trade.as_ref(),
        context.client.as_ref(),
        context.account,
        context.chain_id,
        context.router,
    ) else {
        return SwapCallbackState::Invalid(SwapError::MissingDependencies);
    };

    let recipient = match resolve_recipient(
        context.resolver.as_deref(),
        request.recipient.as_deref(),
        account,
    )
    .await
    {
        RecipientStatus::Resolved(address) => address,
        RecipientStatus::Invalid => return SwapCallbackState::Invalid(SwapError::InvalidRecipient),
        RecipientStatus::Loading => return SwapCallbackState::Loading,
    };

    tracing::debug!(stage = %SwapStage::Building, ?recipient, "Building swap calls");
    let deadline = transaction_deadline(request.deadline, unix_now(), request.deadline_from_now);
    let calls = match build_swap_calls(&SwapCallArguments {
        trade: Some(trade),
        account: Some(account),
        chain_id: Some(chain_id),
        router: Some(router),
        recipient: Some(recipient),
        allowed_slippage: request.allowed_slippage,
        deadline,
    }) {
        Ok(calls) => calls,
        Err(e) => return SwapCallbackState::Invalid(e),
    };

    let mut submitter = SwapSubmitter::new(client.clone(), context.tracker.clone());
    if let Some(gasless) = &context.gasless {
        submitter = submitter.with_gasless(gasless.clone());
    }

    SwapCallbackState::Valid(SwapCallback {
        client: client.clone(),
        submitter,
        account,
        calls,
        summary: swap_summary(trade, account, recipient, request.recipient.as_deref()),
    })
}
