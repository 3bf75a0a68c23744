//! Swap Submitter
//!
//! Sends the selected call either straight through the wallet or, in gasless
//! mode, as a signed meta-transaction through a relay. Calls that attach native
//! value always go direct.

use std::sync::Arc;

use ethers::types::Address;
use evm_client::{ChainClient, ReceiptWaiter, SubmittedTransaction};
use meta_tx::{
    split_signature, ExecuteMetaTransaction, MetaTransaction, MetaTxDomain, MetaTxRelay,
    TypedDataSigner,
};
use swap_core::{CallError, SwapError};

use crate::activity::TransactionTracker;
use crate::estimate::SelectedSwapCall;
use crate::state::{SwapResult, SwapStage};

/// Relay, signer, and signing domain used in gasless mode
#[derive(Clone)]
pub struct GaslessSubmission {
    pub relay: Arc<dyn MetaTxRelay>,
    pub signer: Arc<dyn TypedDataSigner>,
    pub domain: MetaTxDomain,
}

pub struct SwapSubmitter {
    client: Arc<dyn ChainClient>,
    gasless: Option<GaslessSubmission>,
    tracker: Arc<dyn TransactionTracker>,
}

impl SwapSubmitter {
    pub fn new(client: Arc<dyn ChainClient>, tracker: Arc<dyn TransactionTracker>) -> Self {
        Self {
            client,
            gasless: None,
            tracker,
        }
    }

    /// Enable gasless submission
    pub fn with_gasless(mut self, gasless: GaslessSubmission) -> Self {
        self.gasless = Some(gasless);
        self
    }

    pub fn is_gasless(&self) -> bool {
        self.gasless.is_some()
    }

    /// Submit the selected call and record it in the activity log
    pub async fn submit(
        &self,
        account: Address,
        selected: &SelectedSwapCall,
        summary: String,
    ) -> Result<SwapResult, SwapError> {
        let method = selected.call.parameters.method;
        tracing::info!(stage = %SwapStage::Submitting, %method, gasless = self.gasless.is_some(), "Submitting swap");

        let submitted = match &self.gasless {
            Some(gasless) if !method.requires_native_value() => {
                self.submit_gasless(gasless, account, selected).await
            }
            _ => self.submit_direct(account, selected).await,
        };

        let response = match submitted {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(stage = %SwapStage::SubmitFailed, %method, error = %e, "Swap submission failed");
                return Err(e);
            }
        };

        self.tracker.add_transaction(&response, &summary).await;
        tracing::info!(
            stage = %SwapStage::ConfirmedSubmission,
            hash = ?response.hash,
            %summary,
            "Swap submitted"
        );

        Ok(SwapResult { response, summary })
    }

    async fn submit_direct(
        &self,
        account: Address,
        selected: &SelectedSwapCall,
    ) -> Result<SubmittedTransaction, SwapError> {
        let call = selected.call.contract_call(account)?;
        let gas_limit = evm_tx::calculate_gas_margin(selected.gas_estimate);

        let hash = self
            .client
            .send_transaction(&call, gas_limit)
            .await
            .map_err(|e| submission_error(&e))?;

        let waiter: Arc<dyn ReceiptWaiter> = Arc::new(self.client.clone());
        Ok(SubmittedTransaction::new(hash, waiter))
    }

    async fn submit_gasless(
        &self,
        gasless: &GaslessSubmission,
        account: Address,
        selected: &SelectedSwapCall,
    ) -> Result<SubmittedTransaction, SwapError> {
        let function_signature = evm_tx::encode_function_data(
            selected.call.parameters.method.name(),
            &selected.call.parameters.args,
        )?;

        let nonce = gasless
            .relay
            .get_nonce(account)
            .await
            .map_err(|e| submission_error(&e))?;

        let meta_tx = MetaTransaction {
            nonce,
            from: account,
            function_signature: function_signature.clone(),
        };
        let signature = gasless
            .signer
            .sign_meta_transaction(account, &gasless.domain, &meta_tx)
            .await
            .map_err(|e| submission_error(&e))?;
        let signature =
            split_signature(&signature).map_err(|e| submission_error(&CallError::from(e)))?;

        let response = gasless
            .relay
            .execute_meta_transaction(&ExecuteMetaTransaction {
                user: account,
                function_signature,
                signature,
            })
            .await
            .map_err(|e| submission_error(&e))?;

        response.normalize()
    }
}

fn submission_error(error: &CallError) -> SwapError {
    if error.is_user_rejection() {
        tracing::debug!("User rejected the request");
    } else {
        tracing::error!(error = %error, code = ?error.code, "Swap failed");
    }
    SwapError::from_submission(error)
}
