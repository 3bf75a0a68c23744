//! evm-client: Chain access for the swap path
//!
//! Defines the client seams the swap path depends on (gas estimation,
//! read-only simulation, submission, receipt waiting, name resolution) and
//! implements them over an `ethers` middleware stack.

pub mod client;
pub mod revert;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, TxHash, U256};
use swap_core::CallError;

pub use client::EthClient;
pub use revert::{call_error, decode_revert_reason, from_json_rpc, reason_from_message};

/// Result type for chain client operations
pub type Result<T> = std::result::Result<T, CallError>;

/// A contract call ready to be estimated, simulated, or sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    /// Native value attached to the call
    pub value: U256,
}

/// Node-side operations used by the swap path
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// `eth_estimateGas`
    async fn estimate_gas(&self, call: &ContractCall) -> Result<U256>;

    /// `eth_call` against the latest state
    async fn call(&self, call: &ContractCall) -> Result<Bytes>;

    /// Sign (through the wallet) and broadcast the call with an explicit gas limit
    async fn send_transaction(&self, call: &ContractCall, gas_limit: U256) -> Result<TxHash>;

    /// Wait until the transaction has `confirmations` confirmations.
    /// Returns `None` if the transaction was dropped.
    async fn wait_for_receipt(
        &self,
        hash: TxHash,
        confirmations: usize,
    ) -> Result<Option<TransactionReceipt>>;
}

#[async_trait]
impl<T: ChainClient + ?Sized> ChainClient for Arc<T> {
    async fn estimate_gas(&self, call: &ContractCall) -> Result<U256> {
        (**self).estimate_gas(call).await
    }

    async fn call(&self, call: &ContractCall) -> Result<Bytes> {
        (**self).call(call).await
    }

    async fn send_transaction(&self, call: &ContractCall, gas_limit: U256) -> Result<TxHash> {
        (**self).send_transaction(call, gas_limit).await
    }

    async fn wait_for_receipt(
        &self,
        hash: TxHash,
        confirmations: usize,
    ) -> Result<Option<TransactionReceipt>> {
        (**self).wait_for_receipt(hash, confirmations).await
    }
}

/// Wait-for-confirmation capability attached to a submitted transaction
#[async_trait]
pub trait ReceiptWaiter: Send + Sync {
    async fn wait(&self, hash: TxHash, confirmations: usize) -> Result<Option<TransactionReceipt>>;
}

#[async_trait]
impl<T: ChainClient + ?Sized> ReceiptWaiter for T {
    async fn wait(&self, hash: TxHash, confirmations: usize) -> Result<Option<TransactionReceipt>> {
        self.wait_for_receipt(hash, confirmations).await
    }
}

/// Handle to a submitted transaction: its hash plus the ability to wait for it
#[derive(Clone)]
pub struct SubmittedTransaction {
    pub hash: TxHash,
    waiter: Arc<dyn ReceiptWaiter>,
}

impl SubmittedTransaction {
    pub fn new(hash: TxHash, waiter: Arc<dyn ReceiptWaiter>) -> Self {
        Self { hash, waiter }
    }

    /// Wait for the given number of confirmations
    pub async fn wait(&self, confirmations: usize) -> Result<Option<TransactionReceipt>> {
        self.waiter.wait(self.hash, confirmations).await
    }
}

impl fmt::Debug for SubmittedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmittedTransaction")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

/// Outcome of a name-service lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameResolution {
    Found(Address),
    /// The name has no address record
    NotFound,
    /// The lookup could not be completed (node unreachable, etc.)
    Unavailable(String),
}

/// Name-service (ENS) lookup
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve_name(&self, name: &str) -> NameResolution;
}
