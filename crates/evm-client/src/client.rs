//! `ethers` middleware implementation of the client seams

use std::sync::Arc;

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, MiddlewareError, PendingTransaction, Provider, ProviderError};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Bytes, TransactionReceipt, TransactionRequest, TxHash, U256};

use swap_core::{CallError, RpcConfig};

use crate::revert::call_error;
use crate::{ChainClient, ContractCall, NameResolution, NameResolver, Result};

/// Chain client over any `ethers` middleware stack.
///
/// The middleware must be able to sign for `ContractCall::from` (a wallet
/// provider with unlocked accounts, or a `SignerMiddleware`).
pub struct EthClient<M> {
    inner: Arc<M>,
}

impl<M> Clone for EthClient<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl EthClient<Provider<Http>> {
    /// Read-only HTTP client for the configured node
    pub fn connect(config: &RpcConfig) -> std::result::Result<Self, CallError> {
        let provider = Provider::<Http>::try_from(config.url.as_str())
            .map_err(|e| CallError::new(format!("Invalid RPC url {}: {}", config.url, e)))?;
        tracing::info!(url = %config.url, "Connected chain client");
        Ok(Self::new(Arc::new(provider)))
    }
}

impl<M: Middleware + 'static> EthClient<M> {
    pub fn new(inner: Arc<M>) -> Self {
        Self { inner }
    }

    /// Get the underlying middleware (for advanced usage)
    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn transaction(call: &ContractCall) -> TypedTransaction {
        let mut tx = TransactionRequest::new()
            .from(call.from)
            .to(call.to)
            .data(call.data.clone());
        if !call.value.is_zero() {
            tx = tx.value(call.value);
        }
        tx.into()
    }
}

#[async_trait]
impl<M: Middleware + 'static> ChainClient for EthClient<M> {
    async fn estimate_gas(&self, call: &ContractCall) -> Result<U256> {
        let tx = Self::transaction(call);
        self.inner
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| call_error(&e))
    }

    async fn call(&self, call: &ContractCall) -> Result<Bytes> {
        let tx = Self::transaction(call);
        self.inner.call(&tx, None).await.map_err(|e| call_error(&e))
    }

    async fn send_transaction(&self, call: &ContractCall, gas_limit: U256) -> Result<TxHash> {
        let mut tx = Self::transaction(call);
        tx.set_gas(gas_limit);

        let pending = self
            .inner
            .send_transaction(tx, None)
            .await
            .map_err(|e| call_error(&e))?;

        let hash = *pending;
        tracing::debug!(hash = ?hash, "Transaction broadcast");
        Ok(hash)
    }

    async fn wait_for_receipt(
        &self,
        hash: TxHash,
        confirmations: usize,
    ) -> Result<Option<TransactionReceipt>> {
        PendingTransaction::new(hash, self.inner.provider())
            .confirmations(confirmations)
            .await
            .map_err(|e| call_error(&e))
    }
}

#[async_trait]
impl<M: Middleware + 'static> NameResolver for EthClient<M> {
    async fn resolve_name(&self, name: &str) -> NameResolution {
        match self.inner.resolve_name(name).await {
            Ok(address) => NameResolution::Found(address),
            Err(e) => match e.as_provider_error() {
                Some(ProviderError::EnsError(_)) | Some(ProviderError::EnsNotOwned(_)) => {
                    tracing::debug!(name, "Name has no address record");
                    NameResolution::NotFound
                }
                _ => {
                    tracing::warn!(name, error = %e, "Name lookup failed");
                    NameResolution::Unavailable(e.to_string())
                }
            },
        }
    }
}
