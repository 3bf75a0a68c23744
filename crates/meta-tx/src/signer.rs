//! Typed-data signers and signature splitting

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Signature, H256};
use swap_core::CallError;

use crate::eip712::{MetaTransaction, MetaTxDomain};
use crate::error::MetaTxError;

/// Signs `MetaTransaction` typed data on behalf of `account`
#[async_trait]
pub trait TypedDataSigner: Send + Sync {
    async fn sign_meta_transaction(
        &self,
        account: Address,
        domain: &MetaTxDomain,
        tx: &MetaTransaction,
    ) -> Result<Signature, CallError>;
}

/// Asks the connected wallet to sign via `eth_signTypedData_v3`.
///
/// Blocks until the user approves or rejects in the wallet.
pub struct RpcTypedDataSigner<M> {
    inner: Arc<M>,
}

impl<M: Middleware + 'static> RpcTypedDataSigner<M> {
    pub fn new(inner: Arc<M>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<M: Middleware + 'static> TypedDataSigner for RpcTypedDataSigner<M> {
    async fn sign_meta_transaction(
        &self,
        account: Address,
        domain: &MetaTxDomain,
        tx: &MetaTransaction,
    ) -> Result<Signature, CallError> {
        let payload = tx.typed_data(domain).to_string();

        let signed: String = self
            .inner
            .provider()
            .request("eth_signTypedData_v3", (account, payload))
            .await
            .map_err(|e| evm_client::call_error(&e))?;

        Signature::from_str(&signed)
            .map_err(|e| MetaTxError::InvalidSignature(e.to_string()).into())
    }
}

/// Signs with a local private key (headless use)
pub struct LocalTypedDataSigner {
    wallet: LocalWallet,
}

impl LocalTypedDataSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        Self { wallet }
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

#[async_trait]
impl TypedDataSigner for LocalTypedDataSigner {
    async fn sign_meta_transaction(
        &self,
        account: Address,
        domain: &MetaTxDomain,
        tx: &MetaTransaction,
    ) -> Result<Signature, CallError> {
        if account != self.wallet.address() {
            return Err(CallError::new(format!(
                "Signer {:?} cannot sign for {:?}",
                self.wallet.address(),
                account
            )));
        }

        self.wallet
            .sign_hash(tx.digest(domain))
            .map_err(|e| MetaTxError::InvalidSignature(e.to_string()).into())
    }
}

/// `r`, `s`, `v` components of a signature as passed to `executeMetaTransaction`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureParts {
    pub r: H256,
    pub s: H256,
    pub v: u8,
}

/// Split a signature, normalizing `v` to 27/28
pub fn split_signature(signature: &Signature) -> Result<SignatureParts, MetaTxError> {
    let v = match signature.v {
        0 | 1 => signature.v + 27,
        27 | 28 => signature.v,
        other => {
            return Err(MetaTxError::InvalidSignature(format!(
                "unsupported recovery id {}",
                other
            )))
        }
    };

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    signature.r.to_big_endian(&mut r);
    signature.s.to_big_endian(&mut s);

    Ok(SignatureParts {
        r: H256::from(r),
        s: H256::from(s),
        v: v as u8,
    })
}
