//! Meta-transactions
//!
//! Gasless swaps are submitted as EIP-712 signed `MetaTransaction` payloads
//! that a relayer executes through the router's `executeMetaTransaction`.
//!
//! This crate provides:
//! - The typed-data payload and digest (`eip712`)
//! - Wallet and local-key signers plus signature splitting (`signer`)
//! - Relay clients and relay response normalization (`relay`)

pub mod eip712;
pub mod error;
pub mod relay;
pub mod signer;

pub use eip712::{MetaTransaction, MetaTxDomain};
pub use error::MetaTxError;
pub use relay::{
    ContractRelay, ExecuteMetaTransaction, HttpRelay, MetaTxRelay, RelayConfig, RelayResponse,
};
pub use signer::{
    split_signature, LocalTypedDataSigner, RpcTypedDataSigner, SignatureParts, TypedDataSigner,
};
