//! Relay clients
//!
//! A relay broadcasts `executeMetaTransaction(user, functionSignature, r, s, v)`
//! on the router and pays the gas. Two transports are provided:
//! - `HttpRelay`: hosted relay API accepting the signed parameters as JSON
//! - `ContractRelay`: self-hosted relayer sending the call from its own account

use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address, Bytes, TxHash, U256};
use serde::Deserialize;
use serde_json::json;
use swap_core::{CallError, SwapError};

use evm_client::{ChainClient, ContractCall, ReceiptWaiter, SubmittedTransaction};
use evm_tx::{calculate_gas_margin, decode_function_output, encode_function_data};

use crate::error::MetaTxError;
use crate::signer::SignatureParts;

/// Signed `executeMetaTransaction` parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteMetaTransaction {
    pub user: Address,
    pub function_signature: Bytes,
    pub signature: SignatureParts,
}

impl ExecuteMetaTransaction {
    /// Router calldata for `executeMetaTransaction`
    pub fn calldata(&self) -> Result<Bytes, MetaTxError> {
        Ok(encode_function_data(
            "executeMetaTransaction",
            &[
                Token::Address(self.user),
                Token::Bytes(self.function_signature.to_vec()),
                Token::FixedBytes(self.signature.r.as_bytes().to_vec()),
                Token::FixedBytes(self.signature.s.as_bytes().to_vec()),
                Token::Uint(U256::from(self.signature.v)),
            ],
        )?)
    }
}

/// Raw relay answer before normalization.
///
/// Relays are inconsistent about the hash field name and may omit the
/// confirmation capability entirely.
#[derive(Clone, Default)]
pub struct RelayResponse {
    pub hash: Option<TxHash>,
    pub transaction_hash: Option<TxHash>,
    pub waiter: Option<Arc<dyn ReceiptWaiter>>,
}

impl std::fmt::Debug for RelayResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayResponse")
            .field("hash", &self.hash)
            .field("transaction_hash", &self.transaction_hash)
            .field("has_waiter", &self.waiter.is_some())
            .finish()
    }
}

impl RelayResponse {
    /// Use `transaction_hash` when `hash` is absent, then require both a
    /// hash and a way to wait for it.
    pub fn normalize(self) -> Result<SubmittedTransaction, SwapError> {
        let hash = self.hash.or(self.transaction_hash);
        match (hash, self.waiter) {
            (Some(hash), Some(waiter)) => Ok(SubmittedTransaction::new(hash, waiter)),
            _ => {
                tracing::error!(
                    has_hash = hash.is_some(),
                    "Unexpected relay response"
                );
                Err(SwapError::MalformedRelayResponse)
            }
        }
    }
}

/// Meta-transaction relay
#[async_trait]
pub trait MetaTxRelay: Send + Sync {
    /// Current replay-protection nonce of `account` on the router
    async fn get_nonce(&self, account: Address) -> Result<U256, CallError>;

    async fn execute_meta_transaction(
        &self,
        request: &ExecuteMetaTransaction,
    ) -> Result<RelayResponse, CallError>;
}

async fn read_nonce<C: ChainClient + ?Sized>(
    chain: &C,
    router: Address,
    account: Address,
) -> Result<U256, CallError> {
    let data = encode_function_data("getNonce", &[Token::Address(account)])
        .map_err(MetaTxError::from)?;
    let output = chain
        .call(&ContractCall {
            from: account,
            to: router,
            data,
            value: U256::zero(),
        })
        .await?;

    let tokens = decode_function_output("getNonce", &output).map_err(MetaTxError::from)?;
    match tokens.into_iter().next() {
        Some(Token::Uint(nonce)) => Ok(nonce),
        other => Err(MetaTxError::InvalidNonce(format!("{:?}", other)).into()),
    }
}

/// Hosted relay endpoint configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub url: String,
    pub api_key: String,
    pub api_id: String,
}

impl From<&swap_core::GaslessConfig> for RelayConfig {
    fn from(config: &swap_core::GaslessConfig) -> Self {
        Self {
            url: config.relay_url.clone(),
            api_key: config.api_key.clone(),
            api_id: config.api_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayHttpResponse {
    #[serde(default)]
    hash: Option<TxHash>,
    #[serde(default)]
    transaction_hash: Option<TxHash>,
    #[serde(default)]
    tx_hash: Option<TxHash>,
    #[serde(default)]
    message: Option<String>,
}

/// Relay reached over HTTP; nonce reads and confirmations go through `chain`
pub struct HttpRelay<C> {
    http: reqwest::Client,
    config: RelayConfig,
    router: Address,
    chain: Arc<C>,
}

impl<C: ChainClient + 'static> HttpRelay<C> {
    pub fn new(config: RelayConfig, router: Address, chain: Arc<C>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            router,
            chain,
        }
    }

    fn request_body(&self, request: &ExecuteMetaTransaction) -> serde_json::Value {
        json!({
            "to": evm_tx::checksum(&self.router),
            "from": evm_tx::checksum(&request.user),
            "apiId": self.config.api_id,
            "params": [
                evm_tx::checksum(&request.user),
                format!("0x{}", hex::encode(&request.function_signature)),
                format!("{:?}", request.signature.r),
                format!("{:?}", request.signature.s),
                request.signature.v,
            ],
            "signatureType": "EIP712_SIGN",
        })
    }
}

#[async_trait]
impl<C: ChainClient + 'static> MetaTxRelay for HttpRelay<C> {
    async fn get_nonce(&self, account: Address) -> Result<U256, CallError> {
        read_nonce(self.chain.as_ref(), self.router, account).await
    }

    async fn execute_meta_transaction(
        &self,
        request: &ExecuteMetaTransaction,
    ) -> Result<RelayResponse, CallError> {
        let mut builder = self.http.post(&self.config.url).json(&self.request_body(request));
        if !self.config.api_key.is_empty() {
            builder = builder.header("x-api-key", &self.config.api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| MetaTxError::Http(e.to_string()))?;
        let status = response.status();
        let body: RelayHttpResponse = response
            .json()
            .await
            .map_err(|e| MetaTxError::Http(e.to_string()))?;

        if !status.is_success() {
            let message = body
                .message
                .unwrap_or_else(|| format!("relay returned HTTP {}", status));
            return Err(CallError::new(message).with_code(i64::from(status.as_u16())));
        }

        tracing::debug!(?body, "Relay accepted meta-transaction");

        Ok(RelayResponse {
            hash: body.hash,
            transaction_hash: body.transaction_hash.or(body.tx_hash),
            waiter: Some(self.chain.clone() as Arc<dyn ReceiptWaiter>),
        })
    }
}

/// Relayer account that sends `executeMetaTransaction` itself
pub struct ContractRelay<C> {
    relayer: Address,
    router: Address,
    chain: Arc<C>,
}

impl<C: ChainClient + 'static> ContractRelay<C> {
    /// `chain` must be able to sign for `relayer`
    pub fn new(relayer: Address, router: Address, chain: Arc<C>) -> Self {
        Self {
            relayer,
            router,
            chain,
        }
    }
}

#[async_trait]
impl<C: ChainClient + 'static> MetaTxRelay for ContractRelay<C> {
    async fn get_nonce(&self, account: Address) -> Result<U256, CallError> {
        read_nonce(self.chain.as_ref(), self.router, account).await
    }

    async fn execute_meta_transaction(
        &self,
        request: &ExecuteMetaTransaction,
    ) -> Result<RelayResponse, CallError> {
        let call = ContractCall {
            from: self.relayer,
            to: self.router,
            data: request.calldata()?,
            value: U256::zero(),
        };

        let estimate = self.chain.estimate_gas(&call).await?;
        let hash = self
            .chain
            .send_transaction(&call, calculate_gas_margin(estimate))
            .await?;

        Ok(RelayResponse {
            hash: Some(hash),
            transaction_hash: None,
            waiter: Some(self.chain.clone() as Arc<dyn ReceiptWaiter>),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{TransactionReceipt, H256};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockChain {
        nonce: u64,
        sent: Mutex<Vec<(ContractCall, U256)>>,
    }

    #[async_trait]
    impl ChainClient for MockChain {
        async fn estimate_gas(&self, _call: &ContractCall) -> evm_client::Result<U256> {
            Ok(U256::from(80_000))
        }

        async fn call(&self, call: &ContractCall) -> evm_client::Result<Bytes> {
            assert_eq!(&call.data[..4], &[0x2d, 0x03, 0x35, 0xab]);
            let mut word = [0u8; 32];
            U256::from(self.nonce).to_big_endian(&mut word);
            Ok(Bytes::from(word.to_vec()))
        }

        async fn send_transaction(
            &self,
            call: &ContractCall,
            gas_limit: U256,
        ) -> evm_client::Result<TxHash> {
            self.sent.lock().unwrap().push((call.clone(), gas_limit));
            Ok(H256::repeat_byte(0xcd))
        }

        async fn wait_for_receipt(
            &self,
            _hash: TxHash,
            _confirmations: usize,
        ) -> evm_client::Result<Option<TransactionReceipt>> {
            Ok(None)
        }
    }

    fn request() -> ExecuteMetaTransaction {
        ExecuteMetaTransaction {
            user: Address::repeat_byte(0x11),
            function_signature: Bytes::from(vec![0x38, 0xed, 0x17, 0x39]),
            signature: SignatureParts {
                r: H256::repeat_byte(0x01),
                s: H256::repeat_byte(0x02),
                v: 27,
            },
        }
    }

    #[test]
    fn test_normalize_prefers_hash() {
        let waiter: Arc<dyn ReceiptWaiter> = Arc::new(MockChain::default());
        let response = RelayResponse {
            hash: Some(H256::repeat_byte(0x01)),
            transaction_hash: Some(H256::repeat_byte(0x02)),
            waiter: Some(waiter),
        };
        assert_eq!(response.normalize().unwrap().hash, H256::repeat_byte(0x01));
    }

    #[test]
    fn test_normalize_falls_back_to_transaction_hash() {
        let waiter: Arc<dyn ReceiptWaiter> = Arc::new(MockChain::default());
        let response = RelayResponse {
            hash: None,
            transaction_hash: Some(H256::repeat_byte(0xab)),
            waiter: Some(waiter),
        };
        assert_eq!(response.normalize().unwrap().hash, H256::repeat_byte(0xab));
    }

    #[test]
    fn test_normalize_requires_hash_and_waiter() {
        let missing_waiter = RelayResponse {
            hash: Some(H256::repeat_byte(0x01)),
            ..Default::default()
        };
        assert_eq!(
            missing_waiter.normalize().unwrap_err(),
            SwapError::MalformedRelayResponse
        );

        let waiter: Arc<dyn ReceiptWaiter> = Arc::new(MockChain::default());
        let missing_hash = RelayResponse {
            waiter: Some(waiter),
            ..Default::default()
        };
        assert_eq!(
            missing_hash.normalize().unwrap_err().to_string(),
            "Unexpected tx response. Please try again with gasless off."
        );
    }

    #[test]
    fn test_http_response_field_names() {
        let body: RelayHttpResponse = serde_json::from_str(
            r#"{"txHash":"0xabababababababababababababababababababababababababababababababab","flag":200}"#,
        )
        .unwrap();
        assert_eq!(body.tx_hash, Some(H256::repeat_byte(0xab)));
        assert_eq!(body.hash, None);
    }

    #[test]
    fn test_execute_calldata_selector() {
        let data = request().calldata().unwrap();
        // executeMetaTransaction(address,bytes,bytes32,bytes32,uint8)
        assert_eq!(hex::encode(&data[..4]), "0c53c51c");
    }

    #[tokio::test]
    async fn test_contract_relay_reads_nonce_and_sends() {
        let chain = Arc::new(MockChain {
            nonce: 12,
            ..Default::default()
        });
        let relayer = Address::repeat_byte(0x99);
        let router = Address::repeat_byte(0xaa);
        let relay = ContractRelay::new(relayer, router, chain.clone());

        assert_eq!(
            relay.get_nonce(Address::repeat_byte(0x11)).await.unwrap(),
            U256::from(12)
        );

        let response = relay.execute_meta_transaction(&request()).await.unwrap();
        let submitted = response.normalize().unwrap();
        assert_eq!(submitted.hash, H256::repeat_byte(0xcd));

        let sent = chain.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0.from, relayer);
        assert_eq!(sent[0].0.to, router);
        assert_eq!(sent[0].1, U256::from(88_000));
    }

    #[test]
    fn test_http_request_body() {
        let relay = HttpRelay::new(
            RelayConfig {
                url: "http://127.0.0.1:1/relay".to_string(),
                api_key: String::new(),
                api_id: "api-1".to_string(),
            },
            Address::repeat_byte(0xaa),
            Arc::new(MockChain::default()),
        );
        let body = relay.request_body(&request());
        assert_eq!(body["apiId"], "api-1");
        assert_eq!(body["signatureType"], "EIP712_SIGN");
        assert_eq!(body["params"][1], "0x38ed1739");
        assert_eq!(
            body["params"][2],
            "0x0101010101010101010101010101010101010101010101010101010101010101"
        );
        assert_eq!(body["params"][4], 27);
    }
}
