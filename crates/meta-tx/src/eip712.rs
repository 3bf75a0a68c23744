//! EIP-712 `MetaTransaction` payload
//!
//! Domain: `EIP712Domain(string name,string version,address verifyingContract,bytes32 salt)`
//! with the chain id carried in `salt` instead of `chainId`.

use ethers::abi::{encode, Token};
use ethers::types::{Address, Bytes, H256, U256};
use ethers::utils::keccak256;
use serde_json::{json, Value};
use swap_core::constants::{META_TX_DOMAIN_NAME, META_TX_DOMAIN_VERSION};
use swap_core::ChainId;

const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,address verifyingContract,bytes32 salt)";
const META_TX_TYPE: &str = "MetaTransaction(uint256 nonce,address from,bytes functionSignature)";

/// Signing domain of the meta-transaction enabled router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTxDomain {
    pub name: String,
    pub version: String,
    pub verifying_contract: Address,
    pub salt: [u8; 32],
}

impl MetaTxDomain {
    /// Router domain for the given chain
    pub fn router(verifying_contract: Address, chain_id: ChainId) -> Self {
        Self {
            name: META_TX_DOMAIN_NAME.to_string(),
            version: META_TX_DOMAIN_VERSION.to_string(),
            verifying_contract,
            salt: chain_salt(chain_id),
        }
    }

    pub fn separator(&self) -> [u8; 32] {
        keccak256(encode(&[
            Token::FixedBytes(keccak256(DOMAIN_TYPE).to_vec()),
            Token::FixedBytes(keccak256(self.name.as_bytes()).to_vec()),
            Token::FixedBytes(keccak256(self.version.as_bytes()).to_vec()),
            Token::Address(self.verifying_contract),
            Token::FixedBytes(self.salt.to_vec()),
        ]))
    }
}

/// Chain id left-padded to 32 bytes
pub fn chain_salt(chain_id: ChainId) -> [u8; 32] {
    let mut salt = [0u8; 32];
    salt[24..].copy_from_slice(&chain_id.to_be_bytes());
    salt
}

/// Message the user signs for a relayed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTransaction {
    /// Replay-protection nonce read from the router
    pub nonce: U256,
    pub from: Address,
    /// ABI-encoded router call
    pub function_signature: Bytes,
}

impl MetaTransaction {
    pub fn struct_hash(&self) -> [u8; 32] {
        keccak256(encode(&[
            Token::FixedBytes(keccak256(META_TX_TYPE).to_vec()),
            Token::Uint(self.nonce),
            Token::Address(self.from),
            Token::FixedBytes(keccak256(&self.function_signature).to_vec()),
        ]))
    }

    /// Final digest signed by the wallet
    pub fn digest(&self, domain: &MetaTxDomain) -> H256 {
        let mut preimage = Vec::with_capacity(66);
        preimage.extend_from_slice(&[0x19, 0x01]);
        preimage.extend_from_slice(&domain.separator());
        preimage.extend_from_slice(&self.struct_hash());
        H256::from(keccak256(preimage))
    }

    /// Typed data in the shape wallets expect for `eth_signTypedData_v3`
    pub fn typed_data(&self, domain: &MetaTxDomain) -> Value {
        let nonce = if self.nonce <= U256::from(u64::MAX) {
            Value::from(self.nonce.as_u64())
        } else {
            Value::from(self.nonce.to_string())
        };

        json!({
            "types": {
                "EIP712Domain": [
                    { "name": "name", "type": "string" },
                    { "name": "version", "type": "string" },
                    { "name": "verifyingContract", "type": "address" },
                    { "name": "salt", "type": "bytes32" },
                ],
                "MetaTransaction": [
                    { "name": "nonce", "type": "uint256" },
                    { "name": "from", "type": "address" },
                    { "name": "functionSignature", "type": "bytes" },
                ],
            },
            "domain": {
                "name": domain.name,
                "version": domain.version,
                "verifyingContract": evm_tx::checksum(&domain.verifying_contract),
                "salt": format!("0x{}", hex::encode(domain.salt)),
            },
            "primaryType": "MetaTransaction",
            "message": {
                "nonce": nonce,
                "from": evm_tx::checksum(&self.from),
                "functionSignature": format!("0x{}", hex::encode(&self.function_signature)),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MetaTxDomain, MetaTransaction) {
        let domain = MetaTxDomain::router(Address::repeat_byte(0xaa), 137);
        let tx = MetaTransaction {
            nonce: U256::from(3),
            from: Address::repeat_byte(0x11),
            function_signature: Bytes::from(vec![0x38, 0xed, 0x17, 0x39]),
        };
        (domain, tx)
    }

    #[test]
    fn test_chain_salt() {
        let salt = chain_salt(137);
        assert_eq!(
            hex::encode(salt),
            "0000000000000000000000000000000000000000000000000000000000000089"
        );
    }

    #[test]
    fn test_typed_data_shape() {
        let (domain, tx) = sample();
        let data = tx.typed_data(&domain);

        assert_eq!(data["primaryType"], "MetaTransaction");
        assert_eq!(data["domain"]["name"], "QUICKSWAP_ROUTER_V2");
        assert_eq!(data["domain"]["version"], "2");
        assert_eq!(
            data["domain"]["salt"],
            "0x0000000000000000000000000000000000000000000000000000000000000089"
        );
        assert_eq!(data["message"]["nonce"], 3);
        assert_eq!(data["message"]["functionSignature"], "0x38ed1739");
        assert_eq!(data["types"]["MetaTransaction"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_digest_binds_every_field() {
        let (domain, tx) = sample();
        let digest = tx.digest(&domain);

        let mut other_nonce = tx.clone();
        other_nonce.nonce = U256::from(4);
        assert_ne!(digest, other_nonce.digest(&domain));

        let other_chain = MetaTxDomain::router(domain.verifying_contract, 80001);
        assert_ne!(digest, tx.digest(&other_chain));

        let mut other_payload = tx.clone();
        other_payload.function_signature = Bytes::from(vec![0x7f, 0xf3, 0x6a, 0xb5]);
        assert_ne!(digest, other_payload.digest(&domain));
    }
}
