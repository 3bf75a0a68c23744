//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// EVM chain id
pub type ChainId = u64;

/// Unix timestamp in seconds
pub type Timestamp = u64;

/// Slippage tolerance or fee expressed in basis points (10000 = 100%)
pub type Bips = u32;

/// Supported networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Matic,
    Mumbai,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matic => "matic",
            Self::Mumbai => "mumbai",
        }
    }

    pub fn chain_id(&self) -> ChainId {
        match self {
            Self::Matic => 137,
            Self::Mumbai => 80001,
        }
    }

    pub fn from_chain_id(chain_id: ChainId) -> Option<Self> {
        match chain_id {
            137 => Some(Self::Matic),
            80001 => Some(Self::Mumbai),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constants
pub mod constants {
    use super::{Bips, Timestamp};

    /// Denominator for basis point fractions
    pub const BIPS_BASE: Bips = 10_000;

    /// Default slippage tolerance (0.50%)
    pub const INITIAL_ALLOWED_SLIPPAGE: Bips = 50;

    /// Deadline offset used when no explicit transaction deadline is set (20 minutes)
    pub const DEFAULT_DEADLINE_FROM_NOW: Timestamp = 60 * 20;

    /// Flat buffer added to every successful gas estimate
    pub const GAS_ESTIMATE_BUFFER: u64 = 100_000;

    /// Extra gas limit applied on top of the buffered estimate (10%)
    pub const GAS_MARGIN_BIPS: Bips = 1_000;

    /// JSON-RPC error code wallets use when the user declines a request (EIP-1193)
    pub const USER_REJECTED_CODE: i64 = 4001;

    /// Router V2 deployment on Polygon
    pub const ROUTER_ADDRESS: &str = "0xa5E0829CaCEd8fFDD4De3c43696c57F7D7A678ff";

    /// EIP-712 domain name of the meta-transaction enabled router
    pub const META_TX_DOMAIN_NAME: &str = "QUICKSWAP_ROUTER_V2";

    /// EIP-712 domain version of the meta-transaction enabled router
    pub const META_TX_DOMAIN_VERSION: &str = "2";
}
