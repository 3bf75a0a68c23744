//! Configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DEADLINE_FROM_NOW, INITIAL_ALLOWED_SLIPPAGE, ROUTER_ADDRESS};
use crate::{Bips, Network, Timestamp};

/// JSON-RPC endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Node URL (e.g., "https://polygon-rpc.com")
    pub url: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://polygon-rpc.com".to_string(),
        }
    }
}

/// Router contract configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Router V2 address (also the meta-transaction verifying contract)
    #[serde(default = "default_router_address")]
    pub address: String,
}

fn default_router_address() -> String {
    ROUTER_ADDRESS.to_string()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            address: default_router_address(),
        }
    }
}

/// Gasless (meta-transaction) mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GaslessConfig {
    /// Route eligible swaps through the relay
    #[serde(default)]
    pub enabled: bool,

    /// Relay endpoint accepting signed meta-transactions
    #[serde(default)]
    pub relay_url: String,

    /// Relay API key (optional)
    #[serde(default)]
    pub api_key: String,

    /// Relay API id of the `executeMetaTransaction` method (optional)
    #[serde(default)]
    pub api_id: String,
}

/// User swap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapSettings {
    /// Slippage tolerance in basis points
    #[serde(default = "default_slippage")]
    pub allowed_slippage_bips: Bips,

    /// Deadline offset in seconds from submission time
    #[serde(default = "default_deadline")]
    pub deadline_from_now_secs: Timestamp,
}

fn default_slippage() -> Bips {
    INITIAL_ALLOWED_SLIPPAGE
}

fn default_deadline() -> Timestamp {
    DEFAULT_DEADLINE_FROM_NOW
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            allowed_slippage_bips: default_slippage(),
            deadline_from_now_secs: default_deadline(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RPC connection settings
    pub rpc: RpcConfig,

    /// Network the router is deployed on
    pub network: Network,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub gasless: GaslessConfig,

    #[serde(default)]
    pub swap: SwapSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            network: Network::Matic,
            router: RouterConfig::default(),
            gasless: GaslessConfig::default(),
            swap: SwapSettings::default(),
        }
    }
}
