//! Swap State Types
//!
//! Data structures for trades, router calls, and swap results.

use std::fmt;

use ethers::abi::Token;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use swap_core::{Bips, SwapError};

use evm_client::{ContractCall, SubmittedTransaction};

use crate::calculator;

/// Currency of one side of a trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Currency {
    /// Chain native currency (MATIC, ETH)
    Native { symbol: String, decimals: u8 },
    /// ERC-20 token
    Token {
        address: Address,
        symbol: String,
        decimals: u8,
    },
}

impl Currency {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Native { symbol, .. } | Self::Token { symbol, .. } => symbol,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Self::Native { decimals, .. } | Self::Token { decimals, .. } => *decimals,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }
}

/// Raw amount of a currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: Currency,
    pub raw: U256,
}

impl CurrencyAmount {
    pub fn new(currency: Currency, raw: U256) -> Self {
        Self { currency, raw }
    }

    /// Human amount truncated to `digits` significant digits
    pub fn to_significant(&self, digits: usize) -> String {
        calculator::to_significant(self.raw, self.currency.decimals(), digits)
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            calculator::format_units(self.raw, self.currency.decimals()),
            self.currency.symbol()
        )
    }
}

/// Which side of the trade is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

/// Priced trade produced by the routing engine. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_type: TradeType,
    pub input_amount: CurrencyAmount,
    pub output_amount: CurrencyAmount,
    /// Token addresses along the route; native legs use the wrapped token
    pub path: Vec<Address>,
}

impl Trade {
    /// Minimum output accepted under the given slippage tolerance
    pub fn minimum_amount_out(&self, slippage: Bips) -> U256 {
        match self.trade_type {
            TradeType::ExactOutput => self.output_amount.raw,
            TradeType::ExactInput => calculator::minimum_amount_out(self.output_amount.raw, slippage),
        }
    }

    /// Maximum input spent under the given slippage tolerance
    pub fn maximum_amount_in(&self, slippage: Bips) -> U256 {
        match self.trade_type {
            TradeType::ExactInput => self.input_amount.raw,
            TradeType::ExactOutput => calculator::maximum_amount_in(self.input_amount.raw, slippage),
        }
    }
}

/// Router V2 swap methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapMethod {
    SwapExactTokensForTokens,
    SwapTokensForExactTokens,
    SwapExactEthForTokens,
    SwapTokensForExactEth,
    SwapExactTokensForEth,
    SwapEthForExactTokens,
    SwapExactTokensForTokensSupportingFeeOnTransferTokens,
    SwapExactEthForTokensSupportingFeeOnTransferTokens,
    SwapExactTokensForEthSupportingFeeOnTransferTokens,
}

impl SwapMethod {
    /// ABI method name
    pub fn name(&self) -> &'static str {
        match self {
            Self::SwapExactTokensForTokens => "swapExactTokensForTokens",
            Self::SwapTokensForExactTokens => "swapTokensForExactTokens",
            Self::SwapExactEthForTokens => "swapExactETHForTokens",
            Self::SwapTokensForExactEth => "swapTokensForExactETH",
            Self::SwapExactTokensForEth => "swapExactTokensForETH",
            Self::SwapEthForExactTokens => "swapETHForExactTokens",
            Self::SwapExactTokensForTokensSupportingFeeOnTransferTokens => {
                "swapExactTokensForTokensSupportingFeeOnTransferTokens"
            }
            Self::SwapExactEthForTokensSupportingFeeOnTransferTokens => {
                "swapExactETHForTokensSupportingFeeOnTransferTokens"
            }
            Self::SwapExactTokensForEthSupportingFeeOnTransferTokens => {
                "swapExactTokensForETHSupportingFeeOnTransferTokens"
            }
        }
    }

    /// Payable variants: the user attaches native currency, which a relayed
    /// meta-transaction cannot carry. This deliberately covers the
    /// fee-on-transfer ETH variant too, not just the two plain ETH-in methods.
    pub fn requires_native_value(&self) -> bool {
        matches!(
            self,
            Self::SwapExactEthForTokens
                | Self::SwapEthForExactTokens
                | Self::SwapExactEthForTokensSupportingFeeOnTransferTokens
        )
    }

    pub fn is_fee_on_transfer(&self) -> bool {
        matches!(
            self,
            Self::SwapExactTokensForTokensSupportingFeeOnTransferTokens
                | Self::SwapExactEthForTokensSupportingFeeOnTransferTokens
                | Self::SwapExactTokensForEthSupportingFeeOnTransferTokens
        )
    }
}

impl fmt::Display for SwapMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Method, ordered arguments, and native value of one router call
#[derive(Debug, Clone, PartialEq)]
pub struct SwapParameters {
    pub method: SwapMethod,
    pub args: Vec<Token>,
    pub value: U256,
}

/// Candidate call against the router
#[derive(Debug, Clone, PartialEq)]
pub struct SwapCall {
    pub router: Address,
    pub parameters: SwapParameters,
}

impl SwapCall {
    /// Encode into a contract call sent from `from`
    pub fn contract_call(&self, from: Address) -> Result<ContractCall, SwapError> {
        let data = evm_tx::encode_function_data(self.parameters.method.name(), &self.parameters.args)?;
        Ok(ContractCall {
            from,
            to: self.router,
            data,
            value: self.parameters.value,
        })
    }
}

/// Result of a successful swap submission
#[derive(Debug, Clone)]
pub struct SwapResult {
    pub response: SubmittedTransaction,
    pub summary: String,
}

/// Progress of one swap invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStage {
    Building,
    Estimating,
    Selected,
    Submitting,
    ConfirmedSubmission,
    SubmitFailed,
    NoneViable,
}

impl SwapStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Building => "BUILDING",
            Self::Estimating => "ESTIMATING",
            Self::Selected => "SELECTED",
            Self::Submitting => "SUBMITTING",
            Self::ConfirmedSubmission => "CONFIRMED_SUBMISSION",
            Self::SubmitFailed => "SUBMIT_FAILED",
            Self::NoneViable => "NONE_VIABLE",
        }
    }

    /// No further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ConfirmedSubmission | Self::SubmitFailed | Self::NoneViable
        )
    }
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_method_flags() {
        assert!(SwapMethod::SwapEthForExactTokens.requires_native_value());
        assert!(!SwapMethod::SwapTokensForExactEth.requires_native_value());
        assert!(SwapMethod::SwapExactEthForTokensSupportingFeeOnTransferTokens.requires_native_value());
        assert!(SwapMethod::SwapExactTokensForEthSupportingFeeOnTransferTokens.is_fee_on_transfer());
        assert_eq!(
            SwapMethod::SwapExactEthForTokens.to_string(),
            "swapExactETHForTokens"
        );
    }

    #[test]
    fn test_currency_amount_display() {
        let amount = CurrencyAmount::new(
            Currency::Native {
                symbol: "MATIC".to_string(),
                decimals: 18,
            },
            U256::from(15u64) * U256::exp10(17),
        );
        assert_eq!(amount.to_string(), "1.5 MATIC");
        assert_eq!(amount.to_significant(3), "1.5");
    }

    #[test]
    fn test_stage_terminal() {
        assert!(SwapStage::NoneViable.is_terminal());
        assert!(!SwapStage::Selected.is_terminal());
        assert_eq!(
            serde_json::to_string(&SwapStage::ConfirmedSubmission).unwrap(),
            "\"CONFIRMED_SUBMISSION\""
        );
    }
}
