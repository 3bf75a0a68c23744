//! Swap Call Builder
//!
//! Turns a trade into router call candidates. Exact-input trades get a
//! second, fee-on-transfer tolerant candidate after the baseline one.
//!
//! # Method table
//!
//! | trade     | native in               | native out              | tokens only                |
//! |-----------|-------------------------|-------------------------|----------------------------|
//! | exact-in  | swapExactETHForTokens   | swapExactTokensForETH   | swapExactTokensForTokens   |
//! | exact-out | swapETHForExactTokens   | swapTokensForExactETH   | swapTokensForExactTokens   |

use ethers::abi::Token;
use ethers::types::{Address, U256};
use swap_core::constants::BIPS_BASE;
use swap_core::{Bips, ChainId, RouterConfig, SwapError, Timestamp};

use crate::state::{SwapCall, SwapMethod, SwapParameters, Trade, TradeType};

/// Options shared by every candidate of one trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeOptions {
    pub allowed_slippage: Bips,
    pub recipient: Address,
    /// Absolute unix deadline
    pub deadline: Timestamp,
    pub fee_on_transfer: bool,
}

/// Configured router address, if it parses
pub fn router_address(config: &RouterConfig) -> Option<Address> {
    match evm_tx::parse_address(&config.address) {
        Ok(address) => Some(address),
        Err(e) => {
            tracing::warn!(address = %config.address, error = %e, "Invalid router address in config");
            None
        }
    }
}

/// Absolute deadline: the explicit one if set, otherwise `now + ttl`
pub fn transaction_deadline(explicit: Option<Timestamp>, now: Timestamp, ttl: Timestamp) -> Timestamp {
    explicit.unwrap_or_else(|| now.saturating_add(ttl))
}

/// Router method, arguments, and value for a trade
pub fn swap_call_parameters(trade: &Trade, options: &TradeOptions) -> Result<SwapParameters, SwapError> {
    if options.allowed_slippage > BIPS_BASE {
        return Err(SwapError::InvalidSlippage(options.allowed_slippage));
    }
    if trade.path.len() < 2 {
        return Err(SwapError::InvalidTrade("route path needs at least two tokens".to_string()));
    }

    let ether_in = trade.input_amount.currency.is_native();
    let ether_out = trade.output_amount.currency.is_native();
    if ether_in && ether_out {
        return Err(SwapError::InvalidTrade("native currency on both sides".to_string()));
    }

    let amount_in = Token::Uint(trade.maximum_amount_in(options.allowed_slippage));
    let amount_out = Token::Uint(trade.minimum_amount_out(options.allowed_slippage));
    let path = Token::Array(trade.path.iter().copied().map(Token::Address).collect());
    let to = Token::Address(options.recipient);
    let deadline = Token::Uint(U256::from(options.deadline));
    let fot = options.fee_on_transfer;

    let parameters = match trade.trade_type {
        TradeType::ExactInput => {
            if ether_in {
                SwapParameters {
                    method: if fot {
                        SwapMethod::SwapExactEthForTokensSupportingFeeOnTransferTokens
                    } else {
                        SwapMethod::SwapExactEthForTokens
                    },
                    args: vec![amount_out, path, to, deadline],
                    value: trade.maximum_amount_in(options.allowed_slippage),
                }
            } else if ether_out {
                SwapParameters {
                    method: if fot {
                        SwapMethod::SwapExactTokensForEthSupportingFeeOnTransferTokens
                    } else {
                        SwapMethod::SwapExactTokensForEth
                    },
                    args: vec![amount_in, amount_out, path, to, deadline],
                    value: U256::zero(),
                }
            } else {
                SwapParameters {
                    method: if fot {
                        SwapMethod::SwapExactTokensForTokensSupportingFeeOnTransferTokens
                    } else {
                        SwapMethod::SwapExactTokensForTokens
                    },
                    args: vec![amount_in, amount_out, path, to, deadline],
                    value: U256::zero(),
                }
            }
        }
        TradeType::ExactOutput => {
            if fot {
                return Err(SwapError::InvalidTrade(
                    "fee-on-transfer is not supported for exact-output trades".to_string(),
                ));
            }
            if ether_in {
                SwapParameters {
                    method: SwapMethod::SwapEthForExactTokens,
                    args: vec![amount_out, path, to, deadline],
                    value: trade.maximum_amount_in(options.allowed_slippage),
                }
            } else if ether_out {
                SwapParameters {
                    method: SwapMethod::SwapTokensForExactEth,
                    args: vec![amount_out, amount_in, path, to, deadline],
                    value: U256::zero(),
                }
            } else {
                SwapParameters {
                    method: SwapMethod::SwapTokensForExactTokens,
                    args: vec![amount_out, amount_in, path, to, deadline],
                    value: U256::zero(),
                }
            }
        }
    };

    Ok(parameters)
}

/// Inputs of the call builder. Missing pieces yield no candidates.
#[derive(Debug, Clone, Copy)]
pub struct SwapCallArguments<'a> {
    pub trade: Option<&'a Trade>,
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
    /// Router of the connected chain, if the wallet is connected to a supported one
    pub router: Option<Address>,
    /// Resolved recipient; `None` if the override could not be resolved
    pub recipient: Option<Address>,
    pub allowed_slippage: Bips,
    pub deadline: Timestamp,
}

/// Build the ordered call candidates for a trade
pub fn build_swap_calls(args: &SwapCallArguments<'_>) -> Result<Vec<SwapCall>, SwapError> {
    let (Some(trade), Some(_account), Some(_chain_id), Some(router), Some(recipient)) =
        (args.trade, args.account, args.chain_id, args.router, args.recipient)
    else {
        return Ok(Vec::new());
    };

    let mut options = TradeOptions {
        allowed_slippage: args.allowed_slippage,
        recipient,
        deadline: args.deadline,
        fee_on_transfer: false,
    };

    let mut calls = vec![SwapCall {
        router,
        parameters: swap_call_parameters(trade, &options)?,
    }];

    if trade.trade_type == TradeType::ExactInput {
        options.fee_on_transfer = true;
        calls.push(SwapCall {
            router,
            parameters: swap_call_parameters(trade, &options)?,
        });
    }

    Ok(calls)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::{Currency, CurrencyAmount};

    pub(crate) fn token(byte: u8, symbol: &str) -> Currency {
        Currency::Token {
            address: Address::repeat_byte(byte),
            symbol: symbol.to_string(),
            decimals: 18,
        }
    }

    pub(crate) fn matic() -> Currency {
        Currency::Native {
            symbol: "MATIC".to_string(),
            decimals: 18,
        }
    }

    pub(crate) fn ether(amount: u64) -> U256 {
        U256::from(amount) * U256::exp10(18)
    }

    pub(crate) fn trade(trade_type: TradeType, input: Currency, output: Currency) -> Trade {
        Trade {
            trade_type,
            input_amount: CurrencyAmount::new(input, ether(10)),
            output_amount: CurrencyAmount::new(output, ether(20)),
            path: vec![Address::repeat_byte(0x0a), Address::repeat_byte(0x0b)],
        }
    }

    fn arguments(trade: &Trade) -> SwapCallArguments<'_> {
        SwapCallArguments {
            trade: Some(trade),
            account: Some(Address::repeat_byte(0x11)),
            chain_id: Some(137),
            router: Some(Address::repeat_byte(0xaa)),
            recipient: Some(Address::repeat_byte(0x11)),
            allowed_slippage: 50,
            deadline: 1_700_000_000,
        }
    }

    #[test]
    fn test_exact_input_yields_two_candidates() {
        let t = trade(TradeType::ExactInput, token(0x0a, "TOKEN_A"), token(0x0b, "TOKEN_B"));
        let calls = build_swap_calls(&arguments(&t)).unwrap();

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].parameters.method, SwapMethod::SwapExactTokensForTokens);
        assert_eq!(
            calls[1].parameters.method,
            SwapMethod::SwapExactTokensForTokensSupportingFeeOnTransferTokens
        );
        // Same recipient and deadline on both
        assert_eq!(calls[0].parameters.args[3], calls[1].parameters.args[3]);
        assert_eq!(calls[0].parameters.args[4], calls[1].parameters.args[4]);
    }

    #[test]
    fn test_exact_output_yields_one_candidate() {
        let t = trade(TradeType::ExactOutput, token(0x0a, "TOKEN_A"), token(0x0b, "TOKEN_B"));
        let calls = build_swap_calls(&arguments(&t)).unwrap();

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].parameters.method, SwapMethod::SwapTokensForExactTokens);
        // amountOut exact, amountInMax = 10 * 1.005
        assert_eq!(calls[0].parameters.args[0], Token::Uint(ether(20)));
        assert_eq!(
            calls[0].parameters.args[1],
            Token::Uint(U256::from(10_050u64) * U256::exp10(15))
        );
    }

    #[test]
    fn test_missing_dependencies_yield_no_candidates() {
        let t = trade(TradeType::ExactInput, token(0x0a, "TOKEN_A"), token(0x0b, "TOKEN_B"));

        let mut args = arguments(&t);
        args.account = None;
        assert!(build_swap_calls(&args).unwrap().is_empty());

        let mut args = arguments(&t);
        args.recipient = None;
        assert!(build_swap_calls(&args).unwrap().is_empty());

        let mut args = arguments(&t);
        args.trade = None;
        assert!(build_swap_calls(&args).unwrap().is_empty());

        let mut args = arguments(&t);
        args.chain_id = None;
        args.router = None;
        assert!(build_swap_calls(&args).unwrap().is_empty());
    }

    #[test]
    fn test_native_input_attaches_value() {
        let t = trade(TradeType::ExactInput, matic(), token(0x0b, "TOKEN_B"));
        let calls = build_swap_calls(&arguments(&t)).unwrap();

        assert_eq!(calls[0].parameters.method, SwapMethod::SwapExactEthForTokens);
        assert_eq!(calls[0].parameters.value, ether(10));
        assert_eq!(calls[0].parameters.args.len(), 4);
        assert!(calls[0].parameters.method.requires_native_value());
        assert!(calls[1].parameters.method.requires_native_value());
    }

    #[test]
    fn test_native_output_methods() {
        let t = trade(TradeType::ExactOutput, token(0x0a, "TOKEN_A"), matic());
        let calls = build_swap_calls(&arguments(&t)).unwrap();
        assert_eq!(calls[0].parameters.method, SwapMethod::SwapTokensForExactEth);
        assert!(calls[0].parameters.value.is_zero());

        let t = trade(TradeType::ExactInput, token(0x0a, "TOKEN_A"), matic());
        let calls = build_swap_calls(&arguments(&t)).unwrap();
        assert_eq!(
            calls[1].parameters.method,
            SwapMethod::SwapExactTokensForEthSupportingFeeOnTransferTokens
        );
    }

    #[test]
    fn test_minimum_output_uses_slippage() {
        let t = trade(TradeType::ExactInput, token(0x0a, "TOKEN_A"), token(0x0b, "TOKEN_B"));
        let calls = build_swap_calls(&arguments(&t)).unwrap();
        // 20 * 10000 / 10050
        let expected = ether(20) * U256::from(10_000) / U256::from(10_050);
        assert_eq!(calls[0].parameters.args[1], Token::Uint(expected));
    }

    #[test]
    fn test_invalid_trades() {
        let t = trade(TradeType::ExactInput, matic(), matic());
        assert!(matches!(
            build_swap_calls(&arguments(&t)),
            Err(SwapError::InvalidTrade(_))
        ));

        let t = trade(TradeType::ExactInput, token(0x0a, "TOKEN_A"), token(0x0b, "TOKEN_B"));
        let mut args = arguments(&t);
        args.allowed_slippage = 10_001;
        assert_eq!(build_swap_calls(&args), Err(SwapError::InvalidSlippage(10_001)));
    }

    #[test]
    fn test_router_address_from_config() {
        assert!(router_address(&RouterConfig::default()).is_some());
        assert_eq!(
            router_address(&RouterConfig {
                address: "not-an-address".to_string()
            }),
            None
        );
    }

    #[test]
    fn test_transaction_deadline() {
        assert_eq!(transaction_deadline(None, 1_000, 1_200), 2_200);
        assert_eq!(transaction_deadline(Some(5_000), 1_000, 1_200), 5_000);
    }

    #[test]
    fn test_candidates_encode() {
        let t = trade(TradeType::ExactInput, token(0x0a, "TOKEN_A"), token(0x0b, "TOKEN_B"));
        for call in build_swap_calls(&arguments(&t)).unwrap() {
            let encoded = call.contract_call(Address::repeat_byte(0x11)).unwrap();
            assert_eq!(encoded.to, Address::repeat_byte(0xaa));
            assert!(encoded.data.len() > 4);
        }
    }
}
