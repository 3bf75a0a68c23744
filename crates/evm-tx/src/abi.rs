//! Router ABI and calldata encoding
//!
//! The meta-transaction enabled router exposes the standard V2 swap methods
//! plus `getNonce` / `executeMetaTransaction` for relayed calls.

use ethers::abi::{parse_abi, Abi, Token};
use ethers::types::Bytes;
use lazy_static::lazy_static;
use thiserror::Error;

lazy_static! {
    pub static ref ROUTER_ABI: Abi = parse_abi(&[
        "function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external returns (uint256[] amounts)",
        "function swapTokensForExactTokens(uint256 amountOut, uint256 amountInMax, address[] path, address to, uint256 deadline) external returns (uint256[] amounts)",
        "function swapExactETHForTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline) external payable returns (uint256[] amounts)",
        "function swapTokensForExactETH(uint256 amountOut, uint256 amountInMax, address[] path, address to, uint256 deadline) external returns (uint256[] amounts)",
        "function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external returns (uint256[] amounts)",
        "function swapETHForExactTokens(uint256 amountOut, address[] path, address to, uint256 deadline) external payable returns (uint256[] amounts)",
        "function swapExactTokensForTokensSupportingFeeOnTransferTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external",
        "function swapExactETHForTokensSupportingFeeOnTransferTokens(uint256 amountOutMin, address[] path, address to, uint256 deadline) external payable",
        "function swapExactTokensForETHSupportingFeeOnTransferTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external",
        "function getNonce(address user) external view returns (uint256 nonce)",
        "function executeMetaTransaction(address userAddress, bytes functionSignature, bytes32 sigR, bytes32 sigS, uint8 sigV) external payable returns (bytes)",
    ])
    .expect("router ABI is valid");
}

/// Encode `method(args...)` against the router ABI
pub fn encode_function_data(method: &str, args: &[Token]) -> Result<Bytes, EncodeError> {
    let function = ROUTER_ABI
        .function(method)
        .map_err(|_| EncodeError::UnknownMethod(method.to_string()))?;
    let data = function
        .encode_input(args)
        .map_err(|e| EncodeError::InvalidArguments {
            method: method.to_string(),
            message: e.to_string(),
        })?;
    Ok(Bytes::from(data))
}

/// Decode the return data of a router method
pub fn decode_function_output(method: &str, data: &[u8]) -> Result<Vec<Token>, EncodeError> {
    let function = ROUTER_ABI
        .function(method)
        .map_err(|_| EncodeError::UnknownMethod(method.to_string()))?;
    function
        .decode_output(data)
        .map_err(|e| EncodeError::InvalidOutput {
            method: method.to_string(),
            message: e.to_string(),
        })
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Unknown router method: {0}")]
    UnknownMethod(String),
    #[error("Invalid arguments for {method}: {message}")]
    InvalidArguments { method: String, message: String },
    #[error("Invalid return data for {method}: {message}")]
    InvalidOutput { method: String, message: String },
}

impl From<EncodeError> for swap_core::SwapError {
    fn from(e: EncodeError) -> Self {
        swap_core::SwapError::Encoding(e.to_string())
    }
}
