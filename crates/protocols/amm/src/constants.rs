//! Router V2 Constants

/// Router revert reasons that mean the price moved past the slippage tolerance
pub mod revert_reasons {
    pub const INSUFFICIENT_OUTPUT_AMOUNT: &str = "UniswapV2Router: INSUFFICIENT_OUTPUT_AMOUNT";
    pub const EXCESSIVE_INPUT_AMOUNT: &str = "UniswapV2Router: EXCESSIVE_INPUT_AMOUNT";

    pub fn is_slippage_reason(reason: &str) -> bool {
        reason == INSUFFICIENT_OUTPUT_AMOUNT || reason == EXCESSIVE_INPUT_AMOUNT
    }
}

/// Significant digits used for amounts in activity summaries
pub const SUMMARY_SIGNIFICANT_DIGITS: usize = 3;

/// Hex digits kept on each side when shortening a recipient address
pub const SHORTEN_ADDRESS_CHARS: usize = 4;
