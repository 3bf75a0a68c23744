//! Amount Calculator
//!
//! Slippage bounds and display formatting over raw token amounts.

use ethers::types::{U256, U512};
use swap_core::constants::BIPS_BASE;
use swap_core::Bips;

/// Minimum output for an exact-input trade
///
/// Formula: output * BIPS_BASE / (BIPS_BASE + slippage)
pub fn minimum_amount_out(output: U256, slippage: Bips) -> U256 {
    let numerator = output.full_mul(U256::from(BIPS_BASE));
    let denominator = U512::from(BIPS_BASE + slippage);
    U256::try_from(numerator / denominator).unwrap_or(U256::MAX)
}

/// Maximum input for an exact-output trade
///
/// Formula: input * (BIPS_BASE + slippage) / BIPS_BASE
pub fn maximum_amount_in(input: U256, slippage: Bips) -> U256 {
    let numerator = input.full_mul(U256::from(BIPS_BASE + slippage));
    let denominator = U512::from(BIPS_BASE);
    U256::try_from(numerator / denominator).unwrap_or(U256::MAX)
}

/// Format a raw amount truncated (rounded down) to `significant` digits.
///
/// Trailing fractional zeros are dropped and no group separators are used,
/// e.g. 19.98 -> "19.9", 1234.5 -> "1230", 0.0012345 -> "0.00123".
pub fn to_significant(raw: U256, decimals: u8, significant: usize) -> String {
    if raw.is_zero() || significant == 0 {
        return "0".to_string();
    }

    let digits = raw.to_string();
    if digits.len() <= significant {
        return format_digits(&digits, decimals as usize);
    }

    let kept = &digits[..significant];
    let dropped = digits.len() - significant;
    let scaled = format!("{}{}", kept, "0".repeat(dropped));
    format_digits(&scaled, decimals as usize)
}

/// Exact decimal representation of a raw amount
pub fn format_units(raw: U256, decimals: u8) -> String {
    format_digits(&raw.to_string(), decimals as usize)
}

fn format_digits(digits: &str, decimals: usize) -> String {
    let (int_part, frac_part) = if digits.len() > decimals {
        let split = digits.len() - decimals;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        (
            "0".to_string(),
            format!("{}{}", "0".repeat(decimals - digits.len()), digits),
        )
    };

    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        int_part
    } else {
        format!("{}.{}", int_part, frac)
    }
}
