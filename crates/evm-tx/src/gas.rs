//! Gas limit math

use ethers::types::U256;
use swap_core::constants::{BIPS_BASE, GAS_ESTIMATE_BUFFER, GAS_MARGIN_BIPS};

/// Add the flat safety buffer to a raw node estimate
pub fn add_estimate_buffer(estimate: U256) -> U256 {
    estimate.saturating_add(U256::from(GAS_ESTIMATE_BUFFER))
}

/// Gas limit sent with the transaction: estimate plus 10%
pub fn calculate_gas_margin(value: U256) -> U256 {
    value.saturating_mul(U256::from(BIPS_BASE + GAS_MARGIN_BIPS)) / U256::from(BIPS_BASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_buffer_is_flat() {
        assert_eq!(add_estimate_buffer(U256::from(21_000)), U256::from(121_000));
        assert_eq!(add_estimate_buffer(U256::zero()), U256::from(100_000));
    }

    #[test]
    fn test_gas_margin() {
        assert_eq!(calculate_gas_margin(U256::from(100_000)), U256::from(110_000));
        assert_eq!(calculate_gas_margin(U256::from(15)), U256::from(16));
    }
}
