//! Activity summaries for submitted swaps

use ethers::types::Address;

use crate::constants::{SHORTEN_ADDRESS_CHARS, SUMMARY_SIGNIFICANT_DIGITS};
use crate::state::Trade;

/// "Swap {in} {inSymbol} for {out} {outSymbol}", plus " to {recipient}"
/// when the swap pays out to someone other than the sender.
///
/// Hex recipients are shortened; names are shown as typed.
pub fn swap_summary(
    trade: &Trade,
    account: Address,
    recipient: Address,
    recipient_input: Option<&str>,
) -> String {
    let base = format!(
        "Swap {} {} for {} {}",
        trade.input_amount.to_significant(SUMMARY_SIGNIFICANT_DIGITS),
        trade.input_amount.currency.symbol(),
        trade.output_amount.to_significant(SUMMARY_SIGNIFICANT_DIGITS),
        trade.output_amount.currency.symbol(),
    );

    if recipient == account {
        return base;
    }

    let display = match recipient_input.map(str::trim).filter(|s| !s.is_empty()) {
        Some(input) => match evm_tx::is_address(input) {
            Some(address) => evm_tx::shorten_address(&address, SHORTEN_ADDRESS_CHARS),
            None => input.to_string(),
        },
        None => evm_tx::shorten_address(&recipient, SHORTEN_ADDRESS_CHARS),
    };

    format!("{} to {}", base, display)
}
