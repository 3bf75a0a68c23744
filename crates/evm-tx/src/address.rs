//! EVM address utilities

use std::str::FromStr;

use ethers::types::Address;
use ethers::utils::to_checksum;

/// Parse a hex address.
///
/// Accepts all-lowercase or all-uppercase hex, with or without the `0x`
/// prefix. Mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(value: &str) -> Result<Address, AddressError> {
    let body = value.strip_prefix("0x").unwrap_or(value);
    if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AddressError::InvalidAddress(value.to_string()));
    }

    let address = Address::from_str(body)
        .map_err(|_| AddressError::InvalidAddress(value.to_string()))?;

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && checksum(&address) != format!("0x{}", body) {
        return Err(AddressError::BadChecksum(value.to_string()));
    }

    Ok(address)
}

/// Returns the parsed address when `value` is a valid address, `None` otherwise
pub fn is_address(value: &str) -> Option<Address> {
    parse_address(value).ok()
}

/// EIP-55 checksummed representation
pub fn checksum(address: &Address) -> String {
    to_checksum(address, None)
}

/// Shorten an address to `0x` + first `chars` and last `chars` hex digits
pub fn shorten_address(address: &Address, chars: usize) -> String {
    let full = checksum(address);
    let chars = chars.min(20);
    format!("{}...{}", &full[..chars + 2], &full[42 - chars..])
}

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Bad address checksum: {0}")]
    BadChecksum(String),
}
