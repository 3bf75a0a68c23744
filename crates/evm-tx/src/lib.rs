//! evm-tx: Transaction building utilities for the router
//!
//! Provides router ABI encoding, address helpers, and gas limit math.

pub mod abi;
pub mod address;
pub mod gas;

pub use abi::{decode_function_output, encode_function_data, EncodeError, ROUTER_ABI};
pub use address::{checksum, is_address, parse_address, shorten_address, AddressError};
pub use gas::{add_estimate_buffer, calculate_gas_margin};
