//! Router V2 swap submission
//!
//! This crate turns a priced trade into router calls, probes them with gas
//! estimation, and submits the chosen one directly or through a gasless relay.

pub mod activity;
pub mod calculator;
pub mod callback;
pub mod constants;
pub mod estimate;
pub mod recipient;
pub mod router;
pub mod state;
pub mod submit;
pub mod summary;

// Re-exports
pub use activity::{ActivityEntry, ActivityLog, ActivityStatus, TransactionTracker};
pub use calculator::{maximum_amount_in, minimum_amount_out, to_significant};
pub use callback::{prepare_swap, SwapCallback, SwapCallbackState, SwapContext, SwapRequest};
pub use constants::revert_reasons;
pub use estimate::{
    classify_simulation_error, estimate_swap_call, estimate_swap_calls, select_swap_call,
    EstimatedSwapCall, SelectedSwapCall,
};
pub use recipient::{resolve_recipient, RecipientStatus};
pub use router::{
    build_swap_calls, router_address, swap_call_parameters, transaction_deadline,
    SwapCallArguments, TradeOptions,
};
pub use state::{
    Currency, CurrencyAmount, SwapCall, SwapMethod, SwapParameters, SwapResult, SwapStage, Trade,
    TradeType,
};
pub use submit::{GaslessSubmission, SwapSubmitter};
pub use summary::swap_summary;
