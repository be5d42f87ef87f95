//! IPPAN Rebase Economics: elastic supply driven by on-chain activity
//!
//! Per-block epoch accounting, activity-scaled multiplier growth with a hard
//! supply ceiling, perks issuance signalling, and fixed-point conversion
//! between stored and displayed balances.
//!
//! Multiplier unit: fixed-point with scale 10^8 (100_000_000 = 1.0).

pub mod types;
pub mod errors;
pub mod params;
pub mod fixed_point;
pub mod engine;
pub mod source;
pub mod perks;
pub mod verify;

pub use types::*;
pub use errors::*;
pub use params::*;
pub use fixed_point::*;
pub use engine::*;
pub use source::*;
pub use perks::*;
pub use verify::*;

/// Commonly used items for consensus integration
pub mod prelude {
    pub use crate::engine::{RebaseEngine, ReplaySummary};
    pub use crate::errors::RebaseError;
    pub use crate::fixed_point::{get_rebased_amount, get_transfer_amount, SCALE};
    pub use crate::params::RebaseParams;
    pub use crate::perks::{PerksGate, PerksIssuance};
    pub use crate::source::{FixedTxCount, RecordedTxCounts, TxCountSource};
    pub use crate::types::{Amount, BlockNumber, EpochOutcome, EpochTransition, RebaseInfo};
}

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
