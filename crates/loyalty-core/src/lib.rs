//! Ledger state and state transitions for the loyalty program.
//!
//! This crate provides:
//! - [`LedgerStore`], the single aggregate holding the owner, the reward
//!   catalog, and point balances
//! - [`LedgerEvent`] notifications returned with every accepted transition
//! - [`SharedLedger`], a mutex-guarded single writer for concurrent callers
//! - [`LedgerRecord`] and [`RecordChain`], the hash-chained envelope used to
//!   persist events, and [`replay`] to rebuild state from them
//!
//! Core invariants:
//! - Reward ids run 1, 2, 3, ... with no gaps and no reuse
//! - Balances never go negative
//! - Owner-gated operations check the caller against the owner held by the
//!   same aggregate they mutate
//! - A rejected operation changes nothing and emits nothing
//!
#![deny(missing_docs)]

/// Error types for ledger operations and replay.
pub mod errors;
/// Ledger events and the sink trait.
pub mod events;
/// The ledger aggregate.
pub mod ledger;
/// Journal record envelope and hash chain.
pub mod record;
/// Rebuilding a ledger from records.
pub mod replay;
/// Mutex-guarded shared ledger.
pub mod shared;

pub use errors::{LedgerError, ReplayError};
pub use events::{EventSink, LedgerEvent, Transition};
pub use ledger::{LedgerStore, Points, RewardId, REDEMPTION_COST};
pub use record::{LedgerRecord, RecordChain, RECORD_VERSION};
pub use replay::{replay, Replayer};
pub use shared::SharedLedger;
