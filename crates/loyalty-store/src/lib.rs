//! Durable storage for the loyalty ledger.
//!
//! This crate provides:
//! - `StoreWriter` and `StoreReader` traits for append-only entry storage
//! - A journal-backed implementation using `loyalty-journal`
//! - Entry filters for selective iteration
//! - Typed record parsing
//! - Chain verification over a whole journal
//! - [`DurableLedger`], which persists every accepted operation before
//!   reporting it, and [`JournalLedger`], its journal-file form

#![deny(missing_docs)]

/// Error types for store operations.
pub mod error;
/// Entry filters.
pub mod filter;
/// Journal-backed storage implementation.
pub mod journal;
/// Durable ledger.
pub mod ledger;
/// Storage backend traits.
pub mod traits;
/// Typed record parsing.
pub mod typed;
/// Whole-journal chain verification.
pub mod verify;

pub use error::StoreError;
pub use filter::{
    AndFilter, EntryFilter, EventIdFilter, EventTypeFilter, FilteredReader, OrFilter,
    PrincipalFilter, SequenceRangeFilter, UserFilter,
};
pub use journal::{JournalBackendReader, JournalBackendWriter};
pub use ledger::{DurableLedger, JournalLedger, LedgerOptions};
pub use loyalty_journal::{EntryJson, ReadMode, WriteOptions};
pub use traits::{StoreReader, StoreWriter};
pub use typed::{parse_record, ParseError, RecordReader};
pub use verify::{verify_chain, ChainReport, RecordVerdict, Verdict};
