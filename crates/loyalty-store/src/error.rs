//! Error types for store operations.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] loyalty_journal::JournalError),
    /// Entry could not be parsed as a ledger record.
    #[error("parse error: {0}")]
    Parse(#[from] crate::typed::ParseError),
    /// Record could not be encoded.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    /// Operation rejected by the ledger.
    #[error(transparent)]
    Ledger(#[from] loyalty_core::LedgerError),
    /// Stored records do not form a valid ledger.
    #[error("replay failed: {0}")]
    Replay(#[from] loyalty_core::ReplayError),
    /// Record could not be sealed.
    #[error("event id error: {0}")]
    EventId(#[from] loyalty_canonical::EventIdError),
    /// Tried to create a ledger in a journal that already holds records.
    #[error("journal {0} already holds a ledger")]
    AlreadyInitialized(String),
}
