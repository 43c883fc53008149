//! Command implementations.

pub mod init;
pub mod list;
pub mod ops;
pub mod query;
pub mod verify;

use crate::config::CliConfig;
use loyalty_canonical::PrincipalId;
use loyalty_core::{LedgerError, LedgerStore};
use loyalty_store::{JournalLedger, LedgerOptions, WriteOptions};
use std::path::PathBuf;

/// Result type shared by every command.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Resolved settings a command runs with.
pub struct Context {
    /// Journal file holding the ledger.
    pub journal: PathBuf,
    /// Options for opening the ledger.
    pub options: LedgerOptions,
}

impl Context {
    /// Builds the context from configuration and an optional `--journal`.
    pub fn new(config: &CliConfig, journal: Option<PathBuf>) -> Self {
        let options = LedgerOptions {
            write: WriteOptions {
                sync: config.sync,
                ..WriteOptions::default()
            },
            ..LedgerOptions::default()
        };
        Self {
            journal: journal.unwrap_or_else(|| config.journal.clone()),
            options,
        }
    }

    /// Opens the ledger, replaying its journal.
    pub fn open_ledger(&self) -> Result<JournalLedger, Box<dyn std::error::Error>> {
        JournalLedger::open(&self.journal, self.options.clone()).map_err(|e| {
            format!("cannot open ledger {}: {}", self.journal.display(), e).into()
        })
    }

    /// Rebuilds the ledger state for a query without opening the journal
    /// for writing.
    pub fn load_ledger(&self) -> Result<LedgerStore, Box<dyn std::error::Error>> {
        JournalLedger::load(&self.journal, &self.options).map_err(|e| {
            format!("cannot open ledger {}: {}", self.journal.display(), e).into()
        })
    }
}

/// Parses a principal given on the command line.
pub fn principal(value: &str) -> Result<PrincipalId, LedgerError> {
    PrincipalId::parse(value).map_err(|e| LedgerError::InvalidArgument(e.to_string()))
}

/// Parses a non-negative integer argument.
pub fn non_negative(name: &str, value: &str) -> Result<u64, LedgerError> {
    value.parse::<u64>().map_err(|_| {
        LedgerError::InvalidArgument(format!(
            "{} must be a non-negative integer, got '{}'",
            name, value
        ))
    })
}
