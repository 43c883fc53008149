//! Typed record parsing from JSON.

use crate::error::StoreError;
use crate::traits::StoreReader;
use crate::EntryJson;
use loyalty_core::LedgerRecord;
use thiserror::Error;

/// Error raised when an entry is not a ledger record.
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON did not match the record schema.
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Parses a journal entry into a [`LedgerRecord`].
pub fn parse_record(entry: &EntryJson) -> Result<LedgerRecord, ParseError> {
    Ok(serde_json::from_value(entry.clone())?)
}

/// Adapts a [`StoreReader`] to yield parsed records.
pub struct RecordReader<R: StoreReader> {
    reader: R,
}

impl<R: StoreReader> RecordReader<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: StoreReader> Iterator for RecordReader<R> {
    type Item = Result<LedgerRecord, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_next() {
            Ok(Some(entry)) => Some(parse_record(&entry).map_err(StoreError::from)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
