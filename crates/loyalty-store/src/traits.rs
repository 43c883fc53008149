use crate::error::StoreError;
use crate::EntryJson;

/// Append-only sink for journal entries.
pub trait StoreWriter {
    /// Appends one entry. On error nothing is appended.
    fn append(&mut self, entry: &EntryJson) -> Result<(), StoreError>;

    /// Position to pass to [`rollback`](Self::rollback) to undo every
    /// entry appended after this call.
    fn position(&self) -> u64;

    /// Discards the entries appended since `position` was taken.
    fn rollback(&mut self, position: u64) -> Result<(), StoreError>;

    /// Makes appended entries durable per the backend's options.
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Flushes and releases the backend.
    fn finish(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

/// Sequential source of journal entries.
pub trait StoreReader {
    /// Returns the next entry, or `None` at the end.
    fn read_next(&mut self) -> Result<Option<EntryJson>, StoreError>;
}
