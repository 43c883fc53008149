use crate::error::StoreError;
use crate::traits::{StoreReader, StoreWriter};
use crate::EntryJson;
use loyalty_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
use std::path::Path;

/// [`StoreWriter`] over a journal file.
pub struct JournalBackendWriter {
    writer: JournalWriter,
}

impl JournalBackendWriter {
    /// Opens or creates the journal at `path` for appending.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, StoreError> {
        Ok(Self {
            writer: JournalWriter::open(path, options)?,
        })
    }

    /// Whether the journal holds no entries yet.
    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }
}

impl StoreWriter for JournalBackendWriter {
    fn append(&mut self, entry: &EntryJson) -> Result<(), StoreError> {
        Ok(self.writer.append_entry(entry)?)
    }

    fn position(&self) -> u64 {
        self.writer.len()
    }

    fn rollback(&mut self, position: u64) -> Result<(), StoreError> {
        Ok(self.writer.rollback_to(position)?)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(self.writer.flush()?)
    }

    fn finish(self) -> Result<(), StoreError> {
        Ok(self.writer.finish()?)
    }
}

/// [`StoreReader`] over a journal file.
pub struct JournalBackendReader {
    reader: JournalReader,
}

impl JournalBackendReader {
    /// Opens the journal at `path`.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, StoreError> {
        Ok(Self {
            reader: JournalReader::open(path, mode)?,
        })
    }

    /// Offset just past the last complete entry read.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    /// Whether a permissive read stopped at a torn entry.
    pub fn hit_torn_tail(&self) -> bool {
        self.reader.hit_torn_tail()
    }
}

impl StoreReader for JournalBackendReader {
    fn read_next(&mut self) -> Result<Option<EntryJson>, StoreError> {
        Ok(self.reader.read_entry()?)
    }
}
