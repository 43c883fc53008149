use crate::errors::JournalError;
use crate::event::EntryJson;
use crate::frame::{FrameKind, JournalHeader, RecordFrame};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Options for opening a journal for writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// fsync after every append (default: false).
    pub sync: bool,
    /// Create the file if it does not exist (default: true).
    pub create: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
        }
    }
}

/// Appends frames to a journal file.
///
/// Each append writes the frame header and payload in one buffer. If the
/// write fails part way, the file is cut back to its previous length so a
/// failed append leaves nothing behind.
pub struct JournalWriter {
    file: File,
    sync: bool,
    len: u64,
}

impl JournalWriter {
    /// Opens or creates a journal for appending.
    ///
    /// An empty file receives a fresh header. A non-empty file must start
    /// with a valid header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .write(true)
            .open(path.as_ref())?;

        let len = file.metadata()?.len();
        let mut writer = if len == 0 {
            file.write_all(&JournalHeader::new().to_bytes())?;
            Self {
                file,
                sync: options.sync,
                len: JournalHeader::SIZE as u64,
            }
        } else if len < JournalHeader::SIZE as u64 {
            return Err(JournalError::TooShort(len));
        } else {
            let mut header = [0u8; JournalHeader::SIZE];
            file.read_exact(&mut header)?;
            JournalHeader::from_bytes(&header)?;
            Self {
                file,
                sync: options.sync,
                len,
            }
        };
        writer.file.seek(SeekFrom::Start(writer.len))?;
        writer.sync_if_requested()?;
        debug!(path = %path.as_ref().display(), len = writer.len, "journal opened for append");
        Ok(writer)
    }

    /// Cuts a journal back to `len` bytes, discarding a torn tail found by a
    /// permissive read. `len` may not cut into the header.
    pub fn truncate<P: AsRef<Path>>(path: P, len: u64) -> Result<(), JournalError> {
        if len < JournalHeader::SIZE as u64 {
            return Err(JournalError::TooShort(len));
        }
        let file = OpenOptions::new().write(true).open(path.as_ref())?;
        let before = file.metadata()?.len();
        if before > len {
            warn!(path = %path.as_ref().display(), before, after = len, "discarding torn journal tail");
            file.set_len(len)?;
            file.sync_all()?;
        }
        Ok(())
    }

    /// Current file length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true when the journal holds only its header.
    pub fn is_empty(&self) -> bool {
        self.len == JournalHeader::SIZE as u64
    }

    /// Cuts the journal back to `len`, discarding frames appended since
    /// [`len`](Self::len) returned it.
    pub fn rollback_to(&mut self, len: u64) -> Result<(), JournalError> {
        if len < JournalHeader::SIZE as u64 || len > self.len {
            return Err(JournalError::InvalidRollback {
                offset: len,
                len: self.len,
            });
        }
        if len < self.len {
            warn!(before = self.len, after = len, "rolling back journal");
            self.file.set_len(len)?;
            self.file.seek(SeekFrom::Start(len))?;
            self.len = len;
            self.sync_if_requested()?;
        }
        Ok(())
    }

    /// Appends a JSON entry.
    pub fn append_entry(&mut self, entry: &EntryJson) -> Result<(), JournalError> {
        let payload = serde_json::to_vec(entry)?;
        self.append_raw(FrameKind::Json, &payload)
    }

    /// Appends a frame with an arbitrary kind.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let frame = RecordFrame::new(kind, payload.len())?;
        let mut buf = Vec::with_capacity(RecordFrame::HEADER_SIZE + payload.len());
        buf.extend_from_slice(&frame.to_bytes());
        buf.extend_from_slice(payload);

        if let Err(err) = self.write_frame(&buf) {
            // Best effort: the original error is the one worth reporting.
            let _ = self.file.set_len(self.len);
            let _ = self.file.seek(SeekFrom::Start(self.len));
            return Err(err);
        }
        self.len += buf.len() as u64;
        Ok(())
    }

    fn write_frame(&mut self, buf: &[u8]) -> Result<(), JournalError> {
        self.file.write_all(buf)?;
        self.file.flush()?;
        self.sync_if_requested()
    }

    fn sync_if_requested(&mut self) -> Result<(), JournalError> {
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Flushes buffered data (and fsyncs if requested).
    pub fn flush(&mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        self.sync_if_requested()
    }

    /// Flushes and closes the journal.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.flush()
    }
}
