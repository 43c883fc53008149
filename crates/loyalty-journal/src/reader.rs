use crate::errors::JournalError;
use crate::event::EntryJson;
use crate::frame::{FrameKind, JournalHeader, RecordFrame};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// How a reader treats a frame cut short by the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// A torn frame is an error.
    Strict,
    /// A torn frame is treated as the end of the journal.
    Permissive,
}

/// Reads frames from a journal file in order.
pub struct JournalReader {
    inner: BufReader<File>,
    mode: ReadMode,
    position: u64,
    torn: bool,
}

impl JournalReader {
    /// Opens a journal and validates its header.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut inner = BufReader::new(File::open(path)?);
        let mut header = [0u8; JournalHeader::SIZE];
        inner.read_exact(&mut header).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                JournalError::InvalidHeader("file shorter than header".to_string())
            }
            _ => e.into(),
        })?;
        JournalHeader::from_bytes(&header)?;
        Ok(Self {
            inner,
            mode,
            position: JournalHeader::SIZE as u64,
            torn: false,
        })
    }

    /// Offset just past the last complete frame read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether a permissive read stopped at a torn frame.
    pub fn hit_torn_tail(&self) -> bool {
        self.torn
    }

    /// Fills `buf` completely. At a frame boundary a clean end of file
    /// yields `Ok(false)`; anywhere else a short read is a torn frame.
    fn fill(&mut self, buf: &mut [u8], at_boundary: bool) -> Result<bool, JournalError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if filled == buf.len() {
            Ok(true)
        } else if filled == 0 && at_boundary {
            Ok(false)
        } else {
            self.torn_frame()
        }
    }

    fn torn_frame(&mut self) -> Result<bool, JournalError> {
        match self.mode {
            ReadMode::Permissive => {
                self.torn = true;
                Ok(false)
            }
            ReadMode::Strict => Err(JournalError::TruncatedFrame {
                offset: self.position,
            }),
        }
    }

    /// Reads the next frame, or `None` at the end of the journal.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        if self.torn {
            return Ok(None);
        }
        let mut header = [0u8; RecordFrame::HEADER_SIZE];
        if !self.fill(&mut header, true)? {
            return Ok(None);
        }
        let frame = RecordFrame::from_bytes(&header, self.position)?;

        let mut payload = vec![0u8; frame.len as usize];
        if !self.fill(&mut payload, false)? {
            return Ok(None);
        }

        self.position += (RecordFrame::HEADER_SIZE + payload.len()) as u64;
        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next JSON entry, skipping unknown frame kinds.
    pub fn read_entry(&mut self) -> Result<Option<EntryJson>, JournalError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::Json, payload)) => {
                    let text = std::str::from_utf8(&payload)?;
                    return Ok(Some(serde_json::from_str(text)?));
                }
                Some((FrameKind::Unknown(_), _)) => continue,
            }
        }
    }
}

impl Iterator for JournalReader {
    type Item = Result<EntryJson, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_entry().transpose()
    }
}
