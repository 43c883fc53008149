use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Header magic, version, flags, or reserved bytes are wrong.
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Frame header is malformed.
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds the frame size limit.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: u32,
    },
    /// Payload is not UTF-8.
    #[error("invalid UTF-8 in entry payload: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// Payload is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// File exists but is shorter than a header.
    #[error("file is {0} bytes; too short to hold a journal header")]
    TooShort(u64),
    /// Strict read hit the end of the file inside a frame.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where the torn frame starts.
        offset: u64,
    },
    /// Rollback target outside the header-to-end range.
    #[error("cannot roll back to offset {offset}; journal holds {len} bytes")]
    InvalidRollback {
        /// Requested length.
        offset: u64,
        /// Current length.
        len: u64,
    },
}
