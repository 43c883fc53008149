//! Append-only journal files for ledger records.
//!
//! A journal is a 16-byte header followed by length-prefixed frames. Each
//! `Json` frame holds one UTF-8 JSON object; the journal does not interpret
//! it. Hashing and chain checks belong to `loyalty-core`.
//!
//! ```rust
//! use loyalty_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("ledger.lrj");
//!
//! let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
//! writer.append_entry(&json!({"event_type": "ledger_created", "owner": "alice"}))?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
//! while let Some(entry) = reader.read_entry()? {
//!     println!("{}", entry["event_type"]);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Entry payload type.
pub mod event;
/// Header and frame encoding.
pub mod frame;
/// Journal reader.
pub mod reader;
/// Journal writer.
pub mod writer;

pub use errors::JournalError;
pub use event::EntryJson;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use writer::{JournalWriter, WriteOptions};
