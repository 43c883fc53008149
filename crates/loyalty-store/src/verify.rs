//! Whole-journal verification.
//!
//! Every record is parsed, its id recomputed, its chain link checked, and
//! its effect replayed. Verification stops at the first failure; records
//! after it are reported as unchecked since their links can no longer be
//! trusted.

use crate::error::StoreError;
use crate::traits::StoreReader;
use crate::typed::parse_record;
use loyalty_canonical::{Canonicalizer, Digest};
use loyalty_core::Replayer;
use serde_json::{json, Value};

/// Result for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Record verified and replayed.
    Ok,
    /// Record failed; the reason is attached.
    Invalid(String),
    /// Not checked because an earlier record failed.
    Unchecked,
}

/// Verification outcome for one journal entry.
#[derive(Debug, Clone)]
pub struct RecordVerdict {
    /// Position of the entry in the journal.
    pub index: u64,
    /// Claimed record id, if readable.
    pub event_id: Option<String>,
    /// Claimed event type, if readable.
    pub event_type: Option<String>,
    /// Outcome.
    pub verdict: Verdict,
}

/// Outcome of verifying a whole journal.
#[derive(Debug, Clone, Default)]
pub struct ChainReport {
    /// Per-entry verdicts in journal order.
    pub records: Vec<RecordVerdict>,
    /// Id of the last verified record.
    pub head: Option<Digest>,
}

impl ChainReport {
    /// True when every entry verified and the journal was not empty.
    pub fn is_valid(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(|r| r.verdict == Verdict::Ok)
    }

    /// The first failing entry, if any.
    pub fn first_failure(&self) -> Option<&RecordVerdict> {
        self.records
            .iter()
            .find(|r| matches!(r.verdict, Verdict::Invalid(_)))
    }

    /// JSON summary suitable for machine consumption.
    pub fn to_json(&self) -> Value {
        json!({
            "valid": self.is_valid(),
            "records": self.records.len(),
            "head": self.head.as_ref().map(|d| d.b64.clone()),
            "results": self.records.iter().map(|r| json!({
                "index": r.index,
                "event_id": r.event_id,
                "event_type": r.event_type,
                "verdict": match &r.verdict {
                    Verdict::Ok => "ok".to_string(),
                    Verdict::Invalid(reason) => format!("invalid: {}", reason),
                    Verdict::Unchecked => "unchecked".to_string(),
                },
            })).collect::<Vec<_>>(),
        })
    }
}

/// Verifies every entry `reader` yields.
///
/// I/O and framing errors are returned as `Err`; problems with record
/// content are reported in the [`ChainReport`].
pub fn verify_chain<R: StoreReader>(
    reader: &mut R,
    canonicalizer: Canonicalizer,
) -> Result<ChainReport, StoreError> {
    let mut replayer = Replayer::new(canonicalizer);
    let mut report = ChainReport::default();
    let mut failed = false;
    let mut index = 0;

    while let Some(entry) = reader.read_next()? {
        let event_id = entry
            .get("event_id")
            .and_then(|v| v.get("b64"))
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let event_type = entry
            .get("event_type")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let verdict = if failed {
            Verdict::Unchecked
        } else {
            match parse_record(&entry)
                .map_err(|e| e.to_string())
                .and_then(|record| {
                    replayer
                        .push(&record)
                        .map(|()| record.event_id)
                        .map_err(|e| e.to_string())
                }) {
                Ok(id) => {
                    report.head = Some(id);
                    Verdict::Ok
                }
                Err(reason) => {
                    failed = true;
                    Verdict::Invalid(reason)
                }
            }
        };

        report.records.push(RecordVerdict {
            index,
            event_id,
            event_type,
            verdict,
        });
        index += 1;
    }

    Ok(report)
}
