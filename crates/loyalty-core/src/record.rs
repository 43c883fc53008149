use loyalty_canonical::{
    compute_event_id, verify_event_id, Canonicalizer, Digest, DigestAlg, EventIdError,
    PrincipalId, ProfileId, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::errors::ReplayError;
use crate::events::LedgerEvent;

/// Envelope version written into every record.
pub const RECORD_VERSION: &str = "1";

/// A sealed ledger event as stored in the journal.
///
/// Records form a hash chain: `sequence` counts from 0, and every record
/// after the first names its predecessor in `prev_event_id`. The
/// `event_id` is computed over every other field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Content-derived record id.
    pub event_id: Digest,
    /// Envelope version.
    pub event_version: String,
    /// Position in the chain.
    pub sequence: u64,
    /// Id of the previous record; absent only at sequence 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_event_id: Option<Digest>,
    /// When the operation was accepted.
    pub occurred_at: Timestamp,
    /// Caller that performed the operation.
    pub principal_id: PrincipalId,
    /// Canonicalization profile used for `event_id`.
    pub canonical_profile_id: ProfileId,
    /// The event, tagged by `event_type`.
    #[serde(flatten)]
    pub event: LedgerEvent,
}

/// Tip of a record chain: seals new records and checks stored ones.
#[derive(Debug, Clone)]
pub struct RecordChain {
    canonicalizer: Canonicalizer,
    next_sequence: u64,
    head: Option<Digest>,
}

impl RecordChain {
    /// An empty chain.
    pub fn new(canonicalizer: Canonicalizer) -> Self {
        Self {
            canonicalizer,
            next_sequence: 0,
            head: None,
        }
    }

    /// Sequence number the next record receives.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Id of the last record in the chain.
    pub fn head(&self) -> Option<&Digest> {
        self.head.as_ref()
    }

    /// Wraps `event` in a record linked to the current head and advances.
    pub fn seal(
        &mut self,
        caller: &PrincipalId,
        occurred_at: Timestamp,
        event: LedgerEvent,
    ) -> Result<LedgerRecord, EventIdError> {
        let mut record = LedgerRecord {
            event_id: Digest {
                alg: DigestAlg::Sha256,
                b64: String::new(),
            },
            event_version: RECORD_VERSION.to_string(),
            sequence: self.next_sequence,
            prev_event_id: self.head.clone(),
            occurred_at,
            principal_id: caller.clone(),
            canonical_profile_id: self.canonicalizer.profile().clone(),
            event,
        };
        record.event_id = compute_event_id(&record, &self.canonicalizer)?;
        self.advance(&record);
        Ok(record)
    }

    /// Seals several events from one operation. The chain only advances if
    /// every record seals.
    pub fn seal_all(
        &mut self,
        caller: &PrincipalId,
        occurred_at: &Timestamp,
        events: &[LedgerEvent],
    ) -> Result<Vec<LedgerRecord>, EventIdError> {
        let mut staged = self.clone();
        let records = events
            .iter()
            .map(|event| staged.seal(caller, occurred_at.clone(), event.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        *self = staged;
        Ok(records)
    }

    /// Checks that `record` continues this chain and advances past it.
    pub fn accept(&mut self, record: &LedgerRecord) -> Result<(), ReplayError> {
        let sequence = record.sequence;
        if record.event_version != RECORD_VERSION {
            return Err(ReplayError::BrokenChain {
                sequence,
                reason: format!("unsupported record version {}", record.event_version),
            });
        }
        if sequence != self.next_sequence {
            return Err(ReplayError::BrokenChain {
                sequence,
                reason: format!("expected sequence {}", self.next_sequence),
            });
        }
        if record.prev_event_id != self.head {
            return Err(ReplayError::BrokenChain {
                sequence,
                reason: "previous event id does not match chain head".to_string(),
            });
        }
        if !verify_event_id(record, &record.event_id, &self.canonicalizer)? {
            return Err(ReplayError::EventIdMismatch { sequence });
        }
        self.advance(record);
        Ok(())
    }

    fn advance(&mut self, record: &LedgerRecord) {
        self.next_sequence = record.sequence + 1;
        self.head = Some(record.event_id.clone());
    }
}
