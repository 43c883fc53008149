//! Event IDs are `sha256(domain_separator || canonical_bytes(event))`, with the
//! `event_id` field itself excluded from the hash input.

use crate::{Canonicalizer, Digest, DigestAlg};
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest as Sha2Digest, Sha256};

/// Domain separator for ledger record hashing.
const EVENT_DOMAIN_SEPARATOR: &[u8] = b"loyalty:event:v1\0";

/// Error during event ID computation.
#[derive(thiserror::Error, Debug)]
pub enum EventIdError {
    /// Value could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] crate::CanonicalizationError),
    /// Encoded hash did not form a valid digest.
    #[error("digest construction failed: {0}")]
    Digest(#[from] crate::ValidationError),
}

/// Computes the event ID of a serializable record.
///
/// ```rust
/// use loyalty_canonical::{compute_event_id, Canonicalizer};
/// use serde_json::json;
///
/// let canonicalizer = Canonicalizer::default_profile();
/// let record = json!({"event_type": "ledger_created", "sequence": 0, "owner": "alice"});
/// let id = compute_event_id(&record, &canonicalizer)?;
/// assert_eq!(id.b64.len(), 43);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compute_event_id<T: Serialize>(
    event: &T,
    canonicalizer: &Canonicalizer,
) -> Result<Digest, EventIdError> {
    let mut value = serde_json::to_value(event)?;
    if let Value::Object(map) = &mut value {
        map.remove("event_id");
    }
    // Numbers hash as their decimal strings so 64-bit values survive any JSON reader.
    stringify_numbers(&mut value);

    let canonical = canonicalizer.canonicalize(&value)?;

    let mut hasher = Sha256::new();
    hasher.update(EVENT_DOMAIN_SEPARATOR);
    hasher.update(&canonical.bytes);
    let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize());
    Ok(Digest::new(DigestAlg::Sha256, b64)?)
}

/// Returns whether `claimed_id` matches the recomputed ID of `event`.
pub fn verify_event_id<T: Serialize>(
    event: &T,
    claimed_id: &Digest,
    canonicalizer: &Canonicalizer,
) -> Result<bool, EventIdError> {
    Ok(compute_event_id(event, canonicalizer)? == *claimed_id)
}

fn stringify_numbers(value: &mut Value) {
    match value {
        Value::Number(n) => *value = Value::String(n.to_string()),
        Value::Array(items) => items.iter_mut().for_each(stringify_numbers),
        Value::Object(map) => map.values_mut().for_each(stringify_numbers),
        _ => {}
    }
}
