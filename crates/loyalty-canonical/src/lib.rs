//! Canonical primitives shared by every loyalty ledger crate.
//!
//! Anything that takes part in record hashing lives here: validated
//! identifiers, digests, the canonical JSON encoder, and the
//! domain-separated event ID function used to seal journal records.
//!
#![deny(missing_docs)]

/// Canonical JSON encoding with hygiene checks.
pub mod canonicalizer;
/// Digest primitives.
pub mod digest;
/// Domain-separated event ID computation.
pub mod event_id;
/// Hygiene report types emitted during canonicalization.
pub mod hygiene;
/// Identifier newtypes (principals, profiles, timestamps).
pub mod identifiers;
/// Validation errors for canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, CanonicalizationResult, Canonicalizer};
pub use digest::{Digest, DigestAlg};
pub use event_id::{compute_event_id, verify_event_id, EventIdError};
pub use hygiene::{HygieneReport, HygieneStatus, HygieneWarning};
pub use identifiers::{PrincipalId, ProfileId, Timestamp};
pub use validation::ValidationError;

/// Profile every ledger record is canonicalized under.
pub const DEFAULT_PROFILE: &str = "loyalty-canonical-v1";
