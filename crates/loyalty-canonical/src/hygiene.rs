use crate::identifiers::ProfileId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of the hygiene checks run before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HygieneStatus {
    /// Input encoded without issues.
    Ok,
    /// Input was rejected.
    Invalid,
}

/// Stable warning code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HygieneWarning(String);

impl HygieneWarning {
    /// Creates a warning from a literal code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

/// Report attached to every canonicalization attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HygieneReport {
    /// Overall status.
    pub status: HygieneStatus,
    /// Warning codes raised while walking the value.
    pub warnings: Vec<HygieneWarning>,
    /// Counters keyed by warning kind.
    pub metrics: BTreeMap<String, u64>,
    /// Profile that produced the bytes.
    pub profile_id: ProfileId,
}

impl HygieneReport {
    pub(crate) fn clean(profile_id: ProfileId) -> Self {
        Self {
            status: HygieneStatus::Ok,
            warnings: Vec::new(),
            metrics: BTreeMap::new(),
            profile_id,
        }
    }

    pub(crate) fn flag(&mut self, code: &str) {
        self.status = HygieneStatus::Invalid;
        self.warnings.push(HygieneWarning::new(code));
        *self.metrics.entry(code.to_string()).or_insert(0) += 1;
    }
}
