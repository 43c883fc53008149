//! Entry filters for selective iteration.
//!
//! Filters look at the raw JSON so they also work on journals whose records
//! would not parse.

use crate::traits::StoreReader;
use crate::EntryJson;
use loyalty_canonical::Digest;

/// Predicate over journal entries.
pub trait EntryFilter {
    /// Returns true if the entry matches.
    fn matches(&self, entry: &EntryJson) -> bool;
}

fn str_field<'a>(entry: &'a EntryJson, field: &str) -> Option<&'a str> {
    entry.get(field).and_then(|v| v.as_str())
}

/// Matches one `event_type`.
#[derive(Debug, Clone)]
pub struct EventTypeFilter {
    /// Event type to match (e.g. `points_redeemed`).
    pub event_type: String,
}

impl EntryFilter for EventTypeFilter {
    fn matches(&self, entry: &EntryJson) -> bool {
        str_field(entry, "event_type") == Some(self.event_type.as_str())
    }
}

/// Matches the caller that performed the operation.
#[derive(Debug, Clone)]
pub struct PrincipalFilter {
    /// Caller identity to match.
    pub principal_id: String,
}

impl EntryFilter for PrincipalFilter {
    fn matches(&self, entry: &EntryJson) -> bool {
        str_field(entry, "principal_id") == Some(self.principal_id.as_str())
    }
}

/// Matches entries that touch a user's balance, whoever the caller was.
#[derive(Debug, Clone)]
pub struct UserFilter {
    /// User identity to match.
    pub user: String,
}

impl EntryFilter for UserFilter {
    fn matches(&self, entry: &EntryJson) -> bool {
        str_field(entry, "user") == Some(self.user.as_str())
    }
}

/// Matches sequence numbers within an inclusive range.
#[derive(Debug, Clone, Default)]
pub struct SequenceRangeFilter {
    /// Lowest sequence to include.
    pub from: Option<u64>,
    /// Highest sequence to include.
    pub to: Option<u64>,
}

impl EntryFilter for SequenceRangeFilter {
    fn matches(&self, entry: &EntryJson) -> bool {
        let Some(sequence) = entry.get("sequence").and_then(|v| v.as_u64()) else {
            return false;
        };
        self.from.map_or(true, |from| sequence >= from)
            && self.to.map_or(true, |to| sequence <= to)
    }
}

/// Matches one record id.
#[derive(Debug, Clone)]
pub struct EventIdFilter {
    /// Record id to match.
    pub event_id: Digest,
}

impl EntryFilter for EventIdFilter {
    fn matches(&self, entry: &EntryJson) -> bool {
        entry
            .get("event_id")
            .and_then(|v| serde_json::from_value::<Digest>(v.clone()).ok())
            .map_or(false, |id| id == self.event_id)
    }
}

/// All filters must match.
pub struct AndFilter {
    /// Filters to combine.
    pub filters: Vec<Box<dyn EntryFilter>>,
}

impl EntryFilter for AndFilter {
    fn matches(&self, entry: &EntryJson) -> bool {
        self.filters.iter().all(|f| f.matches(entry))
    }
}

/// Any filter may match.
pub struct OrFilter {
    /// Filters to combine.
    pub filters: Vec<Box<dyn EntryFilter>>,
}

impl EntryFilter for OrFilter {
    fn matches(&self, entry: &EntryJson) -> bool {
        self.filters.iter().any(|f| f.matches(entry))
    }
}

impl<F: EntryFilter + ?Sized> EntryFilter for Box<F> {
    fn matches(&self, entry: &EntryJson) -> bool {
        (**self).matches(entry)
    }
}

/// Reader that skips entries the filter rejects.
pub struct FilteredReader<R: StoreReader, F: EntryFilter> {
    reader: R,
    filter: F,
}

impl<R: StoreReader, F: EntryFilter> FilteredReader<R, F> {
    /// Wraps `reader` with `filter`.
    pub fn new(reader: R, filter: F) -> Self {
        Self { reader, filter }
    }
}

impl<R: StoreReader, F: EntryFilter> StoreReader for FilteredReader<R, F> {
    fn read_next(&mut self) -> Result<Option<EntryJson>, crate::error::StoreError> {
        while let Some(entry) = self.reader.read_next()? {
            if self.filter.matches(&entry) {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}
