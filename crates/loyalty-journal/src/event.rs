use serde_json::Value;

/// One journal entry: a JSON object stored as-is.
pub type EntryJson = Value;

