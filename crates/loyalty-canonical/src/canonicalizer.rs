use canonical_json::to_string;
use serde_json::Value;

use crate::hygiene::{HygieneReport, HygieneStatus};
use crate::identifiers::ProfileId;

/// Error returned when a value cannot be canonicalized.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Floating point numbers are lossy and never hashed.
    #[error("floating point number at {0}")]
    FloatNumber(String),
    /// Encoder failure.
    #[error("encoding failed: {0}")]
    Encoding(String),
}

/// Canonical bytes plus the hygiene report that accompanied them.
#[derive(Debug)]
pub struct CanonicalizationResult {
    /// RFC 8785 encoded UTF-8 bytes.
    pub bytes: Vec<u8>,
    /// Hygiene report for the input.
    pub report: HygieneReport,
}

/// Deterministic JSON encoder bound to a profile.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    profile: ProfileId,
}

impl Canonicalizer {
    /// Creates a canonicalizer for `profile`.
    pub fn new(profile: ProfileId) -> Self {
        Self { profile }
    }

    /// Canonicalizer for [`DEFAULT_PROFILE`](crate::DEFAULT_PROFILE).
    pub fn default_profile() -> Self {
        Self::new(ProfileId::new(crate::DEFAULT_PROFILE))
    }

    /// Profile this canonicalizer encodes under.
    pub fn profile(&self) -> &ProfileId {
        &self.profile
    }

    /// Produces canonical bytes and a hygiene report.
    pub fn canonicalize(
        &self,
        value: &Value,
    ) -> Result<CanonicalizationResult, CanonicalizationError> {
        let mut report = HygieneReport::clean(self.profile.clone());
        let mut path = Vec::new();
        check(value, &mut path, &mut report)?;

        let encoded =
            to_string(value).map_err(|err| CanonicalizationError::Encoding(err.to_string()))?;
        debug_assert_eq!(report.status, HygieneStatus::Ok);
        Ok(CanonicalizationResult {
            bytes: encoded.into_bytes(),
            report,
        })
    }
}

fn check(
    value: &Value,
    path: &mut Vec<String>,
    report: &mut HygieneReport,
) -> Result<(), CanonicalizationError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(key.clone());
                check(child, path, report)?;
                path.pop();
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                path.push(format!("[{}]", idx));
                check(item, path, report)?;
                path.pop();
            }
        }
        Value::Number(num) if num.is_f64() => {
            report.flag("FloatNumber");
            return Err(CanonicalizationError::FloatNumber(render_path(path)));
        }
        _ => {}
    }
    Ok(())
}

fn render_path(path: &[String]) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn orders_keys() {
        let canonicalizer = Canonicalizer::default_profile();
        let result = canonicalizer
            .canonicalize(&json!({"b": 1, "a": {"nested": "x"}}))
            .unwrap();
        assert_eq!(result.bytes, br#"{"a":{"nested":"x"},"b":1}"#.to_vec());
        assert_eq!(result.report.status, HygieneStatus::Ok);
    }

    #[test]
    fn rejects_floats_with_path() {
        let canonicalizer = Canonicalizer::default_profile();
        let err = canonicalizer
            .canonicalize(&json!({"outer": [{"price": 1.5}]}))
            .unwrap_err();
        assert_eq!(err.to_string(), "floating point number at outer.[0].price");
    }
}
