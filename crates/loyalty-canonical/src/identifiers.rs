use crate::validation::ValidationError;
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! identifier {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a value that the caller has already validated.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Parses and validates a value.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                if !Regex::new($pattern).expect("invalid regex").is_match(&s) {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }

            /// Borrows the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier!(
    PrincipalId,
    "Opaque caller identity such as an account id or address (`[A-Za-z0-9][A-Za-z0-9._:@-]{0,127}`).",
    r"^[A-Za-z0-9][A-Za-z0-9._:@-]{0,127}$"
);
identifier!(
    ProfileId,
    "Identifier for canonicalization profiles (`[A-Za-z0-9_-]{16,128}`).",
    r"^[A-Za-z0-9_-]{16,128}$"
);
identifier!(
    Timestamp,
    "UTC RFC 3339 timestamp with a `Z` suffix.",
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{1,9})?Z$"
);

impl Timestamp {
    /// Current wall-clock time at millisecond precision.
    pub fn now() -> Self {
        Self(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_accepts_addresses_and_account_ids() {
        assert!(PrincipalId::parse("0x5B38Da6a701c568545dCfcB03FcB875f56beddC4").is_ok());
        assert!(PrincipalId::parse("human:alice").is_ok());
        assert!(PrincipalId::parse("alice@example.com").is_ok());
    }

    #[test]
    fn principal_rejects_empty_and_whitespace() {
        assert!(PrincipalId::parse("").is_err());
        assert!(PrincipalId::parse("has space").is_err());
        assert!(PrincipalId::parse(":leading").is_err());
    }

    #[test]
    fn now_is_a_valid_timestamp() {
        let now = Timestamp::now();
        assert!(Timestamp::parse(now.as_str()).is_ok());
    }
}
