//! Navitia resource identifier type.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Error returned when building an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {reason}")]
pub struct InvalidId {
    reason: &'static str,
}

/// An opaque Navitia resource identifier.
///
/// Identifiers name regions (`fr-idf`), stop areas
/// (`stop_area:OIF:SA:8739305`), stop points, lines and so on. The API
/// treats them as opaque strings; the only validation is that they must be
/// non-empty.
///
/// # Examples
///
/// ```
/// use navitia_client::domain::Id;
///
/// let id = Id::new("stop_area:OIF:SA:8739305").unwrap();
/// assert_eq!(id.as_str(), "stop_area:OIF:SA:8739305");
///
/// // Empty strings are rejected
/// assert!(Id::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(pub(super) String);

impl Id {
    /// Create a new identifier.
    ///
    /// Returns an error if the string is empty.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidId> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidId {
                reason: "identifier cannot be empty",
            });
        }
        Ok(Id(s))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the Id and returns the inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Id::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: new then as_str returns the original
        #[test]
        fn roundtrip(s in ".+") {
            let id = Id::new(s.clone()).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Serialization is transparent
        #[test]
        fn serializes_as_plain_string(s in "[a-z:_0-9]{1,20}") {
            let id = Id::new(s.clone()).unwrap();
            prop_assert_eq!(serde_json::to_string(&id).unwrap(), serde_json::to_string(&s).unwrap());
        }
    }
}
