//! Typed ID wrappers for domain entities.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use uuid::Uuid;

/// A strongly-typed wrapper for user IDs.
///
/// Identifiers are opaque strings on the wire. Freshly generated ones are
/// UUID text, but a caller may hand us anything, so no format is enforced
/// here; stores decide what an unrecognised shape means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new random user ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an existing identifier without validation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Interprets the identifier as a UUID, if it is one.
    #[must_use]
    pub fn as_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.0).ok()
    }

    /// Returns the lowercase hyphenated spelling when the identifier parses
    /// as a UUID, otherwise a copy of the identifier unchanged.
    ///
    /// Postgres resolves every UUID spelling to one row, so cache keys and
    /// store calls must agree on a single spelling.
    #[must_use]
    pub fn canonical(&self) -> Self {
        self.as_uuid().map_or_else(|| self.clone(), Self::from)
    }

    /// Returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_ne!(a, b);
        assert!(a.as_uuid().is_some());
        assert!(!a.is_blank());
    }

    #[test]
    fn test_blank_ids() {
        assert!(UserId::new("").is_blank());
        assert!(UserId::new("   ").is_blank());
        assert!(!UserId::new("abc").is_blank());
    }

    #[test]
    fn test_non_uuid_id_is_kept_verbatim() {
        let id = UserId::from("not-a-uuid");
        assert_eq!(id.as_str(), "not-a-uuid");
        assert_eq!(id.to_string(), "not-a-uuid");
        assert!(id.as_uuid().is_none());
    }

    #[test]
    fn test_canonical_folds_uuid_spellings() {
        let lower = "6f1c2b9e-3a4d-4e5f-8a7b-1c2d3e4f5a6b";
        let expected = UserId::new(lower);

        assert_eq!(UserId::new(lower).canonical(), expected);
        assert_eq!(UserId::new(lower.to_uppercase()).canonical(), expected);
        assert_eq!(UserId::new(lower.replace('-', "")).canonical(), expected);
        assert_eq!(UserId::new(format!("{{{lower}}}")).canonical(), expected);
    }

    #[test]
    fn test_canonical_keeps_other_ids() {
        assert_eq!(UserId::new("Not-A-Uuid").canonical().as_str(), "Not-A-Uuid");
        assert_eq!(UserId::new("").canonical().as_str(), "");
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::new("u-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u-1\"");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
