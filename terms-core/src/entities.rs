//! Core entity structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Timestamp type used throughout the terms module.
pub type Timestamp = DateTime<Utc>;

/// Version number of a terms document.
///
/// Versions are positive, unique, and assigned by the store in strictly
/// increasing order. They are never client-supplied.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TermsVersion(pub u32);

impl TermsVersion {
    /// The version assigned to the first document in an empty store.
    pub const FIRST: TermsVersion = TermsVersion(1);

    /// The version a new document receives when this one is the latest.
    pub fn next(self) -> TermsVersion {
        TermsVersion(self.0 + 1)
    }
}

impl fmt::Display for TermsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TermsVersion {
    fn from(v: u32) -> Self {
        TermsVersion(v)
    }
}

/// Opaque reference to the agreeing party.
///
/// The identity itself (user account, customer number, ...) is owned by
/// the embedding application; this module only stores and compares the
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityRef(pub String);

impl IdentityRef {
    pub fn new(value: impl Into<String>) -> Self {
        IdentityRef(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityRef {
    fn from(value: &str) -> Self {
        IdentityRef(value.to_string())
    }
}

/// A single version of the terms document.
///
/// Rows are immutable: a new version supersedes an old one, it never
/// replaces it. The row with the highest version is the "latest" and is
/// the only one the access gate checks against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terms {
    pub version: TermsVersion,
    pub created_at: Timestamp,
    /// Document body, stored verbatim. The presentation layer may treat
    /// it as lightweight markup.
    pub text: String,
}

/// A record that a specific identity accepted a specific terms version.
///
/// Append-only: agreements are never mutated or deleted. An identity may
/// hold many agreements across versions; only one referencing the current
/// latest terms counts as "agreed to latest".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    pub agreement_id: Uuid,
    pub identity_ref: IdentityRef,
    pub terms_version: TermsVersion,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(TermsVersion(2) > TermsVersion(1));
        assert_eq!(TermsVersion::FIRST.next(), TermsVersion(2));
        assert_eq!(TermsVersion(41).next(), TermsVersion(42));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(TermsVersion(7).to_string(), "7");
    }

    #[test]
    fn test_identity_ref_roundtrip() {
        let identity = IdentityRef::new("K10001");
        assert_eq!(identity.as_str(), "K10001");
        assert_eq!(identity.to_string(), "K10001");
        assert_eq!(IdentityRef::from("K10001"), identity);
    }

    #[test]
    fn test_version_serde_transparent() {
        let json = serde_json::to_string(&TermsVersion(3)).unwrap();
        assert_eq!(json, "3");
        let back: TermsVersion = serde_json::from_str("3").unwrap();
        assert_eq!(back, TermsVersion(3));
    }
}
