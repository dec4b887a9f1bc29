//! Error types for terms operations

use crate::TermsVersion;
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Terms version {version} not found")]
    VersionNotFound { version: TermsVersion },

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Storage backend error: {reason}")]
    Backend { reason: String },
}

/// Agreement challenge verification errors.
///
/// All variants reject the submission; none of them create an agreement
/// record. They are recovered at the form boundary and turned into
/// user-visible feedback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("Integrity tag does not match the submitted fields")]
    IntegrityMismatch,

    #[error("Challenge expired: issued {age_secs}s ago, limit is {max_age_secs}s")]
    Expired { age_secs: i64, max_age_secs: i64 },

    #[error("Integrity tag is not valid hex: {reason}")]
    MalformedTag { reason: String },
}

/// Configuration errors, treated as fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required secret {name} is not configured")]
    MissingSecret { name: &'static str },

    #[error("Secret {name} is too short: {len} bytes, need at least {min} bytes")]
    WeakSecret {
        name: &'static str,
        len: usize,
        min: usize,
    },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StorageError::VersionNotFound {
            version: TermsVersion(4),
        };
        assert_eq!(err.to_string(), "Terms version 4 not found");

        let err = ChallengeError::Expired {
            age_secs: 10800,
            max_age_secs: 7200,
        };
        assert!(err.to_string().contains("10800"));
        assert!(err.to_string().contains("7200"));

        let err = ConfigError::MissingSecret {
            name: "TERMS_SECRET_KEY",
        };
        assert!(err.to_string().contains("TERMS_SECRET_KEY"));
    }
}
