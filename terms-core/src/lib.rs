//! Core data types for the terms module.
//!
//! This crate defines the two entities the module revolves around
//! (a versioned [`Terms`] document and an append-only [`Agreement`]
//! record), the domain error enums, and the agreement challenge used
//! to protect the public agreement form against tampering and replay.
//!
//! Persistence and HTTP live in `terms-storage` and `terms-api`; this
//! crate is pure data and logic.

pub mod challenge;
pub mod entities;
pub mod error;

pub use challenge::{
    AgreementChallenge, ChallengeSigner, ValidatedAgreement, MAX_CHALLENGE_AGE,
};
pub use entities::{Agreement, IdentityRef, Terms, TermsVersion, Timestamp};
pub use error::{ChallengeError, ConfigError, StorageError};
