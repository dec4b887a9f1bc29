//! Agreement challenge issuing and verification.
//!
//! The agreement form is exposed to the public web, so the fields it
//! carries (who agrees, to which version, issued when) are bound together
//! by a keyed hash. A submission whose tag does not match the recomputed
//! hash is rejected, as is a submission older than [`MAX_CHALLENGE_AGE`].
//! The tag binds identity and version, so a challenge cannot be replayed
//! against a different terms version or a different identity, and cannot
//! be reused indefinitely once issued.
//!
//! The tag is `hex(HMAC-SHA256(secret, claims))` where `claims` is the
//! JSON serialization of the (identity_ref, terms_ref, timestamp)
//! triple. Field order in the claims struct is part of the tag format.

use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

use crate::error::{ChallengeError, ConfigError};
use crate::{IdentityRef, TermsVersion};

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a challenge: 2 hours.
pub const MAX_CHALLENGE_AGE: Duration = Duration::from_secs(2 * 60 * 60);

/// Minimum length of the signing secret, in bytes.
const MIN_SECRET_LEN: usize = 16;

/// The fields rendered into the agreement form and posted back on
/// submission.
///
/// `timestamp` is unix seconds at issue time. `integrity_tag` is the
/// keyed hash over the other three fields; any mutation of them
/// invalidates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementChallenge {
    pub identity_ref: IdentityRef,
    pub terms_ref: TermsVersion,
    pub timestamp: i64,
    pub integrity_tag: String,
}

/// A submission that passed the integrity and staleness checks, ready to
/// be persisted as an agreement record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAgreement {
    pub identity_ref: IdentityRef,
    pub terms_version: TermsVersion,
}

/// Claims bound into the integrity tag.
///
/// Serialized with serde_json, which preserves struct field order, so
/// the byte stream fed to the MAC is deterministic.
#[derive(Serialize)]
struct ChallengeClaims<'a> {
    identity_ref: &'a str,
    terms_ref: TermsVersion,
    timestamp: i64,
}

/// Issues and verifies agreement challenges with a process-wide secret.
///
/// The secret is configured once at startup and never mutated at
/// runtime. `Debug` never prints it.
pub struct ChallengeSigner {
    secret: SecretString,
    max_age: Duration,
}

impl ChallengeSigner {
    /// Create a signer from the configured secret.
    ///
    /// Rejects empty or short secrets; a weak signing secret is a fatal
    /// configuration error, not something to limp along with.
    pub fn new(secret: SecretString) -> Result<Self, ConfigError> {
        let len = secret.expose_secret().len();
        if len == 0 {
            return Err(ConfigError::MissingSecret {
                name: "TERMS_SECRET_KEY",
            });
        }
        if len < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret {
                name: "TERMS_SECRET_KEY",
                len,
                min: MIN_SECRET_LEN,
            });
        }
        Ok(Self {
            secret,
            max_age: MAX_CHALLENGE_AGE,
        })
    }

    /// Override the staleness window. The default is [`MAX_CHALLENGE_AGE`].
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Issue a challenge for the given identity and terms version,
    /// stamped with the current time.
    pub fn issue(&self, identity_ref: &IdentityRef, terms_ref: TermsVersion) -> AgreementChallenge {
        self.issue_at(identity_ref, terms_ref, Utc::now().timestamp())
    }

    /// Issue a challenge with an explicit timestamp (unix seconds).
    pub fn issue_at(
        &self,
        identity_ref: &IdentityRef,
        terms_ref: TermsVersion,
        timestamp: i64,
    ) -> AgreementChallenge {
        let integrity_tag = self.compute_tag(identity_ref.as_str(), terms_ref, timestamp);
        AgreementChallenge {
            identity_ref: identity_ref.clone(),
            terms_ref,
            timestamp,
            integrity_tag,
        }
    }

    /// Verify a submitted challenge against the current time.
    pub fn verify(
        &self,
        submission: &AgreementChallenge,
    ) -> Result<ValidatedAgreement, ChallengeError> {
        self.verify_at(submission, Utc::now().timestamp())
    }

    /// Verify a submitted challenge against an explicit "now".
    ///
    /// The tag is checked first: a submission with a tampered timestamp
    /// is always an integrity failure, never a staleness one. Both
    /// checks are pure functions of (submission, secret, now), so
    /// re-verifying an unmodified submission yields the same outcome.
    pub fn verify_at(
        &self,
        submission: &AgreementChallenge,
        now: i64,
    ) -> Result<ValidatedAgreement, ChallengeError> {
        let submitted_tag =
            hex::decode(&submission.integrity_tag).map_err(|e| ChallengeError::MalformedTag {
                reason: e.to_string(),
            })?;

        self.mac_for_claims(
            submission.identity_ref.as_str(),
            submission.terms_ref,
            submission.timestamp,
        )
        .verify_slice(&submitted_tag)
        .map_err(|_| ChallengeError::IntegrityMismatch)?;

        let age_secs = now - submission.timestamp;
        let max_age_secs = self.max_age.as_secs() as i64;
        if age_secs > max_age_secs {
            return Err(ChallengeError::Expired {
                age_secs,
                max_age_secs,
            });
        }

        Ok(ValidatedAgreement {
            identity_ref: submission.identity_ref.clone(),
            terms_version: submission.terms_ref,
        })
    }

    fn compute_tag(&self, identity_ref: &str, terms_ref: TermsVersion, timestamp: i64) -> String {
        let mac = self.mac_for_claims(identity_ref, terms_ref, timestamp);
        hex::encode(mac.finalize().into_bytes())
    }

    fn mac_for_claims(
        &self,
        identity_ref: &str,
        terms_ref: TermsVersion,
        timestamp: i64,
    ) -> HmacSha256 {
        let claims = ChallengeClaims {
            identity_ref,
            terms_ref,
            timestamp,
        };
        // Serializing three scalar fields cannot fail.
        let bytes = serde_json::to_vec(&claims).unwrap_or_default();

        // HMAC-SHA256 accepts keys of any size, so this never fails for
        // the non-empty secret enforced in `new`.
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any size");
        mac.update(&bytes);
        mac
    }
}

impl std::fmt::Debug for ChallengeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ChallengeSigner([REDACTED, {} chars], max_age: {:?})",
            self.secret.expose_secret().len(),
            self.max_age
        )
    }
}
