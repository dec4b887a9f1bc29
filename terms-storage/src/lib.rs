//! Terms Storage - Storage Trait and In-Memory Implementation
//!
//! Defines the storage abstraction for terms documents and agreement
//! records. Applications embed the module by providing an implementation
//! of [`TermsStorage`] over their own datastore; [`MemoryStorage`] is a
//! complete single-process implementation used by tests and small
//! deployments.
//!
//! The latest-terms resolver lives here as a provided trait method, so
//! every store implementation shares the same semantics.

pub mod memory;

pub use memory::MemoryStorage;

use async_trait::async_trait;
use terms_core::{Agreement, IdentityRef, StorageError, Terms, TermsVersion};

/// Storage trait for terms documents and agreement records.
///
/// Terms rows are immutable and monotonically versioned; agreement rows
/// are append-only. Implementations must make `terms_create` atomic with
/// respect to concurrent calls: the read-latest-then-insert sequence may
/// never assign the same version twice.
#[async_trait]
pub trait TermsStorage: Send + Sync {
    // === Terms Operations ===

    /// Create the next terms version with the given text.
    ///
    /// Assigns `version = latest + 1`, or 1 for an empty store, and the
    /// creation timestamp. Versions are never client-supplied.
    async fn terms_create(&self, text: String) -> Result<Terms, StorageError>;

    /// Get the terms row with the highest version, or `None` when no
    /// terms exist yet. An empty store is an expected state, not an
    /// error.
    async fn terms_get_latest(&self) -> Result<Option<Terms>, StorageError>;

    /// Get a terms row by version.
    async fn terms_get_by_version(
        &self,
        version: TermsVersion,
    ) -> Result<Option<Terms>, StorageError>;

    /// Number of terms versions stored.
    async fn terms_count(&self) -> Result<usize, StorageError>;

    // === Agreement Operations ===

    /// Append an agreement record for the given identity and version.
    ///
    /// Fails with [`StorageError::VersionNotFound`] when the referenced
    /// terms version does not exist; performs no other validation.
    async fn agreement_create(
        &self,
        identity_ref: IdentityRef,
        terms_version: TermsVersion,
    ) -> Result<Agreement, StorageError>;

    /// Get the most recently created agreement for an identity, or
    /// `None` when the identity never agreed to anything.
    async fn agreement_get_latest_for(
        &self,
        identity_ref: &IdentityRef,
    ) -> Result<Option<Agreement>, StorageError>;

    /// Full agreement history for an identity, newest first.
    async fn agreement_list_for(
        &self,
        identity_ref: &IdentityRef,
    ) -> Result<Vec<Agreement>, StorageError>;

    // === Latest-Terms Resolver ===

    /// Whether the identity's most recent agreement references the
    /// current latest terms.
    ///
    /// With no terms in the store there is nothing to gate, so the
    /// check passes (fail-open). With terms but no agreement it fails.
    /// Otherwise the agreement's version is compared against the latest
    /// version; text content never enters the comparison.
    ///
    /// Point-in-time: every call re-reads current state, no caching,
    /// no side effects.
    async fn has_agreed_to_latest(
        &self,
        identity_ref: &IdentityRef,
    ) -> Result<bool, StorageError> {
        let Some(latest) = self.terms_get_latest().await? else {
            return Ok(true);
        };
        let Some(agreement) = self.agreement_get_latest_for(identity_ref).await? else {
            return Ok(false);
        };
        Ok(agreement.terms_version == latest.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolver_fail_open_on_empty_store() {
        let store = MemoryStorage::new();
        let agreed = store
            .has_agreed_to_latest(&IdentityRef::new("u1"))
            .await
            .unwrap();
        assert!(agreed, "no terms means nothing to gate");
    }

    #[tokio::test]
    async fn test_resolver_false_without_agreement() {
        let store = MemoryStorage::new();
        store.terms_create("Text A".to_string()).await.unwrap();

        let agreed = store
            .has_agreed_to_latest(&IdentityRef::new("u1"))
            .await
            .unwrap();
        assert!(!agreed);
    }

    #[tokio::test]
    async fn test_resolver_true_after_agreement() {
        let store = MemoryStorage::new();
        let terms = store.terms_create("Text A".to_string()).await.unwrap();
        store
            .agreement_create(IdentityRef::new("u1"), terms.version)
            .await
            .unwrap();

        let agreed = store
            .has_agreed_to_latest(&IdentityRef::new("u1"))
            .await
            .unwrap();
        assert!(agreed);
    }

    #[tokio::test]
    async fn test_resolver_flips_back_when_superseded() {
        let store = MemoryStorage::new();
        let v1 = store.terms_create("Text A".to_string()).await.unwrap();
        store
            .agreement_create(IdentityRef::new("u1"), v1.version)
            .await
            .unwrap();
        assert!(store
            .has_agreed_to_latest(&IdentityRef::new("u1"))
            .await
            .unwrap());

        store.terms_create("Text B".to_string()).await.unwrap();
        assert!(
            !store
                .has_agreed_to_latest(&IdentityRef::new("u1"))
                .await
                .unwrap(),
            "agreement to v1 no longer counts once v2 is latest"
        );
    }

    #[tokio::test]
    async fn test_resolver_compares_versions_not_content() {
        let store = MemoryStorage::new();
        // Two versions with identical text still gate separately.
        let v1 = store.terms_create("Same text".to_string()).await.unwrap();
        store
            .agreement_create(IdentityRef::new("u1"), v1.version)
            .await
            .unwrap();
        store.terms_create("Same text".to_string()).await.unwrap();

        assert!(!store
            .has_agreed_to_latest(&IdentityRef::new("u1"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_resolver_uses_most_recent_agreement() {
        let store = MemoryStorage::new();
        let v1 = store.terms_create("Text A".to_string()).await.unwrap();
        let v2 = store.terms_create("Text B".to_string()).await.unwrap();

        store
            .agreement_create(IdentityRef::new("u1"), v2.version)
            .await
            .unwrap();
        // A later agreement to an older version supersedes the newer
        // one for resolution purposes (most recent record wins).
        store
            .agreement_create(IdentityRef::new("u1"), v1.version)
            .await
            .unwrap();

        assert!(!store
            .has_agreed_to_latest(&IdentityRef::new("u1"))
            .await
            .unwrap());
    }
}
