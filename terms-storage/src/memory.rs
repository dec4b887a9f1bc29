//! In-memory storage implementation.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use terms_core::{Agreement, IdentityRef, StorageError, Terms, TermsVersion};

use crate::TermsStorage;

/// In-memory store for terms and agreements.
///
/// Terms are kept in a `BTreeMap` keyed by version, so the latest row is
/// the last entry. Agreements are kept in insertion order, which doubles
/// as creation order; "most recent agreement" never depends on timestamp
/// ties.
///
/// All operations take the single lock once, so `terms_create` reads the
/// latest version and inserts the successor under the same write guard.
/// Concurrent uploads can never assign the same version twice.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    terms: BTreeMap<TermsVersion, Terms>,
    agreements: Vec<Agreement>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StorageError> {
        self.inner.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StorageError> {
        self.inner.write().map_err(|_| StorageError::LockPoisoned)
    }
}

#[async_trait]
impl TermsStorage for MemoryStorage {
    async fn terms_create(&self, text: String) -> Result<Terms, StorageError> {
        let mut inner = self.write()?;
        let version = inner
            .terms
            .last_key_value()
            .map(|(version, _)| version.next())
            .unwrap_or(TermsVersion::FIRST);
        let terms = Terms {
            version,
            created_at: Utc::now(),
            text,
        };
        inner.terms.insert(version, terms.clone());
        Ok(terms)
    }

    async fn terms_get_latest(&self) -> Result<Option<Terms>, StorageError> {
        let inner = self.read()?;
        Ok(inner.terms.last_key_value().map(|(_, terms)| terms.clone()))
    }

    async fn terms_get_by_version(
        &self,
        version: TermsVersion,
    ) -> Result<Option<Terms>, StorageError> {
        let inner = self.read()?;
        Ok(inner.terms.get(&version).cloned())
    }

    async fn terms_count(&self) -> Result<usize, StorageError> {
        let inner = self.read()?;
        Ok(inner.terms.len())
    }

    async fn agreement_create(
        &self,
        identity_ref: IdentityRef,
        terms_version: TermsVersion,
    ) -> Result<Agreement, StorageError> {
        let mut inner = self.write()?;
        if !inner.terms.contains_key(&terms_version) {
            return Err(StorageError::VersionNotFound {
                version: terms_version,
            });
        }
        let agreement = Agreement {
            agreement_id: Uuid::now_v7(),
            identity_ref,
            terms_version,
            created_at: Utc::now(),
        };
        inner.agreements.push(agreement.clone());
        Ok(agreement)
    }

    async fn agreement_get_latest_for(
        &self,
        identity_ref: &IdentityRef,
    ) -> Result<Option<Agreement>, StorageError> {
        let inner = self.read()?;
        Ok(inner
            .agreements
            .iter()
            .rev()
            .find(|agreement| &agreement.identity_ref == identity_ref)
            .cloned())
    }

    async fn agreement_list_for(
        &self,
        identity_ref: &IdentityRef,
    ) -> Result<Vec<Agreement>, StorageError> {
        let inner = self.read()?;
        Ok(inner
            .agreements
            .iter()
            .rev()
            .filter(|agreement| &agreement.identity_ref == identity_ref)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_versions_are_sequential() {
        let store = MemoryStorage::new();
        for expected in 1..=5u32 {
            let terms = store.terms_create(format!("v{}", expected)).await.unwrap();
            assert_eq!(terms.version, TermsVersion(expected));
        }
        assert_eq!(store.terms_count().await.unwrap(), 5);
        assert_eq!(
            store.terms_get_latest().await.unwrap().unwrap().version,
            TermsVersion(5)
        );
    }

    #[tokio::test]
    async fn test_latest_on_empty_store_is_absent() {
        let store = MemoryStorage::new();
        assert_eq!(store.terms_get_latest().await.unwrap(), None);
        assert_eq!(store.terms_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_by_version() {
        let store = MemoryStorage::new();
        store.terms_create("Text A".to_string()).await.unwrap();
        store.terms_create("Text B".to_string()).await.unwrap();

        let v1 = store
            .terms_get_by_version(TermsVersion(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(v1.text, "Text A");
        assert_eq!(
            store.terms_get_by_version(TermsVersion(9)).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_text_stored_verbatim() {
        let store = MemoryStorage::new();
        let text = "# AGB\n\n  *verbatim*  \u{00e4}\u{00f6}\u{00fc}\n";
        let terms = store.terms_create(text.to_string()).await.unwrap();
        assert_eq!(terms.text, text);
    }

    #[tokio::test]
    async fn test_agreement_requires_existing_version() {
        let store = MemoryStorage::new();
        let err = store
            .agreement_create(IdentityRef::new("u1"), TermsVersion(1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StorageError::VersionNotFound {
                version: TermsVersion(1)
            }
        );
    }

    #[tokio::test]
    async fn test_agreement_history_newest_first() {
        let store = MemoryStorage::new();
        let v1 = store.terms_create("Text A".to_string()).await.unwrap();
        let v2 = store.terms_create("Text B".to_string()).await.unwrap();

        store
            .agreement_create(IdentityRef::new("u1"), v1.version)
            .await
            .unwrap();
        store
            .agreement_create(IdentityRef::new("u2"), v1.version)
            .await
            .unwrap();
        store
            .agreement_create(IdentityRef::new("u1"), v2.version)
            .await
            .unwrap();

        let history = store
            .agreement_list_for(&IdentityRef::new("u1"))
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].terms_version, v2.version);
        assert_eq!(history[1].terms_version, v1.version);

        let latest = store
            .agreement_get_latest_for(&IdentityRef::new("u1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.terms_version, v2.version);
    }

    #[tokio::test]
    async fn test_unknown_identity_has_no_agreement() {
        let store = MemoryStorage::new();
        store.terms_create("Text A".to_string()).await.unwrap();
        assert_eq!(
            store
                .agreement_get_latest_for(&IdentityRef::new("nobody"))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_never_duplicate_versions() {
        let store = MemoryStorage::new();
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.terms_create(format!("upload {}", i)).await.unwrap()
            }));
        }

        let mut versions = Vec::new();
        for handle in handles {
            versions.push(handle.await.unwrap().version);
        }
        versions.sort();
        versions.dedup();
        assert_eq!(versions.len(), 32, "every upload got a distinct version");
        assert_eq!(
            store.terms_get_latest().await.unwrap().unwrap().version,
            TermsVersion(32)
        );
    }
}
