//! Shared application state for Axum routers.

use std::sync::Arc;

use terms_core::ChallengeSigner;
use terms_storage::TermsStorage;

use crate::config::TermsConfig;

/// Type alias for the storage collaborator behind the routes.
///
/// The in-memory implementation from `terms-storage` is the default;
/// embedding applications substitute their own `TermsStorage`
/// implementation here.
pub type DynStorage = Arc<dyn TermsStorage>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Terms and agreement store.
    pub store: DynStorage,
    /// Challenge signer holding the process-wide secret.
    pub signer: Arc<ChallengeSigner>,
    /// Server configuration.
    pub config: Arc<TermsConfig>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(store: DynStorage, signer: Arc<ChallengeSigner>, config: Arc<TermsConfig>) -> Self {
        Self {
            store,
            signer,
            config,
            start_time: std::time::Instant::now(),
        }
    }
}

crate::impl_from_ref!(DynStorage, store);
crate::impl_from_ref!(Arc<ChallengeSigner>, signer);
crate::impl_from_ref!(Arc<TermsConfig>, config);
crate::impl_from_ref!(std::time::Instant, start_time);
