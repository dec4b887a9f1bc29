//! Access gate: redirect identities that have not agreed to the latest
//! terms into the agreement flow.
//!
//! The gate is advisory, not a security boundary: no lock is held
//! between the resolver's read and the wrapped handler, and the only
//! persisted state is the agreement store itself. Each request is
//! checked exactly once, with three outcomes:
//!
//! - no identity on the request: log a diagnostic and run the wrapped
//!   handler (designed fail-open policy);
//! - identity agreed to the latest terms: run the wrapped handler;
//! - identity has not agreed: redirect to the agreement flow, carrying
//!   the original path and query as the `next` parameter.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::ApiError;
use crate::identity::RequestIdentity;
use crate::state::{AppState, DynStorage};

/// State for the access gate middleware.
#[derive(Clone)]
pub struct GateState {
    pub store: DynStorage,
    /// Where to send identities that still need to agree.
    pub agree_path: String,
}

impl GateState {
    pub fn new(store: DynStorage, agree_path: impl Into<String>) -> Self {
        Self {
            store,
            agree_path: agree_path.into(),
        }
    }

    /// Build gate state from the application state.
    pub fn from_app(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.config.agree_path.clone())
    }
}

/// Axum middleware enforcing agreement to the latest terms.
pub async fn latest_terms_gate(
    State(gate): State<GateState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match request.extensions().get::<RequestIdentity>() {
        Some(RequestIdentity(Some(identity))) => identity.clone(),
        // Covers both an anonymous request and a missing identity
        // layer. Fail open: the gate is a UX redirect, and without an
        // identity there is nothing to look up.
        _ => {
            tracing::debug!(
                path = %request.uri().path(),
                "no identity on request, terms gate fails open"
            );
            return Ok(next.run(request).await);
        }
    };

    if gate.store.has_agreed_to_latest(&identity).await? {
        return Ok(next.run(request).await);
    }

    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = format!(
        "{}?next={}",
        gate.agree_path,
        urlencoding::encode(original)
    );

    tracing::info!(
        identity_ref = %identity,
        next = %original,
        "identity has not agreed to the latest terms, redirecting"
    );
    Ok(Redirect::to(&target).into_response())
}
