//! Identity context for inbound requests.
//!
//! The identity itself (session, credential, customer account) is owned
//! by the embedding application; this module only sees an opaque
//! reference. `identity_middleware` reads it from a configurable header
//! and threads it through request extensions as an explicit
//! `Option`-shaped value, so downstream code pattern-matches on
//! presence instead of probing.
//!
//! Handlers that cannot work without an identity (the agreement flow)
//! use the [`Identity`] extractor, which rejects with 401. The access
//! gate does NOT use the extractor: a missing identity there is a
//! designed fail-open branch, not an error.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use terms_core::IdentityRef;

use crate::config::TermsConfig;
use crate::error::ApiError;

/// The identity reference attached to the current request, if any.
///
/// Inserted into request extensions by [`identity_middleware`].
#[derive(Debug, Clone)]
pub struct RequestIdentity(pub Option<IdentityRef>);

/// Axum middleware that extracts the identity reference from the
/// configured header and stores it in request extensions.
///
/// An absent, empty, or non-UTF-8 header value yields
/// `RequestIdentity(None)`; nothing is rejected here.
pub async fn identity_middleware(
    State(config): State<Arc<TermsConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = request
        .headers()
        .get(config.identity_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(IdentityRef::new);

    request.extensions_mut().insert(RequestIdentity(identity));
    next.run(request).await
}

/// Extractor for handlers that require an identity.
///
/// Rejects with 401 when the request carries no identity reference.
#[derive(Debug, Clone)]
pub struct Identity(pub IdentityRef);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RequestIdentity>() {
            Some(RequestIdentity(Some(identity))) => Ok(Identity(identity.clone())),
            _ => Err(ApiError::unauthorized(
                "Request carries no identity reference",
            )),
        }
    }
}
