//! Agreement flow routes: show the form, accept submissions.
//!
//! GET renders the latest terms plus the hidden challenge fields issued
//! by the signer. POST verifies the posted challenge, appends the
//! agreement record, and redirects to `next`. Rejected submissions
//! (integrity, staleness, missing acceptance) re-render the form with
//! the error and a fresh challenge; they never create a record.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum::Form;
use serde::Deserialize;
use utoipa::ToSchema;

use terms_core::{AgreementChallenge, IdentityRef, TermsVersion};

use crate::error::{ApiError, ApiResult};
use crate::identity::Identity;
use crate::render;
use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AgreeQuery {
    #[serde(default)]
    pub next: Option<String>,
}

/// Fields posted by the agreement form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AgreementFormData {
    pub identity_ref: String,
    pub terms_ref: u32,
    pub timestamp: i64,
    pub integrity_tag: String,
    #[serde(default)]
    pub accept: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl AgreementFormData {
    fn challenge(&self) -> AgreementChallenge {
        AgreementChallenge {
            identity_ref: IdentityRef::new(self.identity_ref.clone()),
            terms_ref: TermsVersion(self.terms_ref),
            timestamp: self.timestamp,
            integrity_tag: self.integrity_tag.clone(),
        }
    }

    fn accepted(&self) -> bool {
        matches!(
            self.accept.as_deref(),
            Some("on" | "true" | "1" | "yes")
        )
    }
}

/// Restrict the post-agreement redirect to a local path. Anything else
/// (absolute URLs, protocol-relative `//host`) falls back to `/`.
fn sanitize_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /terms - Show the agreement form for the latest terms.
#[utoipa::path(
    get,
    path = "/terms",
    tag = "Agreement",
    params(
        ("next" = Option<String>, Query, description = "Path to return to after agreeing")
    ),
    responses(
        (status = 200, description = "Agreement form (HTML)", body = String),
        (status = 401, description = "No identity on request", body = ApiError),
        (status = 404, description = "No terms published yet", body = ApiError),
    ),
)]
pub async fn show_form(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Query(query): Query<AgreeQuery>,
) -> ApiResult<Html<String>> {
    let next = sanitize_next(query.next.as_deref());
    render_form(&state, &identity, next, None).await
}

/// POST /terms - Verify a submitted agreement and persist it.
#[utoipa::path(
    post,
    path = "/terms",
    tag = "Agreement",
    responses(
        (status = 200, description = "Submission rejected, form re-rendered with error (HTML)", body = String),
        (status = 303, description = "Agreement recorded, redirect to `next`"),
        (status = 401, description = "No identity on request", body = ApiError),
    ),
)]
pub async fn submit(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Form(form): Form<AgreementFormData>,
) -> ApiResult<Response> {
    let next = sanitize_next(form.next.as_deref()).to_string();

    // The tag binds the submitted identity; requiring it to match the
    // request identity stops one identity replaying a challenge issued
    // to another.
    if identity.as_str() != form.identity_ref {
        tracing::warn!(
            identity_ref = %identity,
            submitted = %form.identity_ref,
            "agreement submitted for a different identity"
        );
        return Ok(render_form(
            &state,
            &identity,
            &next,
            Some("This agreement form was issued for a different identity."),
        )
        .await?
        .into_response());
    }

    let validated = match state.signer.verify(&form.challenge()) {
        Ok(validated) => validated,
        Err(err) => {
            tracing::warn!(
                identity_ref = %identity,
                terms_ref = form.terms_ref,
                error = %err,
                "agreement submission rejected"
            );
            return Ok(render_form(&state, &identity, &next, Some(&err.to_string()))
                .await?
                .into_response());
        }
    };

    if !form.accepted() {
        return Ok(render_form(
            &state,
            &identity,
            &next,
            Some("You must accept the terms to continue."),
        )
        .await?
        .into_response());
    }

    let agreement = state
        .store
        .agreement_create(validated.identity_ref, validated.terms_version)
        .await?;
    tracing::info!(
        identity_ref = %agreement.identity_ref,
        terms_version = %agreement.terms_version,
        agreement_id = %agreement.agreement_id,
        "agreement recorded"
    );

    Ok(Redirect::to(&next).into_response())
}

/// Render the form against the current latest terms with a fresh
/// challenge.
async fn render_form(
    state: &AppState,
    identity: &IdentityRef,
    next: &str,
    error: Option<&str>,
) -> ApiResult<Html<String>> {
    let terms = state
        .store
        .terms_get_latest()
        .await?
        .ok_or_else(ApiError::no_terms)?;
    let challenge = state.signer.issue(identity, terms.version);
    Ok(Html(render::agree_page(&terms, &challenge, next, error)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_next() {
        assert_eq!(sanitize_next(Some("/orders")), "/orders");
        assert_eq!(sanitize_next(Some("/orders?page=2")), "/orders?page=2");
        assert_eq!(sanitize_next(Some("https://evil.example")), "/");
        assert_eq!(sanitize_next(Some("//evil.example")), "/");
        assert_eq!(sanitize_next(Some("")), "/");
        assert_eq!(sanitize_next(None), "/");
    }

    #[test]
    fn test_accept_values() {
        let form = |accept: Option<&str>| AgreementFormData {
            identity_ref: "u1".to_string(),
            terms_ref: 1,
            timestamp: 0,
            integrity_tag: String::new(),
            accept: accept.map(str::to_string),
            next: None,
        };
        assert!(form(Some("on")).accepted());
        assert!(form(Some("true")).accepted());
        assert!(!form(Some("off")).accepted());
        assert!(!form(None).accepted());
    }
}
