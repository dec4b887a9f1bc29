//! Administrative terms upload route.
//!
//! POST /terms/upload creates the next terms version from the raw
//! request body. The route is guarded by a fixed Basic-Auth credential
//! from configuration; with no credential configured the endpoint is
//! disabled and always answers 403. Every failed authorization leaves
//! the store untouched.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use terms_core::TermsVersion;

use crate::config::TermsConfig;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for a successful terms upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadTermsResponse {
    pub success: bool,
    /// Version assigned to the uploaded document.
    #[schema(value_type = u32)]
    pub version: TermsVersion,
}

/// POST /terms/upload - Create the next terms version.
#[utoipa::path(
    post,
    path = "/terms/upload",
    tag = "Terms",
    request_body(content = String, description = "Raw terms text", content_type = "text/plain"),
    responses(
        (status = 200, description = "New version created", body = UploadTermsResponse),
        (status = 400, description = "Empty upload body", body = ApiError),
        (status = 403, description = "Bad or missing upload credentials", body = ApiError),
    ),
    security(
        ("basic_auth" = [])
    )
)]
pub async fn upload_terms(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Json<UploadTermsResponse>> {
    authorize_upload(&state.config, &headers)?;

    if body.trim().is_empty() {
        return Err(ApiError::invalid_input("Upload body is empty"));
    }

    let terms = state.store.terms_create(body).await?;
    tracing::info!(version = %terms.version, "new terms version uploaded");

    Ok(Json(UploadTermsResponse {
        success: true,
        version: terms.version,
    }))
}

/// Check the `Authorization: Basic <credential>` header against the
/// configured upload token.
///
/// The credential is accepted either verbatim (the fixed-token form) or
/// as standard Basic auth, base64("user:token") with any user, so both
/// scripted clients and `curl -u` work. All failure modes are 403.
fn authorize_upload(config: &TermsConfig, headers: &HeaderMap) -> ApiResult<()> {
    let Some(expected) = config.upload_token.as_ref() else {
        tracing::warn!("terms upload attempted but TERMS_UPLOAD_TOKEN is not configured");
        return Err(ApiError::forbidden("Terms upload is disabled"));
    };
    let expected = expected.expose_secret();

    let credential = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
        .ok_or_else(|| ApiError::forbidden("Missing Basic authorization"))?;

    if credential == expected {
        return Ok(());
    }

    if let Ok(decoded) = BASE64_STANDARD.decode(credential) {
        if let Ok(decoded) = String::from_utf8(decoded) {
            let password_matches = decoded
                .split_once(':')
                .map(|(_, password)| password == expected)
                .unwrap_or(false);
            if password_matches {
                return Ok(());
            }
        }
    }

    tracing::warn!("terms upload rejected: invalid credentials");
    Err(ApiError::forbidden("Invalid upload credentials"))
}
