//! Read-only terms display routes.

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
};

use terms_core::TermsVersion;

use crate::error::{ApiError, ApiResult};
use crate::render;
use crate::state::DynStorage;

/// GET /terms/show - Display the latest terms version.
#[utoipa::path(
    get,
    path = "/terms/show",
    tag = "Terms",
    responses(
        (status = 200, description = "Terms document (HTML)", body = String),
        (status = 404, description = "No terms published yet", body = ApiError),
    ),
)]
pub async fn show_latest(State(store): State<DynStorage>) -> ApiResult<Html<String>> {
    let terms = store
        .terms_get_latest()
        .await?
        .ok_or_else(ApiError::no_terms)?;
    Ok(Html(render::show_page(&terms)))
}

/// GET /terms/show/{version} - Display a specific terms version.
#[utoipa::path(
    get,
    path = "/terms/show/{version}",
    tag = "Terms",
    params(
        ("version" = u32, Path, description = "Terms version to display")
    ),
    responses(
        (status = 200, description = "Terms document (HTML)", body = String),
        (status = 404, description = "Version does not exist", body = ApiError),
    ),
)]
pub async fn show_version(
    State(store): State<DynStorage>,
    Path(version): Path<u32>,
) -> ApiResult<Html<String>> {
    let version = TermsVersion(version);
    let terms = store
        .terms_get_by_version(version)
        .await?
        .ok_or_else(|| ApiError::version_not_found(version))?;
    Ok(Html(render::show_page(&terms)))
}

/// GET /terms/text - Latest terms as plain text.
#[utoipa::path(
    get,
    path = "/terms/text",
    tag = "Terms",
    responses(
        (status = 200, description = "Latest terms text", body = String, content_type = "text/plain"),
        (status = 404, description = "No terms published yet", body = ApiError),
    ),
)]
pub async fn plain_text(State(store): State<DynStorage>) -> ApiResult<impl IntoResponse> {
    let terms = store
        .terms_get_latest()
        .await?
        .ok_or_else(ApiError::no_terms)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        terms.text,
    ))
}
