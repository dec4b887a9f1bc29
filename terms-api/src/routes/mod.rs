//! HTTP routes for the terms module.
//!
//! - agreement flow (GET/POST /terms)
//! - read-only display (/terms/show, /terms/show/:version, /terms/text)
//! - administrative upload (/terms/upload)
//! - health checks (/health/*)
//! - OpenAPI document (/openapi.json)

pub mod agree;
pub mod health;
pub mod show;
pub mod upload;

use axum::{
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::identity::identity_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Handler for /openapi.json endpoint.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Build the terms routes (agreement flow, display, upload).
fn terms_router() -> Router<AppState> {
    Router::new()
        .route("/", get(agree::show_form).post(agree::submit))
        .route("/text", get(show::plain_text))
        .route("/show", get(show::show_latest))
        .route("/show/:version", get(show::show_version))
        // Registered with and without the trailing slash; axum treats
        // them as distinct paths and existing upload scripts use both.
        .route("/upload", post(upload::upload_terms))
        .route("/upload/", post(upload::upload_terms))
}

/// Build the complete router for the terms server.
///
/// The identity middleware runs for every route, so the agreement flow
/// can extract the identity and the health endpoints simply ignore it.
/// The access gate is NOT installed here: applications compose
/// [`crate::middleware::latest_terms_gate`] into their own routers
/// around the handlers they want gated.
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .nest("/terms", terms_router())
        .nest("/health", health::create_router())
        .route("/openapi.json", get(openapi_json))
        .layer(from_fn_with_state(state.config.clone(), identity_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
