//! terms API - HTTP layer for versioned terms of service
//!
//! This crate exposes the terms module over HTTP (Axum):
//! - the agreement flow (form + submission, protected by a signed
//!   challenge),
//! - read-only display and plain-text endpoints,
//! - an administrative upload endpoint guarded by a fixed Basic-Auth
//!   credential,
//! - the access-gate middleware applications compose around their own
//!   protected routes.
//!
//! Storage is abstracted behind `terms_storage::TermsStorage`; the
//! bundled server binary runs on the in-memory store.

pub mod config;
pub mod error;
pub mod identity;
pub mod macros;
pub mod middleware;
pub mod openapi;
pub mod render;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use config::{TermsConfig, DEFAULT_IDENTITY_HEADER};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use identity::{identity_middleware, Identity, RequestIdentity};
pub use middleware::{latest_terms_gate, GateState};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::{AppState, DynStorage};
