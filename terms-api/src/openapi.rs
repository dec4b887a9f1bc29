//! OpenAPI document for the terms HTTP surface.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{HealthResponse, HealthStatus};
use crate::routes::upload::UploadTermsResponse;

/// Registers the Basic-Auth scheme the upload endpoint references.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "terms",
        description = "Versioned terms of service with agreement tracking and gating",
    ),
    modifiers(&SecurityAddon),
    paths(
        crate::routes::agree::show_form,
        crate::routes::agree::submit,
        crate::routes::show::show_latest,
        crate::routes::show::show_version,
        crate::routes::show::plain_text,
        crate::routes::upload::upload_terms,
        crate::routes::health::ping,
        crate::routes::health::live,
        crate::routes::health::ready,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        UploadTermsResponse,
        HealthResponse,
        HealthStatus,
    )),
    tags(
        (name = "Agreement", description = "Agreement flow for end users"),
        (name = "Terms", description = "Terms display and administration"),
        (name = "Health", description = "Health checks"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let paths = json["paths"].as_object().unwrap();
        assert!(paths.contains_key("/terms"));
        assert!(paths.contains_key("/terms/upload"));
        assert!(paths.contains_key("/health/ping"));
    }
}
