//! terms server entry point
//!
//! Bootstraps configuration and the challenge signer, then starts the
//! Axum HTTP server on the in-memory store.

use std::sync::Arc;

use terms_api::{create_api_router, ApiError, ApiResult, AppState, TermsConfig};
use terms_core::ChallengeSigner;
use terms_storage::MemoryStorage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing();

    let config = Arc::new(TermsConfig::from_env()?);
    let signer = Arc::new(
        ChallengeSigner::new(config.secret_key.clone())?.with_max_age(config.challenge_max_age),
    );
    if config.upload_token.is_none() {
        tracing::warn!("TERMS_UPLOAD_TOKEN not set, terms upload endpoint is disabled");
    }

    let store = Arc::new(MemoryStorage::new());
    let state = AppState::new(store, signer, config.clone());
    let app = create_api_router(state);

    let addr = config.bind_addr()?;
    tracing::info!(%addr, "Starting terms server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("terms_api=debug,tower_http=debug,info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
