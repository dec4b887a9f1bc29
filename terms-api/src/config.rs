//! Configuration for the terms HTTP layer.
//!
//! Loaded from environment variables with development defaults, except
//! for the challenge-signing secret, which is required: starting without
//! one is a configuration error, not something to paper over with a
//! default.

use secrecy::SecretString;
use std::net::SocketAddr;
use std::time::Duration;

use terms_core::{ConfigError, MAX_CHALLENGE_AGE};

use crate::error::{ApiError, ApiResult};

/// Header carrying the opaque identity reference, unless overridden.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-identity-ref";

/// Configuration for the terms server and middleware.
#[derive(Debug, Clone)]
pub struct TermsConfig {
    /// Bind host for the HTTP server.
    pub bind_host: String,

    /// Bind port for the HTTP server.
    pub port: u16,

    /// Secret used to sign agreement challenges. Required.
    pub secret_key: SecretString,

    /// Basic-Auth credential for the terms upload endpoint.
    /// `None` disables uploads (the endpoint answers 403).
    pub upload_token: Option<SecretString>,

    /// Path the access gate redirects unagreed identities to.
    pub agree_path: String,

    /// Name of the request header carrying the identity reference.
    pub identity_header: String,

    /// Accepted age of an agreement challenge.
    pub challenge_max_age: Duration,
}

impl TermsConfig {
    /// Create a TermsConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TERMS_SECRET_KEY`: Challenge-signing secret (required)
    /// - `TERMS_UPLOAD_TOKEN`: Upload credential (unset = uploads disabled)
    /// - `TERMS_BIND`: Bind host (default: "0.0.0.0")
    /// - `PORT` / `TERMS_PORT`: Bind port (default: 3000)
    /// - `TERMS_AGREE_PATH`: Gate redirect target (default: "/terms")
    /// - `TERMS_IDENTITY_HEADER`: Identity header name (default: "x-identity-ref")
    /// - `TERMS_CHALLENGE_MAX_AGE_SECS`: Challenge window (default: 7200)
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = std::env::var("TERMS_SECRET_KEY")
            .ok()
            .filter(|value| !value.is_empty())
            .map(|value| SecretString::new(value.into()))
            .ok_or(ConfigError::MissingSecret {
                name: "TERMS_SECRET_KEY",
            })?;

        let upload_token = std::env::var("TERMS_UPLOAD_TOKEN")
            .ok()
            .filter(|value| !value.is_empty())
            .map(|value| SecretString::new(value.into()));

        let bind_host = std::env::var("TERMS_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port_str = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("TERMS_PORT").ok())
            .unwrap_or_else(|| "3000".to_string());
        let port = port_str
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue {
                name: "TERMS_PORT",
                reason: format!("not a port number: {}", port_str),
            })?;

        let agree_path =
            std::env::var("TERMS_AGREE_PATH").unwrap_or_else(|_| "/terms".to_string());

        let identity_header = std::env::var("TERMS_IDENTITY_HEADER")
            .map(|header| header.to_lowercase())
            .unwrap_or_else(|_| DEFAULT_IDENTITY_HEADER.to_string());

        let challenge_max_age = match std::env::var("TERMS_CHALLENGE_MAX_AGE_SECS") {
            Ok(value) => {
                let secs = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    name: "TERMS_CHALLENGE_MAX_AGE_SECS",
                    reason: format!("not a number of seconds: {}", value),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => MAX_CHALLENGE_AGE,
        };

        Ok(Self {
            bind_host,
            port,
            secret_key,
            upload_token,
            agree_path,
            identity_header,
            challenge_max_age,
        })
    }

    /// Resolve the socket address to bind.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TermsConfig {
        TermsConfig {
            bind_host: "127.0.0.1".to_string(),
            port: 3000,
            secret_key: SecretString::new("test-secret-key-value".into()),
            upload_token: None,
            agree_path: "/terms".to_string(),
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            challenge_max_age: MAX_CHALLENGE_AGE,
        }
    }

    #[test]
    fn test_bind_addr() {
        let config = test_config();
        assert_eq!(
            config.bind_addr().unwrap(),
            "127.0.0.1:3000".parse().unwrap()
        );
    }

    #[test]
    fn test_bind_addr_rejects_garbage_host() {
        let mut config = test_config();
        config.bind_host = "not a host".to_string();
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_default_challenge_window_is_two_hours() {
        assert_eq!(test_config().challenge_max_age, Duration::from_secs(7200));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let debug = format!("{:?}", test_config());
        assert!(!debug.contains("test-secret-key-value"));
    }
}
