//! Environment-driven configuration for the Parse REST client.
//!
//! All values are read once at process entry and passed by value into
//! [`crate::client::ParseClient::new`]; request logic never consults the
//! environment.

use crate::error::{ParseRestError, Result};
use tracing::{info, warn};

pub const ENV_SERVER_URL: &str = "PARSE_SERVER_URL";
pub const ENV_SERVER_URL_FALLBACK: &str = "PARSE_URL";
pub const ENV_APP_ID: &str = "PARSE_APP_ID";
pub const ENV_REST_KEY: &str = "PARSE_REST_KEY";
pub const ENV_MASTER_KEY: &str = "PARSE_MASTER_KEY";
pub const ENV_ALLOW_INSECURE_TLS: &str = "PARSE_ALLOW_SELF_SIGNED_CERT";
const ENV_ALLOW_INSECURE_TLS_FALLBACK: &str = "ALLOW_SELF_SIGNED_CERT";

/// Connection settings for one Parse Server deployment.
#[derive(Clone)]
pub struct ParseConfig {
    /// Base URL the dispatcher appends request paths to, e.g.
    /// `https://example.com/parse`.
    pub server_url: String,
    /// Value of the `X-Parse-Application-Id` header, sent on every request.
    pub app_id: String,
    /// Restricted credential (`X-Parse-REST-API-Key`).
    pub rest_key: Option<String>,
    /// Privileged credential (`X-Parse-Master-Key`).
    pub master_key: Option<String>,
    /// Accept invalid upstream TLS certificates. Development only.
    pub allow_insecure_tls: bool,
}

impl std::fmt::Debug for ParseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseConfig")
            .field("server_url", &self.server_url)
            .field("app_id", &mask_secret(&self.app_id))
            .field("rest_key", &self.rest_key.as_deref().map(mask_secret))
            .field("master_key", &self.master_key.as_deref().map(mask_secret))
            .field("allow_insecure_tls", &self.allow_insecure_tls)
            .finish()
    }
}

impl ParseConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ParseRestError::Config`] when the base URL or app id is
    /// missing, or when neither credential is set.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server_url: read_env(ENV_SERVER_URL)
                .or_else(|| read_env(ENV_SERVER_URL_FALLBACK))
                .unwrap_or_default(),
            app_id: read_env(ENV_APP_ID).unwrap_or_default(),
            rest_key: read_env(ENV_REST_KEY),
            master_key: read_env(ENV_MASTER_KEY),
            allow_insecure_tls: read_env(ENV_ALLOW_INSECURE_TLS)
                .or_else(|| read_env(ENV_ALLOW_INSECURE_TLS_FALLBACK))
                .is_some_and(|v| v == "true"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the startup invariants without touching the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ParseRestError::Config`] describing the first missing value.
    pub fn validate(&self) -> Result<()> {
        if self.server_url.is_empty() {
            return Err(ParseRestError::Config(format!(
                "missing Parse Server base URL ({ENV_SERVER_URL} or {ENV_SERVER_URL_FALLBACK})"
            )));
        }
        if self.app_id.is_empty() {
            return Err(ParseRestError::Config(format!(
                "missing application id ({ENV_APP_ID})"
            )));
        }
        if self.rest_key.is_none() && self.master_key.is_none() {
            return Err(ParseRestError::Config(format!(
                "at least one of {ENV_REST_KEY} or {ENV_MASTER_KEY} must be set"
            )));
        }
        Ok(())
    }

    /// Log the effective configuration with secrets masked.
    pub fn log_startup(&self) {
        info!(
            server_url = %self.server_url,
            app_id = %mask_secret(&self.app_id),
            rest_key = %self.rest_key.as_deref().map_or_else(|| "unset".to_string(), mask_secret),
            master_key = %self.master_key.as_deref().map_or_else(|| "unset".to_string(), mask_secret),
            "parse configuration loaded"
        );
        if self.allow_insecure_tls {
            warn!("accepting invalid upstream TLS certificates; do not use in production");
        }
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Mask a secret for logs: first and last four characters, `***` in between.
/// Short secrets are fully masked.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    if secret.len() <= 8 {
        return "***".to_string();
    }
    match (secret.get(..4), secret.get(secret.len() - 4..)) {
        (Some(head), Some(tail)) => format!("{head}***{tail}"),
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseConfig, mask_secret};
    use crate::error::ParseRestError;

    fn base_config() -> ParseConfig {
        ParseConfig {
            server_url: "http://127.0.0.1:1337/parse".to_string(),
            app_id: "myAppId".to_string(),
            rest_key: Some("restKey123".to_string()),
            master_key: None,
            allow_insecure_tls: false,
        }
    }

    #[test]
    fn validate_accepts_rest_key_only() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_accepts_master_key_only() {
        let config = ParseConfig {
            rest_key: None,
            master_key: Some("masterKey456".to_string()),
            ..base_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_url() {
        let config = ParseConfig {
            server_url: String::new(),
            ..base_config()
        };
        let err = config.validate().expect_err("must fail");
        assert!(matches!(err, ParseRestError::Config(_)));
        assert!(err.to_string().contains("base URL"));
    }

    #[test]
    fn validate_rejects_missing_app_id() {
        let config = ParseConfig {
            app_id: String::new(),
            ..base_config()
        };
        let err = config.validate().expect_err("must fail");
        assert!(err.to_string().contains("application id"));
    }

    #[test]
    fn validate_rejects_missing_credentials() {
        let config = ParseConfig {
            rest_key: None,
            master_key: None,
            ..base_config()
        };
        let err = config.validate().expect_err("must fail");
        assert!(err.to_string().contains("PARSE_REST_KEY"));
    }

    #[test]
    fn mask_secret_keeps_only_edges() {
        assert_eq!(mask_secret("abcdefghijkl"), "abcd***ijkl");
        assert_eq!(mask_secret("short"), "***");
        assert_eq!(mask_secret(""), "***");
    }

    #[test]
    fn debug_output_masks_secrets() {
        let config = ParseConfig {
            master_key: Some("supersecretmasterkey".to_string()),
            ..base_config()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("supersecretmasterkey"));
        assert!(rendered.contains("supe***rkey"));
    }
}
