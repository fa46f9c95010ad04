//! Client options and endpoint selection.

use crate::cache::CacheOptions;
use crate::error::MockupError;
use crate::types::RateLimits;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable consulted when no [`Environment`] is configured.
pub const ENVIRONMENT_VAR: &str = "MOCKUP_SDK_ENV";

/// Deployment whose endpoints the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    /// Read the environment from `MOCKUP_SDK_ENV`, defaulting to production.
    pub fn from_env() -> Self {
        std::env::var(ENVIRONMENT_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Default endpoints for this environment.
    pub fn endpoints(self) -> Endpoints {
        match self {
            Environment::Production => Endpoints {
                api_url: "https://api.mockupsign.io".to_string(),
                mockup_api_url: "https://mockups.mockupsign.io".to_string(),
                url_signer_endpoint: "https://api.mockupsign.io/v1/sign-url".to_string(),
            },
            Environment::Development => Endpoints {
                api_url: "http://localhost:4000".to_string(),
                mockup_api_url: "http://localhost:4001".to_string(),
                url_signer_endpoint: "http://localhost:4000/v1/sign-url".to_string(),
            },
        }
    }
}

impl FromStr for Environment {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(MockupError::validation(format!(
                "unknown environment {other:?}"
            ))),
        }
    }
}

/// Resolved service endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base URL of the REST API.
    pub api_url: String,
    /// Base URL that signed mockup paths are joined onto.
    pub mockup_api_url: String,
    /// Endpoint that signs canonical mockup paths.
    pub url_signer_endpoint: String,
}

impl Endpoints {
    /// Start from the environment table and apply explicit overrides.
    pub fn resolve(options: &ClientOptions) -> Self {
        let defaults = options
            .environment
            .unwrap_or_else(Environment::from_env)
            .endpoints();

        Self {
            api_url: options.api_url.clone().unwrap_or(defaults.api_url),
            mockup_api_url: options
                .mockup_api_url
                .clone()
                .unwrap_or(defaults.mockup_api_url),
            url_signer_endpoint: options
                .url_signer_endpoint
                .clone()
                .unwrap_or(defaults.url_signer_endpoint),
        }
    }
}

/// Options used to construct a [`Client`](crate::Client).
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Account that owns the signatures (required).
    pub account_id: String,
    /// Client identifier sent to the signer (required).
    pub client_id: String,
    /// REST API base URL override.
    pub api_url: Option<String>,
    /// Mockup base URL override.
    pub mockup_api_url: Option<String>,
    /// URL signer endpoint override.
    pub url_signer_endpoint: Option<String>,
    /// Endpoint table to use (default: read from `MOCKUP_SDK_ENV`).
    pub environment: Option<Environment>,
    /// Request timeout (default: 30 seconds).
    pub timeout: Option<Duration>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Signature cache capacities.
    pub cache: CacheOptions,
    /// Limits reported by the rate counters.
    pub rate_limits: RateLimits,
}

impl ClientOptions {
    /// Options with the two required identifiers and defaults elsewhere.
    pub fn new(account_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), MockupError> {
        if self.account_id.trim().is_empty() {
            return Err(MockupError::validation("accountId is required"));
        }
        if self.client_id.trim().is_empty() {
            return Err(MockupError::validation("clientId is required"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(
            " Production ".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_resolve_uses_environment_table() {
        let options = ClientOptions {
            environment: Some(Environment::Development),
            ..ClientOptions::new("acct", "client")
        };

        assert_eq!(Endpoints::resolve(&options), Environment::Development.endpoints());
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let options = ClientOptions {
            environment: Some(Environment::Production),
            mockup_api_url: Some("https://cdn.example.com".to_string()),
            ..ClientOptions::new("acct", "client")
        };

        let endpoints = Endpoints::resolve(&options);
        assert_eq!(endpoints.mockup_api_url, "https://cdn.example.com");
        assert_eq!(endpoints.api_url, "https://api.mockupsign.io");
    }

    #[test]
    fn test_validate_requires_ids() {
        assert!(ClientOptions::new("acct", "client").validate().is_ok());
        assert!(ClientOptions::new("", "client").validate().unwrap_err().is_validation());
        assert!(ClientOptions::new("acct", "  ").validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_default_options() {
        let options = ClientOptions::default();
        assert!(options.api_url.is_none());
        assert!(options.timeout.is_none());
        assert_eq!(options.cache, CacheOptions::default());
    }
}
