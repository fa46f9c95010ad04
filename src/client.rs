//! MockupSign API client.
//!
//! The main entry point. A client owns its signature cache and rate counters;
//! clones share them.

use crate::cache::SignatureCache;
use crate::config::{ClientOptions, Endpoints};
use crate::error::{MockupError, Result};
use crate::mockups::MockupsClient;
use crate::rate::RateObserver;
use crate::store::DurableStore;
use reqwest::{header, Client as HttpClient};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CLIENT_ID_HEADER: &str = "X-Client-ID";

/// MockupSign API client.
///
/// # Example
///
/// ```rust,no_run
/// use mockup_sdk::{Client, ClientOptions};
///
/// let client = Client::new(ClientOptions::new("acct_123", "client_abc"))?;
/// let info = client.mockups().get_rate_limit_info();
/// assert_eq!(info.queue_length, 0);
/// # Ok::<(), mockup_sdk::MockupError>(())
/// ```
#[derive(Clone)]
pub struct Client {
    pub(crate) http: HttpClient,
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) options: ClientOptions,
    pub(crate) endpoints: Endpoints,
    pub(crate) cache: SignatureCache,
    pub(crate) rate: RateObserver,
}

impl Client {
    /// Create a client whose signature cache lives in memory only.
    ///
    /// Fails with [`MockupError::Validation`] when `account_id` or
    /// `client_id` is empty.
    pub fn new(options: ClientOptions) -> Result<Self> {
        options.validate()?;
        let cache = SignatureCache::new(options.cache);

        Self::build(options, cache)
    }

    /// Create a client whose signature cache is mirrored to `store`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use mockup_sdk::{Client, ClientOptions, store::FileStore};
    /// use std::sync::Arc;
    ///
    /// let store = FileStore::open(".mockup-cache").expect("cache directory");
    /// let client = Client::with_store(
    ///     ClientOptions::new("acct_123", "client_abc"),
    ///     Arc::new(store),
    /// )?;
    /// println!("{:?}", client.mockups().cache_stats());
    /// # Ok::<(), mockup_sdk::MockupError>(())
    /// ```
    pub fn with_store(options: ClientOptions, store: Arc<dyn DurableStore>) -> Result<Self> {
        options.validate()?;
        let cache = SignatureCache::with_store(options.cache, store);

        Self::build(options, cache)
    }

    fn build(options: ClientOptions, cache: SignatureCache) -> Result<Self> {
        let timeout = options
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("mockup-sdk-rust/{}", env!("CARGO_PKG_VERSION")));

        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        let endpoints = Endpoints::resolve(&options);
        let rate = RateObserver::new(options.rate_limits);

        Ok(Self {
            http,
            inner: Arc::new(ClientInner {
                options,
                endpoints,
                cache,
                rate,
            }),
        })
    }

    /// Get the mockups client for URL signing.
    pub fn mockups(&self) -> MockupsClient {
        MockupsClient::new(self.clone())
    }

    /// Copy of the options this client was built with.
    pub fn get_config(&self) -> ClientOptions {
        self.inner.options.clone()
    }

    /// Endpoints resolved from the options and environment.
    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    /// Cancel pending rate-window releases.
    ///
    /// Pending releases are also aborted when the last clone is dropped.
    pub fn shutdown(&self) {
        self.inner.rate.shutdown();
    }

    /// Ask the URL signer to sign `cache_key`.
    pub(crate) async fn request_signature(&self, cache_key: &str) -> Result<SignedPath> {
        let client_id = self.inner.options.client_id.as_str();
        let endpoint = &self.inner.endpoints.url_signer_endpoint;

        debug!(target: "mockup_sdk", endpoint = %endpoint, "requesting signature");

        let response = self
            .http
            .get(endpoint)
            .query(&[("url", cache_key), ("clientId", client_id)])
            .header(header::ACCEPT, "application/json")
            .header(CLIENT_ID_HEADER, client_id)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MockupError::Unknown(format!("failed to read signer response: {e}")))?;

        if !status.is_success() {
            warn!(target: "mockup_sdk", status = status.as_u16(), "signer rejected request");
            return Err(MockupError::Signing {
                message: format!("signer responded with {status}"),
                status: Some(status.as_u16()),
                body: Some(body),
            });
        }

        let parsed: Option<SignerResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(SignerResponse {
                signature: Some(signature),
                url_with_signature: Some(url_with_signature),
            }) if !signature.is_empty() && !url_with_signature.is_empty() => Ok(SignedPath {
                signature,
                url_with_signature,
            }),
            _ => Err(MockupError::Signing {
                message: "signer response is missing signature or urlWithSignature".to_string(),
                status: Some(status.as_u16()),
                body: Some(body),
            }),
        }
    }
}

/// Signer answer for one canonical path.
pub(crate) struct SignedPath {
    pub signature: String,
    pub url_with_signature: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignerResponse {
    signature: Option<String>,
    url_with_signature: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn options() -> ClientOptions {
        ClientOptions {
            environment: Some(Environment::Production),
            ..ClientOptions::new("acct_1", "client_1")
        }
    }

    #[test]
    fn test_client_new() {
        let client = Client::new(options()).unwrap();
        assert_eq!(client.endpoints(), &Environment::Production.endpoints());
    }

    #[test]
    fn test_client_requires_account_id() {
        let result = Client::new(ClientOptions::new("", "client_1"));
        assert!(matches!(result, Err(MockupError::Validation(_))));
    }

    #[test]
    fn test_client_requires_client_id() {
        let result = Client::new(ClientOptions::new("acct_1", ""));
        assert!(matches!(result, Err(MockupError::Validation(_))));
    }

    #[test]
    fn test_get_config_returns_copy() {
        let client = Client::new(ClientOptions {
            timeout: Some(Duration::from_secs(5)),
            ..options()
        })
        .unwrap();

        let mut config = client.get_config();
        assert_eq!(config.account_id, "acct_1");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));

        config.account_id = "changed".to_string();
        assert_eq!(client.get_config().account_id, "acct_1");
    }

    #[test]
    fn test_clones_share_state() {
        let client = Client::new(options()).unwrap();
        let other = client.clone();

        client.inner.cache.set("/mockup?a=1", "sig");
        assert_eq!(other.mockups().cache_stats().size, 1);
    }
}
