//! Portal REST API client
//!
//! Thin wrapper around reqwest. Session cookies are kept in the client's
//! cookie store and sent with every request.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::alert::AlertChannel;
use crate::core::config::Config;
use crate::error::{PortalError, Result};

const USER_AGENT: &str = concat!("eduportal/", env!("CARGO_PKG_VERSION"));

/// List endpoints answer with `{ "data": [...] }`
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Portal API client
#[derive(Clone)]
pub struct ApiClient {
    inner: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client from the user configuration
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.api_base_url, config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|_| PortalError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(PortalError::InvalidUrl(base_url.to_string()));
        }

        let inner = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { inner, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/books`
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    /// GET a list endpoint and return its `data` array
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = self.url_for(path)?;
        tracing::debug!("GET {}", url);

        let response = self
            .inner
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(classify_fetch_error)?;

        let body: ListResponse<T> = response.json().await.map_err(classify_fetch_error)?;
        Ok(body.data)
    }
}

/// Map a transport failure to a user-facing error
pub fn classify_fetch_error(err: reqwest::Error) -> PortalError {
    if err.is_timeout() {
        let target = err
            .url()
            .map(|u| format!("GET {}", u.path()))
            .unwrap_or_else(|| "request".to_string());
        return PortalError::Timeout(target);
    }

    if err.is_connect() {
        let target = err
            .url()
            .map(|u| match (u.host_str(), u.port_or_known_default()) {
                (Some(host), Some(port)) => format!("{}:{}", host, port),
                _ => u.to_string(),
            })
            .unwrap_or_else(|| "server".to_string());
        return PortalError::Connection(target);
    }

    if let Some(status) = err.status() {
        return PortalError::HttpStatus {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string(),
        };
    }

    PortalError::Network(err)
}

/// Surface a fetch failure through the alert channel
pub fn report_fetch_error(err: &PortalError, alerts: &AlertChannel) {
    tracing::warn!("Fetch failed: {}", err.summary());
    alerts.publish_error(err);
}
