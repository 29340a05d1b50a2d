// ============================
// website-backend-lib/src/directory.rs
// ============================
//! Client for the external user Directory API.
//!
//! The Directory is the service of record for whether a username exists.
//! Lookups issue `GET {api_url}users?filter=Username,eq,{username}` with the
//! API key in `X-API-KEY` and read the `records` array of the response.
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use website_common::{RecordsPage, UserRecord};

use crate::config::Settings;
use crate::metrics::DIRECTORY_LOOKUP;

/// Header carrying the API credential
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Resource queried below the API base URL
pub const USERS_RESOURCE: &str = "users";

/// Failures talking to the Directory API
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("invalid directory URL: {0}")]
    InvalidUrl(String),

    #[error("directory request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("directory responded with status {0}")]
    Status(StatusCode),

    #[error("malformed directory response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Username existence lookups
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Records matching `username`, or `None` when there are none
    async fn lookup(&self, username: &str) -> Result<Option<Vec<UserRecord>>, DirectoryError>;
}

/// [`UserDirectory`] backed by the Directory REST API
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    users_url: Url,
    api_key: String,
}

impl HttpDirectory {
    /// `base_url` must end in `/`; `users` is resolved against it.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let base = Url::parse(base_url).map_err(|e| DirectoryError::InvalidUrl(e.to_string()))?;
        let users_url = base
            .join(USERS_RESOURCE)
            .map_err(|e| DirectoryError::InvalidUrl(e.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DirectoryError::Request)?;

        Ok(Self {
            client,
            users_url,
            api_key: api_key.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, DirectoryError> {
        Self::new(&settings.api_url, settings.api_key.clone(), settings.api_timeout())
    }

    pub fn users_url(&self) -> &Url {
        &self.users_url
    }

    /// Value of the `filter` query parameter for `username`
    pub fn username_filter(username: &str) -> String {
        format!("Username,eq,{username}")
    }
}

#[async_trait]
impl UserDirectory for HttpDirectory {
    #[tracing::instrument(skip(self), fields(url = %self.users_url))]
    async fn lookup(&self, username: &str) -> Result<Option<Vec<UserRecord>>, DirectoryError> {
        counter!(DIRECTORY_LOOKUP).increment(1);

        // `query` form-encodes the pair, so the username cannot break out of the filter.
        let response = self
            .client
            .get(self.users_url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("filter", Self::username_filter(username))])
            .send()
            .await
            .map_err(DirectoryError::Request)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "directory lookup rejected");
            return Err(DirectoryError::Status(status));
        }

        let body = response.bytes().await.map_err(DirectoryError::Request)?;
        let page: RecordsPage = serde_json::from_slice(&body).map_err(DirectoryError::Decode)?;
        let matches = page.into_matches();

        tracing::debug!(found = matches.is_some(), "directory lookup");
        Ok(matches)
    }
}
