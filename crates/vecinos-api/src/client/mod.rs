//! HTTP client for the vecinos REST API.
//!
//! Wraps `reqwest` with bearer authentication, typed error mapping and
//! per-endpoint response decoding. Non-2xx responses become
//! [`ApiError::Status`] carrying the server's `{ msg }` when present; on
//! authenticated endpoints 401/403 become [`ApiError::Unauthenticated`].

mod auth;
mod nearby;
mod profile;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::types::ErrorBody;

pub use auth::SignedIn;
pub use nearby::{NearbyApi, NearbyQuery};

/// Client for the vecinos API.
///
/// Holds a pooled `reqwest::Client` and the normalised base URL. Cheap to
/// clone.
#[derive(Debug, Clone)]
pub struct VecinosClient {
    client: Client,
    base_url: Url,
}

impl VecinosClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// `base_url` may carry a path prefix (`https://host/api`); endpoint paths
    /// are resolved relative to it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends to the prefix
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL and appends query parameters,
    /// percent-encoding every value.
    pub(crate) fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join '{path}': {e}"),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Passes 2xx responses through and turns everything else into a typed error.
    ///
    /// When `authenticated` is set, 401 and 403 map to
    /// [`ApiError::Unauthenticated`]; otherwise they are plain status errors
    /// (login reports bad credentials with 401 and a message).
    pub(crate) async fn ensure_success(
        response: Response,
        url: &Url,
        authenticated: bool,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if authenticated && (status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN)
        {
            return Err(ApiError::Unauthenticated {
                status: status.as_u16(),
            });
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.msg)
            .filter(|m| !m.trim().is_empty());

        Err(ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            message,
        })
    }

    /// Reads the body as text and deserializes it, naming `context` on failure.
    pub(crate) async fn decode<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
