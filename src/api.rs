//! Typed client for the classification backend's REST surface.
//!
//! Owns the per-request timeout, the cookie jar that carries the backend
//! session, and normalization of transport and HTTP failures into
//! [`InsightError`]. Controllers depend on the [`ApiGateway`] trait so tests
//! can script responses without a server.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{InsightError, Result};
use crate::models::{AuthStatusResponse, EmailListResponse, LoginResponse, StatsSummary};

/// Backend operations used by the session and sync controllers
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Obtain the OAuth authorization URL to navigate to
    async fn login_url(&self) -> Result<String>;

    /// Current session validity. A 401 is part of the contract here (the
    /// backend answers `{authenticated: false}` with it) and yields `Ok(false)`
    /// rather than an error.
    async fn auth_status(&self) -> Result<bool>;

    /// Invalidate the backend session
    async fn logout(&self) -> Result<()>;

    /// Fetch the classified email list; `force_refresh` asks the backend to
    /// bypass its own cache
    async fn fetch_emails(&self, force_refresh: bool) -> Result<EmailListResponse>;

    /// Fetch the aggregate statistics
    async fn fetch_stats(&self) -> Result<StatsSummary>;

    /// Mark one email as read
    async fn mark_read(&self, id: &str) -> Result<()>;
}

/// Structured error body the backend attaches to non-success responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Production gateway over HTTP
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    /// Build a client for `base_url` with the given per-request timeout.
    /// The cookie store holds the session credential across calls.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| InsightError::Config(format!("HTTP client construction: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a settled response to `Ok` or a normalized error, consuming the
    /// structured `error` field from failure bodies when present
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error);

        if status == reqwest::StatusCode::UNAUTHORIZED {
            Err(InsightError::Unauthorized { message })
        } else {
            Err(InsightError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn transport(error: reqwest::Error) -> InsightError {
        if error.is_timeout() {
            InsightError::Timeout
        } else {
            InsightError::Network(error.to_string())
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| InsightError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ApiGateway for HttpApiClient {
    async fn login_url(&self) -> Result<String> {
        let response = self
            .client
            .get(self.endpoint("/auth/login"))
            .send()
            .await
            .map_err(Self::transport)?;
        let body: LoginResponse = Self::decode(Self::check(response).await?).await?;
        Ok(body.auth_url)
    }

    async fn auth_status(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.endpoint("/auth/status"))
            .send()
            .await
            .map_err(Self::transport)?;

        // The backend signals a missing session with a 401 body; that is a
        // valid answer, not a failure.
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(false);
        }

        let body: AuthStatusResponse = Self::decode(Self::check(response).await?).await?;
        Ok(body.authenticated)
    }

    async fn logout(&self) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("/auth/logout"))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn fetch_emails(&self, force_refresh: bool) -> Result<EmailListResponse> {
        debug!(force_refresh, "Fetching email list");
        let response = self
            .client
            .get(self.endpoint("/emails"))
            .query(&[("refresh", force_refresh)])
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(Self::check(response).await?).await
    }

    async fn fetch_stats(&self) -> Result<StatsSummary> {
        let response = self
            .client
            .get(self.endpoint("/stats"))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::decode(Self::check(response).await?).await
    }

    async fn mark_read(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint(&format!("/emails/{}/read", id)))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpApiClient::new("http://localhost:5000/api/", Duration::from_secs(20))
            .unwrap();
        assert_eq!(client.endpoint("/stats"), "http://localhost:5000/api/stats");
    }
}
