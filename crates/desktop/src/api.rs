//! Client for the CMMS auth endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::ClientConfig;
use crate::types::{Credentials, MeResponse, TokenPair};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The server refused the credential or bearer token (400/401/403/422).
    #[error("rejected by the server ({0})")]
    Rejected(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error {0}: {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Whether the failure says nothing about the credential itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Network(_))
            || matches!(self, ApiError::Api(status, _) if *status >= 500)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// The three auth calls the session provider needs.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError>;

    async fn me(&self, access_token: &str) -> Result<MeResponse, ApiError>;

    async fn logout(&self, access_token: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl<T: AuthApi + ?Sized> AuthApi for Arc<T> {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        (**self).login(credentials).await
    }

    async fn me(&self, access_token: &str) -> Result<MeResponse, ApiError> {
        (**self).me(access_token).await
    }

    async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        (**self).logout(access_token).await
    }
}

/// `reqwest` implementation against `{api_url}/auth/*`.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    api_url: String,
}

impl HttpAuthApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/{}", self.api_url, path)
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match status {
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::UNPROCESSABLE_ENTITY => Err(ApiError::Rejected(status.as_u16())),
        _ => Err(ApiError::Api(status.as_u16(), resp.text().await.unwrap_or_default())),
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let resp = self.client.post(self.url("login")).json(credentials).send().await?;
        let resp = check(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn me(&self, access_token: &str) -> Result<MeResponse, ApiError> {
        let resp = self
            .client
            .get(self.url("me"))
            .bearer_auth(access_token)
            .send()
            .await?;
        let resp = check(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn logout(&self, access_token: &str) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.url("logout"))
            .bearer_auth(access_token)
            .send()
            .await?;
        check(resp).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_ignore_trailing_slash() {
        let config = ClientConfig {
            api_url: "http://cmms.local/api/".into(),
            ..ClientConfig::default()
        };
        let api = HttpAuthApi::new(&config).unwrap();
        assert_eq!(api.url("me"), "http://cmms.local/api/auth/me");
    }

    #[test]
    fn transient_errors() {
        assert!(ApiError::Timeout.is_transient());
        assert!(ApiError::Api(503, String::new()).is_transient());
        assert!(!ApiError::Api(404, String::new()).is_transient());
        assert!(!ApiError::Rejected(401).is_transient());
    }
}
