//! Client wrappers for the auth API endpoints. These helpers centralize
//! request plumbing and error decoding, keeping screen code free of HTTP
//! details. The session cookie is kept between calls so `me` and `logout`
//! behave like a browser session.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::ErrorBody;
use crate::users::dto::{
    LoginRequest, MessageResponse, ProviderLoginRequest, RegisterRequest, SafeUser,
};

/// Errors surfaced by the remote dispatch layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status and an error body.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the auth service.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url: String = base_url.into();
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<SafeUser, ClientError> {
        let response = self
            .http
            .post(self.url("/api/users/register"))
            .json(request)
            .send()
            .await?;
        decode_json(response).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<SafeUser, ClientError> {
        let response = self
            .http
            .post(self.url("/api/users/login"))
            .json(request)
            .send()
            .await?;
        decode_json(response).await
    }

    pub async fn login_with_provider(
        &self,
        request: &ProviderLoginRequest,
    ) -> Result<SafeUser, ClientError> {
        let response = self
            .http
            .post(self.url("/api/users/login/provider"))
            .json(request)
            .send()
            .await?;
        decode_json(response).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        let response = self.http.get(self.url("/api/users/logout")).send().await?;
        decode_json(response).await
    }

    pub async fn me(&self) -> Result<SafeUser, ClientError> {
        let response = self.http.get(self.url("/api/users/me")).send().await?;
        decode_json(response).await
    }

    pub async fn login_status(&self) -> Result<bool, ClientError> {
        let response = self
            .http
            .get(self.url("/api/users/loggedin"))
            .send()
            .await?;
        decode_json(response).await
    }
}

/// Decode a success body, or map a non-2xx response to its error message.
async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
