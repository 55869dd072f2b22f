//! HTTP transport for the portal API.
//!
//! [`ApiClient`] wraps one `reqwest::Client` and one base endpoint. Every
//! request consults the shared [`SessionStore`] and carries
//! `Authorization: Bearer <token>` when a token is present; anonymous
//! requests carry no credential. There is no retry and no caching: every call
//! is a fresh round trip.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, TransportError};
use crate::session::SessionStore;

/// Portal API client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash.
    base: String,
    session: Arc<SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.inner.base)
            .finish_non_exhaustive()
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
}

/// Response of `POST /auth/login`.
#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

impl ApiClient {
    /// Create a client for `config.api_base` that authenticates with `session`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::HttpClient(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base: config.api_base.as_str().trim_end_matches('/').to_string(),
                session,
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    /// Base endpoint every path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base
    }

    /// Execute a GET request.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on network failure, non-success status, or
    /// an undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        self.send(self.request(Method::GET, path)).await
    }

    /// Execute a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on network failure, non-success status, or
    /// an undecodable body.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// Execute a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on network failure, non-success status, or
    /// an undecodable body.
    pub async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// Execute a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` on network failure, non-success status, or
    /// an undecodable body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    /// Exchange an email address for a session token.
    ///
    /// Sends `POST /auth/login?email=<email>` with no body. The token is
    /// returned, not stored; see [`crate::auth::login`].
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the API rejects the login.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn login(&self, email: &str) -> Result<SecretString, TransportError> {
        let mut url = Url::parse(&self.url("/auth/login"))
            .map_err(|e| TransportError::Network(format!("Invalid login URL: {e}")))?;
        url.query_pairs_mut().append_pair("email", email);

        let request = self.inner.client.post(url);
        let response: LoginResponse = self.send(request).await?;

        Ok(SecretString::from(response.token))
    }

    /// Ask the API for its health status.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the API is unreachable or unhealthy.
    pub async fn health(&self) -> Result<Health, TransportError> {
        self.get("/health").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.client.request(method, self.url(path))
    }

    /// Attach the session credential, send, and decode the response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TransportError> {
        let request = match self.inner.session.token().await {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.inner.client.execute(request).await.map_err(|e| {
            warn!(%method, %url, error = %e, "Portal API request failed");
            TransportError::from(e)
        })?;

        let status = response.status();
        let payload = response.text().await?;

        if !status.is_success() {
            warn!(%method, %url, %status, "Portal API returned an error");
            return Err(TransportError::Status { status, payload });
        }

        debug!(%method, %url, %status, "Portal API request completed");

        serde_json::from_str(&payload).map_err(|source| TransportError::Decode {
            status,
            payload,
            source,
        })
    }
}
