//! ArangoDB HTTP API client.
//!
//! Every authenticated call fetches its own JWT from `/_open/auth` first;
//! tokens are never cached. Failures of any kind (transport, status, body)
//! surface as [`ArangoError`], which the HTTP layer renders as one generic
//! backend error.

pub mod collection;
pub mod database;
pub mod document;

use crate::config::ArangoConfig;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use service_core::observability::TracedClientExt;
use std::time::Duration;
use thiserror::Error;

pub use collection::CollectionApi;
pub use database::DatabaseApi;
pub use document::{DocumentApi, DocumentOptions};

const AUTH_PATH: [&str; 2] = ["_open", "auth"];

/// Failure of a single call against ArangoDB, with enough detail to log.
#[derive(Debug, Error)]
pub enum ArangoError {
    #[error("{method} {endpoint} failed: {source}")]
    Transport {
        method: Method,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {endpoint} returned {status}: {body}")]
    Status {
        method: Method,
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    #[error("{method} {endpoint} returned an unreadable body: {source}")]
    Decode {
        method: Method,
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("authentication against ArangoDB failed: {0}")]
    Authentication(#[source] Box<ArangoError>),

    #[error("authentication response from {endpoint} carries no usable jwt")]
    MissingToken { endpoint: String },

    #[error("{name:?} cannot be used as a path segment")]
    InvalidName { name: String },

    #[error("invalid ArangoDB url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ArangoError {
    /// HTTP status returned by ArangoDB, when the failure carried one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ArangoError::Status { status, .. } => Some(*status),
            ArangoError::Authentication(inner) => inner.status(),
            _ => None,
        }
    }
}

impl From<ArangoError> for AppError {
    fn from(err: ArangoError) -> Self {
        AppError::Backend(anyhow::Error::new(err))
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    jwt: String,
}

/// Thin client over the ArangoDB REST API.
#[derive(Clone)]
pub struct ArangoClient {
    client: Client,
    base_url: Url,
    config: ArangoConfig,
}

impl ArangoClient {
    pub fn new(config: ArangoConfig) -> Result<Self, ArangoError> {
        let base_url = Url::parse(config.url.trim()).map_err(|e| ArangoError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ArangoError::InvalidUrl {
                url: config.url.clone(),
                reason: "url cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(ArangoError::Client)?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn databases(&self) -> DatabaseApi<'_> {
        DatabaseApi::new(self)
    }

    pub fn collections(&self) -> CollectionApi<'_> {
        CollectionApi::new(self)
    }

    pub fn documents(&self) -> DocumentApi<'_> {
        DocumentApi::new(self)
    }

    /// Resolve `segments` against the configured base URL. Each segment is
    /// percent-encoded on its own, so names can never add path components.
    /// Dot segments are rejected since URL normalisation would drop them.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ArangoError> {
        if let Some(name) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ArangoError::InvalidName {
                name: name.to_string(),
            });
        }

        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Exchange the configured credentials for a JWT.
    pub async fn authenticate(&self) -> Result<String, ArangoError> {
        let url = self.endpoint(&AUTH_PATH)?;
        let credentials = Credentials {
            username: &self.config.username,
            password: self.config.password.expose_secret(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .post(url.clone(), &credentials, headers)
            .await
            .map_err(|e| ArangoError::Authentication(Box::new(e)))?;

        let auth: AuthResponse =
            serde_json::from_value(response).map_err(|_| ArangoError::MissingToken {
                endpoint: url.to_string(),
            })?;

        if auth.jwt.is_empty() {
            return Err(ArangoError::MissingToken {
                endpoint: url.to_string(),
            });
        }

        Ok(auth.jwt)
    }

    /// Authenticated GET. Only `200 OK` counts as success.
    pub async fn get(&self, url: Url) -> Result<Value, ArangoError> {
        let headers = self.auth_headers().await?;
        let endpoint = url.to_string();

        let response = self
            .client
            .traced_get(url.as_str())
            .headers(headers)
            .send()
            .await
            .map_err(|source| {
                record_call(&Method::GET, "transport_error");
                tracing::error!(endpoint = %endpoint, error = %source, "I/O error on ArangoDB GET API request");
                ArangoError::Transport {
                    method: Method::GET,
                    endpoint: endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status();
        let body = read_body(Method::GET, &endpoint, response).await?;

        if status != StatusCode::OK {
            record_call(&Method::GET, "status_error");
            tracing::error!(endpoint = %endpoint, status = %status, body = %body, "ArangoDB GET API error");
            return Err(ArangoError::Status {
                method: Method::GET,
                endpoint,
                status,
                body,
            });
        }

        record_call(&Method::GET, "ok");
        decode(Method::GET, &endpoint, &body)
    }

    /// POST `payload` with the given headers. Any status below 400 counts as
    /// success, so `201 Created` and `202 Accepted` pass.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: Url,
        payload: &T,
        headers: HeaderMap,
    ) -> Result<Value, ArangoError> {
        let endpoint = url.to_string();

        let response = self
            .client
            .traced_post(url.as_str())
            .headers(headers)
            .json(payload)
            .send()
            .await
            .map_err(|source| {
                record_call(&Method::POST, "transport_error");
                tracing::error!(endpoint = %endpoint, error = %source, "I/O error on ArangoDB POST API request");
                ArangoError::Transport {
                    method: Method::POST,
                    endpoint: endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status();
        let body = read_body(Method::POST, &endpoint, response).await?;

        if status.as_u16() >= 400 {
            record_call(&Method::POST, "status_error");
            tracing::error!(endpoint = %endpoint, status = %status, body = %body, "ArangoDB POST API error");
            return Err(ArangoError::Status {
                method: Method::POST,
                endpoint,
                status,
                body,
            });
        }

        record_call(&Method::POST, "ok");
        decode(Method::POST, &endpoint, &body)
    }

    /// POST with a freshly fetched bearer token.
    pub async fn post_authenticated<T: Serialize + ?Sized>(
        &self,
        url: Url,
        payload: &T,
    ) -> Result<Value, ArangoError> {
        let mut headers = self.auth_headers().await?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        self.post(url, payload, headers).await
    }

    async fn auth_headers(&self) -> Result<HeaderMap, ArangoError> {
        let token = self.authenticate().await?;
        let value = HeaderValue::from_str(&format!("bearer {}", token)).map_err(|_| {
            ArangoError::MissingToken {
                endpoint: self.base_url.to_string(),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

async fn read_body(
    method: Method,
    endpoint: &str,
    response: reqwest::Response,
) -> Result<String, ArangoError> {
    response.text().await.map_err(|source| {
        record_call(&method, "transport_error");
        tracing::error!(endpoint = %endpoint, error = %source, "Unexpected abort reading ArangoDB {} response", method);
        ArangoError::Transport {
            method,
            endpoint: endpoint.to_string(),
            source,
        }
    })
}

fn decode(method: Method, endpoint: &str, body: &str) -> Result<Value, ArangoError> {
    serde_json::from_str(body).map_err(|source| {
        tracing::error!(endpoint = %endpoint, error = %source, "Malformed JSON in ArangoDB {} response", method);
        ArangoError::Decode {
            method,
            endpoint: endpoint.to_string(),
            source,
        }
    })
}

fn record_call(method: &Method, outcome: &'static str) {
    metrics::counter!(
        "arango_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
