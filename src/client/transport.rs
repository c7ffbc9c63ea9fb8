// HTTP transport for the client actions
// One request per call over the hyper-util pooled client

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::ClientConfig;
use crate::auth::TOKEN_HEADER;
use crate::validation::FieldError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-2xx status
    #[error("server responded {status}")]
    Status { status: StatusCode, body: Bytes },

    #[error("unexpected response body ({status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct MsgBody {
    msg: String,
}

#[derive(Deserialize)]
struct ErrorsBody {
    errors: Vec<FieldError>,
}

impl ClientError {
    /// HTTP status of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(status.as_u16()),
            _ => None,
        }
    }

    /// Text for the error event: the server's `msg` when it sent one,
    /// otherwise the status reason phrase
    pub fn message(&self) -> String {
        match self {
            Self::Status { status, body } => serde_json::from_slice::<MsgBody>(body)
                .map(|b| b.msg)
                .unwrap_or_else(|_| reason(*status)),
            Self::Decode { status, .. } => reason(*status),
            other => other.to_string(),
        }
    }

    /// Field validation failures carried by a 400 response
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            Self::Status { body, .. } => serde_json::from_slice::<ErrorsBody>(body)
                .map(|b| b.errors)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_string(), ToString::to_string)
}

/// A JSON API client bound to one base URL and token
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
    http: Client<HttpConnector, Full<Bytes>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            http: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.send(Method::GET, path, None).await?;
        decode(&body)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = self.send(Method::POST, path, Some(encode(body)?)).await?;
        decode(&body)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = self.send(Method::PUT, path, Some(encode(body)?)).await?;
        decode(&body)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.send(Method::DELETE, path, None).await?;
        decode(&body)
    }

    /// Issue one request and return the body of a 2xx response
    async fn send(
        &self,
        method: Method,
        path: &str,
        json: Option<Vec<u8>>,
    ) -> Result<Decoded, ClientError> {
        let url = format!("{}{path}", self.base_url);
        let uri: Uri = url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
            ClientError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        let body = match json {
            Some(bytes) => {
                builder = builder.header(hyper::header::CONTENT_TYPE, "application/json");
                Full::new(Bytes::from(bytes))
            }
            None => Full::new(Bytes::new()),
        };
        let req = builder.body(body).map_err(|e| ClientError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let exchange = async {
            let response = self.http.request(req).await?;
            let status = response.status();
            let body = response.into_body().collect().await?.to_bytes();
            Ok::<_, ClientError>(Decoded { status, body })
        };

        let decoded = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))??;

        if decoded.status.is_success() {
            Ok(decoded)
        } else {
            Err(ClientError::Status {
                status: decoded.status,
                body: decoded.body,
            })
        }
    }
}

struct Decoded {
    status: StatusCode,
    body: Bytes,
}

fn encode<B: Serialize>(body: &B) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(body).map_err(ClientError::Encode)
}

fn decode<T: DeserializeOwned>(decoded: &Decoded) -> Result<T, ClientError> {
    serde_json::from_slice(&decoded.body).map_err(|source| ClientError::Decode {
        status: decoded.status,
        source,
    })
}
