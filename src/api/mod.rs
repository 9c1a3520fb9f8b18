//! Typed client for the paper-transfer REST API.
//!
//! Every call maps to exactly one HTTP request against the configured base
//! URL and returns its own `Result`; the client keeps no per-call state and
//! can be cloned freely across tasks.

mod academic;
pub mod disposition;
mod error;
mod papers;
mod roles;
mod users;

pub use error::{ApiError, ApiResult, ErrorKind, Operation};
pub use papers::PaperUpload;
pub use users::ProfileImage;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{MessageBody, Payload};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request carrying the bearer token, when one is configured.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Request without credentials, on the same base URL.
    fn public_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Sends the request; any non-2xx status becomes a `Server` error carrying
    /// the body's `message` field when there is one.
    async fn send(&self, op: Operation, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|e| {
            warn!(operation = ?op, error = %e, "Request failed before a response arrived");
            ApiError::new(op, classify(e))
        })?;

        let status = response.status();
        debug!(operation = ?op, url = %response.url(), status = status.as_u16(), "Response received");
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageBody>(&text)
            .ok()
            .and_then(|b| b.message);
        warn!(operation = ?op, status = status.as_u16(), message = ?message, "Server rejected request");
        Err(ApiError::new(
            op,
            ErrorKind::Server {
                status: status.as_u16(),
                message,
            },
        ))
    }

    async fn read_bytes(op: Operation, response: Response) -> ApiResult<Vec<u8>> {
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ApiError::new(op, ErrorKind::Network(e)))
    }

    async fn read_json<T: DeserializeOwned>(op: Operation, response: Response) -> ApiResult<T> {
        let bytes = Self::read_bytes(op, response).await?;
        serde_json::from_slice(&bytes).map_err(|e| format_error(op, e.to_string()))
    }

    /// Bare or `{"data": ...}`-wrapped payload.
    async fn read_payload<T: DeserializeOwned>(op: Operation, response: Response) -> ApiResult<T> {
        Self::read_json::<Payload<T>>(op, response)
            .await
            .map(Payload::into_inner)
    }

    /// Acknowledgement text of a mutating call: a JSON string, a `message`
    /// field, or plain text. Empty bodies yield `None`.
    async fn read_ack(op: Operation, response: Response) -> ApiResult<Option<String>> {
        let bytes = Self::read_bytes(op, response).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let ack = match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(serde_json::Value::String(s)) => Some(s),
            Ok(serde_json::Value::Object(map)) => map
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| map.get("data").and_then(|d| d.as_str()))
                .map(str::to_string),
            Ok(_) => None,
            Err(_) => Some(String::from_utf8_lossy(&bytes).trim().to_string()),
        };
        Ok(ack)
    }
}

fn classify(e: reqwest::Error) -> ErrorKind {
    if e.is_builder() {
        ErrorKind::ClientSetup(e.to_string())
    } else {
        ErrorKind::Network(e)
    }
}

fn format_error(op: Operation, detail: impl Into<String>) -> ApiError {
    let detail = detail.into();
    warn!(operation = ?op, detail = %detail, "Unexpected response format");
    ApiError::new(op, ErrorKind::Format(detail))
}
