//! Analysis submission: the one network round trip of the client.
//!
//! The staged file is sent as a single multipart part named `file` via POST
//! to the configured endpoint. The response is interpreted in three tiers:
//!
//! 1. transport failure ⇒ [`AnalyzeError::NetworkUnreachable`]
//! 2. non-2xx status ⇒ [`AnalyzeError::ServerRejected`] carrying the body's
//!    optional `error` string
//! 3. 2xx with an unparseable body ⇒ [`AnalyzeError::MalformedResponse`]
//!
//! The body interpretation lives in free functions taking `(status, body)`
//! so it can be tested without a live server.

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{AnalyzeError, AnalyzeResult};
use crate::intake::SelectedFile;
use crate::verdict::AnalysisResult;

/// Shape of the backend's non-2xx bodies, e.g. `{"error": "No file part"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Health probe answer from `GET /health`.
#[derive(Debug, Deserialize)]
pub struct ServerHealth {
    /// Reported status, `"healthy"` when the backend is up
    pub status: String,
}

impl ServerHealth {
    /// Whether the backend reports itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Client for the remote classification service.
///
/// Owns a connection-pooling HTTP client; cheap to clone per request via the
/// inner `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct Analyzer {
    client: reqwest::Client,
    config: ClientConfig,
}

impl Analyzer {
    /// Build an analyzer from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::InvalidConfig`] if the configuration fails
    /// validation or the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> AnalyzeResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalyzeError::invalid_config(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// The configuration this analyzer was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit the staged file and await the verdict.
    ///
    /// # Errors
    ///
    /// Any of the three response tiers documented at module level.
    pub async fn analyze(&self, file: &SelectedFile) -> AnalyzeResult<AnalysisResult> {
        info!(
            "submitting '{}' ({} bytes, {}) to {}",
            file.name,
            file.len(),
            file.mime,
            self.config.endpoint
        );

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|e| AnalyzeError::invalid_config(format!("bad upload MIME: {e}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("request to {} failed: {e}", self.config.endpoint);
                AnalyzeError::network_unreachable(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        debug!("endpoint answered HTTP {status}: {body}");

        interpret_response(status, &body)
    }

    /// Probe the backend's health endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::NetworkUnreachable`] on transport failure,
    /// [`AnalyzeError::ServerRejected`] on a non-2xx answer, or
    /// [`AnalyzeError::MalformedResponse`] if the body lacks a status.
    pub async fn health(&self) -> AnalyzeResult<ServerHealth> {
        let url = self.config.health_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalyzeError::network_unreachable(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(AnalyzeError::server_rejected(status, None));
        }
        response
            .json::<ServerHealth>()
            .await
            .map_err(|e| AnalyzeError::malformed_response(e.to_string()))
    }
}

/// Interpret a `(status, body)` pair from the prediction endpoint.
///
/// # Errors
///
/// Non-2xx statuses become [`AnalyzeError::ServerRejected`] with the body's
/// `error` string when present; 2xx bodies that are not the expected shape
/// become [`AnalyzeError::MalformedResponse`].
pub fn interpret_response(status: u16, body: &Value) -> AnalyzeResult<AnalysisResult> {
    if !(200..300).contains(&status) {
        return Err(AnalyzeError::server_rejected(
            status,
            server_error_message(body),
        ));
    }
    AnalysisResult::from_body(body)
}

/// Pull the optional `error` string out of a failure body.
fn server_error_message(body: &Value) -> Option<String> {
    serde_json::from_value::<ErrorBody>(body.clone())
        .ok()
        .and_then(|b| b.error)
}
