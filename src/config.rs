//! # Configuration Module
//!
//! Endpoint configuration shared by the CLI and the desktop GUI. It is the
//! common interface between the front ends and the submission pipeline.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Default | Description |
//! |-----------|------|---------|-------------|
//! | `endpoint` | `String` | `http://localhost:5000/predict` | Prediction endpoint URL |
//! | `timeout_secs` | `u64` | 30 | Request timeout in seconds |
//!
//! ## Timeout Formats
//!
//! The CLI accepts flexible timeout input:
//! - Raw seconds: `30` or `30s`
//! - Minutes: `2m` (120 seconds)
//!
//! ## Examples
//!
//! ```rust
//! use inkcheck::config::ClientConfig;
//!
//! // Use defaults (local backend)
//! let config = ClientConfig::default();
//! assert!(config.validate().is_ok());
//!
//! // Custom endpoint
//! let config = ClientConfig::new("http://10.0.0.4:5000/predict", 10);
//! assert_eq!(config.health_url(), "http://10.0.0.4:5000/health");
//! ```

use crate::error::{AnalyzeError, AnalyzeResult};

/// Default prediction endpoint, matching the local development backend.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";

/// Default request timeout in seconds.
///
/// The original client had no timeout at all; a bound keeps a dead backend
/// from pinning the busy state forever.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for talking to the remote classification service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the prediction endpoint.
    ///
    /// The request is a multipart POST with a single part named `file`;
    /// nothing else about the URL is interpreted except for deriving the
    /// sibling health URL.
    pub endpoint: String,

    /// Request timeout in seconds. Must be between 1 and 600.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with an explicit endpoint and timeout.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs,
        }
    }

    /// Validate the configuration, returning a helpful message on failure.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::InvalidConfig`] if the endpoint is empty, is
    /// not an http/https URL, or the timeout is out of range.
    pub fn validate(&self) -> AnalyzeResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(AnalyzeError::invalid_config("endpoint URL is empty"));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(AnalyzeError::invalid_config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(AnalyzeError::invalid_config(format!(
                "timeout must be between 1 and 600 seconds, got {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }

    /// URL of the backend's health probe, derived from the endpoint.
    ///
    /// The backend serves `GET /health` next to `POST /predict`; the last
    /// path segment of the endpoint is replaced accordingly.
    pub fn health_url(&self) -> String {
        match self.endpoint.rfind('/') {
            Some(idx) if idx > "https://".len() => format!("{}/health", &self.endpoint[..idx]),
            _ => format!("{}/health", self.endpoint.trim_end_matches('/')),
        }
    }
}

/// Parse a timeout string like `"30"`, `"30s"` or `"2m"` into seconds.
pub fn parse_timeout(timeout: &str) -> AnalyzeResult<u64> {
    if let Ok(seconds) = timeout.parse::<u64>() {
        return Ok(seconds);
    }

    let len = timeout.len();
    if len < 2 {
        return Err(AnalyzeError::invalid_config(format!(
            "invalid timeout format: {timeout}"
        )));
    }

    let (num_str, unit) = timeout.split_at(len - 1);
    let num: u64 = num_str.parse().map_err(|_| {
        AnalyzeError::invalid_config(format!("invalid number in timeout: {num_str}"))
    })?;

    match unit {
        "s" => Ok(num),
        "m" => Ok(num * 60),
        _ => Err(AnalyzeError::invalid_config(format!(
            "invalid timeout unit: {unit}. Use 's' for seconds or 'm' for minutes"
        ))),
    }
}
