//! # Error Handling
//!
//! Error types for the analysis client, covering the three boundaries where
//! things go wrong: file intake, the network round trip, and response
//! interpretation.
//!
//! ## Error Classification
//!
//! Errors are classified using traits:
//!
//! - [`Retryable`]: errors where simply trying again may succeed (e.g. the
//!   server was unreachable)
//! - [`HasSeverity`]: severity level for logging and display decisions
//!
//! Every error produces a `user_message()` suitable for direct display; the
//! component never panics on any of these and never retries automatically.
//!
//! ## Usage
//!
//! ```rust
//! use inkcheck::error::{AnalyzeError, Retryable};
//!
//! let err = AnalyzeError::network_unreachable("connection refused");
//! assert!(err.is_retryable());
//! assert!(err.user_message().contains("reach the server"));
//! ```

use std::{error::Error as StdError, fmt};

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational; the user corrected course themselves
    Info,
    /// Warnings that may indicate potential issues
    Warning,
    /// Errors that affect the current operation but leave the client usable
    Error,
}

/// Errors that can be retried without changing anything
pub trait Retryable {
    /// Whether trying the same operation again may succeed
    fn is_retryable(&self) -> bool;
}

/// Errors carrying a severity level
pub trait HasSeverity {
    /// Severity of this error
    fn severity(&self) -> ErrorSeverity;
}

/// All error conditions surfaced by the analysis client.
///
/// Each variant corresponds to one recovery path at the UI boundary; none of
/// them terminate the component.
#[derive(Debug)]
pub enum AnalyzeError {
    /// The staged file is not an image. No state is mutated.
    InvalidFileType {
        /// File name as offered by the user
        name: String,
        /// The MIME type that was detected, if any
        detected: Option<String>,
    },

    /// The staged image could not be decoded for preview.
    ///
    /// Policy: fail closed. The file is not staged and the intake state is
    /// kept, with this error shown to the user.
    PreviewDecode {
        /// File name as offered by the user
        name: String,
        /// Decoder error text
        reason: String,
    },

    /// The server answered with a non-2xx status.
    ServerRejected {
        /// HTTP status code
        status: u16,
        /// Server-supplied `error` field, if the body carried one
        message: Option<String>,
    },

    /// The request never completed: connection refused, DNS failure,
    /// timeout, or any other transport-level problem.
    NetworkUnreachable {
        /// Transport error text
        reason: String,
    },

    /// The server answered 2xx but the body was not the expected
    /// `{result, confidence}` shape, or the confidence was not numeric.
    MalformedResponse {
        /// What was wrong with the body
        reason: String,
    },

    /// The endpoint configuration failed validation.
    InvalidConfig {
        /// What was wrong with the configuration
        reason: String,
    },
}

impl AnalyzeError {
    /// Create an [`AnalyzeError::InvalidFileType`]
    pub fn invalid_file_type(name: impl Into<String>, detected: Option<String>) -> Self {
        Self::InvalidFileType {
            name: name.into(),
            detected,
        }
    }

    /// Create an [`AnalyzeError::PreviewDecode`]
    pub fn preview_decode(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PreviewDecode {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an [`AnalyzeError::ServerRejected`]
    pub fn server_rejected(status: u16, message: Option<String>) -> Self {
        Self::ServerRejected { status, message }
    }

    /// Create an [`AnalyzeError::NetworkUnreachable`]
    pub fn network_unreachable(reason: impl Into<String>) -> Self {
        Self::NetworkUnreachable {
            reason: reason.into(),
        }
    }

    /// Create an [`AnalyzeError::MalformedResponse`]
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Create an [`AnalyzeError::InvalidConfig`]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Message suitable for direct display to the user.
    ///
    /// These are the alert texts of the original UI contract: a plain
    /// instruction for intake rejections, the server's own words for
    /// rejections (with a generic fallback), and a connectivity hint for
    /// transport failures.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFileType { .. } => "Please upload an image file.".to_string(),
            Self::PreviewDecode { name, .. } => {
                format!("Could not read \"{name}\" as an image.")
            }
            Self::ServerRejected { message, .. } => {
                let detail = message.as_deref().unwrap_or("Something went wrong");
                format!("Error: {detail}")
            }
            Self::NetworkUnreachable { .. } => {
                "Failed to reach the server. Make sure the analysis backend is running."
                    .to_string()
            }
            Self::MalformedResponse { .. } => {
                "The server returned an unreadable result.".to_string()
            }
            Self::InvalidConfig { reason } => format!("Invalid configuration: {reason}"),
        }
    }
}

impl fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileType { name, detected } => match detected {
                Some(mime) => write!(f, "'{name}' is not an image (detected {mime})"),
                None => write!(f, "'{name}' is not an image"),
            },
            Self::PreviewDecode { name, reason } => {
                write!(f, "failed to decode '{name}' for preview: {reason}")
            }
            Self::ServerRejected { status, message } => match message {
                Some(msg) => write!(f, "server rejected the request (HTTP {status}): {msg}"),
                None => write!(f, "server rejected the request (HTTP {status})"),
            },
            Self::NetworkUnreachable { reason } => {
                write!(f, "could not reach the analysis endpoint: {reason}")
            }
            Self::MalformedResponse { reason } => {
                write!(f, "malformed analysis response: {reason}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl StdError for AnalyzeError {}

impl Retryable for AnalyzeError {
    fn is_retryable(&self) -> bool {
        // Only transport failures are worth repeating unchanged; a rejected
        // or malformed exchange will fail the same way again.
        matches!(self, Self::NetworkUnreachable { .. })
    }
}

impl HasSeverity for AnalyzeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidFileType { .. } => ErrorSeverity::Info,
            Self::PreviewDecode { .. } => ErrorSeverity::Warning,
            Self::ServerRejected { .. }
            | Self::NetworkUnreachable { .. }
            | Self::MalformedResponse { .. }
            | Self::InvalidConfig { .. } => ErrorSeverity::Error,
        }
    }
}

/// Convenient result alias used throughout the crate
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;
