//! # Inkcheck
//!
//! Client library for a remote signature-forgery classification service:
//! stage an image, preview it, submit it, render the verdict.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `intake`: file staging and image-type validation
//! - `preview`: decoding the staged file into displayable pixels
//! - `analyze`: the multipart submission and response interpretation
//! - `verdict`: verdict classification, confidence formatting, meter animation
//! - `state`: the UploadAnalyzer state machine the front ends render from
//! - `config`: endpoint configuration and validation
//! - `error`: error types and classification traits
//!
//! ## Features
//!
//! - **Explicit state machine**: every visual state the GUI shows is derived
//!   from [`state::UploadAnalyzer`], never toggled ad hoc
//! - **Fail-closed parsing**: undecodable previews and non-numeric
//!   confidences are reported, never guessed at
//! - **Single-flight submission**: overlapping analysis requests are
//!   structurally impossible, not merely discouraged
//!
//! ## Example
//!
//! ```rust,no_run
//! use inkcheck::{analyze_path, config::ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::default();
//! let result = analyze_path("signature.png".as_ref(), &config).await?;
//! println!("{}: {}", result.verdict.title(), result.confidence_text());
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod analyze;
pub mod config;
pub mod error;
pub mod intake;
pub mod preview;
pub mod state;
pub mod verdict;

/// Re-export error types for convenience
pub use error::{AnalyzeError, AnalyzeResult, ErrorSeverity, HasSeverity, Retryable};

/// Re-export the core types front ends work with
pub use analyze::Analyzer;
pub use intake::SelectedFile;
pub use state::{Phase, UploadAnalyzer};
pub use verdict::{AnalysisResult, Verdict};

/// Stage, validate and submit an image file in one call.
///
/// This is the headless entry point used by the CLI: it runs the same
/// intake → preview → submit pipeline the GUI drives interactively, minus
/// the rendering. The preview decode is kept so a file that would fail in
/// the GUI fails identically here.
///
/// # Errors
///
/// Any [`AnalyzeError`]: intake rejection, preview decode failure,
/// transport failure, server rejection, or a malformed response.
pub async fn analyze_path(
    path: &Path,
    config: &config::ClientConfig,
) -> AnalyzeResult<AnalysisResult> {
    let file = intake::stage_path(path)?;
    preview::decode_preview(&file)?;
    let analyzer = Analyzer::new(config.clone())?;
    analyzer.analyze(&file).await
}
