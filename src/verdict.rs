//! Verdict model: interpreting and presenting the server's answer.
//!
//! The server reports `result` as a string and `confidence` as either a
//! number, a numeric string, or a percent-suffixed string (`"97.30%"` is the
//! exact shape the reference backend emits). `result == "Real"` is the
//! success case; any other value is treated as a forgery finding. A
//! confidence that cannot be parsed as a leading decimal fails closed as a
//! malformed response rather than rendering a meter from garbage.

use std::time::Duration;

use serde_json::Value;

use crate::error::{AnalyzeError, AnalyzeResult};

/// Delay before the confidence meter starts filling, so the reset-to-zero
/// frame is actually visible.
pub const METER_DELAY: Duration = Duration::from_millis(100);

/// Duration of the meter fill ramp once the delay has elapsed.
pub const METER_RAMP: Duration = Duration::from_millis(600);

/// Binary classification of the server's `result` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// `result == "Real"`: the signature is judged authentic
    Authentic,
    /// Any other result string: treated as a forgery finding
    Forged,
}

impl Verdict {
    /// Classify a raw `result` string.
    pub fn from_label(label: &str) -> Self {
        if label == "Real" {
            Self::Authentic
        } else {
            Self::Forged
        }
    }

    /// Whether this verdict renders in the success style.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Authentic)
    }

    /// Headline text for the result card.
    pub fn title(self) -> &'static str {
        match self {
            Self::Authentic => "Authentic Signature",
            Self::Forged => "Potential Forgery",
        }
    }

    /// Body text for the result card.
    pub fn description(self) -> &'static str {
        match self {
            Self::Authentic => {
                "The system has verified this signature as authentic with high confidence."
            }
            Self::Forged => {
                "The system detected anomalies suggesting this signature may be forged."
            }
        }
    }
}

/// The parsed verdict and confidence pair returned by the remote service.
///
/// Transient: lives until the next analysis replaces it or Remove discards
/// it.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Classified verdict
    pub verdict: Verdict,
    /// The server's raw `result` string, kept for logging
    pub label: String,
    /// Confidence as a percentage value (not yet clamped)
    pub confidence: f64,
    /// The server's optional raw probability score, when present
    pub raw_score: Option<f64>,
}

impl AnalysisResult {
    /// Parse a successful (2xx) response body.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::MalformedResponse`] when `result` is missing
    /// or not a string, when `confidence` is missing, or when `confidence`
    /// does not start with a decimal number.
    pub fn from_body(body: &Value) -> AnalyzeResult<Self> {
        let label = body
            .get("result")
            .and_then(Value::as_str)
            .ok_or_else(|| AnalyzeError::malformed_response("missing 'result' field"))?
            .to_string();

        let confidence_field = body
            .get("confidence")
            .ok_or_else(|| AnalyzeError::malformed_response("missing 'confidence' field"))?;
        let confidence = parse_confidence(confidence_field)?;

        let raw_score = body.get("raw_score").and_then(Value::as_f64);

        Ok(Self {
            verdict: Verdict::from_label(&label),
            label,
            confidence,
            raw_score,
        })
    }

    /// Confidence formatted to one decimal place, e.g. `"97.3% Confidence"`.
    pub fn confidence_text(&self) -> String {
        format!("{:.1}% Confidence", self.confidence)
    }

    /// Target fill fraction for the confidence meter, clamped to `[0, 1]`.
    pub fn meter_target(&self) -> f32 {
        (self.confidence.clamp(0.0, 100.0) / 100.0) as f32
    }

    /// Meter fill fraction at `elapsed` since the result was shown.
    ///
    /// Models the reset-then-ramp animation of the original UI: the meter
    /// holds at zero for [`METER_DELAY`], then ramps linearly to the target
    /// over [`METER_RAMP`].
    pub fn meter_fill_at(&self, elapsed: Duration) -> f32 {
        let target = self.meter_target();
        if elapsed <= METER_DELAY {
            return 0.0;
        }
        let ramped = elapsed - METER_DELAY;
        if ramped >= METER_RAMP {
            return target;
        }
        target * (ramped.as_secs_f32() / METER_RAMP.as_secs_f32())
    }
}

/// Parse a confidence value as the server may express it.
///
/// Accepts a JSON number, a numeric string, or a string with a trailing
/// percent sign or other suffix; like `parseFloat`, only the leading decimal
/// is read. Fails closed on anything without a leading decimal.
fn parse_confidence(value: &Value) -> AnalyzeResult<f64> {
    if let Some(n) = value.as_f64() {
        return Ok(n);
    }
    if let Some(s) = value.as_str() {
        if let Some(n) = leading_float(s) {
            return Ok(n);
        }
    }
    Err(AnalyzeError::malformed_response(format!(
        "confidence is not numeric: {value}"
    )))
}

/// Extract the leading decimal number from a string, `parseFloat`-style:
/// optional sign, mantissa, and a complete exponent if one follows
/// (`"9.7e1"` is 97; in `"5e%"` the dangling `e` is not consumed).
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                seen_digit = true;
                i += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                i += 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    let mut end = i;
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn real_label_is_success() {
        let result = AnalysisResult::from_body(&json!({
            "result": "Real",
            "confidence": "97.3"
        }))
        .unwrap();
        assert!(result.verdict.is_success());
        assert_eq!(result.verdict.title(), "Authentic Signature");
        assert_eq!(result.confidence_text(), "97.3% Confidence");
    }

    #[test]
    fn any_other_label_is_danger() {
        for label in ["Fake", "Forged", "unknown"] {
            let result = AnalysisResult::from_body(&json!({
                "result": label,
                "confidence": 62
            }))
            .unwrap();
            assert!(!result.verdict.is_success());
            assert_eq!(result.confidence_text(), "62.0% Confidence");
        }
    }

    #[test]
    fn percent_suffixed_confidence_parses() {
        // The reference backend sends confidence as "97.30%".
        let result = AnalysisResult::from_body(&json!({
            "result": "Real",
            "confidence": "97.30%",
            "raw_score": 0.973
        }))
        .unwrap();
        assert!((result.confidence - 97.3).abs() < 1e-9);
        assert_eq!(result.raw_score, Some(0.973));
    }

    #[test]
    fn exponent_notation_parses_like_parse_float() {
        let result = AnalysisResult::from_body(&json!({
            "result": "Real",
            "confidence": "9.7e1"
        }))
        .unwrap();
        assert!((result.confidence - 97.0).abs() < 1e-9);

        // A dangling exponent marker is not consumed.
        let result = AnalysisResult::from_body(&json!({
            "result": "Real",
            "confidence": "5e%"
        }))
        .unwrap();
        assert!((result.confidence - 5.0).abs() < 1e-9);
    }

    #[test]
    fn non_numeric_confidence_fails_closed() {
        let err = AnalysisResult::from_body(&json!({
            "result": "Real",
            "confidence": "very sure"
        }))
        .unwrap_err();
        assert!(matches!(err, AnalyzeError::MalformedResponse { .. }));
    }

    #[test]
    fn missing_result_fails_closed() {
        let err = AnalysisResult::from_body(&json!({ "confidence": 50 })).unwrap_err();
        assert!(matches!(err, AnalyzeError::MalformedResponse { .. }));
    }

    #[test]
    fn meter_target_clamps_to_unit_range() {
        let over = AnalysisResult::from_body(&json!({
            "result": "Real",
            "confidence": 140.0
        }))
        .unwrap();
        assert_eq!(over.meter_target(), 1.0);

        let under = AnalysisResult::from_body(&json!({
            "result": "Fake",
            "confidence": -3.0
        }))
        .unwrap();
        assert_eq!(under.meter_target(), 0.0);
    }

    #[test]
    fn meter_holds_then_ramps_then_settles() {
        let result = AnalysisResult::from_body(&json!({
            "result": "Real",
            "confidence": 80.0
        }))
        .unwrap();
        assert_eq!(result.meter_fill_at(Duration::ZERO), 0.0);
        assert_eq!(result.meter_fill_at(Duration::from_millis(100)), 0.0);
        let mid = result.meter_fill_at(Duration::from_millis(400));
        assert!(mid > 0.0 && mid < 0.8, "mid fill was {mid}");
        assert_eq!(result.meter_fill_at(Duration::from_secs(2)), 0.8);
    }
}
