//! # CAD Export
//!
//! Two serializers read the same [`CrateModel`](crate::model::CrateModel):
//!
//! - [`expressions`] - NX-style `NAME=VALUE` parameter file
//! - [`step`] - ISO-10303-21 (STEP AP242) file with PMI entities from [`pmi`]
//!
//! Both render numbers through [`format_real`], so a value that appears in
//! both files has the same text and parses back to the same `f64` bits.

pub mod expressions;
pub mod pmi;
pub mod step;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CrateError, CrateResult};

pub use expressions::{generate_expression_file, ExpressionFile};
pub use pmi::{generate_pmi_annotations, PmiAnnotations};
pub use step::{export_step_with_pmi, StepFile};

/// Default standards-compliance tag stamped on exported files
pub const DEFAULT_STANDARDS_TAG: &str = "AMAT-0251-70054";

/// Unassigned part number
pub const PART_NUMBER_PLACEHOLDER: &str = "0205-XXXXX";

/// Shortest text that parses back to exactly `value`, always with a decimal
/// point. `-0.0` renders as `0.0`.
///
/// Callers must reject non-finite values first.
///
/// ```rust
/// use crate_core::export::format_real;
///
/// assert_eq!(format_real(1.0), "1.0");
/// assert_eq!(format_real(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(format_real(-0.0), "0.0");
/// ```
pub fn format_real(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

/// Append one line of export text.
pub(crate) fn push_line(out: &mut String, line: impl AsRef<str>) {
    out.push_str(line.as_ref());
    out.push('\n');
}

/// Fail with `SerializationFailure` if `value` cannot be written.
pub(crate) fn ensure_finite(format: &str, name: &str, value: f64) -> CrateResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CrateError::serialization(format, format!("{name} is not a finite number ({value})")))
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Part numbers echoed into both export headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartNumbers {
    pub base: String,
    #[serde(rename = "crate")]
    pub crate_number: String,
    pub cap: String,
}

impl Default for PartNumbers {
    fn default() -> Self {
        PartNumbers {
            base: PART_NUMBER_PLACEHOLDER.to_string(),
            crate_number: PART_NUMBER_PLACEHOLDER.to_string(),
            cap: PART_NUMBER_PLACEHOLDER.to_string(),
        }
    }
}

impl PartNumbers {
    /// `(label, value)` pairs in header order
    pub fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("BASE", self.base.as_str()),
            ("CRATE", self.crate_number.as_str()),
            ("CAP", self.cap.as_str()),
        ]
    }
}

/// Per-export stamp: when, which part numbers, which standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub part_numbers: PartNumbers,
    pub standards_tag: String,
}

impl ExportMetadata {
    pub fn now(part_numbers: PartNumbers, standards_tag: impl Into<String>) -> Self {
        ExportMetadata {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            part_numbers,
            standards_tag: standards_tag.into(),
        }
    }

    /// Calendar date used in file names (`YYYY-MM-DD`)
    pub fn date_stamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }

    /// RFC 3339 timestamp for file headers
    pub fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }
}

impl Default for ExportMetadata {
    fn default() -> Self {
        ExportMetadata::now(PartNumbers::default(), DEFAULT_STANDARDS_TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_real_round_trips() {
        for value in [1.0, 0.25, 46.0, 94.5, 1.0 / 3.0, 7.25, 1e-7, 123456.789, -19.25, 1e22] {
            let text = format_real(value);
            assert!(text.contains('.'), "{text}");
            assert_eq!(text.parse::<f64>().unwrap().to_bits(), value.to_bits());
        }
        assert_eq!(format_real(-0.0), "0.0");
        assert_eq!(format_real(11.25), "11.25");
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("STEP", "x", 1.0).is_ok());
        let err = ensure_finite("STEP", "x", f64::NAN).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_FAILURE");
    }

    #[test]
    fn test_push_line() {
        let mut out = String::new();
        push_line(&mut out, "# header");
        push_line(&mut out, format!("a={}", format_real(2.0)));
        assert_eq!(out, "# header\na=2.0\n");
    }

    #[test]
    fn test_metadata_stamps() {
        let mut meta = ExportMetadata::default();
        meta.generated_at = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 9).unwrap();
        assert_eq!(meta.date_stamp(), "2025-03-07");
        assert_eq!(meta.timestamp(), "2025-03-07T14:05:09Z");
        assert_eq!(meta.standards_tag, DEFAULT_STANDARDS_TAG);
        assert_eq!(meta.part_numbers.entries()[1], ("CRATE", PART_NUMBER_PLACEHOLDER));
    }

    #[test]
    fn test_part_numbers_wire_names() {
        let json = serde_json::to_value(PartNumbers::default()).unwrap();
        assert!(json.get("crate").is_some());
        assert!(json.get("base").is_some());
    }
}
