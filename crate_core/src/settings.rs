//! # Process Settings
//!
//! Settings that stay the same across designs: the standards tag and part
//! numbers stamped on exports, the handling envelope, splicer stock and
//! clearances, and the default log level. Every field has a default, so an
//! empty JSON object is a valid settings file.
//!
//! ```json
//! {
//!   "standardsTag": "AMAT-0251-70054",
//!   "partNumbers": { "base": "0205-12345", "crate": "0205-12346", "cap": "0205-12347" },
//!   "envelope": { "maxLength": 130, "maxWidth": 130, "maxHeight": 130 },
//!   "splicing": { "minTrimWidth": 6.0 },
//!   "logging": { "level": "debug" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::splicing::{HandlingEnvelope, SpliceOptions};
use crate::errors::{CrateError, CrateResult};
use crate::export::{PartNumbers, DEFAULT_STANDARDS_TAG};

const PART_NUMBER_PREFIX: &str = "0205-";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Fallback level when neither `RUST_LOG` nor a CLI flag sets one
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub standards_tag: String,
    pub part_numbers: PartNumbers,
    pub envelope: HandlingEnvelope,
    pub splicing: SpliceOptions,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            standards_tag: DEFAULT_STANDARDS_TAG.to_string(),
            part_numbers: PartNumbers::default(),
            envelope: HandlingEnvelope::default(),
            splicing: SpliceOptions::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON.
    pub fn from_json(json: &str) -> CrateResult<Self> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| CrateError::invalid_configuration("settings", "<invalid>", e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> CrateResult<()> {
        if self.standards_tag.trim().is_empty() {
            return Err(CrateError::invalid_configuration(
                "standardsTag",
                "",
                "Standards tag must not be empty",
            ));
        }

        for (label, number) in self.part_numbers.entries() {
            if !is_part_number(number) {
                return Err(CrateError::invalid_configuration(
                    format!("partNumbers.{}", label.to_lowercase()),
                    number,
                    "Part numbers must look like 0205-XXXXX",
                ));
            }
        }

        let sheet = &self.splicing.sheet;
        for (field, value) in [
            ("splicing.sheet.width", sheet.width),
            ("splicing.sheet.height", sheet.height),
            ("envelope.maxLength", self.envelope.max_length),
            ("envelope.maxWidth", self.envelope.max_width),
            ("envelope.maxHeight", self.envelope.max_height),
            ("envelope.maxVolume", self.envelope.max_volume),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CrateError::invalid_configuration(
                    field,
                    value.to_string(),
                    "Must be a positive number",
                ));
            }
        }

        for (field, value) in [
            ("splicing.minTrimWidth", self.splicing.min_trim_width),
            ("splicing.cleatClearanceRow", self.splicing.cleat_clearance_row),
            ("splicing.cleatClearanceSplice", self.splicing.cleat_clearance_splice),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CrateError::invalid_configuration(
                    field,
                    value.to_string(),
                    "Must be zero or positive",
                ));
            }
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(CrateError::invalid_configuration(
                "logging.level",
                &self.logging.level,
                "Expected one of trace, debug, info, warn, error",
            ));
        }

        Ok(())
    }
}

/// `0205-` followed by five upper-case letters or digits
fn is_part_number(value: &str) -> bool {
    match value.strip_prefix(PART_NUMBER_PREFIX) {
        Some(rest) => rest.len() == 5 && rest.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.standards_tag, "AMAT-0251-70054");
        assert_eq!(settings.envelope, HandlingEnvelope::CUBE_130);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "partNumbers": { "crate": "0205-12AB9" },
            "splicing": { "minTrimWidth": 6.0, "allowRotation": false },
            "logging": { "level": "debug" }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.part_numbers.crate_number, "0205-12AB9");
        assert_eq!(settings.part_numbers.base, "0205-XXXXX");
        assert_eq!(settings.splicing.min_trim_width, 6.0);
        assert!(!settings.splicing.allow_rotation);
        assert_eq!(settings.splicing.sheet.width, 48.0);
    }

    #[test]
    fn test_part_number_pattern() {
        assert!(is_part_number("0205-XXXXX"));
        assert!(is_part_number("0205-00042"));
        assert!(!is_part_number("0205-abcde"));
        assert!(!is_part_number("0206-12345"));
        assert!(!is_part_number("0205-1234"));

        let mut settings = Settings::default();
        settings.part_numbers.cap = "CAP-1".to_string();
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, CrateError::InvalidConfiguration { ref field, .. } if field == "partNumbers.cap"));
    }

    #[test]
    fn test_rejects_bad_sheet_and_level() {
        let mut settings = Settings::default();
        settings.splicing.sheet.width = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        assert!(settings.validate().is_err());

        assert!(Settings::from_json("{ not json").is_err());
    }
}
