//! # Design Session
//!
//! A `DesignSession` is the root container for one crate design: the
//! configuration being worked on, who is working on it, and the settings
//! exports are stamped with. A session lives only as long as the process;
//! it serializes to JSON for transport, not for storage.
//!
//! ## Structure
//!
//! ```text
//! DesignSession
//! ├── meta: SessionMetadata (id, engineer, TI number, timestamps)
//! ├── settings: Settings (standards tag, part numbers, envelope, splicing)
//! └── configuration: CrateConfiguration
//! ```
//!
//! Nothing derived is stored. Every model, BOM or export is rebuilt from the
//! configuration on request.
//!
//! ## Example
//!
//! ```rust
//! use crate_core::session::DesignSession;
//!
//! let session = DesignSession::new("Jane Engineer", "TI-2025-014");
//! let model = session.build_model().unwrap();
//! assert_eq!(model.skids.count, 3);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::bom::{generate_bill_of_materials, BillOfMaterials};
use crate::configuration::CrateConfiguration;
use crate::errors::CrateResult;
use crate::export::{
    export_step_with_pmi, generate_expression_file, generate_pmi_annotations, ExportMetadata,
    ExpressionFile, StepFile,
};
use crate::model::{build_model, CrateModel};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSession {
    pub meta: SessionMetadata,
    pub settings: Settings,
    configuration: CrateConfiguration,
}

/// Session header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub id: Uuid,

    pub engineer: String,

    /// Technical instruction number the crate is built against
    pub ti_number: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl DesignSession {
    /// Start a session on the default configuration.
    pub fn new(engineer: impl Into<String>, ti_number: impl Into<String>) -> Self {
        let now = Utc::now();
        DesignSession {
            meta: SessionMetadata {
                id: Uuid::new_v4(),
                engineer: engineer.into(),
                ti_number: ti_number.into(),
                created: now,
                modified: now,
            },
            settings: Settings::default(),
            configuration: CrateConfiguration::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn configuration(&self) -> &CrateConfiguration {
        &self.configuration
    }

    /// Swap in a new configuration. An invalid one leaves the session untouched.
    pub fn replace_configuration(&mut self, configuration: CrateConfiguration) -> CrateResult<()> {
        configuration.validate()?;
        self.configuration = configuration;
        self.touch();
        Ok(())
    }

    /// Back to the default configuration
    pub fn reset(&mut self) {
        self.configuration = CrateConfiguration::default();
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn build_model(&self) -> CrateResult<CrateModel> {
        build_model(&self.configuration, &self.settings.splicing)
    }

    /// Whether the current design fits the handling envelope
    pub fn fits_envelope(&self) -> CrateResult<bool> {
        Ok(self.build_model()?.fits(&self.settings.envelope))
    }

    /// Fresh metadata for one export
    pub fn export_metadata(&self) -> ExportMetadata {
        ExportMetadata::now(self.settings.part_numbers.clone(), self.settings.standards_tag.clone())
    }

    pub fn bill_of_materials(&self) -> CrateResult<BillOfMaterials> {
        Ok(generate_bill_of_materials(&self.build_model()?))
    }

    pub fn export_expressions(&self) -> CrateResult<ExpressionFile> {
        let model = self.build_model()?;
        let file = generate_expression_file(&model, &self.export_metadata())?;
        info!(session = %self.meta.id, filename = %file.filename, "Session exported expressions");
        Ok(file)
    }

    pub fn export_step(&self) -> CrateResult<StepFile> {
        let model = self.build_model()?;
        let annotations = generate_pmi_annotations(&model);
        let file = export_step_with_pmi(&model, &annotations, &self.export_metadata())?;
        info!(session = %self.meta.id, filename = %file.filename, "Session exported STEP");
        Ok(file)
    }
}

impl Default for DesignSession {
    fn default() -> Self {
        DesignSession::new("", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::ProductSpec;

    fn larger() -> CrateConfiguration {
        let mut config = CrateConfiguration::default();
        config.product = ProductSpec {
            length: 80.0,
            width: 50.0,
            height: 40.0,
            weight: 1_500.0,
        };
        config
    }

    #[test]
    fn test_session_creation() {
        let session = DesignSession::new("John Doe", "TI-001");
        assert_eq!(session.meta.engineer, "John Doe");
        assert_eq!(session.meta.ti_number, "TI-001");
        assert_eq!(session.configuration(), &CrateConfiguration::default());
    }

    #[test]
    fn test_replace_and_reset() {
        let mut session = DesignSession::new("Engineer", "TI-002");
        session.replace_configuration(larger()).unwrap();
        assert_eq!(session.configuration().product.length, 80.0);
        assert!(session.meta.modified >= session.meta.created);

        let mut bad = larger();
        bad.product.width = -1.0;
        assert!(session.replace_configuration(bad).is_err());
        assert_eq!(session.configuration().product.width, 50.0);

        session.reset();
        assert_eq!(session.configuration(), &CrateConfiguration::default());
    }

    #[test]
    fn test_exports_use_session_settings() {
        let mut settings = Settings::default();
        settings.part_numbers.crate_number = "0205-00042".to_string();
        settings.standards_tag = "TEST-STD".to_string();
        let session = DesignSession::new("Engineer", "TI-003").with_settings(settings);

        let exp = session.export_expressions().unwrap();
        assert!(exp.content.contains("# Part Number CRATE: 0205-00042"));

        let step = session.export_step().unwrap();
        assert!(step.content.contains("PRODUCT('0205-00042'"));
        assert_ne!(exp.metadata.id, step.metadata.id);
        assert!(session.fits_envelope().unwrap());
        assert!(!session.bill_of_materials().unwrap().lines.is_empty());
    }

    #[test]
    fn test_session_serialization() {
        let session = DesignSession::new("Jane Engineer", "TI-042");
        let json = serde_json::to_string_pretty(&session).unwrap();
        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("tiNumber"));

        let roundtrip: DesignSession = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, session);
    }
}
