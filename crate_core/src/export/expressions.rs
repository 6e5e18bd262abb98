//! # NX Expression Export
//!
//! Renders a [`CrateModel`] as a plain-text expression file: `# comment`
//! lines, blank lines and `NAME=VALUE` assignments that a parametric CAD
//! template can import directly.
//!
//! Sections, in order:
//!
//! 1. Header with timestamp, export id, standards tag and part numbers
//! 2. Model parameters (`overall_length=52.0`)
//! 3. Splice layout per panel
//! 4. Component boxes (`SKID_1_X`, `SKID_1_WIDTH`, ...)
//!
//! ## Example
//!
//! ```rust
//! use crate_core::calculations::splicing::SpliceOptions;
//! use crate_core::configuration::CrateConfiguration;
//! use crate_core::export::{generate_expression_file, ExportMetadata};
//! use crate_core::model::build_model;
//!
//! let model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
//! let file = generate_expression_file(&model, &ExportMetadata::default()).unwrap();
//! assert!(file.content.contains("overall_width=44.0"));
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ensure_finite, format_real, push_line, ExportMetadata};
use crate::calculations::splicing::generate_splice_expressions;
use crate::errors::{CrateError, CrateResult};
use crate::model::CrateModel;

const FORMAT: &str = "NX expressions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionFile {
    pub content: String,
    pub filename: String,
    pub metadata: ExportMetadata,
}

impl ExpressionFile {
    /// `(name, raw value)` for every assignment line
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.content
            .lines()
            .filter(|line| !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
    }

    /// Numeric value of one expression
    pub fn value(&self, name: &str) -> Option<f64> {
        self.assignments()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.parse().ok())
    }
}

/// Generate the expression file for a model.
pub fn generate_expression_file(model: &CrateModel, metadata: &ExportMetadata) -> CrateResult<ExpressionFile> {
    let mut out = String::new();

    push_line(&mut out, "# AutoCrate NX Expressions");
    push_line(&mut out, format!("# Generated: {}", metadata.timestamp()));
    push_line(&mut out, format!("# Export ID: {}", metadata.id));
    push_line(&mut out, format!("# Standards: {}", metadata.standards_tag));
    for (label, number) in metadata.part_numbers.entries() {
        push_line(&mut out, format!("# Part Number {label}: {number}"));
    }
    push_line(&mut out, "# Units: inches, pounds");
    push_line(&mut out, "# Coordinates: X across width (centred), Y from front face, Z up from skid bottom");
    out.push('\n');

    push_line(&mut out, "# MODEL PARAMETERS");
    for parameter in &model.parameters {
        ensure_finite(FORMAT, &parameter.name, parameter.value)?;
        push_line(&mut out, format!("{}={}", parameter.name, format_real(parameter.value)));
    }
    out.push('\n');

    push_line(&mut out, "# PANEL SPLICE LAYOUTS");
    for layout in &model.splice_layouts {
        for sheet in &layout.sheets {
            for (field, value) in [("x", sheet.x), ("y", sheet.y), ("width", sheet.width), ("height", sheet.height)] {
                ensure_finite(FORMAT, &format!("{}.{field}", sheet.id), value)?;
            }
        }
        for splice in &layout.splices {
            ensure_finite(FORMAT, &format!("{} splice", layout.panel_name), splice.position)?;
        }
        out.push_str(&generate_splice_expressions(layout));
        out.push('\n');
    }

    push_line(&mut out, "# COMPONENTS");
    for component in &model.components {
        let name = &component.name;
        let mut values = vec![
            ("X", component.min.x),
            ("Y", component.min.y),
            ("Z", component.min.z),
            ("WIDTH", component.width()),
            ("LENGTH", component.length()),
            ("HEIGHT", component.height()),
        ];
        if let Some(thickness) = component.thickness {
            values.push(("THICKNESS", thickness));
        }
        for (suffix, value) in values {
            let expression = format!("{name}_{suffix}");
            ensure_finite(FORMAT, &expression, value)?;
            push_line(&mut out, format!("{expression}={}", format_real(value)));
        }
    }

    let file = ExpressionFile {
        content: out,
        filename: format!("autocrate_expressions_{}.exp", metadata.date_stamp()),
        metadata: metadata.clone(),
    };

    let mut seen = HashSet::new();
    for (name, _) in file.assignments() {
        if !seen.insert(name) {
            return Err(CrateError::serialization(FORMAT, format!("duplicate expression name {name}")));
        }
    }

    info!(filename = %file.filename, expressions = seen.len(), "Expression export generated");
    Ok(file)
}
