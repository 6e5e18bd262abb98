//! # STEP AP242 Export
//!
//! Writes a [`CrateModel`] and its [`PmiAnnotations`] as an ISO-10303-21
//! exchange file. Each component becomes an axis-aligned `BLOCK` wrapped in a
//! `CSG_SOLID`; model parameters, PMI, materials and part numbers follow as
//! numbered entities in the same data section.
//!
//! The file is assembled in memory. Any non-finite number or dangling datum
//! reference fails the whole export with `SerializationFailure`, so a caller
//! never sees a partial file.
//!
//! ## Example
//!
//! ```rust
//! use crate_core::calculations::splicing::SpliceOptions;
//! use crate_core::configuration::CrateConfiguration;
//! use crate_core::export::{export_step_with_pmi, generate_pmi_annotations, ExportMetadata};
//! use crate_core::model::build_model;
//!
//! let model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
//! let pmi = generate_pmi_annotations(&model);
//! let step = export_step_with_pmi(&model, &pmi, &ExportMetadata::default()).unwrap();
//! assert!(step.content.starts_with("ISO-10303-21;"));
//! assert!(step.filename.ends_with(".stp"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::pmi::PmiAnnotations;
use super::{ensure_finite, format_real, push_line, ExportMetadata};
use crate::errors::{CrateError, CrateResult};
use crate::model::{Component, CrateModel, ParameterUnit, Point3};
use crate::units::{Inches, Millimeters};

pub const STEP_SCHEMA: &str = "AP242_MANAGED_MODEL_BASED_3D_ENGINEERING_MIM_LF";
pub const STEP_MIME_TYPE: &str = "application/step";

const FORMAT: &str = "STEP";
const POUNDS_TO_KG: f64 = 0.45359237;

/// A finished STEP file, ready to write or serve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFile {
    pub content: String,
    pub filename: String,
    pub schema: String,
    pub metadata: ExportMetadata,
}

impl StepFile {
    /// Headers for serving the file as a download
    pub fn response_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", STEP_MIME_TYPE.to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            ),
            ("X-STEP-Version", "AP242".to_string()),
            ("X-PMI-Included", "true".to_string()),
            ("X-Standards-Compliance", self.metadata.standards_tag.clone()),
        ]
    }
}

/// Export the model and its PMI as STEP AP242.
pub fn export_step_with_pmi(
    model: &CrateModel,
    annotations: &PmiAnnotations,
    metadata: &ExportMetadata,
) -> CrateResult<StepFile> {
    let filename = format!("autocrate_assembly_{}.stp", metadata.date_stamp());

    let mut w = StepWriter::default();
    let ctx = w.write_context();
    let product = w.write_product_structure(metadata);
    let solids = w.write_components(&model.components)?;

    let shape = w.add(format!(
        "SHAPE_REPRESENTATION({},({}),#{})",
        quote("AutoCrate Assembly"),
        refs(solids.iter().map(|(_, id)| *id)),
        ctx.geometry
    ));
    w.add(format!("SHAPE_DEFINITION_REPRESENTATION(#{},#{shape})", product.shape));

    w.write_parameters(model, &ctx, product.definition)?;
    w.write_pmi(annotations)?;
    w.write_materials(&model.components, &solids);
    w.write_part_numbers(model, metadata);

    let content = w.finish(&filename, metadata);
    info!(
        filename = %filename,
        entities = w.next_id - 1,
        components = model.components.len(),
        "STEP export generated"
    );

    Ok(StepFile {
        content,
        filename,
        schema: STEP_SCHEMA.to_string(),
        metadata: metadata.clone(),
    })
}

// ============================================================================
// Writer
// ============================================================================

/// Entity ids of the unit and geometry context
struct Context {
    inch: usize,
    pound: usize,
    geometry: usize,
}

struct ProductIds {
    definition: usize,
    shape: usize,
}

struct StepWriter {
    next_id: usize,
    data: String,
}

impl Default for StepWriter {
    fn default() -> Self {
        StepWriter {
            next_id: 1,
            data: String::new(),
        }
    }
}

impl StepWriter {
    /// Append `#n=<entity>;` and return `n`
    fn add(&mut self, entity: impl AsRef<str>) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        push_line(&mut self.data, format!("#{id}={};", entity.as_ref()));
        id
    }

    fn section(&mut self, title: &str) {
        push_line(&mut self.data, format!("/* {title} */"));
    }

    fn point(&mut self, name: &str, p: Point3) -> CrateResult<usize> {
        ensure_finite(FORMAT, &format!("{name}.x"), p.x)?;
        ensure_finite(FORMAT, &format!("{name}.y"), p.y)?;
        ensure_finite(FORMAT, &format!("{name}.z"), p.z)?;
        Ok(self.add(format!(
            "CARTESIAN_POINT({},({},{},{}))",
            quote(name),
            format_real(p.x),
            format_real(p.y),
            format_real(p.z)
        )))
    }

    fn direction(&mut self, name: &str, d: Point3) -> CrateResult<usize> {
        for value in [d.x, d.y, d.z] {
            ensure_finite(FORMAT, name, value)?;
        }
        if d.x == 0.0 && d.y == 0.0 && d.z == 0.0 {
            return Err(CrateError::serialization(FORMAT, format!("{name} has zero length")));
        }
        Ok(self.add(format!(
            "DIRECTION({},({},{},{}))",
            quote(name),
            format_real(d.x),
            format_real(d.y),
            format_real(d.z)
        )))
    }

    fn write_context(&mut self) -> Context {
        self.section("units and geometric context");
        let mm = self.add("(LENGTH_UNIT()NAMED_UNIT(*)SI_UNIT(.MILLI.,.METRE.))");
        let factor = Millimeters::from(Inches(1.0)).0;
        let inch_measure = self.add(format!(
            "LENGTH_MEASURE_WITH_UNIT(LENGTH_MEASURE({}),#{mm})",
            format_real(factor)
        ));
        let length_dims = self.add("DIMENSIONAL_EXPONENTS(1.0,0.0,0.0,0.0,0.0,0.0,0.0)");
        let inch = self.add(format!(
            "(CONVERSION_BASED_UNIT('INCH',#{inch_measure})LENGTH_UNIT()NAMED_UNIT(#{length_dims}))"
        ));

        let kg = self.add("(MASS_UNIT()NAMED_UNIT(*)SI_UNIT(.KILO.,.GRAM.))");
        let pound_measure = self.add(format!(
            "MASS_MEASURE_WITH_UNIT(MASS_MEASURE({}),#{kg})",
            format_real(POUNDS_TO_KG)
        ));
        let mass_dims = self.add("DIMENSIONAL_EXPONENTS(0.0,1.0,0.0,0.0,0.0,0.0,0.0)");
        let pound = self.add(format!(
            "(CONVERSION_BASED_UNIT('POUND',#{pound_measure})MASS_UNIT()NAMED_UNIT(#{mass_dims}))"
        ));

        let radian = self.add("(NAMED_UNIT(*)PLANE_ANGLE_UNIT()SI_UNIT($,.RADIAN.))");
        let steradian = self.add("(NAMED_UNIT(*)SI_UNIT($,.STERADIAN.)SOLID_ANGLE_UNIT())");
        let uncertainty = self.add(format!(
            "UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(0.001),#{inch},'distance_accuracy_value','confusion accuracy')"
        ));
        let geometry = self.add(format!(
            "(GEOMETRIC_REPRESENTATION_CONTEXT(3)GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{uncertainty}))\
             GLOBAL_UNIT_ASSIGNED_CONTEXT((#{inch},#{radian},#{steradian}))REPRESENTATION_CONTEXT('AutoCrate','3D'))"
        ));

        Context { inch, pound, geometry }
    }

    fn write_product_structure(&mut self, metadata: &ExportMetadata) -> ProductIds {
        self.section("product structure");
        let app = self.add("APPLICATION_CONTEXT('managed model based 3d engineering')");
        self.add(format!(
            "APPLICATION_PROTOCOL_DEFINITION('international standard','ap242_managed_model_based_3d_engineering',2014,#{app})"
        ));
        let product_ctx = self.add(format!("PRODUCT_CONTEXT('',#{app},'mechanical')"));
        let product = self.add(format!(
            "PRODUCT({},'AutoCrate Assembly',{},(#{product_ctx}))",
            quote(&metadata.part_numbers.crate_number),
            quote(&format!("Export {}", metadata.id))
        ));
        let formation = self.add(format!("PRODUCT_DEFINITION_FORMATION('','',#{product})"));
        let def_ctx = self.add(format!("PRODUCT_DEFINITION_CONTEXT('part definition',#{app},'design')"));
        let definition = self.add(format!("PRODUCT_DEFINITION('design','',#{formation},#{def_ctx})"));
        let shape = self.add(format!("PRODUCT_DEFINITION_SHAPE('','',#{definition})"));
        ProductIds { definition, shape }
    }

    /// One block solid per component. Returns `(component index, solid id)`.
    fn write_components(&mut self, components: &[Component]) -> CrateResult<Vec<(usize, usize)>> {
        self.section("components");
        let z_axis = self.direction("Z_AXIS", Point3::new(0.0, 0.0, 1.0))?;
        let x_axis = self.direction("X_AXIS", Point3::new(1.0, 0.0, 0.0))?;

        let mut solids = Vec::with_capacity(components.len());
        for (index, component) in components.iter().enumerate() {
            let name = &component.name;
            let extents = [
                ("WIDTH", component.width()),
                ("LENGTH", component.length()),
                ("HEIGHT", component.height()),
            ];
            for (label, value) in extents {
                ensure_finite(FORMAT, &format!("{name}_{label}"), value)?;
            }

            let origin = self.point(&format!("{name}_ORIGIN"), component.min)?;
            let placement = self.add(format!(
                "AXIS2_PLACEMENT_3D({},#{origin},#{z_axis},#{x_axis})",
                quote(&format!("{name}_PLACEMENT"))
            ));
            let block = self.add(format!(
                "BLOCK({},#{placement},{},{},{})",
                quote(name),
                format_real(component.width()),
                format_real(component.length()),
                format_real(component.height())
            ));
            let solid = self.add(format!("CSG_SOLID({},#{block})", quote(name)));
            solids.push((index, solid));
        }
        Ok(solids)
    }

    fn write_parameters(&mut self, model: &CrateModel, ctx: &Context, definition: usize) -> CrateResult<()> {
        self.section("parameters");
        let mut items = Vec::with_capacity(model.parameters.len());
        for parameter in &model.parameters {
            ensure_finite(FORMAT, &parameter.name, parameter.value)?;
            let value = format_real(parameter.value);
            let id = match parameter.unit {
                ParameterUnit::Inch => self.add(format!(
                    "MEASURE_REPRESENTATION_ITEM({},LENGTH_MEASURE({value}),#{})",
                    quote(&parameter.name),
                    ctx.inch
                )),
                ParameterUnit::Pound => self.add(format!(
                    "MEASURE_REPRESENTATION_ITEM({},MASS_MEASURE({value}),#{})",
                    quote(&parameter.name),
                    ctx.pound
                )),
                ParameterUnit::Count => self.add(format!(
                    "VALUE_REPRESENTATION_ITEM({},COUNT_MEASURE({value}))",
                    quote(&parameter.name)
                )),
            };
            items.push(id);
        }
        let rep = self.add(format!(
            "REPRESENTATION('crate parameters',({}),#{})",
            refs(items),
            ctx.geometry
        ));
        let property = self.add(format!("PROPERTY_DEFINITION('crate parameters','',#{definition})"));
        self.add(format!("PROPERTY_DEFINITION_REPRESENTATION(#{property},#{rep})"));
        Ok(())
    }

    fn write_pmi(&mut self, pmi: &PmiAnnotations) -> CrateResult<()> {
        self.section("PMI dimensions");
        for dim in &pmi.dimensions {
            ensure_finite(FORMAT, &dim.id, dim.value)?;
            self.point(&format!("{}_POSITION", dim.id), dim.position)?;
            self.add(format!(
                "DIMENSIONAL_SIZE({},{},{})",
                quote(&dim.id),
                format_real(dim.value),
                quote(&dim.referenced_geometry.join(","))
            ));
            if let Some(band) = dim.tolerance {
                ensure_finite(FORMAT, &format!("{}_TOL", dim.id), band.upper_limit)?;
                ensure_finite(FORMAT, &format!("{}_TOL", dim.id), band.lower_limit)?;
                self.add(format!(
                    "TOLERANCE_VALUE({},{},{},'INCH')",
                    quote(&format!("{}_TOL", dim.id)),
                    format_real(band.upper_limit),
                    format_real(band.lower_limit)
                ));
            }
            self.add(format!(
                "SEMANTIC_REFERENCE({},{})",
                quote(&dim.semantic_reference),
                quote(&dim.id)
            ));
        }

        self.section("datums");
        let mut datums = BTreeMap::new();
        for datum in &pmi.datums {
            let origin = self.point(&format!("{}_ORIGIN", datum.id), datum.origin)?;
            let normal = self.direction(&format!("{}_NORMAL", datum.id), datum.normal)?;
            let placement = self.add(format!("AXIS2_PLACEMENT_3D('',#{origin},#{normal},$)"));
            let plane = self.add(format!("PLANE({},#{placement})", quote(&format!("{}_PLANE", datum.id))));
            let id = self.add(format!(
                "DATUM({},{},#{plane},{})",
                quote(&datum.id),
                quote(&datum.label),
                quote(&datum.semantic_reference)
            ));
            datums.insert(datum.id.as_str(), id);
        }

        self.section("geometric tolerances");
        for gtol in &pmi.geometric_tolerances {
            ensure_finite(FORMAT, &gtol.id, gtol.tolerance)?;
            let id = self.add(format!(
                "GEOMETRIC_TOLERANCE({},{},{},{})",
                quote(&gtol.id),
                quote(gtol.kind.as_str()),
                format_real(gtol.tolerance),
                quote(&gtol.referenced_geometry.join(","))
            ));
            for reference in &gtol.datum_references {
                let datum = datums.get(reference.as_str()).copied().ok_or_else(|| {
                    CrateError::serialization(
                        FORMAT,
                        format!("{} references unknown datum {reference}", gtol.id),
                    )
                })?;
                self.add(format!(
                    "DATUM_REFERENCE({},#{id},#{datum})",
                    quote(&format!("{}_{reference}", gtol.id))
                ));
            }
            self.add(format!(
                "SEMANTIC_REFERENCE({},{})",
                quote(&gtol.semantic_reference),
                quote(&gtol.id)
            ));
        }

        self.section("notes");
        for note in &pmi.notes {
            self.add(format!(
                "MANUFACTURING_NOTE({},{},{})",
                quote(&note.id),
                quote(note.kind.as_str()),
                quote(&note.text)
            ));
        }
        Ok(())
    }

    fn write_materials(&mut self, components: &[Component], solids: &[(usize, usize)]) {
        self.section("materials");
        let mut by_material: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for &(index, solid) in solids {
            by_material
                .entry(components[index].material.as_str())
                .or_default()
                .push(solid);
        }
        for (material, ids) in by_material {
            self.add(format!("MATERIAL_DESIGNATION({},({}))", quote(material), refs(ids)));
        }
    }

    fn write_part_numbers(&mut self, model: &CrateModel, metadata: &ExportMetadata) {
        self.section("part numbers and instructions");
        for (label, number) in metadata.part_numbers.entries() {
            self.add(format!("PART_NUMBER({},{})", quote(label), quote(number)));
        }
        self.add(format!(
            "MANUFACTURING_INSTRUCTION('STANDARDS',{})",
            quote(&format!("Manufacture per {}", metadata.standards_tag))
        ));
        let d = &model.dimensions;
        self.add(format!(
            "MANUFACTURING_INSTRUCTION('OVERALL_SIZE',{})",
            quote(&format!(
                "{} x {} x {} in",
                format_real(d.external_length),
                format_real(d.external_width),
                format_real(d.external_height)
            ))
        ));
    }

    fn finish(&self, filename: &str, metadata: &ExportMetadata) -> String {
        let mut out = String::with_capacity(self.data.len() + 512);
        push_line(&mut out, "ISO-10303-21;");
        push_line(&mut out, "HEADER;");
        push_line(&mut out, "FILE_DESCRIPTION(('AutoCrate STEP Export with PMI'),'2;1');");
        push_line(
            &mut out,
            format!(
                "FILE_NAME({},{},('AutoCrate'),({}),{},'AutoCrate','');",
                quote(filename),
                quote(&metadata.timestamp()),
                quote(&metadata.standards_tag),
                quote(concat!("crate_core ", env!("CARGO_PKG_VERSION")))
            ),
        );
        push_line(&mut out, format!("FILE_SCHEMA(('{STEP_SCHEMA}'));"));
        push_line(&mut out, "ENDSEC;");
        push_line(&mut out, "DATA;");
        out.push_str(&self.data);
        push_line(&mut out, "ENDSEC;");
        push_line(&mut out, "END-ISO-10303-21;");
        out
    }
}

/// `#a,#b,#c`
fn refs(ids: impl IntoIterator<Item = usize>) -> String {
    ids.into_iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quote a string as a Part 21 literal.
///
/// Apostrophes and backslashes are doubled, control characters use `\X\hh`
/// and anything outside printable ASCII uses `\X2\` (or `\X4\` above the
/// basic multilingual plane).
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            ' '..='~' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\X\\{:02X}", c as u32));
            }
            c if (c as u32) <= 0xFFFF => {
                out.push_str(&format!("\\X2\\{:04X}\\X0\\", c as u32));
            }
            c => {
                out.push_str(&format!("\\X4\\{:08X}\\X0\\", c as u32));
            }
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::splicing::SpliceOptions;
    use crate::configuration::CrateConfiguration;
    use crate::export::generate_pmi_annotations;
    use crate::model::build_model;

    fn export() -> (CrateModel, StepFile) {
        let model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
        let pmi = generate_pmi_annotations(&model);
        let step = export_step_with_pmi(&model, &pmi, &ExportMetadata::default()).unwrap();
        (model, step)
    }

    fn entity_ids(content: &str) -> Vec<usize> {
        content
            .lines()
            .filter_map(|line| line.strip_prefix('#'))
            .filter_map(|rest| rest.split_once('='))
            .map(|(id, _)| id.parse().unwrap())
            .collect()
    }

    #[test]
    fn test_iso_markers_and_header() {
        let (_, step) = export();
        assert!(step.content.starts_with("ISO-10303-21;\nHEADER;\n"));
        assert!(step.content.trim_end().ends_with("END-ISO-10303-21;"));
        assert!(step.content.contains("FILE_SCHEMA(('AP242_MANAGED_MODEL_BASED_3D_ENGINEERING_MIM_LF'));"));
        assert!(step.content.contains("FILE_DESCRIPTION(('AutoCrate STEP Export with PMI'),'2;1');"));
        assert!(step.content.contains(&format!("FILE_NAME('{}'", step.filename)));
        assert!(step.filename.starts_with("autocrate_assembly_"));
    }

    #[test]
    fn test_entity_ids_sequential() {
        let (_, step) = export();
        let ids = entity_ids(&step.content);
        assert!(!ids.is_empty());
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(*id, i + 1);
        }
    }

    #[test]
    fn test_every_component_is_a_solid() {
        let (model, step) = export();
        for component in &model.components {
            let solid = format!("CSG_SOLID('{}',", component.name);
            assert!(step.content.contains(&solid), "{}", component.name);
        }
        assert!(step.content.contains("BLOCK('SKID_1',"));
        assert!(step.content.contains("MEASURE_REPRESENTATION_ITEM('overall_width',LENGTH_MEASURE(44.0),"));
        assert!(step.content.contains("VALUE_REPRESENTATION_ITEM('skid_count',COUNT_MEASURE(3.0))"));
        assert!(step.content.contains("LENGTH_MEASURE(25.4)"));
    }

    #[test]
    fn test_pmi_entities_present() {
        let (_, step) = export();
        assert!(step.content.contains("DIMENSIONAL_SIZE('DIM_PRODUCT_LENGTH',46.0,"));
        assert!(step.content.contains("TOLERANCE_VALUE('DIM_PRODUCT_LENGTH_TOL',46.125,45.875,'INCH')"));
        assert!(step.content.contains("GEOMETRIC_TOLERANCE('GTOL_SKID_FLATNESS','FLATNESS',0.125,"));
        assert!(step.content.contains("DATUM_REFERENCE('GTOL_PANEL_PERPENDICULARITY_DATUM_A',"));
        assert!(step.content.contains("PART_NUMBER('CAP','0205-XXXXX')"));
        assert!(step.content.contains("MANUFACTURING_INSTRUCTION('STANDARDS','Manufacture per AMAT-0251-70054')"));
        // note line breaks are escaped, so every entity stays on one line
        assert!(step.content.contains("MATERIAL SPECIFICATIONS:\\X\\0A"));
    }

    #[test]
    fn test_quote_escaping() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote("1/4\" CDX"), "'1/4\" CDX'");
        assert_eq!(quote("O'Brien"), "'O''Brien'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
        assert_eq!(quote("a\nb"), "'a\\X\\0Ab'");
        assert_eq!(quote("±"), "'\\X2\\00B1\\X0\\'");
        assert_eq!(quote("😀"), "'\\X4\\0001F600\\X0\\'");
    }

    #[test]
    fn test_unknown_datum_fails() {
        let model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
        let mut pmi = generate_pmi_annotations(&model);
        pmi.geometric_tolerances[1].datum_references = vec!["DATUM_Z".to_string()];
        let err = export_step_with_pmi(&model, &pmi, &ExportMetadata::default()).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_FAILURE");
    }

    #[test]
    fn test_non_finite_value_fails() {
        let mut model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
        let pmi = generate_pmi_annotations(&model);
        model.components[0].max.z = f64::NAN;
        assert!(export_step_with_pmi(&model, &pmi, &ExportMetadata::default()).is_err());

        let mut model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
        model.parameters[0].value = f64::INFINITY;
        assert!(export_step_with_pmi(&model, &pmi, &ExportMetadata::default()).is_err());
    }

    #[test]
    fn test_response_headers() {
        let (_, step) = export();
        let headers = step.response_headers();
        assert_eq!(headers[0], ("Content-Type", "application/step".to_string()));
        assert_eq!(
            headers[1].1,
            format!("attachment; filename=\"{}\"", step.filename)
        );
        assert!(headers.contains(&("X-STEP-Version", "AP242".to_string())));
        assert!(headers.contains(&("X-Standards-Compliance", "AMAT-0251-70054".to_string())));
    }
}
