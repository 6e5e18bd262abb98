//! # crate_core - Shipping Crate Design Engine
//!
//! `crate_core` turns a product's size and weight into a complete shipping
//! crate design: skids, floorboards, plywood panels spliced from stock sheets,
//! cleats, a bill of materials, and CAD exports (NX expressions and STEP AP242
//! with PMI). All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **One Model**: Exporters read a single [`CrateModel`], never recompute
//!
//! ## Quick Start
//!
//! ```rust
//! use crate_core::calculations::splicing::SpliceOptions;
//! use crate_core::configuration::CrateConfiguration;
//! use crate_core::export::{generate_expression_file, ExportMetadata};
//! use crate_core::model::build_model;
//!
//! let json = r#"{ "product": { "length": 46, "width": 38, "height": 91.5, "weight": 600 } }"#;
//! let config = CrateConfiguration::from_json(json).unwrap();
//! let model = build_model(&config, &SpliceOptions::default()).unwrap();
//! let file = generate_expression_file(&model, &ExportMetadata::default()).unwrap();
//! assert!(file.content.contains("overall_length=52.0"));
//! ```
//!
//! ## Modules
//!
//! - [`configuration`] - Product, clearances, materials and requirement flags
//! - [`calculations`] - Skids, dimensions, floorboards, splicing, cleats
//! - [`model`] - The assembled crate geometry
//! - [`export`] - Expression file, PMI and STEP writers
//! - [`bom`] - Bill of materials
//! - [`session`] - Design session container
//! - [`settings`] - Process settings (part numbers, envelope, splicing)
//! - [`materials`] - Lumber and plywood tables
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic writes and locking

pub mod bom;
pub mod calculations;
pub mod configuration;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod materials;
pub mod model;
pub mod session;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use configuration::CrateConfiguration;
pub use errors::{CrateError, CrateResult};
pub use file_io::{load_configuration, load_settings, write_artifact, FileLock};
pub use model::{build_model, CrateModel};
pub use session::{DesignSession, SessionMetadata};
pub use settings::Settings;
