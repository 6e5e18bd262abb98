//! # AutoCrate CLI
//!
//! Command-line front end for `crate_core`: load a crate configuration,
//! run the design pipeline and print or write the results.
//!
//! ```text
//! autocrate dimensions crate.json
//! autocrate splice --width 44 --height 96 --name FRONT_PANEL
//! autocrate usage crate.json
//! autocrate bom crate.json
//! autocrate export crate.json --format step --out-dir out/
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, error, warn, Level};
use tracing_subscriber::EnvFilter;

use crate_core::bom::generate_bill_of_materials;
use crate_core::calculations::splicing::{
    calculate_optimized_splice_layout, generate_splice_expressions, PanelSize,
};
use crate_core::export::{
    export_step_with_pmi, generate_expression_file, generate_pmi_annotations, ExportMetadata,
};
use crate_core::{build_model, load_configuration, load_settings, write_artifact, CrateModel, CrateResult, Settings};

/// Shipping crate design: dimensions, plywood splicing, BOM and CAD export.
#[derive(Parser, Debug)]
#[command(name = "autocrate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (standards tag, part numbers, envelope, splicing)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print JSON instead of the text summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Internal and external crate dimensions, skids and floorboards
    Dimensions {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Splice layout for a single panel
    Splice {
        /// Panel width (in)
        #[arg(long)]
        width: f64,

        /// Panel height (in)
        #[arg(long)]
        height: f64,

        #[arg(long, default_value = "PANEL")]
        name: String,

        /// Keep sheets in their original orientation
        #[arg(long)]
        no_rotation: bool,

        /// Ignore bottom-cleat clearance for horizontal splices
        #[arg(long)]
        no_cleats: bool,
    },

    /// Plywood usage across all panels
    Usage {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Bill of materials
    Bom {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Write a CAD export file
    Export {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        #[arg(long, value_enum, default_value_t = ExportFormat::Expressions)]
        format: ExportFormat,

        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    /// NX expression file (.exp)
    Expressions,
    /// STEP AP242 with PMI (.stp)
    Step,
}

/// Determines the log level from CLI arguments.
fn get_log_level(verbose: u8, quiet: bool, settings_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match settings_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match args.settings.as_deref().map(load_settings).transpose() {
        Ok(settings) => settings.unwrap_or_default(),
        Err(e) => {
            eprintln!("Settings error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(get_log_level(args.verbose, args.quiet, &settings.logging.level));
    debug!(version = env!("CARGO_PKG_VERSION"), "Starting autocrate");

    match run(&args, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "{e}");
            eprintln!("Error: {e}");
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{json}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, settings: &Settings) -> CrateResult<()> {
    match &args.command {
        Command::Dimensions { config } => {
            let model = load_model(config, settings)?;
            if args.json {
                return print_json(&model.dimensions);
            }
            print_dimensions(&model, settings);
        }

        Command::Splice {
            width,
            height,
            name,
            no_rotation,
            no_cleats,
        } => {
            let options = settings
                .splicing
                .with_rotation(settings.splicing.allow_rotation && !no_rotation)
                .with_stacked_cleats(!no_cleats);
            let layout = calculate_optimized_splice_layout(name, PanelSize::new(*width, *height), &options)?;
            if args.json {
                return print_json(&layout);
            }
            print!("{}", generate_splice_expressions(&layout));
        }

        Command::Usage { config } => {
            let model = load_model(config, settings)?;
            if args.json {
                return print_json(&model.material_usage);
            }
            let usage = &model.material_usage;
            for layout in &model.splice_layouts {
                println!(
                    "  {:<18} {:>7.2} x {:<7.2} {} sheet(s){}",
                    layout.panel_name,
                    layout.panel_width,
                    layout.panel_height,
                    layout.sheet_count,
                    if layout.is_rotated { ", rotated" } else { "" }
                );
            }
            println!();
            println!("Sheets:      {}", usage.total_sheets);
            println!("Covered:     {:.1} sq ft", usage.total_area_sq_ft);
            println!("Efficiency:  {:.1}%", usage.efficiency * 100.0);
        }

        Command::Bom { config } => {
            let model = load_model(config, settings)?;
            let bom = generate_bill_of_materials(&model);
            if args.json {
                return print_json(&bom);
            }
            println!("{bom}");
        }

        Command::Export {
            config,
            format,
            out_dir,
        } => {
            let model = load_model(config, settings)?;
            let metadata = ExportMetadata::now(settings.part_numbers.clone(), settings.standards_tag.clone());
            let (filename, content) = match format {
                ExportFormat::Expressions => {
                    let file = generate_expression_file(&model, &metadata)?;
                    (file.filename, file.content)
                }
                ExportFormat::Step => {
                    let annotations = generate_pmi_annotations(&model);
                    let file = export_step_with_pmi(&model, &annotations, &metadata)?;
                    (file.filename, file.content)
                }
            };
            let path = out_dir.join(&filename);
            write_artifact(&path, content.as_bytes())?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn load_model(path: &Path, settings: &Settings) -> CrateResult<CrateModel> {
    let config = load_configuration(path)?;
    let model = build_model(&config, &settings.splicing)?;
    if !model.fits(&settings.envelope) {
        warn!(
            length = model.dimensions.external_length,
            width = model.dimensions.external_width,
            height = model.dimensions.external_height,
            "Crate exceeds the handling envelope"
        );
    }
    Ok(model)
}

fn print_json<T: Serialize>(value: &T) -> CrateResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| crate_core::CrateError::serialization("JSON", e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_dimensions(model: &CrateModel, settings: &Settings) {
    let d = &model.dimensions;
    let skids = &model.skids;
    println!("Internal:  {:.2} L x {:.2} W x {:.2} H in", d.internal_length, d.internal_width, d.internal_height);
    println!("External:  {:.2} L x {:.2} W x {:.2} H in", d.external_length, d.external_width, d.external_height);
    println!("Wall:      {:.3} in (plywood {:.3} + cleat {:.3})", d.wall_thickness, d.plywood_thickness, d.cleat_thickness);
    println!(
        "Skids:     {} x {} at {:.2} in pitch{}{}",
        skids.count,
        skids.size,
        skids.spacing,
        if skids.layers > 1 { ", double layer" } else { "" },
        if skids.requires_rub_strips { ", rub strips" } else { "" }
    );
    let boards: Vec<String> = model
        .floorboards
        .boards
        .iter()
        .map(|b| format!("{}({:.2})", b.nominal(), b.width))
        .collect();
    println!("Floor:     {}", boards.join(" "));
    println!(
        "Hardware:  {} klimps, {} lag screws",
        model.hardware.klimp_count, model.hardware.lag_screw_count
    );
    println!("Weight:    crate {:.0} lb, gross {:.0} lb", model.weight.tare, model.weight.gross);
    println!(
        "Envelope:  {}",
        if model.fits(&settings.envelope) { "[OK]" } else { "[EXCEEDS]" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_log_level_flags() {
        assert_eq!(get_log_level(0, true, "trace"), Level::ERROR);
        assert_eq!(get_log_level(0, false, "debug"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "nonsense"), Level::WARN);
        assert_eq!(get_log_level(2, false, "error"), Level::DEBUG);
        assert_eq!(get_log_level(5, false, "info"), Level::TRACE);
    }

    #[test]
    fn test_parse_export_command() {
        let args = Args::parse_from(["autocrate", "-vv", "export", "crate.json", "--format", "step", "--out-dir", "out"]);
        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Export { format, out_dir, .. } => {
                assert_eq!(format, ExportFormat::Step);
                assert_eq!(out_dir, PathBuf::from("out"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_splice_flags() {
        let args = Args::parse_from([
            "autocrate", "splice", "--width", "44", "--height", "96", "--no-rotation", "--no-cleats",
        ]);
        match args.command {
            Command::Splice { width, name, no_rotation, no_cleats, .. } => {
                assert_eq!(width, 44.0);
                assert_eq!(name, "PANEL");
                assert!(no_rotation && no_cleats);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
