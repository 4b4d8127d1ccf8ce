//! # CalcBlock CLI
//!
//! Command-line estimator for block and brick walls: collects the form
//! (flags, job file, or interactive prompts), prints the results and
//! optionally writes the PDF report.

mod config;
mod form;
mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use calcblock_core::calculations::estimate::{calculate, EstimateInput, EstimationResult};
use calcblock_core::equations::generate_formulas_markdown;
use calcblock_core::errors::CalcError;
use calcblock_core::materials::PieceSpec;
use calcblock_core::pdf::export_estimate;
use calcblock_core::report::{build_report, REPORT_FILE_NAME};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{load_job_file, BinderChoice, ConfigError, FormOverrides, FormValues, PieceChoice};

/// CalcBlock MX - masonry materials estimator
#[derive(Parser, Debug)]
#[command(name = "calcblock")]
#[command(version)]
#[command(about = "Estimate blocks, mortar, cement and sand for a masonry wall")]
pub struct Cli {
    /// Increase log verbosity (-v for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Estimate materials for one wall
    Estimate(EstimateArgs),
    /// List the piece catalog
    Pieces,
    /// Print the formula reference (Markdown)
    Formulas,
}

#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Wall label shown in the report
    #[arg(long)]
    pub label: Option<String>,

    /// Piece type
    #[arg(long, value_enum)]
    pub piece: Option<PieceChoice>,

    /// Piece length (cm)
    #[arg(long)]
    pub length_cm: Option<f64>,

    /// Piece height (cm)
    #[arg(long)]
    pub height_cm: Option<f64>,

    /// Piece thickness, also the wall thickness (cm)
    #[arg(long)]
    pub thickness_cm: Option<f64>,

    /// Weight of one piece (kg)
    #[arg(long)]
    pub unit_weight_kg: Option<f64>,

    /// Price of one piece ($)
    #[arg(long)]
    pub unit_cost: Option<f64>,

    /// Mortar joint width (cm)
    #[arg(long)]
    pub joint_cm: Option<f64>,

    /// Waste (%)
    #[arg(long)]
    pub waste_pct: Option<f64>,

    /// Wall face area (m²)
    #[arg(long, conflicts_with_all = ["wall_length_m", "wall_height_m"])]
    pub area_m2: Option<f64>,

    /// Wall length (m)
    #[arg(long)]
    pub wall_length_m: Option<f64>,

    /// Wall height (m)
    #[arg(long)]
    pub wall_height_m: Option<f64>,

    /// Binder used to lay the pieces
    #[arg(long, value_enum)]
    pub binder: Option<BinderChoice>,

    /// Price of a 25 kg premixed mortar bag ($)
    #[arg(long)]
    pub mortar_bag_cost: Option<f64>,

    /// Volume produced by one mortar bag (m³)
    #[arg(long)]
    pub mortar_yield_m3: Option<f64>,

    /// Price of a 50 kg cement bag ($)
    #[arg(long)]
    pub cement_bag_cost: Option<f64>,

    /// Price of sand ($/m³)
    #[arg(long)]
    pub sand_cost: Option<f64>,

    /// Cement parts in the cement:sand ratio
    #[arg(long)]
    pub cement_parts: Option<f64>,

    /// Sand parts in the cement:sand ratio
    #[arg(long)]
    pub sand_parts: Option<f64>,

    /// Job file with form values (.toml or .json)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Prompt for each field, showing its current value as default
    #[arg(short, long)]
    pub interactive: bool,

    /// Print input and result as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Write the PDF report (default file name when PATH is omitted)
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = REPORT_FILE_NAME)]
    pub pdf: Option<PathBuf>,
}

impl From<&EstimateArgs> for FormOverrides {
    fn from(args: &EstimateArgs) -> Self {
        FormOverrides {
            label: args.label.clone(),
            piece: args.piece,
            length_cm: args.length_cm,
            height_cm: args.height_cm,
            thickness_cm: args.thickness_cm,
            unit_weight_kg: args.unit_weight_kg,
            unit_cost: args.unit_cost,
            joint_cm: args.joint_cm,
            waste_pct: args.waste_pct,
            area_m2: args.area_m2,
            wall_length_m: args.wall_length_m,
            wall_height_m: args.wall_height_m,
            binder: args.binder,
            mortar_bag_cost: args.mortar_bag_cost,
            mortar_yield_m3: args.mortar_yield_m3,
            cement_bag_cost: args.cement_bag_cost,
            sand_cost: args.sand_cost,
            cement_parts: args.cement_parts,
            sand_parts: args.sand_parts,
        }
    }
}

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Serialize)]
struct EstimateOutput<'a> {
    input: &'a EstimateInput,
    result: &'a EstimationResult,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    let stdout = io::stdout();
    match run(cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let AppError::Calc(err) = &e {
                if let Ok(json) = serde_json::to_string_pretty(err) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), AppError> {
    match cli.command {
        Command::Estimate(args) => run_estimate(&args, out),
        Command::Pieces => print_pieces(out),
        Command::Formulas => {
            write!(out, "{}", generate_formulas_markdown())?;
            Ok(())
        }
    }
}

/// Resolve the form: defaults, then job file, then flags, then prompts.
fn resolve_form(args: &EstimateArgs) -> Result<FormValues, AppError> {
    let mut values = FormValues::default();

    if let Some(path) = &args.input {
        let overrides = FormOverrides::from(load_job_file(path)?);
        overrides.check_wall(&path.display().to_string())?;
        values = values.apply(overrides);
        debug!(path = %path.display(), "loaded job file");
    }

    values = values.apply(FormOverrides::from(args));

    if args.interactive {
        let stdin = io::stdin();
        let mut prompter = form::Prompter::new(stdin.lock(), io::stderr());
        values = form::collect(&mut prompter, values)?;
    }

    Ok(values)
}

fn run_estimate(args: &EstimateArgs, out: &mut impl Write) -> Result<(), AppError> {
    let input = resolve_form(args)?.to_input();
    let result = calculate(&input)?;
    let generated_at = chrono::Local::now().naive_local();

    if args.json {
        let json = serde_json::to_string_pretty(&EstimateOutput {
            input: &input,
            result: &result,
        })
        .map_err(CalcError::from)?;
        writeln!(out, "{}", json)?;
    } else {
        write!(out, "{}", build_report(&input, &result, generated_at).to_text())?;
    }

    if let Some(path) = &args.pdf {
        let document = export_estimate(&input, generated_at)?;
        std::fs::write(path, &document.bytes)
            .map_err(|e| CalcError::file_error("write", path.display().to_string(), e.to_string()))?;
        info!(path = %path.display(), bytes = document.bytes.len(), "wrote pdf report");
        eprintln!("PDF guardado en {}", path.display());
    }

    Ok(())
}

fn print_pieces(out: &mut impl Write) -> Result<(), AppError> {
    writeln!(out, "{:<10} {:<26} {:<18} {:>10}", "Clave", "Pieza", "Medidas", "Peso (kg)")?;
    for choice in PieceChoice::ALL {
        let Some(spec) = PieceSpec::from_type(choice.piece_type()) else {
            continue;
        };
        let key = choice
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{:<10} {:<26} {:<18} {:>10}",
            key,
            spec.piece_type.display_name(),
            spec.dimensions_label(),
            spec.unit_weight_kg
        )?;
    }
    Ok(())
}
