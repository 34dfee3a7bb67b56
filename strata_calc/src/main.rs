//! # Strata Calculator Binary
//!
//! Stratified-proportional sampling error (SE and 95% MOE) for a
//! region × type design.
//!
//! # Usage
//!
//! ```bash
//! # Write a starting design, edit it, then compute
//! strata_calc template > design.toml
//! strata_calc compute design.toml
//!
//! # Machine-readable output, N_h assumed equal across strata
//! strata_calc compute design.toml --equal-split --json
//!
//! # Fill the form interactively
//! strata_calc interactive
//!
//! # Verbose logging with a settings file
//! strata_calc --config strata.toml -v compute design.toml
//! ```

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use strata::config::{AppConfig, ConfigLoader, LogLevel};
use strata::design::{Design, DesignFile, StratumPopulations};
use strata_calc::estimator::estimate_design;
use strata_calc::form::FormState;
use strata_calc::report::Report;
use strata_calc::session::{Session, user_message};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit code for rejected calculator input.
const EXIT_INVALID_INPUT: u8 = 2;

/// Strata Calculator - stratified-proportional sampling error
#[derive(Parser, Debug)]
#[command(name = "strata_calc")]
#[command(version)]
#[command(about = "Stratified-proportional sampling error (SE and 95% MOE) for a proportion")]
#[command(long_about = None)]
struct Args {
    /// Settings file (log level, display precision).
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the sampling error of a design file
    Compute {
        /// Design file (TOML)
        #[arg(value_name = "DESIGN")]
        design: PathBuf,

        /// Ignore entered N_h and assume N / H per stratum
        #[arg(long)]
        equal_split: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a starting design file
    Template,

    /// Fill the design form interactively on stdin
    Interactive {
        /// Pre-fill the form from a design file
        #[arg(long, value_name = "DESIGN")]
        design: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("strata_calc failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    };
    let log_level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    let config = config?;
    config.validate()?;
    info!(
        service = %config.shared.service_name,
        "strata_calc v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    match args.command {
        Command::Compute {
            design,
            equal_split,
            json,
        } => {
            let mut design = load_design(&design)?;
            if equal_split {
                design = Design::new(
                    design.population(),
                    design.samples().clone(),
                    StratumPopulations::EqualSplit,
                )?;
            }
            let estimate = match estimate_design(&design) {
                Ok(estimate) => estimate,
                Err(e) => {
                    error!(reason = e.reason().code(), "calculation rejected");
                    eprintln!("error: {}", user_message(&e, design.samples()));
                    return Ok(ExitCode::from(EXIT_INVALID_INPUT));
                }
            };
            let report = Report::new(&design, &estimate);
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.render_text(&config.display));
            }
        }
        Command::Template => {
            print!("{}", toml::to_string(&DesignFile::template())?);
        }
        Command::Interactive { design } => {
            let mut form = FormState::new();
            if let Some(path) = design {
                form.load_design(&load_design(&path)?);
            }
            let mut session = Session::with_form(form, config.display);
            session.run(io::stdin().lock(), io::stdout().lock())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Read and validate a design file.
fn load_design(path: &Path) -> Result<Design, Box<dyn std::error::Error>> {
    info!("Loading design from {}", path.display());
    let file = DesignFile::load(path).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(file.into_design()?)
}

/// Setup tracing subscriber based on CLI arguments and settings.
///
/// Logs go to stderr; stdout carries only results.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        configured
    };

    // RUST_LOG, when set, wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    if args.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}
