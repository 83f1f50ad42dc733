//! # LineCheck Station Simulator
//!
//! Reads command tokens from stdin, one per line, and drives a single
//! radiator line-check station through `StationRunner`. Every command prints
//! the controller message and a one-line status; records go to a JSON Lines
//! file unless `--no-log` is given.
//!
//! Configuration comes from `--config <FILE>`, else `config/linecheck.toml`
//! when present, else built-in defaults.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use linecheck_common::config::LogLevel;
use linecheck_common::station::command::Command;
use linecheck_controller::config::{ConfigSource, resolve_config};
use linecheck_controller::cycle::{StationRunner, new_run_id};
use linecheck_controller::sink::{JsonlSink, RecordSink};
use linecheck_controller::state::machine::StationController;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// LineCheck: single-station radiator line controller
#[derive(Parser, Debug)]
#[command(name = "linecheck")]
#[command(version)]
#[command(about = "Command-driven radiator line-check station simulator")]
struct Args {
    /// Station configuration TOML. Defaults to config/linecheck.toml if present.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the JSON Lines record log (overrides [log].dir).
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Start with record logging disabled.
    #[arg(long)]
    no_log: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output diagnostics in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let resolved = resolve_config(args.config.as_deref());
    let configured = resolved
        .as_ref()
        .map(|(config, _)| config.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, configured);

    info!("LineCheck Simulator v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = resolved
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|(config, source)| {
            match source {
                ConfigSource::File(path) => info!("Config loaded from {}", path.display()),
                ConfigSource::Defaults => info!("No config file, using built-in defaults"),
            }
            run(&args, config)
        });

    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(
    args: &Args,
    config: linecheck_common::station::config::LineCheckConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let run_id = new_run_id();
    let log_dir = args.log_dir.clone().unwrap_or(config.log.dir);
    let sink = JsonlSink::new(&log_dir, &run_id, config.log.enabled && !args.no_log);
    info!(
        run_id = %run_id,
        service = %config.shared.service_name,
        "record log {} ({})",
        if sink.is_enabled() { "enabled" } else { "disabled" },
        sink.path().display()
    );

    let controller = StationController::new(config.timeouts);
    let mut runner = StationRunner::new(controller, sink, run_id);

    let mut out = io::stdout().lock();
    writeln!(out, "LineCheck Simulator started")?;
    let tokens: Vec<&str> = Command::ALL.iter().map(Command::token).collect();
    writeln!(out, "Commands: {}", tokens.join(", "))?;
    writeln!(out, "{}", runner.controller().state())?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let step = runner.step(&line);
        match step.record.error_code {
            Some(code) => writeln!(out, "[{code}] {}", step.record.message)?,
            None => writeln!(out, "{}", step.record.message)?,
        }
        writeln!(out, "{}", runner.controller().state())?;
        out.flush()?;
        if step.exit {
            break;
        }
    }

    runner.finish();
    Ok(())
}

/// `RUST_LOG` wins; otherwise `--verbose`, then the configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        LogLevel::Debug
    } else {
        configured
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
