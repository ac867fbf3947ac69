// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI tool to run the cryptography benchmarks and print a report.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use cipherbench::{build_registry, render, BenchmarkHarness, Driver, JsonReporter, ReportContext};
use cipherbench_core::{Algorithm, ConfigLoader, Payload, SuiteConfig, SuiteSettings};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(about = "Run cryptographic micro-benchmarks and report timing and memory statistics")]
struct Args {
    /// Suite file (YAML); the built-in suite is used when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Measured iterations per benchmark (built-in suite)
    #[arg(short, long, default_value_t = 100)]
    iterations: u64,

    /// Warm-up iterations per benchmark (built-in suite)
    #[arg(short, long, default_value_t = 10)]
    warmup: u64,

    /// Payload fixture for the symmetric benchmarks
    #[arg(long)]
    payload_file: Option<PathBuf>,

    /// Synthetic payload size in bytes when no fixture is given
    #[arg(long, default_value_t = 1024)]
    payload_size: usize,

    /// Only run these algorithms (repeatable)
    #[arg(short, long = "algorithm")]
    algorithms: Vec<Algorithm>,

    /// Report format on stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also save the JSON report in this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run in quick mode (10 iterations, 2 warm-up)
    #[arg(long)]
    quick: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries only the report.
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut suite = load_suite(&args)?;
    suite.retain_algorithms(&args.algorithms);

    let payload = match &suite.settings.payload_file {
        Some(path) => Payload::from_file(path)
            .with_context(|| format!("loading payload fixture {}", path.display()))?,
        None => Payload::synthetic(suite.settings.payload_size),
    };
    tracing::info!(
        suite = %suite.settings.name,
        payload_bytes = payload.len(),
        payload_crc32 = payload.checksum(),
        benchmarks = suite.benchmarks.len(),
        "Suite loaded"
    );

    let mut registry = build_registry(&suite, &payload)?;
    let harness = BenchmarkHarness::new().context("initialising resource probes")?;
    let report = Driver::new(harness).execute_all(
        &mut registry,
        ReportContext::new(suite.settings.name.clone(), &payload),
    );

    match args.format {
        OutputFormat::Table => {
            print!("{}", render::render_table(&report));
            eprint!("{}", render::render_summary(&report));
        }
        OutputFormat::Json => println!("{}", render::render_json(&report)?),
    }

    if let Some(dir) = &args.output {
        let path = JsonReporter::new(dir)?.save(&report)?;
        tracing::info!(path = %path.display(), "Benchmark report saved");
    }

    Ok(ExitCode::from(report.exit_code()))
}

fn load_suite(args: &Args) -> anyhow::Result<SuiteConfig> {
    let mut suite = match &args.config {
        Some(path) => ConfigLoader::load_file(path)?,
        None => {
            let (iterations, warmup) = if args.quick {
                (10, 2)
            } else {
                (args.iterations, args.warmup)
            };
            let settings = SuiteSettings::new(
                SuiteSettings::default().name,
                None,
                args.payload_size,
                iterations,
                warmup,
            )?;
            SuiteConfig::default_suite(settings)?
        }
    };

    // A fixture on the command line wins over the suite file.
    if let Some(path) = &args.payload_file {
        suite.settings.payload_file = Some(path.clone());
    }

    Ok(suite)
}
