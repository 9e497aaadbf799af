//! # edi-cli
//!
//! Command-line generator of EDIFACT JSON Schemas.
//!
//! Reads the mapping package of one edition (or of every known edition) and
//! writes one JSON Schema document per data element, composite data element,
//! segment and message.

mod config;

use anyhow::{Context, bail};
use clap::Parser;
use config::{GeneratorConfig, Overrides};
use edi_defs::{DEFAULT_EDITION, Edition, EditionSelection, MappingDirectory};
use edi_jsonschema::{DirectorySink, EditionGenerator, EditionReport, MemorySink};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "edifact-schema")]
#[command(about = "Generate JSON Schemas from EDIFACT edition definitions")]
#[command(version)]
struct Cli {
    /// Edition to generate (e.g. D96A), or `all` for every known edition
    edition: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mapping package directory holding one subdirectory per edition
    #[arg(short, long)]
    mapping_dir: Option<PathBuf>,

    /// Directory the edition output trees are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Root URL for `$id` and `$ref`
    #[arg(long)]
    base_url: Option<String>,

    /// Stop at the first edition that fails
    #[arg(long)]
    fail_fast: bool,

    /// Generate without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    }
    .with_overrides(Overrides {
        edition: cli.edition.clone(),
        mapping_dir: cli.mapping_dir.clone(),
        output_dir: cli.output_dir.clone(),
        base_url: cli.base_url.clone(),
        fail_fast: cli.fail_fast,
    });

    let selector = config.edition.as_deref().unwrap_or(DEFAULT_EDITION);
    let selection = EditionSelection::parse(selector).context("invalid edition argument")?;
    let editions = selection.editions();

    println!("Generating EDIFACT JSON Schemas...");
    println!(
        "Target edition(s): {}\n",
        editions.iter().map(Edition::as_str).collect::<Vec<_>>().join(", ")
    );
    let source = MappingDirectory::new(&config.mapping_dir);
    info!("Reading mapping package from {:?}", source.root());
    let generator = EditionGenerator::new(&source).with_base_url(config.base_url.as_str());

    let mut failed = Vec::new();
    for edition in &editions {
        println!("Processing edition: {edition}");
        match generate_edition(&generator, &config, edition, cli.dry_run) {
            Ok(report) => println!("  - Generated {} messages", report.messages),
            Err(e) => {
                eprintln!("  - {e:#}");
                failed.push(edition.to_string());
                if config.fail_fast {
                    break;
                }
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} edition(s) failed: {}", failed.len(), failed.join(", "));
    }

    println!("\nDone!");
    Ok(())
}

fn generate_edition(
    generator: &EditionGenerator<'_>,
    config: &GeneratorConfig,
    edition: &Edition,
    dry_run: bool,
) -> anyhow::Result<EditionReport> {
    let report = if dry_run {
        let mut sink = MemorySink::new();
        let report = generator.run(edition, &mut sink)?;
        info!("Dry run rendered {} documents for {}", sink.len(), edition);
        report
    } else {
        let mut sink = DirectorySink::new(&config.output_dir, edition.as_str());
        generator.run(edition, &mut sink)?
    };
    Ok(report)
}
