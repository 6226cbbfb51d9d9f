mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use json_schema_validation::{Draft, Validator, ValidatorOptions};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Overrides;
use report::InstanceReport;

/// Validate JSON documents against a JSON Schema
#[derive(Parser, Debug)]
#[command(name = "validate-json")]
#[command(about = "Validate JSON documents against a JSON Schema", long_about = None)]
struct Args {
    /// Path to the JSON Schema file
    #[arg(long, value_name = "FILE")]
    schema: PathBuf,

    /// Draft for the root schema (draft4, draft6, draft7, draft201909, draft202012)
    #[arg(long, value_name = "DRAFT")]
    draft: Option<Draft>,

    /// Make the standard meta-schemas resolvable by `$ref`
    #[arg(long)]
    with_meta_schemas: bool,

    /// Treat `format` as an assertion
    #[arg(long)]
    validate_formats: bool,

    /// TOML file with validator options; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print structured error records instead of text
    #[arg(long)]
    json: bool,

    /// JSON documents to validate
    #[arg(value_name = "INSTANCE", required = true)]
    instances: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(2);
        }
    }
}

/// Returns whether every instance is valid.
fn run() -> Result<bool> {
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => config::load(path)?,
        None => ValidatorOptions::default(),
    };
    let overrides = Overrides {
        draft: args.draft,
        with_meta_schemas: args.with_meta_schemas,
        validate_formats: args.validate_formats,
    };
    let options = overrides.apply(base);
    debug!(?options, "effective options");

    let schema_content = fs::read_to_string(&args.schema)
        .with_context(|| format!("Failed to read schema file: {}", args.schema.display()))?;
    let validator = Validator::new(&schema_content, options)
        .with_context(|| format!("Failed to load schema from {}", args.schema.display()))?;
    info!(schema = %args.schema.display(), draft = %options.draft, "schema compiled");

    let mut reports = Vec::with_capacity(args.instances.len());
    for path in &args.instances {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        let errors = validator
            .validate(&content)
            .with_context(|| format!("Failed to parse input file {}", path.display()))?;
        reports.push(InstanceReport::new(path, errors));
    }

    if args.json {
        println!("{}", report::render_json(&reports)?);
    } else {
        print!("{}", report::render_text(&reports));
    }
    Ok(reports.iter().all(|report| report.valid))
}
