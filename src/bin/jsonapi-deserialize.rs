//! JSON:API Deserializer CLI
//!
//! Command-line interface for turning JSON:API documents into plain JSON
//! models and checking model definition files.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jsonapi_deserialize::{
    load_document, load_json, load_models, parse_models, DeserializeOptions, Deserialized,
    RegistryError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonapi-deserialize")]
#[command(about = "Deserialize JSON:API documents into plain models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deserialize a JSON:API document
    Deserialize {
        /// JSON:API document file
        document: PathBuf,

        /// Model definition file
        #[arg(long, short)]
        models: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Fail when the document does not match the model definitions
        #[arg(long)]
        strict: bool,

        /// Share models between primary resources that reference each other
        #[arg(long)]
        share_cache: bool,
    },

    /// Check a model definition file
    CheckModels {
        /// Model definition file
        models: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Deserialize {
            document,
            models,
            output,
            pretty,
            strict,
            share_cache,
        } => run_deserialize(DeserializeArgs {
            document,
            models,
            output,
            pretty,
            strict,
            share_cache,
        }),

        Commands::CheckModels { models, json } => run_check_models(&models, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Schema mismatch warnings go to stderr; `RUST_LOG` overrides the default
/// `warn` level.
fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

struct DeserializeArgs {
    document: PathBuf,
    models: PathBuf,
    output: Option<PathBuf>,
    pretty: bool,
    strict: bool,
    share_cache: bool,
}

fn run_deserialize(args: DeserializeArgs) -> Result<(), u8> {
    let DeserializeArgs {
        document: document_path,
        models,
        output,
        pretty,
        strict,
        share_cache,
    } = args;

    let registry = load_models(&models).map_err(|e| {
        eprintln!("Error loading models: {}", e);
        e.exit_code() as u8
    })?;

    let document = load_document(&document_path).map_err(|e| {
        eprintln!("Error loading document: {}", e);
        e.exit_code() as u8
    })?;

    let options = if share_cache {
        DeserializeOptions::new().use_cache(true).clear_cache(false)
    } else {
        DeserializeOptions::new()
    };

    let deserialized = Deserialized::from_document(&registry, document, options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let rendered = deserialized.to_json();
    let json_output = if pretty {
        serde_json::to_string_pretty(&rendered)
    } else {
        serde_json::to_string(&rendered)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    if strict && !deserialized.diagnostics.is_empty() {
        eprintln!(
            "{} schema mismatch(es) in {}",
            deserialized.diagnostics.len(),
            document_path.display()
        );
        return Err(1);
    }

    Ok(())
}

fn run_check_models(path: &Path, json_output: bool) -> Result<(), u8> {
    let definitions = load_json(path).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    match parse_models(&definitions) {
        Ok(registry) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": true,
                    "models": registry.models().collect::<Vec<_>>()
                });
                println!("{}", output);
            } else {
                println!("Valid ({} models)", registry.len());
            }
            Ok(())
        }
        Err(RegistryError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Invalid model definitions:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
