//! Kanon CLI - Extract and canonicalize container images in Kubernetes manifests

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use kanon_kube::{DefaultExtractor, ExtractorExt};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod display;
mod error;
mod exit_codes;
mod util;

use display::OutputFormat;

#[derive(Parser)]
#[command(name = "kanon")]
#[command(author = "Kanon Contributors")]
#[command(version)]
#[command(about = "Extract and canonicalize container images in Kubernetes manifests", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse image references and show their canonical form
    Parse {
        /// Image references (e.g. busybox, ghcr.io/org/app:v1)
        #[arg(required = true)]
        references: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List the container images of every workload in a manifest
    Images {
        /// Manifest file (JSON or YAML), `-` for stdin
        #[arg(default_value = "-")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Fail if any container image cannot be extracted
        #[arg(long)]
        strict: bool,
    },

    /// Rewrite every image in a manifest to its canonical form
    Canonicalize {
        /// Manifest file (JSON or YAML), `-` for stdin
        #[arg(default_value = "-")]
        file: PathBuf,

        /// Output format (defaults to the input format)
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,

        /// Fail if any container image cannot be extracted
        #[arg(long)]
        strict: bool,
    },
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::SUCCESS,
                _ => exit_codes::USAGE_ERROR,
            };
            // Printing can only fail when stdout/stderr are gone
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_tracing(cli.debug);

    // Extraction failures are reported by the commands themselves
    let extractor = DefaultExtractor.with_tracing("kanon-cli");

    let result = match cli.command {
        Commands::Parse { references, output } => commands::parse::run(&references, output),

        Commands::Images {
            file,
            output,
            strict,
        } => commands::images::run(&extractor, &file, output, strict),

        Commands::Canonicalize {
            file,
            output,
            strict,
        } => commands::canonicalize::run(&extractor, &file, output, strict),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
