//! Weftmark CLI - textile authentication tool.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use weftmark_core::{FeatureExtractor, FsRecordStore, Registrar};

mod commands;
mod exit_codes;
mod utils;

const EXIT_CODES_HELP: &str = "Exit codes:
  0   success
  1   general error
  65  verification failed (candidate not authentic)
  66  cannot read input image or unknown item id
  74  record store I/O error
  78  configuration error
";

#[derive(Parser)]
#[command(name = "weftmark")]
#[command(author, version, about = "Textile authentication from photographs", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Directory holding feature and identity records
    #[arg(long, global = true, default_value = "data", value_name = "DIR")]
    store: PathBuf,

    /// Suppress decorative output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new textile item from a photograph
    Register {
        /// Path to the photograph
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Use a fixed item id instead of generating one
        #[arg(long, value_name = "ID")]
        id: Option<String>,
    },

    /// Verify a photograph against a registered item
    Verify {
        /// Registered item id
        #[arg(value_name = "ID")]
        id: String,

        /// Path to the candidate photograph
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },

    /// List registered items
    List,

    /// Delete a registered item and its records
    Delete {
        /// Registered item id
        #[arg(value_name = "ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", "error:".red().bold());
        process::exit(exit_codes::classify(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = FsRecordStore::open(&cli.store)?;
    let registrar = Registrar::new(store, FeatureExtractor::default());

    match cli.command {
        Commands::Register { image, id } => {
            commands::register::execute(&registrar, &image, id, cli.quiet)
        }
        Commands::Verify { id, image } => {
            commands::verify::execute(&registrar, &id, &image, cli.quiet)
        }
        Commands::List => commands::list::execute(&registrar),
        Commands::Delete { id, yes } => commands::delete::execute(&registrar, &id, yes),
    }
}
