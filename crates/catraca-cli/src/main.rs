mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use catraca_core::model::MeasureKind;

#[derive(Parser)]
#[command(
    name = "catraca",
    version,
    about = "Reconciles daily bus-line ridership feeds into a canonical record store"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FeedKind {
    /// Predicted-ridership spreadsheet export (BOM-prefixed)
    Predicted,
    /// Realized-ridership database extract (Windows-1252)
    Realized,
}

impl From<FeedKind> for MeasureKind {
    fn from(kind: FeedKind) -> Self {
        match kind {
            FeedKind::Predicted => MeasureKind::Predicted,
            FeedKind::Realized => MeasureKind::Realized,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Import a feed extract into the record store
    Import {
        /// Path to the delimited extract
        input_file: PathBuf,

        /// Which measure this feed populates
        #[arg(short, long, value_enum)]
        kind: FeedKind,

        /// SQLite database file (created if missing)
        #[arg(short, long, default_value = "bus_analysis.db")]
        db: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Run the import pipeline against a throwaway store (feed validation)
    Check {
        /// Path to the delimited extract
        input_file: PathBuf,

        /// Which feed flavor to validate as
        #[arg(short, long, value_enum)]
        kind: FeedKind,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import {
            input_file,
            kind,
            db,
            output,
        } => commands::import::run(input_file, kind.into(), db, &output),
        Commands::Check {
            input_file,
            kind,
            output,
        } => commands::check::run(input_file, kind.into(), &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
