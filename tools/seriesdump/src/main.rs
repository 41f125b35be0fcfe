mod commands;
mod format;
mod options;
mod writer;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{export::ExportArgs, list::ListArgs, schema::SchemaArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seriesdump", about = "Flatten mcap messages into time series")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List series paths with their point counts
    List(ListArgs),
    /// Export every sample as path,timestamp,value rows
    Export(ExportArgs),
    /// Print the field tree for a topic
    Schema(SchemaArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List(args) => args.run(),
        Commands::Export(args) => args.run(),
        Commands::Schema(args) => args.run(),
    }
}
