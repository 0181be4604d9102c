//! Command-line entry point.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "studenthub",
    about = "Student, course and enrollment records over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub port: Option<u16>,
    /// Database file, or `:memory:` for a throwaway database
    #[arg(long)]
    pub database: Option<PathBuf>,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
    }
}
