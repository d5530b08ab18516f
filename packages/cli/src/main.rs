mod commands;
mod loader;

use clap::{Parser, Subcommand};
use commands::{rewrite, RewriteArgs};

/// Treescribe CLI - batch plugin-driven source rewriting
#[derive(Parser, Debug)]
#[command(name = "treescribe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite every source file under a project directory
    Rewrite(RewriteArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Rewrite(args) => rewrite(args).await,
    }
}
