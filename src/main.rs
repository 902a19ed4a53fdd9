use clap::{Parser, Subcommand};
use mcp2plugin::cli;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcp2plugin")]
#[command(about = "Convert MCP directory listings into Claude Code plugins")]
#[command(version)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an MCP URL into a plugin and register it
    Convert(cli::ConvertArgs),
    /// Show extracted MCP information without generating anything
    Info(cli::InfoArgs),
    /// Initialize a marketplace at the target directory
    Init(cli::InitArgs),
    /// List registered plugins
    List(cli::ListArgs),
    /// Remove a plugin entry from the marketplace
    Remove(cli::RemoveArgs),
    /// Serve the marketplace as a read-only HTTP API
    Serve(cli::ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    match args.command {
        Command::Convert(args) => cli::convert::convert(args).await,
        Command::Info(args) => cli::convert::info(args).await,
        Command::Init(args) => cli::marketplace::init(args),
        Command::List(args) => cli::marketplace::list(args),
        Command::Remove(args) => cli::marketplace::remove(args),
        Command::Serve(args) => cli::serve::serve(args).await,
    }
}
