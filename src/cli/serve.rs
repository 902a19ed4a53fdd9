//! `serve` command: read-only HTTP API over a marketplace

use crate::cli::{expand_path, DEFAULT_CONFIG_PATH};
use crate::config::Config;
use crate::http_server::HttpServer;
use crate::marketplace::Marketplace;
use anyhow::Result as AnyhowResult;
use clap::Args;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Marketplace root directory
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Directory holding the generated plugins (default: <path>/plugins)
    #[arg(long)]
    pub plugins_dir: Option<String>,

    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(long)]
    pub port: Option<u16>,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

pub async fn serve(args: ServeArgs) -> AnyhowResult<()> {
    let config = Config::load(&args.config)?;

    let root = expand_path(&args.path);
    let plugins_dir = args
        .plugins_dir
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| root.join("plugins"));

    let server = HttpServer::new(
        args.host.unwrap_or(config.server.host),
        args.port.unwrap_or(config.server.port),
        Marketplace::new(root),
        plugins_dir,
    );

    server.run().await
}
