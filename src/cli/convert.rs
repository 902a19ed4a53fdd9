//! `convert` and `info` commands

use crate::cli::{expand_path, DEFAULT_CONFIG_PATH};
use crate::config::Config;
use crate::converter::Converter;
use crate::enhancer::{Enhancer, GeminiClient};
use crate::fetch::HttpFetcher;
use crate::generator::PluginGenerator;
use crate::marketplace::Marketplace;
use crate::models::{Connection, McpInfo};
use anyhow::Result as AnyhowResult;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// MCP listing URL (fastmcp.me or smithery.ai)
    pub url: String,

    /// Output directory for generated plugins
    #[arg(short, long)]
    pub output: Option<String>,

    /// Skip the LLM enhancement pass
    #[arg(long)]
    pub no_enhance: bool,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// MCP listing URL (fastmcp.me or smithery.ai)
    pub url: String,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

pub async fn convert(args: ConvertArgs) -> AnyhowResult<()> {
    let config = Config::load(&args.config)?;

    let output_dir = expand_path(args.output.as_deref().unwrap_or(&config.output.dir));
    let marketplace_root = output_dir
        .parent()
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."));

    let marketplace = Marketplace::new(&marketplace_root);
    if !marketplace.is_initialized() {
        marketplace.initialize(
            &config.marketplace.name,
            &config.marketplace.owner,
            &config.marketplace.description,
        )?;
    }

    let converter = Converter::new(
        Box::new(HttpFetcher::new()?),
        build_enhancer(&config, args.no_enhance)?,
        PluginGenerator::new(&output_dir),
        marketplace,
    );

    match converter.convert(&args.url).await {
        Ok(conversion) => {
            println!("✓ Converted '{}'", conversion.info.name);
            println!("  Plugin:      {}", conversion.plugin_dir.display());
            println!(
                "  Marketplace: {}",
                marketplace_root
                    .join(".claude-plugin/marketplace.json")
                    .display()
            );
            println!();
            println!("To use in Claude Code:");
            println!(
                "  1. Add marketplace:  /plugin marketplace add {}",
                marketplace_root.display()
            );
            println!(
                "  2. Install plugin:   /plugin install {}@{}",
                conversion.entry.name, config.marketplace.name
            );
            Ok(())
        }
        Err(e) => {
            if let Some(dir) = &e.plugin_dir {
                eprintln!(
                    "Plugin files were generated at {} but registration failed.",
                    dir.display()
                );
                eprintln!("Re-run the command to retry registration, or remove the directory.");
            }
            Err(e.into())
        }
    }
}

pub async fn info(args: InfoArgs) -> AnyhowResult<()> {
    let config = Config::load(&args.config)?;
    debug!("inspecting {}", args.url);

    // Inspection never generates or registers anything; the generator
    // and marketplace stay untouched.
    let converter = Converter::new(
        Box::new(HttpFetcher::new()?),
        None,
        PluginGenerator::new(expand_path(&config.output.dir)),
        Marketplace::new("."),
    );

    let info = converter.inspect(&args.url).await?;
    print_info(&info);
    Ok(())
}

/// The enhancer is built only when the toggle is on and a credential is
/// present; a missing credential means disabled, not failed.
fn build_enhancer(config: &Config, no_enhance: bool) -> AnyhowResult<Option<Enhancer>> {
    if no_enhance || !config.gemini.enabled {
        return Ok(None);
    }
    let Some(api_key) = config.gemini_api_key() else {
        return Ok(None);
    };
    let mut client = GeminiClient::new(api_key)?.with_model(&config.gemini.model);
    if let Some(endpoint) = &config.gemini.endpoint {
        client = client.with_endpoint(endpoint);
    }
    Ok(Some(Enhancer::new(Box::new(client))))
}

fn print_info(info: &McpInfo) {
    println!("Name:        {}", info.name);
    println!(
        "Description: {}",
        if info.description.is_empty() {
            "(none)"
        } else {
            &info.description
        }
    );
    if let Some(author) = &info.author {
        println!("Author:      {}", author);
    }
    if let Some(homepage) = &info.homepage {
        println!("Homepage:    {}", homepage);
    }
    match &info.connection {
        Connection::Stdio { command, args } => {
            println!("Connection:  stdio ({} {})", command, args.join(" "));
        }
        Connection::Http { url } => {
            println!("Connection:  http ({})", url);
        }
    }
    if !info.env_vars.is_empty() {
        println!("Env vars:    {}", info.env_vars.join(", "));
    }
    if !info.tools.is_empty() {
        println!("Tools:");
        for tool in &info.tools {
            if tool.description.is_empty() {
                println!("  - {}", tool.name);
            } else {
                println!("  - {}: {}", tool.name, tool.description);
            }
        }
    }
    println!("Source:      {}", info.source_url);
}
