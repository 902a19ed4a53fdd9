//! `init`, `list` and `remove` commands

use crate::cli::{expand_path, DEFAULT_CONFIG_PATH};
use crate::config::Config;
use crate::marketplace::Marketplace;
use anyhow::Result as AnyhowResult;
use clap::Args;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Marketplace root directory
    #[arg(short, long, default_value = ".")]
    pub path: String,

    /// Marketplace name
    #[arg(long)]
    pub name: Option<String>,

    /// Marketplace owner
    #[arg(long)]
    pub owner: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Marketplace root directory
    #[arg(short, long, default_value = ".")]
    pub path: String,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Plugin entry name to remove
    pub name: String,

    /// Marketplace root directory
    #[arg(short, long, default_value = ".")]
    pub path: String,
}

pub fn init(args: InitArgs) -> AnyhowResult<()> {
    let config = Config::load(&args.config)?;
    let root = expand_path(&args.path);

    let marketplace = Marketplace::new(&root);
    marketplace.initialize(
        args.name.as_deref().unwrap_or(&config.marketplace.name),
        args.owner.as_deref().unwrap_or(&config.marketplace.owner),
        &config.marketplace.description,
    )?;

    println!(
        "Initialized marketplace at {}",
        marketplace.manifest_path().display()
    );
    Ok(())
}

pub fn list(args: ListArgs) -> AnyhowResult<()> {
    let marketplace = Marketplace::new(expand_path(&args.path));
    let plugins = marketplace.list()?;

    if plugins.is_empty() {
        println!("No plugins registered.");
        return Ok(());
    }

    println!("{} plugin(s):", plugins.len());
    for entry in plugins {
        println!("  {}  ({})", entry.name, entry.source);
        if !entry.description.is_empty() {
            println!("    {}", entry.description);
        }
    }
    Ok(())
}

pub fn remove(args: RemoveArgs) -> AnyhowResult<()> {
    let marketplace = Marketplace::new(expand_path(&args.path));

    if marketplace.remove(&args.name)? {
        println!("Removed '{}' from the marketplace.", args.name);
        println!("The plugin directory itself was left on disk.");
    } else {
        println!("No entry named '{}' found.", args.name);
    }
    Ok(())
}
