//! Command implementations for the mcp2plugin binary

pub mod convert;
pub mod marketplace;
pub mod serve;

pub use convert::{ConvertArgs, InfoArgs};
pub use marketplace::{InitArgs, ListArgs, RemoveArgs};
pub use serve::ServeArgs;

use std::path::PathBuf;

pub(crate) fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/mcp2plugin/config.toml";
