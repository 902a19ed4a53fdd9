//! mcp2plugin: convert MCP directory listings into Claude Code plugins

pub mod classifier;
pub mod cli;
pub mod config;
pub mod converter;
pub mod enhancer;
pub mod fetch;
pub mod generator;
pub mod http_server;
pub mod marketplace;
pub mod models;
pub mod sources;
pub mod utils;

pub use config::Config;
