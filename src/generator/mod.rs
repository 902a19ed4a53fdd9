//! Deterministic plugin descriptor generation
//!
//! Maps an [`McpInfo`] to a [`PluginManifest`] and writes it under
//! `<output_dir>/<slug>/.claude-plugin/plugin.json`. The same input
//! always produces the same bytes; regenerating with an updated record
//! replaces the descriptor without leaving stale fields behind.

use crate::models::{
    Connection, McpInfo, McpServerConfig, PluginAuthor, PluginManifest, MANIFEST_DIR,
    PLUGIN_MANIFEST_FILE, PLUGIN_VERSION,
};
use crate::utils::errors::{ConvertError, ConvertResult};
use crate::utils::fs::atomic_write;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct PluginGenerator {
    output_dir: PathBuf,
}

impl PluginGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the descriptor for `info` and return the plugin directory.
    /// Refuses to claim a path that exists but is not a plugin directory
    /// of its own making. The descriptor file itself is written via
    /// temp-then-rename, so a failed write leaves no half-written file.
    pub fn generate(&self, info: &McpInfo) -> ConvertResult<PathBuf> {
        let slug = slugify(&info.name);
        let plugin_dir = self.output_dir.join(&slug);

        if plugin_dir.exists() {
            if !plugin_dir.is_dir() {
                return Err(ConvertError::Generation(format!(
                    "{} exists and is not a directory",
                    plugin_dir.display()
                )));
            }
            if !plugin_dir.join(MANIFEST_DIR).exists() && !is_empty_dir(&plugin_dir)? {
                return Err(ConvertError::Generation(format!(
                    "{} exists and is not a generated plugin directory",
                    plugin_dir.display()
                )));
            }
        }

        let manifest_dir = plugin_dir.join(MANIFEST_DIR);
        fs::create_dir_all(&manifest_dir)?;

        let manifest = build_manifest(info, &slug);
        let mut content = serde_json::to_string_pretty(&manifest)?;
        content.push('\n');
        atomic_write(&manifest_dir.join(PLUGIN_MANIFEST_FILE), content.as_bytes())?;

        info!("generated plugin '{}' at {}", slug, plugin_dir.display());
        Ok(plugin_dir)
    }
}

/// Map an [`McpInfo`] to its descriptor. `server_key` names the single
/// `mcpServers` entry; the plugin's original name stays verbatim in the
/// manifest body.
pub fn build_manifest(info: &McpInfo, server_key: &str) -> PluginManifest {
    let server = match &info.connection {
        Connection::Stdio { command, args } => McpServerConfig {
            command: Some(command.clone()),
            args: Some(args.clone()),
            env: if info.env_vars.is_empty() {
                None
            } else {
                Some(
                    info.env_vars
                        .iter()
                        .map(|var| (var.clone(), format!("${{{}}}", var)))
                        .collect::<BTreeMap<_, _>>(),
                )
            },
            ..Default::default()
        },
        Connection::Http { url } => McpServerConfig {
            connection_type: Some("http".to_string()),
            url: Some(url.clone()),
            ..Default::default()
        },
    };

    let repository = info.repository.clone().or_else(|| {
        info.homepage
            .as_ref()
            .filter(|homepage| homepage.contains("github"))
            .cloned()
    });

    PluginManifest {
        name: info.name.clone(),
        description: if info.description.is_empty() {
            format!("MCP server: {}", info.name)
        } else {
            info.description.clone()
        },
        version: PLUGIN_VERSION.to_string(),
        author: info
            .author
            .clone()
            .map(|name| PluginAuthor { name }),
        homepage: info.homepage.clone(),
        repository,
        mcp_servers: BTreeMap::from([(server_key.to_string(), server)]),
    }
}

/// Filesystem-safe slug: lowercase, runs of non-alphanumerics collapsed
/// to a single hyphen, no leading or trailing hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "unknown-plugin".to_string()
    } else {
        slug
    }
}

fn is_empty_dir(path: &Path) -> ConvertResult<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}
