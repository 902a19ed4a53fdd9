//! Canonical data models shared across the conversion pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Initial version assigned to every generated plugin
pub const PLUGIN_VERSION: &str = "1.0.0";

/// Directory holding the descriptor inside a plugin (and the marketplace
/// manifest at the marketplace root)
pub const MANIFEST_DIR: &str = ".claude-plugin";

/// Descriptor file name inside [`MANIFEST_DIR`]
pub const PLUGIN_MANIFEST_FILE: &str = "plugin.json";

/// Marketplace manifest file name inside [`MANIFEST_DIR`]
pub const MARKETPLACE_MANIFEST_FILE: &str = "marketplace.json";

/// A single tool exposed by an MCP server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// How a plugin host reaches the server. Exactly one shape is populated,
/// which is what makes the descriptor output unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// Locally spawned process
    Stdio { command: String, args: Vec<String> },
    /// Remotely reachable endpoint
    Http { url: String },
}

impl Connection {
    pub fn kind(&self) -> &'static str {
        match self {
            Connection::Stdio { .. } => "stdio",
            Connection::Http { .. } => "http",
        }
    }
}

/// Canonical intermediate representation of one MCP listing, produced by
/// the source extractors and consumed by the generator and marketplace.
#[derive(Debug, Clone, PartialEq)]
pub struct McpInfo {
    pub name: String,
    pub description: String,
    pub author: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub connection: Connection,
    pub tools: Vec<McpTool>,
    pub env_vars: Vec<String>,
    pub source_url: String,
}

/// Author block in a plugin descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginAuthor {
    pub name: String,
}

/// One `mcpServers` entry in a plugin descriptor. Absent fields are
/// omitted from the JSON entirely, matching what plugin hosts expect:
/// stdio entries carry `command`/`args` (no `type`), http entries carry
/// `type: "http"` and `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

/// The `plugin.json` descriptor written for each converted plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<PluginAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(rename = "mcpServers")]
    pub mcp_servers: BTreeMap<String, McpServerConfig>,
}

/// One plugin entry in the marketplace manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceEntry {
    pub name: String,
    /// Path to the plugin directory, relative to the marketplace root
    pub source: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

/// Marketplace owner block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceOwner {
    pub name: String,
}

/// The `marketplace.json` manifest: the persisted index of all converted
/// plugins, keyed by unique entry name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner: MarketplaceOwner,
    #[serde(default)]
    pub plugins: Vec<MarketplaceEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stdio_server_config_omits_http_fields() {
        let server = McpServerConfig {
            command: Some("npx".to_string()),
            args: Some(vec!["-y".to_string(), "repomix".to_string()]),
            ..Default::default()
        };
        let value = serde_json::to_value(&server).unwrap();
        assert_eq!(
            value,
            json!({"command": "npx", "args": ["-y", "repomix"]})
        );
    }

    #[test]
    fn test_http_server_config_omits_stdio_fields() {
        let server = McpServerConfig {
            connection_type: Some("http".to_string()),
            url: Some("https://server.smithery.ai/slack".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&server).unwrap();
        assert_eq!(
            value,
            json!({"type": "http", "url": "https://server.smithery.ai/slack"})
        );
    }

    #[test]
    fn test_marketplace_entry_roundtrip_without_optional_fields() {
        let raw = json!({"name": "repomix", "source": "./plugins/repomix"});
        let entry: MarketplaceEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.name, "repomix");
        assert_eq!(entry.description, "");
        assert!(entry.category.is_none());
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("category").is_none());
    }

    #[test]
    fn test_connection_kind() {
        let stdio = Connection::Stdio {
            command: "npx".to_string(),
            args: vec![],
        };
        let http = Connection::Http {
            url: "https://example.com/mcp".to_string(),
        };
        assert_eq!(stdio.kind(), "stdio");
        assert_eq!(http.kind(), "http");
    }
}
