//! End-to-end conversion pipeline tests

use async_trait::async_trait;
use mcp2plugin::converter::{Converter, Stage};
use mcp2plugin::enhancer::{CompletionModel, EnhanceError, Enhancer};
use mcp2plugin::fetch::Fetcher;
use mcp2plugin::generator::PluginGenerator;
use mcp2plugin::marketplace::{
    Marketplace, DEFAULT_DESCRIPTION, DEFAULT_NAME, DEFAULT_OWNER,
};
use mcp2plugin::utils::errors::{ConvertError, ConvertResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const REPOMIX_URL: &str = "https://fastmcp.me/MCP/Details/217/repomix";

const REPOMIX_PAGE: &str = r#"
<html>
  <head><meta name="description" content="Pack your codebase into AI-friendly formats"></head>
  <body>
    <h1>repomix</h1>
    <p>by @yamadashy</p>
    <pre>npx -y repomix --mcp</pre>
    <ul>
      <li>pack_codebase - Package a local code directory</li>
    </ul>
    <a href="https://github.com/yamadashy/repomix">GitHub</a>
  </body>
</html>"#;

const SLACK_URL: &str = "https://smithery.ai/server/slack";

const SLACK_PAGE: &str = r#"
<html>
  <body>
    <h1>Slack</h1>
    <p>Hosted MCP server for Slack workspaces</p>
  </body>
</html>"#;

struct StubFetcher {
    pages: HashMap<String, String>,
}

impl StubFetcher {
    fn new() -> Self {
        let mut pages = HashMap::new();
        pages.insert(REPOMIX_URL.to_string(), REPOMIX_PAGE.to_string());
        pages.insert(SLACK_URL.to_string(), SLACK_PAGE.to_string());
        Self { pages }
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> ConvertResult<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ConvertError::Fetch(format!("no stub page for {}", url)))
    }
}

struct FailingModel;

#[async_trait]
impl CompletionModel for FailingModel {
    async fn complete(&self, _prompt: &str) -> Result<String, EnhanceError> {
        Err(EnhanceError::Request("capability down".to_string()))
    }
}

fn converter_at(root: &Path, enhancer: Option<Enhancer>) -> Converter {
    Converter::new(
        Box::new(StubFetcher::new()),
        enhancer,
        PluginGenerator::new(root.join("plugins")),
        Marketplace::new(root),
    )
}

fn initialized_converter(root: &Path) -> Converter {
    let marketplace = Marketplace::new(root);
    marketplace
        .initialize(DEFAULT_NAME, DEFAULT_OWNER, DEFAULT_DESCRIPTION)
        .unwrap();
    converter_at(root, None)
}

fn read_manifest(plugin_dir: &Path) -> Value {
    let content =
        fs::read_to_string(plugin_dir.join(".claude-plugin/plugin.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_convert_repomix_end_to_end() {
    let dir = TempDir::new().unwrap();
    let converter = initialized_converter(dir.path());

    let conversion = converter.convert(REPOMIX_URL).await.unwrap();

    assert_eq!(conversion.plugin_dir, dir.path().join("plugins/repomix"));
    let manifest = read_manifest(&conversion.plugin_dir);
    assert_eq!(
        manifest["mcpServers"]["repomix"],
        json!({"command": "npx", "args": ["-y", "repomix", "--mcp"]})
    );

    let entries = converter.marketplace().list().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "repomix");
    assert_eq!(entries[0].source, "./plugins/repomix");
}

#[tokio::test]
async fn test_reconvert_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let converter = initialized_converter(dir.path());

    converter.convert(REPOMIX_URL).await.unwrap();
    converter.convert(REPOMIX_URL).await.unwrap();

    let entries = converter.marketplace().list().unwrap();
    assert_eq!(entries.len(), 1);
    // one plugin directory, not two
    let dirs: Vec<_> = fs::read_dir(dir.path().join("plugins")).unwrap().collect();
    assert_eq!(dirs.len(), 1);
}

#[tokio::test]
async fn test_hosted_smithery_server_converts_to_http() {
    let dir = TempDir::new().unwrap();
    let converter = initialized_converter(dir.path());

    let conversion = converter.convert(SLACK_URL).await.unwrap();
    let manifest = read_manifest(&conversion.plugin_dir);
    assert_eq!(
        manifest["mcpServers"]["slack"],
        json!({"type": "http", "url": "https://server.smithery.ai/slack"})
    );
}

#[tokio::test]
async fn test_unsupported_url_fails_in_classifying() {
    let dir = TempDir::new().unwrap();
    let converter = initialized_converter(dir.path());

    let err = converter
        .convert("https://example.com/some-server")
        .await
        .unwrap_err();
    assert_eq!(err.stage, Stage::Classifying);
    assert!(matches!(err.source, ConvertError::UnsupportedUrl(_)));
    assert!(err.plugin_dir.is_none());
    // nothing was generated or registered
    assert!(converter.marketplace().list().unwrap().is_empty());
    assert!(!dir.path().join("plugins").exists());
}

#[tokio::test]
async fn test_fetch_failure_fails_in_extracting() {
    let dir = TempDir::new().unwrap();
    let converter = initialized_converter(dir.path());

    let err = converter
        .convert("https://fastmcp.me/MCP/Details/999/unknown")
        .await
        .unwrap_err();
    assert_eq!(err.stage, Stage::Extracting);
    assert!(matches!(err.source, ConvertError::Extraction { .. }));
    assert!(converter.marketplace().list().unwrap().is_empty());
}

#[tokio::test]
async fn test_registering_failure_reports_partial_success() {
    let dir = TempDir::new().unwrap();
    // marketplace never initialized: registration must fail after the
    // plugin has been generated
    let converter = converter_at(dir.path(), None);

    let err = converter.convert(REPOMIX_URL).await.unwrap_err();
    assert_eq!(err.stage, Stage::Registering);
    assert!(matches!(err.source, ConvertError::NotInitialized(_)));

    let plugin_dir = err.plugin_dir.expect("plugin dir reported");
    assert!(plugin_dir.join(".claude-plugin/plugin.json").exists());
    // the registry was not implicitly created
    assert!(!Marketplace::new(dir.path()).is_initialized());
}

#[tokio::test]
async fn test_failed_enhancement_never_changes_output() {
    let plain_dir = TempDir::new().unwrap();
    let enhanced_dir = TempDir::new().unwrap();

    let plain = initialized_converter(plain_dir.path());
    let marketplace = Marketplace::new(enhanced_dir.path());
    marketplace
        .initialize(DEFAULT_NAME, DEFAULT_OWNER, DEFAULT_DESCRIPTION)
        .unwrap();
    let enhanced = converter_at(
        enhanced_dir.path(),
        Some(Enhancer::new(Box::new(FailingModel))),
    );

    let a = plain.convert(REPOMIX_URL).await.unwrap();
    let b = enhanced.convert(REPOMIX_URL).await.unwrap();

    // byte-for-byte identical descriptors
    let bytes_a = fs::read(a.plugin_dir.join(".claude-plugin/plugin.json")).unwrap();
    let bytes_b = fs::read(b.plugin_dir.join(".claude-plugin/plugin.json")).unwrap();
    assert_eq!(bytes_a, bytes_b);
}

#[tokio::test]
async fn test_inspect_generates_nothing() {
    let dir = TempDir::new().unwrap();
    let converter = initialized_converter(dir.path());

    let info = converter.inspect(REPOMIX_URL).await.unwrap();
    assert_eq!(info.name, "repomix");
    assert!(!dir.path().join("plugins").exists());
    assert!(converter.marketplace().list().unwrap().is_empty());
}
