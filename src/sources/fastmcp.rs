//! fastmcp.me listing extractor

use super::html;
use super::{McpSource, MAX_ENV_VARS, MAX_TOOLS};
use crate::classifier::{Source, SourceKind};
use crate::fetch::Fetcher;
use crate::models::{Connection, McpInfo, McpTool};
use crate::utils::errors::{ConvertError, ConvertResult};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

pub struct FastMcpSource;

#[async_trait]
impl McpSource for FastMcpSource {
    fn kind(&self) -> SourceKind {
        SourceKind::FastMcp
    }

    async fn extract(&self, source: &Source, fetcher: &dyn Fetcher) -> ConvertResult<McpInfo> {
        let url = source.page_url();
        let page = fetcher
            .fetch(&url)
            .await
            .map_err(|e| ConvertError::transport(e.to_string()))?;
        parse_page(&page, source.slug(), &url)
    }
}

static AUTHOR_HANDLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z][A-Za-z0-9_-]+)").expect("valid author pattern"));

static RUN_COMMANDS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r#"npx\s+-y\s+([^\s<"']+)((?:\s+--?[A-Za-z0-9][A-Za-z0-9-]*)*)"#)
                .expect("valid npx pattern"),
            "npx",
        ),
        (
            Regex::new(r#"uvx\s+([^\s<"']+)((?:\s+--?[A-Za-z0-9][A-Za-z0-9-]*)*)"#)
                .expect("valid uvx pattern"),
            "uvx",
        ),
        (
            Regex::new(r#"bunx\s+([^\s<"']+)((?:\s+--?[A-Za-z0-9][A-Za-z0-9-]*)*)"#)
                .expect("valid bunx pattern"),
            "bunx",
        ),
        (
            Regex::new(r#"npm\s+exec\s+([^\s<"']+)"#).expect("valid npm pattern"),
            "npm",
        ),
    ]
});

static ANY_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("valid url pattern"));

static ENV_VAR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\$\{([A-Z][A-Z0-9_]{3,})\}").expect("valid env pattern"),
        Regex::new(r"\$([A-Z][A-Z0-9_]{3,})").expect("valid env pattern"),
        Regex::new(r"\b([A-Z][A-Z0-9_]{3,})=").expect("valid env pattern"),
    ]
});

static TOOL_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[-\u{2013}:]\s*").expect("valid split pattern"));

pub(crate) fn parse_page(page: &str, slug: &str, url: &str) -> ConvertResult<McpInfo> {
    let name = html::first_h1(page).unwrap_or_else(|| slug.to_string());
    if name.is_empty() {
        return Err(ConvertError::missing_field(format!(
            "no server name on {}",
            url
        )));
    }

    let description = html::meta_description(page).unwrap_or_default();
    let text = html::strip_tags(page);

    let author = AUTHOR_HANDLE
        .captures(&text)
        .map(|caps| caps[1].to_string());

    let connection = match find_endpoint(&text) {
        Some(endpoint) => Connection::Http { url: endpoint },
        None => {
            let (command, args) = install_command(&text, slug);
            Connection::Stdio { command, args }
        }
    };

    let tools = extract_tools(page);
    let env_vars = extract_env_vars(&text);
    let homepage = html::github_link(page);

    debug!(
        "fastmcp: parsed '{}' ({} tools, {} env vars, {})",
        name,
        tools.len(),
        env_vars.len(),
        connection.kind()
    );

    Ok(McpInfo {
        name,
        description,
        author,
        repository: homepage.clone(),
        homepage,
        connection,
        tools,
        env_vars,
        source_url: url.to_string(),
    })
}

/// Installation command and arguments, from run-command hints on the
/// page or a package-name fallback.
fn install_command(text: &str, slug: &str) -> (String, Vec<String>) {
    for (pattern, command) in RUN_COMMANDS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let package = caps[1].to_string();
            let extra: Vec<String> = caps
                .get(2)
                .map(|m| m.as_str().split_whitespace().map(String::from).collect())
                .unwrap_or_default();
            let mut args = match *command {
                "npx" => vec!["-y".to_string(), package],
                "npm" => return ("npm".to_string(), vec!["exec".to_string(), package]),
                _ => vec![package],
            };
            args.extend(extra);
            return (command.to_string(), args);
        }
    }

    // Fall back to package naming conventions before giving up
    let lowered = slug.to_lowercase();
    let candidates = [
        format!(r"@[^/\s]+/{}", regex::escape(&lowered)),
        format!(r"mcp-server-{}", regex::escape(&lowered)),
        format!(r"{}-mcp", regex::escape(&lowered)),
    ];
    for candidate in &candidates {
        if let Ok(pattern) = Regex::new(&format!("(?i){}", candidate)) {
            if let Some(found) = pattern.find(text) {
                return (
                    "npx".to_string(),
                    vec!["-y".to_string(), found.as_str().to_string()],
                );
            }
        }
    }

    (
        "npx".to_string(),
        vec!["-y".to_string(), format!("mcp-server-{}", lowered)],
    )
}

/// An MCP endpoint URL mentioned on the page implies an http connection.
/// The directory's own pages and repository links are not endpoints.
fn find_endpoint(text: &str) -> Option<String> {
    ANY_URL
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ')']).to_string())
        .find(|candidate| {
            let lowered = candidate.to_lowercase();
            lowered.contains("mcp")
                && !lowered.contains("fastmcp.me")
                && !lowered.contains("github.com")
        })
}

fn extract_tools(page: &str) -> Vec<McpTool> {
    let mut tools: Vec<McpTool> = Vec::new();

    for item in html::list_items(page) {
        if item.len() < 6 {
            continue;
        }
        let mut parts = TOOL_SPLIT.splitn(&item, 2);
        if let (Some(name), Some(description)) = (parts.next(), parts.next()) {
            let name = name.trim();
            if !name.is_empty() && name.len() <= 50 && !description.trim().is_empty() {
                push_tool(&mut tools, name, description.trim());
            }
        }
    }

    // Bold identifiers are often tool names without a description
    for name in html::bold_text(page) {
        if looks_like_tool_name(&name) {
            push_tool(&mut tools, &name, "");
        }
    }

    tools.truncate(MAX_TOOLS);
    tools
}

fn looks_like_tool_name(name: &str) -> bool {
    !name.contains(' ')
        && (name.contains('_')
            || name.starts_with("get")
            || name.starts_with("create")
            || name.starts_with("list")
            || name.starts_with("search"))
}

fn push_tool(tools: &mut Vec<McpTool>, name: &str, description: &str) {
    if tools.iter().any(|t| t.name == name) {
        return;
    }
    tools.push(McpTool {
        name: name.to_string(),
        description: description.to_string(),
    });
}

fn extract_env_vars(text: &str) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    for pattern in ENV_VAR_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let var = caps[1].to_string();
            let lowered = var.to_lowercase();
            if ["url", "uri", "http", "json", "xml"]
                .iter()
                .any(|noise| lowered.contains(noise))
            {
                continue;
            }
            if !vars.contains(&var) {
                vars.push(var);
            }
        }
    }
    vars.truncate(MAX_ENV_VARS);
    vars
}
