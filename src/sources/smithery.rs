//! smithery.ai listing extractor

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

pub struct SmitherySource;

#[async_trait]
impl McpSource for SmitherySource {
    fn kind(&self) -> SourceKind {
        SourceKind::Smithery
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

const DESCRIPTION_LIMIT: usize = 500;

static AUTHOR_BYLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bby\s+@?([A-Za-z][A-Za-z0-9_-]+)").expect("valid byline"));

static HOSTED_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(hosted|remote|cloud)\b|server\.smithery\.ai").expect("valid hosted hint")
});

static INSTALL_COMMANDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"npx\s+@smithery/cli\s+install\s+(\S+)").expect("valid smithery cli pattern"),
        Regex::new(r#"npx\s+-y\s+([^\s<"']+)"#).expect("valid npx pattern"),
        Regex::new(r"npm\s+install\s+(\S+)").expect("valid npm pattern"),
    ]
});

static QUOTED_ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([A-Z][A-Z0-9_]{3,})""#).expect("valid env pattern"));

static PLACEHOLDER_ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z][A-Z0-9_]{3,})\}").expect("valid env pattern"));

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

    let description = html::meta_description(page)
        .or_else(|| html::first_paragraph(page))
        .map(|text| truncate(&text, DESCRIPTION_LIMIT))
        .unwrap_or_default();

    let text = html::strip_tags(page);
    let author = AUTHOR_BYLINE
        .captures(&text)
        .map(|caps| caps[1].to_string());

    let connection = determine_connection(&text, slug);
    let tools = extract_tools(page);
    let env_vars = extract_env_vars(page);
    let homepage = html::github_link(page);

    debug!(
        "smithery: parsed '{}' ({} tools, {} env vars, {})",
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

/// A page advertising a hosted/remote deployment maps to an http
/// connection at smithery's server host; everything else is a local
/// stdio server launched through npx.
fn determine_connection(text: &str, slug: &str) -> Connection {
    if HOSTED_HINT.is_match(text) {
        return Connection::Http {
            url: format!("https://server.smithery.ai/{}", slug),
        };
    }

    for (index, pattern) in INSTALL_COMMANDS.iter().enumerate() {
        if let Some(caps) = pattern.captures(text) {
            let package = caps[1].to_string();
            let args = if index == 0 {
                // Packages installed via the smithery CLI also run through it
                vec![
                    "-y".to_string(),
                    "@smithery/cli".to_string(),
                    "run".to_string(),
                    package,
                ]
            } else {
                vec!["-y".to_string(), package]
            };
            return Connection::Stdio {
                command: "npx".to_string(),
                args,
            };
        }
    }

    Connection::Stdio {
        command: "npx".to_string(),
        args: vec![
            "-y".to_string(),
            "@smithery/cli".to_string(),
            "run".to_string(),
            slug.to_string(),
        ],
    }
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
            if name.is_empty() || name.len() > 50 || description.trim().is_empty() {
                continue;
            }
            if tools.iter().all(|t| t.name != name) {
                tools.push(McpTool {
                    name: name.to_string(),
                    description: description.trim().to_string(),
                });
            }
        }
    }

    tools.truncate(MAX_TOOLS);
    tools
}

fn extract_env_vars(page: &str) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    for pattern in [&*QUOTED_ENV_VAR, &*PLACEHOLDER_ENV_VAR] {
        for caps in pattern.captures_iter(page) {
            let var = caps[1].to_string();
            let lowered = var.to_lowercase();
            if ["type", "string", "number", "boolean"]
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

fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosted_page_yields_http_connection() {
        let page = r#"<h1>Slack</h1><p>Hosted MCP server for Slack workspaces</p>"#;
        let info = parse_page(page, "slack", "https://smithery.ai/server/slack").unwrap();
        assert_eq!(
            info.connection,
            Connection::Http {
                url: "https://server.smithery.ai/slack".to_string()
            }
        );
        assert_eq!(info.name, "Slack");
        assert_eq!(info.description, "Hosted MCP server for Slack workspaces");
    }

    #[test]
    fn test_smithery_cli_install_command() {
        let conn = determine_connection("run npx @smithery/cli install @owner/github", "github");
        assert_eq!(
            conn,
            Connection::Stdio {
                command: "npx".to_string(),
                args: vec![
                    "-y".to_string(),
                    "@smithery/cli".to_string(),
                    "run".to_string(),
                    "@owner/github".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_plain_npx_install_command() {
        let conn = determine_connection("npx -y mcp-server-sqlite", "sqlite");
        assert_eq!(
            conn,
            Connection::Stdio {
                command: "npx".to_string(),
                args: vec!["-y".to_string(), "mcp-server-sqlite".to_string()],
            }
        );
    }

    #[test]
    fn test_default_falls_back_to_smithery_cli_run() {
        let conn = determine_connection("nothing useful here", "filesystem");
        assert_eq!(
            conn,
            Connection::Stdio {
                command: "npx".to_string(),
                args: vec![
                    "-y".to_string(),
                    "@smithery/cli".to_string(),
                    "run".to_string(),
                    "filesystem".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_author_byline() {
        let page = r#"<h1>Sqlite</h1><span>by @jparkerweb</span><code>npx -y mcp-sqlite</code>"#;
        let info = parse_page(page, "sqlite", "https://smithery.ai/server/sqlite").unwrap();
        assert_eq!(info.author.as_deref(), Some("jparkerweb"));
    }

    #[test]
    fn test_env_vars_from_config_block() {
        let page = r#"<pre>{"SLACK_BOT_TOKEN": "...", "STRING_VALUE": "...", "${SLACK_TEAM_ID}": 1}</pre>"#;
        let vars = extract_env_vars(page);
        assert!(vars.contains(&"SLACK_BOT_TOKEN".to_string()));
        assert!(vars.contains(&"SLACK_TEAM_ID".to_string()));
        assert!(!vars.iter().any(|v| v == "STRING_VALUE"));
    }

    #[test]
    fn test_description_falls_back_to_first_paragraph() {
        let page = "<h1>Thing</h1><p>Does the thing well.</p>";
        let info = parse_page(page, "thing", "https://smithery.ai/server/thing").unwrap();
        assert_eq!(info.description, "Does the thing well.");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(300);
        let truncated = truncate(&text, DESCRIPTION_LIMIT);
        assert!(truncated.len() <= DESCRIPTION_LIMIT);
    }
}
