//! Optional LLM enhancement pass
//!
//! The enhancer may rewrite the description and enrich the tool list of
//! an extracted record. It never touches structurally derived facts
//! (name, connection, env vars), and any failure of the completion
//! capability is swallowed: the caller always gets a usable record back.

pub mod gemini;

pub use gemini::GeminiClient;

use crate::models::{McpInfo, McpTool};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Free-text completion capability backing the enhancer
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, EnhanceError>;
}

/// Minimum description length below which a polish pass is attempted
const MIN_DESCRIPTION_LEN: usize = 20;

#[derive(Debug, Deserialize)]
struct Refinement {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tools: Vec<McpTool>,
}

pub struct Enhancer {
    model: Box<dyn CompletionModel>,
}

impl Enhancer {
    pub fn new(model: Box<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Enhance description and tools. On any capability failure the input
    /// record is returned unchanged; enhancement is never a pipeline
    /// failure, only a degraded-quality notice in the logs.
    pub async fn enhance(&self, info: &McpInfo) -> McpInfo {
        match self.try_enhance(info).await {
            Ok(enhanced) => enhanced,
            Err(e) => {
                warn!("enhancement failed, keeping extracted record: {}", e);
                info.clone()
            }
        }
    }

    async fn try_enhance(&self, info: &McpInfo) -> Result<McpInfo, EnhanceError> {
        let raw = self.model.complete(&refinement_prompt(info)).await?;
        let refinement: Refinement = serde_json::from_str(strip_code_fences(&raw))
            .map_err(|e| EnhanceError::MalformedResponse(e.to_string()))?;

        let mut enhanced = info.clone();

        if let Some(description) = refinement.description {
            let description = description.trim();
            if !description.is_empty() {
                enhanced.description = description.to_string();
            }
        }
        merge_tools(&mut enhanced.tools, refinement.tools);

        if enhanced.description.len() < MIN_DESCRIPTION_LEN {
            let polished = self.model.complete(&polish_prompt(&enhanced)).await?;
            let polished = polished.trim();
            if !polished.is_empty() {
                enhanced.description = polished.to_string();
            }
        }

        debug!("enhanced '{}'", enhanced.name);
        Ok(enhanced)
    }
}

/// Fill descriptions of known tools and append newly discovered ones;
/// existing order is preserved, nothing is removed.
fn merge_tools(tools: &mut Vec<McpTool>, refined: Vec<McpTool>) {
    for tool in refined {
        if tool.name.trim().is_empty() {
            continue;
        }
        match tools.iter_mut().find(|t| t.name == tool.name) {
            Some(existing) => {
                if existing.description.is_empty() && !tool.description.is_empty() {
                    existing.description = tool.description;
                }
            }
            None => tools.push(tool),
        }
    }
}

fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

fn refinement_prompt(info: &McpInfo) -> String {
    let tool_lines = if info.tools.is_empty() {
        "none listed".to_string()
    } else {
        info.tools
            .iter()
            .map(|t| format!("- {}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Improve the metadata of this MCP (Model Context Protocol) server listing.\n\
         \n\
         Name: {}\n\
         Current description: {}\n\
         Known tools:\n{}\n\
         \n\
         Respond with JSON only, no markdown:\n\
         {{\"description\": \"1-2 sentence developer-facing description\", \
         \"tools\": [{{\"name\": \"tool_name\", \"description\": \"what it does\"}}]}}\n\
         Only include tools the server actually provides.",
        info.name,
        if info.description.is_empty() {
            "none"
        } else {
            &info.description
        },
        tool_lines
    )
}

fn polish_prompt(info: &McpInfo) -> String {
    format!(
        "Write a concise 1-2 sentence description for an MCP server plugin \
         named '{}'. It exposes these tools: {}. \
         Return only the description text, no quotes.",
        info.name,
        if info.tools.is_empty() {
            "unknown".to_string()
        } else {
            info.tools
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    )
}
