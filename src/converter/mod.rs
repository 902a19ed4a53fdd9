//! End-to-end conversion orchestrator
//!
//! One conversion walks classify → extract → enhance (optional) →
//! generate → register. Any stage failure aborts the whole operation
//! with the originating stage attached; nothing is retried. A failure
//! while registering leaves the generated plugin on disk and reports it
//! so the caller can re-register or clean up.

use crate::classifier::{self, Source};
use crate::enhancer::Enhancer;
use crate::fetch::Fetcher;
use crate::generator::{slugify, PluginGenerator};
use crate::marketplace::Marketplace;
use crate::models::{MarketplaceEntry, McpInfo};
use crate::sources::{default_sources, McpSource};
use crate::utils::errors::ConvertError;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Pipeline stages, in execution order. `Enhancing` never tags an
/// error: enhancement failures are swallowed inside the enhancer, so
/// the variant exists only to name the stage in progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Classifying,
    Extracting,
    Enhancing,
    Generating,
    Registering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Classifying => "classifying",
            Stage::Extracting => "extracting",
            Stage::Enhancing => "enhancing",
            Stage::Generating => "generating",
            Stage::Registering => "registering",
        };
        write!(f, "{}", name)
    }
}

/// A conversion failure, tagged with the stage it originated in
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct ConversionError {
    pub stage: Stage,
    #[source]
    pub source: ConvertError,
    /// Set when plugin files were generated before the failure; the
    /// caller may re-register them or clean up.
    pub plugin_dir: Option<PathBuf>,
}

fn fail(stage: Stage, source: ConvertError) -> ConversionError {
    ConversionError {
        stage,
        source,
        plugin_dir: None,
    }
}

/// Result of one successful conversion
#[derive(Debug)]
pub struct Conversion {
    pub info: McpInfo,
    pub plugin_dir: PathBuf,
    pub entry: MarketplaceEntry,
}

pub struct Converter {
    fetcher: Box<dyn Fetcher>,
    sources: Vec<Box<dyn McpSource>>,
    enhancer: Option<Enhancer>,
    generator: PluginGenerator,
    marketplace: Marketplace,
}

impl Converter {
    /// `enhancer: None` skips the enhancement stage entirely; no
    /// capability call is ever attempted.
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        enhancer: Option<Enhancer>,
        generator: PluginGenerator,
        marketplace: Marketplace,
    ) -> Self {
        Self {
            fetcher,
            sources: default_sources(),
            enhancer,
            generator,
            marketplace,
        }
    }

    /// Replace the extractor set. New sources register here plus a
    /// classifier pattern; no other component changes.
    pub fn with_sources(mut self, sources: Vec<Box<dyn McpSource>>) -> Self {
        self.sources = sources;
        self
    }

    pub fn marketplace(&self) -> &Marketplace {
        &self.marketplace
    }

    /// Run the full pipeline for one URL.
    pub async fn convert(&self, url: &str) -> Result<Conversion, ConversionError> {
        let (source, mut info) = self.classify_and_extract(url).await?;
        info!(
            "extracted '{}' from {:?} ({})",
            info.name,
            source.kind(),
            info.connection.kind()
        );

        if let Some(enhancer) = &self.enhancer {
            // Soft-fail inside: a capability failure returns the record
            // unchanged and the pipeline continues.
            info = enhancer.enhance(&info).await;
        }

        let plugin_dir = self
            .generator
            .generate(&info)
            .map_err(|e| fail(Stage::Generating, e))?;

        let entry = self.entry_for(&info, &plugin_dir);
        self.marketplace
            .upsert(entry.clone())
            .map_err(|e| ConversionError {
                stage: Stage::Registering,
                source: e,
                plugin_dir: Some(plugin_dir.clone()),
            })?;

        info!(
            "registered plugin '{}' at {}",
            entry.name,
            plugin_dir.display()
        );

        Ok(Conversion {
            info,
            plugin_dir,
            entry,
        })
    }

    /// Classify and extract only; generates nothing, registers nothing.
    pub async fn inspect(&self, url: &str) -> Result<McpInfo, ConversionError> {
        let (_, info) = self.classify_and_extract(url).await?;
        Ok(info)
    }

    async fn classify_and_extract(
        &self,
        url: &str,
    ) -> Result<(Source, McpInfo), ConversionError> {
        let source = classifier::classify(url).map_err(|e| fail(Stage::Classifying, e))?;

        let extractor = self
            .sources
            .iter()
            .find(|s| s.kind() == source.kind())
            .ok_or_else(|| {
                fail(
                    Stage::Extracting,
                    ConvertError::UnsupportedUrl(url.to_string()),
                )
            })?;

        let info = extractor
            .extract(&source, self.fetcher.as_ref())
            .await
            .map_err(|e| fail(Stage::Extracting, e))?;

        Ok((source, info))
    }

    fn entry_for(&self, info: &McpInfo, plugin_dir: &Path) -> MarketplaceEntry {
        let source = match plugin_dir.strip_prefix(self.marketplace.root()) {
            Ok(relative) => format!("./{}", relative.display()),
            Err(_) => plugin_dir.display().to_string(),
        };

        MarketplaceEntry {
            name: slugify(&info.name),
            source,
            description: if info.description.is_empty() {
                format!("MCP server: {}", info.name)
            } else {
                info.description.clone()
            },
            category: Some("mcp".to_string()),
            homepage: info.homepage.clone(),
        }
    }
}
