//! Source-specific extractors for supported MCP directories
//!
//! Each directory gets one [`McpSource`] implementation. Adding a new
//! source means implementing this trait, adding its URL pattern to the
//! classifier, and registering the extractor in
//! [`default_sources`]; nothing else changes.

mod html;

pub mod fastmcp;
pub mod smithery;

pub use fastmcp::FastMcpSource;
pub use smithery::SmitherySource;

use crate::classifier::{Source, SourceKind};
use crate::fetch::Fetcher;
use crate::models::McpInfo;
use crate::utils::errors::ConvertResult;
use async_trait::async_trait;

#[async_trait]
pub trait McpSource: Send + Sync {
    /// Which classified source kind this extractor handles
    fn kind(&self) -> SourceKind;

    /// Fetch the listing page for `source` and parse it into an
    /// [`McpInfo`]. Parsing is defensive: missing optional fields resolve
    /// to empty/absent; only an unfetchable page or a missing server name
    /// fails. No retries here; that is the fetcher's concern.
    async fn extract(&self, source: &Source, fetcher: &dyn Fetcher) -> ConvertResult<McpInfo>;
}

/// The built-in extractor set, in classifier priority order
pub fn default_sources() -> Vec<Box<dyn McpSource>> {
    vec![Box::new(FastMcpSource), Box::new(SmitherySource)]
}

/// Shared limits for defensive parsing
pub(crate) const MAX_TOOLS: usize = 20;
pub(crate) const MAX_ENV_VARS: usize = 10;
