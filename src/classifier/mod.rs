//! URL classification for supported MCP directories
//!
//! Pure pattern matching: a raw URL maps to a `(SourceKind, identifier)`
//! pair or an `UnsupportedUrl` error. Patterns are tried in a fixed
//! priority order (fastmcp.me first, then smithery.ai); first match wins.

use crate::utils::errors::{ConvertError, ConvertResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Supported MCP directory sites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    FastMcp,
    Smithery,
}

/// A classified URL: which directory it belongs to plus the normalized
/// identifier extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    FastMcp { id: u64, slug: String },
    Smithery { slug: String },
}

impl Source {
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::FastMcp { .. } => SourceKind::FastMcp,
            Source::Smithery { .. } => SourceKind::Smithery,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Source::FastMcp { slug, .. } => slug,
            Source::Smithery { slug } => slug,
        }
    }

    /// Canonical page URL the extractor should fetch. Smithery's
    /// `server.smithery.ai/{slug}` redirect form normalizes to the
    /// canonical `smithery.ai/server/{slug}` page here.
    pub fn page_url(&self) -> String {
        match self {
            Source::FastMcp { id, slug } => {
                format!("https://fastmcp.me/MCP/Details/{}/{}", id, slug)
            }
            Source::Smithery { slug } => format!("https://smithery.ai/server/{}", slug),
        }
    }
}

static FASTMCP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.)?fastmcp\.me/MCP/Details/(\d+)/([^/\s]+)$")
        .expect("valid fastmcp pattern")
});

static SMITHERY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:server\.)?smithery\.ai/(?:server/)?([^/\s]+)$")
        .expect("valid smithery pattern")
});

/// Trim surrounding whitespace and trailing slashes before matching
pub fn normalize(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// Classify a raw URL into a [`Source`]. No side effects, no fuzzy
/// matching: anything that matches neither pattern is unsupported.
pub fn classify(url: &str) -> ConvertResult<Source> {
    let url = normalize(url);

    if let Some(caps) = FASTMCP_PATTERN.captures(url) {
        let id = caps[1]
            .parse::<u64>()
            .map_err(|_| ConvertError::UnsupportedUrl(url.to_string()))?;
        return Ok(Source::FastMcp {
            id,
            slug: caps[2].to_string(),
        });
    }

    if let Some(caps) = SMITHERY_PATTERN.captures(url) {
        return Ok(Source::Smithery {
            slug: caps[1].to_string(),
        });
    }

    Err(ConvertError::UnsupportedUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_fastmcp() {
        let source = classify("https://fastmcp.me/MCP/Details/217/repomix").unwrap();
        assert_eq!(
            source,
            Source::FastMcp {
                id: 217,
                slug: "repomix".to_string()
            }
        );
        assert_eq!(source.kind(), SourceKind::FastMcp);
    }

    #[test]
    fn test_classify_fastmcp_www_and_http() {
        let source = classify("http://www.fastmcp.me/MCP/Details/5/slack").unwrap();
        assert_eq!(
            source,
            Source::FastMcp {
                id: 5,
                slug: "slack".to_string()
            }
        );
    }

    #[test]
    fn test_classify_smithery_canonical() {
        let source = classify("https://smithery.ai/server/slack").unwrap();
        assert_eq!(
            source,
            Source::Smithery {
                slug: "slack".to_string()
            }
        );
    }

    #[test]
    fn test_classify_smithery_redirect_host() {
        let source = classify("https://server.smithery.ai/slack").unwrap();
        assert_eq!(
            source,
            Source::Smithery {
                slug: "slack".to_string()
            }
        );
        assert_eq!(source.page_url(), "https://smithery.ai/server/slack");
    }

    #[test]
    fn test_classify_normalizes_whitespace_and_trailing_slash() {
        let source = classify("  https://fastmcp.me/MCP/Details/217/repomix/  ").unwrap();
        assert_eq!(source.slug(), "repomix");
    }

    #[test]
    fn test_classify_unsupported() {
        for url in [
            "https://example.com/mcp/foo",
            "https://fastmcp.me/MCP/Details/not-a-number/foo",
            "https://fastmcp.me/other/217/repomix",
            "not a url",
            "",
        ] {
            assert!(
                matches!(classify(url), Err(ConvertError::UnsupportedUrl(_))),
                "expected unsupported: {}",
                url
            );
        }
    }

    #[test]
    fn test_fastmcp_takes_priority() {
        // fastmcp pattern is tried first; a fastmcp URL never falls through
        // to the smithery pattern.
        let source = classify("https://fastmcp.me/MCP/Details/1/a").unwrap();
        assert_eq!(source.kind(), SourceKind::FastMcp);
    }

    #[test]
    fn test_fastmcp_page_url() {
        let source = Source::FastMcp {
            id: 217,
            slug: "repomix".to_string(),
        };
        assert_eq!(
            source.page_url(),
            "https://fastmcp.me/MCP/Details/217/repomix"
        );
    }
}
