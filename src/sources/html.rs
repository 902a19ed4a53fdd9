//! Regex helpers for pulling fields out of directory pages
//!
//! Directory sites expose server metadata as rendered HTML, not as a
//! stable API. These helpers stay deliberately forgiving: a pattern that
//! does not match yields `None`/empty, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static H1: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid h1 pattern"));

static PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").expect("valid paragraph pattern"));

static META_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<meta[^>]+name=["']description["'][^>]*content=["']([^"']*)["']"#)
        .expect("valid meta pattern")
});

static META_DESCRIPTION_CONTENT_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<meta[^>]+content=["']([^"']*)["'][^>]*name=["']description["']"#)
        .expect("valid meta pattern")
});

static GITHUB_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"href=["'](https?://github\.com/[^"']+)["']"#).expect("valid link pattern")
});

static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").expect("valid list pattern"));

static BOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:strong|b)[^>]*>(.*?)</(?:strong|b)>").expect("valid bold pattern")
});

/// Drop tags, decode the common entities, collapse whitespace
pub fn strip_tags(html: &str) -> String {
    let text = TAG.replace_all(html, " ");
    let text = decode_entities(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

/// Text content of the first `<h1>` element
pub fn first_h1(html: &str) -> Option<String> {
    H1.captures(html)
        .map(|caps| strip_tags(&caps[1]))
        .filter(|text| !text.is_empty())
}

/// Text content of the first `<p>` element
pub fn first_paragraph(html: &str) -> Option<String> {
    PARAGRAPH
        .captures(html)
        .map(|caps| strip_tags(&caps[1]))
        .filter(|text| !text.is_empty())
}

/// `content` of the `<meta name="description">` tag, either attribute order
pub fn meta_description(html: &str) -> Option<String> {
    META_DESCRIPTION
        .captures(html)
        .or_else(|| META_DESCRIPTION_CONTENT_FIRST.captures(html))
        .map(|caps| decode_entities(caps[1].trim()))
        .filter(|text| !text.is_empty())
}

/// First github.com link on the page, if any
pub fn github_link(html: &str) -> Option<String> {
    GITHUB_LINK.captures(html).map(|caps| caps[1].to_string())
}

/// Stripped text of each `<li>` element
pub fn list_items(html: &str) -> Vec<String> {
    LIST_ITEM
        .captures_iter(html)
        .map(|caps| strip_tags(&caps[1]))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Stripped text of each `<strong>`/`<b>` element
pub fn bold_text(html: &str) -> Vec<String> {
    BOLD.captures_iter(html)
        .map(|caps| strip_tags(&caps[1]))
        .filter(|text| !text.is_empty())
        .collect()
}
