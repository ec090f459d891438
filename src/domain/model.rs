use serde::Serialize;
use std::ops::Range;

/// 已載入記憶體的樣式表
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub path: String,
    pub text: String,
}

/// One `url(...) format(...)` match in a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontReference {
    pub url: String,
    pub format: String,
    pub span: Range<usize>,
}

impl FontReference {
    /// Data URIs and absolute URLs are left as they are.
    pub fn is_inlinable(&self) -> bool {
        let url = unquote(self.url.trim());
        let lower = url.to_ascii_lowercase();
        !(lower.starts_with("data:") || lower.starts_with("//") || lower.contains("://"))
    }
}

/// A reference together with the cache filename derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFont {
    pub reference: FontReference,
    pub filename: String,
}

/// One line of a dry run: what would be inlined and whether it needs a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunEntry {
    pub filename: String,
    pub format: String,
    pub cached: bool,
}

#[derive(Debug, Clone)]
pub struct EncodedFont {
    pub base64: String,
    pub byte_len: usize,
    pub from_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlinedFont {
    pub filename: String,
    pub format: String,
    pub byte_len: usize,
    pub from_cache: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineResult {
    #[serde(skip_serializing)]
    pub css: String,
    pub inlined: Vec<InlinedFont>,
    pub skipped: Vec<String>,
}

pub(crate) fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
