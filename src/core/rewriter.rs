use crate::core::{FontProvider, FontReference, InlineResult, InlinedFont, PlannedFont};
use crate::domain::model::unquote;
use crate::utils::error::{InlineError, Result};
use regex::Regex;
use std::sync::LazyLock;

static FONT_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"url\((.*?)\) format\((.*?)\)").expect("font reference pattern is valid")
});

/// Rewrites `url(...) format(...)` font references into base64 data URIs.
#[derive(Debug, Clone, Default)]
pub struct FontRewriter {
    strip_prefix: Option<String>,
}

impl FontRewriter {
    pub fn new(strip_prefix: Option<String>) -> Self {
        Self { strip_prefix }
    }

    /// All matches in text order, inlinable or not.
    pub fn find_references(&self, css: &str) -> Vec<FontReference> {
        FONT_REFERENCE
            .captures_iter(css)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(FontReference {
                    url: caps[1].to_string(),
                    format: caps[2].to_string(),
                    span: whole.range(),
                })
            })
            .collect()
    }

    /// Inlinable references with their cache filenames. Nothing is fetched.
    pub fn plan(&self, css: &str) -> Result<Vec<PlannedFont>> {
        self.find_references(css)
            .into_iter()
            .filter(FontReference::is_inlinable)
            .map(|reference| {
                let filename = font_filename(&reference.url, self.strip_prefix.as_deref())?;
                Ok(PlannedFont {
                    reference,
                    filename,
                })
            })
            .collect()
    }

    pub async fn rewrite<P: FontProvider>(&self, css: &str, provider: &P) -> Result<InlineResult> {
        let mut output = String::with_capacity(css.len());
        let mut inlined = Vec::new();
        let mut skipped = Vec::new();
        let mut last_end = 0;

        for reference in self.find_references(css) {
            output.push_str(&css[last_end..reference.span.start]);
            last_end = reference.span.end;

            if !reference.is_inlinable() {
                tracing::debug!("Leaving reference as is: {}", shorten(&reference.url));
                output.push_str(&css[reference.span.clone()]);
                skipped.push(reference.url);
                continue;
            }

            let filename = font_filename(&reference.url, self.strip_prefix.as_deref())?;
            let font = provider.encoded(&filename).await?;

            output.push_str(&format!(
                "url({}) format({})",
                data_uri(&filename, &font.base64),
                reference.format
            ));
            inlined.push(InlinedFont {
                filename,
                format: reference.format,
                byte_len: font.byte_len,
                from_cache: font.from_cache,
            });
        }
        output.push_str(&css[last_end..]);

        Ok(InlineResult {
            css: output,
            inlined,
            skipped,
        })
    }
}

pub fn data_uri(filename: &str, base64: &str) -> String {
    format!("data:application/{};charset=utf-8;base64,{}", filename, base64)
}

/// Derives the flat cache filename from a `url(...)` capture.
///
/// A leading `./` is dropped, then the `strip_prefix` directory (with or
/// without its trailing `/`) if the path starts with it; otherwise the last
/// path component is used.
pub fn font_filename(url: &str, strip_prefix: Option<&str>) -> Result<String> {
    let invalid = |reason: &str| InlineError::InvalidFontReference {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let path = unquote(url.trim());
    let path = path.strip_prefix("./").unwrap_or(path);

    // 前綴一律視為目錄，"fonts" 等同 "fonts/"
    let prefix = strip_prefix.map(|prefix| prefix.trim_end_matches('/'));
    let stripped = prefix
        .filter(|prefix| !prefix.is_empty())
        .and_then(|prefix| path.strip_prefix(prefix))
        .and_then(|rest| rest.strip_prefix('/'));

    let filename = match stripped {
        Some(rest) => rest,
        None => path.rsplit('/').next().unwrap_or(path),
    };

    if filename.is_empty() {
        return Err(invalid("no filename after stripping the path"));
    }
    if filename == "." || filename == ".." || filename.contains('\\') {
        return Err(invalid("filename must not escape the cache directory"));
    }
    if filename.contains('/') {
        return Err(invalid("nested paths are not supported by the flat cache"));
    }

    Ok(filename.to_string())
}

fn shorten(url: &str) -> &str {
    match url.char_indices().nth(48) {
        Some((idx, _)) => &url[..idx],
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EncodedFont;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockProvider {
        fonts: HashMap<String, String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockProvider {
        fn with_font(mut self, filename: &str, base64: &str) -> Self {
            self.fonts.insert(filename.to_string(), base64.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl FontProvider for MockProvider {
        async fn encoded(&self, filename: &str) -> Result<EncodedFont> {
            self.calls.lock().unwrap().push(filename.to_string());
            let base64 = self.fonts.get(filename).cloned().ok_or_else(|| {
                InlineError::FetchStatus {
                    url: filename.to_string(),
                    status: 404,
                }
            })?;
            Ok(EncodedFont {
                byte_len: base64.len() * 3 / 4,
                base64,
                from_cache: false,
            })
        }
    }

    const KATEX_FACE: &str = "@font-face{font-family:KaTeX_AMS;src:url(fonts/KaTeX_AMS-Regular.woff2) format(\"woff2\"),url(fonts/KaTeX_AMS-Regular.woff) format(\"woff\");font-weight:400}";

    #[tokio::test]
    async fn test_text_without_references_is_unchanged() {
        let css = ".katex{font:normal 1.21em KaTeX_Main,Times New Roman,serif}";
        let provider = MockProvider::default();

        let result = FontRewriter::default().rewrite(css, &provider).await.unwrap();

        assert_eq!(result.css, css);
        assert!(result.inlined.is_empty());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_reference_is_inlined() {
        let css = "src: url(./x/foo.woff2) format(woff2);";
        let provider = MockProvider::default().with_font("foo.woff2", "AAEC");

        let result = FontRewriter::default().rewrite(css, &provider).await.unwrap();

        assert_eq!(provider.calls(), vec!["foo.woff2".to_string()]);
        assert_eq!(
            result.css,
            "src: url(data:application/foo.woff2;charset=utf-8;base64,AAEC) format(woff2);"
        );
        assert_eq!(result.inlined.len(), 1);
        assert_eq!(result.inlined[0].format, "woff2");
    }

    #[tokio::test]
    async fn test_katex_face_keeps_quoted_formats_in_order() {
        let provider = MockProvider::default()
            .with_font("KaTeX_AMS-Regular.woff2", "d29mMg==")
            .with_font("KaTeX_AMS-Regular.woff", "d29mZg==");
        let rewriter = FontRewriter::new(Some("fonts/".to_string()));

        let result = rewriter.rewrite(KATEX_FACE, &provider).await.unwrap();

        assert_eq!(
            provider.calls(),
            vec![
                "KaTeX_AMS-Regular.woff2".to_string(),
                "KaTeX_AMS-Regular.woff".to_string()
            ]
        );
        assert_eq!(
            result.css,
            "@font-face{font-family:KaTeX_AMS;src:url(data:application/KaTeX_AMS-Regular.woff2;charset=utf-8;base64,d29mMg==) format(\"woff2\"),url(data:application/KaTeX_AMS-Regular.woff;charset=utf-8;base64,d29mZg==) format(\"woff\");font-weight:400}"
        );
    }

    #[tokio::test]
    async fn test_second_pass_is_a_no_op() {
        let provider = MockProvider::default()
            .with_font("KaTeX_AMS-Regular.woff2", "d29mMg==")
            .with_font("KaTeX_AMS-Regular.woff", "d29mZg==");
        let rewriter = FontRewriter::new(Some("fonts/".to_string()));

        let first = rewriter.rewrite(KATEX_FACE, &provider).await.unwrap();
        let second = rewriter.rewrite(&first.css, &provider).await.unwrap();

        assert_eq!(provider.calls().len(), 2);
        assert_eq!(second.css, first.css);
        assert!(second.inlined.is_empty());
        assert_eq!(second.skipped.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_references_call_provider_each_time() {
        let css = "a{src:url(fonts/foo.woff2) format(woff2)} b{src:url(fonts/foo.woff2) format(woff2)}";
        let provider = MockProvider::default().with_font("foo.woff2", "Zm9v");

        let result = FontRewriter::new(Some("fonts/".to_string()))
            .rewrite(css, &provider)
            .await
            .unwrap();

        assert_eq!(provider.calls().len(), 2);
        assert_eq!(result.inlined.len(), 2);
        assert_eq!(result.css.matches("base64,Zm9v) format(woff2)").count(), 2);
    }

    #[tokio::test]
    async fn test_absolute_urls_are_skipped() {
        let css = "src:url(https://cdn.example.com/a.woff2) format(woff2),url(//cdn.example.com/b.woff) format(woff)";
        let provider = MockProvider::default();

        let result = FontRewriter::default().rewrite(css, &provider).await.unwrap();

        assert_eq!(result.css, css);
        assert!(provider.calls().is_empty());
        assert_eq!(result.skipped.len(), 2);
    }

    #[tokio::test]
    async fn test_provider_error_aborts_rewrite() {
        let css = "src:url(fonts/a.woff2) format(woff2),url(fonts/b.woff2) format(woff2)";
        let provider = MockProvider::default();

        let err = FontRewriter::default().rewrite(css, &provider).await.unwrap_err();

        assert!(matches!(err, InlineError::FetchStatus { .. }));
        assert_eq!(provider.calls(), vec!["a.woff2".to_string()]);
    }

    #[test]
    fn test_font_filename_strips_explicit_prefix() {
        assert_eq!(
            font_filename("fonts/KaTeX_Main-Regular.woff2", Some("fonts/")).unwrap(),
            "KaTeX_Main-Regular.woff2"
        );
        assert_eq!(
            font_filename("./fonts/KaTeX_Main-Regular.woff2", Some("fonts/")).unwrap(),
            "KaTeX_Main-Regular.woff2"
        );
        assert_eq!(
            font_filename("\"fonts/KaTeX_Size1-Regular.ttf\"", Some("fonts/")).unwrap(),
            "KaTeX_Size1-Regular.ttf"
        );
    }

    #[test]
    fn test_font_filename_accepts_prefix_without_trailing_slash() {
        assert_eq!(
            font_filename("fonts/KaTeX_Main-Regular.woff2", Some("fonts")).unwrap(),
            "KaTeX_Main-Regular.woff2"
        );
        assert_eq!(
            font_filename("./fonts/KaTeX_Main-Regular.woff2", Some("fonts")).unwrap(),
            "KaTeX_Main-Regular.woff2"
        );
        assert!(font_filename("fonts/sub/a.woff2", Some("fonts")).is_err());
        // 只比對完整的目錄名稱
        assert_eq!(
            font_filename("fontsX/a.woff2", Some("fonts")).unwrap(),
            "a.woff2"
        );
    }

    #[test]
    fn test_font_filename_falls_back_to_last_component() {
        assert_eq!(font_filename("./x/foo.woff2", Some("fonts/")).unwrap(), "foo.woff2");
        assert_eq!(font_filename("assets/type/bar.woff", None).unwrap(), "bar.woff");
        assert_eq!(font_filename("baz.ttf", None).unwrap(), "baz.ttf");
    }

    #[test]
    fn test_font_filename_rejects_unsafe_names() {
        assert!(font_filename("fonts/", Some("fonts/")).is_err());
        assert!(font_filename("fonts/../secret", Some("fonts/")).is_err());
        assert!(font_filename("fonts/sub/a.woff2", Some("fonts/")).is_err());
        assert!(font_filename("..", None).is_err());
        assert!(font_filename("fonts\\a.woff2", None).is_err());
    }

    #[test]
    fn test_plan_lists_only_inlinable_references() {
        let css = "src:url(fonts/a.woff2) format(woff2),url(data:application/b.woff;charset=utf-8;base64,AA==) format(woff)";
        let rewriter = FontRewriter::new(Some("fonts/".to_string()));

        assert_eq!(rewriter.find_references(css).len(), 2);

        let plan = rewriter.plan(css).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].filename, "a.woff2");
        assert_eq!(plan[0].reference.format, "woff2");
    }
}
