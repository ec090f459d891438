use crate::adapters::{LocalStorage, RemoteFontSource};
use crate::core::font_cache::FontCache;
use crate::core::rewriter::FontRewriter;
use crate::core::{
    ConfigProvider, DryRunEntry, FontProvider, FontSource, InlineResult, Pipeline, Storage,
    Stylesheet,
};
use crate::utils::error::{InlineError, Result};

pub struct InlinePipeline<S: Storage, C: ConfigProvider, P: FontProvider> {
    storage: S,
    config: C,
    provider: P,
    rewriter: FontRewriter,
}

impl<S: Storage, C: ConfigProvider, P: FontProvider> InlinePipeline<S, C, P> {
    pub fn new(storage: S, config: C, provider: P) -> Self {
        let rewriter = FontRewriter::new(config.strip_prefix().map(str::to_string));
        Self {
            storage,
            config,
            provider,
            rewriter,
        }
    }
}

impl<C: ConfigProvider> InlinePipeline<LocalStorage, C, FontCache<RemoteFontSource>> {
    /// Wires local files, the on-disk cache and the remote origin from `config`.
    pub fn from_config(config: C) -> Result<Self> {
        let source = RemoteFontSource::new(config.origin(), config.timeout())?;
        let cache = FontCache::new(config.cache_dir(), source)
            .with_create_dir(config.create_cache_dir());
        Ok(Self::new(LocalStorage::default(), config, cache))
    }
}

impl<S: Storage, C: ConfigProvider, F: FontSource> InlinePipeline<S, C, FontCache<F>> {
    /// Reads the stylesheet and resolves every inlinable reference against the
    /// cache. Nothing is downloaded or written.
    pub async fn dry_run(&self) -> Result<Vec<DryRunEntry>> {
        let stylesheet = self.extract().await?;
        let planned = self.rewriter.plan(&stylesheet.text)?;

        Ok(planned
            .into_iter()
            .map(|font| DryRunEntry {
                cached: self.provider.is_cached(&font.filename),
                filename: font.filename,
                format: font.reference.format,
            })
            .collect())
    }
}

/// Plain-text listing printed by `--dry-run`.
pub fn render_dry_run(entries: &[DryRunEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let status = if entry.cached { "cached" } else { "download" };
        out.push_str(&format!(
            "{:<9} {:<40} format({})\n",
            status, entry.filename, entry.format
        ));
    }
    out.push_str(&format!("{} fonts would be inlined\n", entries.len()));
    out
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, P: FontProvider> Pipeline for InlinePipeline<S, C, P> {
    async fn extract(&self) -> Result<Stylesheet> {
        let path = self.config.input_path();
        tracing::debug!("Reading stylesheet: {}", path);

        let bytes = self.storage.read_file(path).await?;
        let text = String::from_utf8(bytes).map_err(|e| InlineError::InvalidStylesheet {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Stylesheet is {} bytes", text.len());
        Ok(Stylesheet {
            path: path.to_string(),
            text,
        })
    }

    async fn transform(&self, stylesheet: Stylesheet) -> Result<InlineResult> {
        let result = self
            .rewriter
            .rewrite(&stylesheet.text, &self.provider)
            .await?;

        tracing::debug!(
            "Found {} font references in {}",
            result.inlined.len() + result.skipped.len(),
            stylesheet.path
        );
        Ok(result)
    }

    async fn load(&self, result: InlineResult) -> Result<String> {
        let output_path = self.config.output_path();

        tracing::debug!("Writing {} bytes to {}", result.css.len(), output_path);
        self.storage
            .write_file(output_path, result.css.as_bytes())
            .await?;

        // 選用的 JSON 報告，不含 CSS 本文
        if let Some(report_path) = self.config.report_path() {
            let report = serde_json::to_string_pretty(&result)?;
            self.storage
                .write_file(report_path, report.as_bytes())
                .await?;
            tracing::debug!("Report saved to {}", report_path);
        }

        Ok(output_path.to_string())
    }
}
