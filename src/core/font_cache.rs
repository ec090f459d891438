use crate::core::{EncodedFont, FontProvider, FontSource};
use crate::utils::error::{InlineError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::PathBuf;

/// Flat on-disk font cache in front of a [`FontSource`].
///
/// A file present in the cache directory is trusted as-is: it is never
/// revalidated, refreshed, or checked against the origin.
pub struct FontCache<F: FontSource> {
    cache_dir: PathBuf,
    source: F,
    create_dir: bool,
}

impl<F: FontSource> FontCache<F> {
    pub fn new(cache_dir: impl Into<PathBuf>, source: F) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            source,
            create_dir: false,
        }
    }

    /// Create the cache directory on demand instead of failing when it is absent.
    pub fn with_create_dir(mut self, create_dir: bool) -> Self {
        self.create_dir = create_dir;
        self
    }

    pub fn cache_path(&self, filename: &str) -> PathBuf {
        self.cache_dir.join(filename)
    }

    pub fn is_cached(&self, filename: &str) -> bool {
        self.cache_path(filename).is_file()
    }

    fn ensure_cache_dir(&self) -> Result<()> {
        if self.cache_dir.is_dir() {
            return Ok(());
        }
        if !self.create_dir {
            return Err(InlineError::CacheDirectoryMissing {
                path: self.cache_dir.display().to_string(),
            });
        }

        tracing::debug!("Creating cache directory: {}", self.cache_dir.display());
        fs::create_dir_all(&self.cache_dir).map_err(|source| InlineError::WriteFailed {
            path: self.cache_dir.display().to_string(),
            source,
        })
    }
}

impl<F: FontSource> FontProvider for FontCache<F> {
    async fn encoded(&self, filename: &str) -> Result<EncodedFont> {
        tracing::info!("processing: {}", filename);

        self.ensure_cache_dir()?;
        let path = self.cache_path(filename);

        let from_cache = path.is_file();
        if from_cache {
            tracing::debug!("Cache hit: {}", path.display());
        } else {
            let bytes = self.source.fetch(filename).await?;
            fs::write(&path, &bytes).map_err(|source| InlineError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;
            tracing::debug!("Cached {} bytes at {}", bytes.len(), path.display());
        }

        // 一律從磁碟讀回，快取內容即為唯一來源
        let bytes = fs::read(&path).map_err(|source| InlineError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        Ok(EncodedFont {
            base64: STANDARD.encode(&bytes),
            byte_len: bytes.len(),
            from_cache,
        })
    }
}
