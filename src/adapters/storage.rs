use crate::core::Storage;
use crate::utils::error::{InlineError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".".to_string())
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        fs::read(&full_path).map_err(|source| InlineError::ReadFailed {
            path: full_path.display().to_string(),
            source,
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        let write_failed = |source| InlineError::WriteFailed {
            path: full_path.display().to_string(),
            source,
        };

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_failed)?;
            }
        }

        fs::write(&full_path, data).map_err(write_failed)?;
        Ok(())
    }
}
