use thiserror::Error;

#[derive(Error, Debug)]
pub enum InlineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stylesheet '{path}' is not valid text: {reason}")]
    InvalidStylesheet { path: String, reason: String },

    #[error("Cache directory '{path}' does not exist")]
    CacheDirectoryMissing { path: String },

    #[error("Font download from {url} returned HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("Invalid font reference '{url}': {reason}")]
    InvalidFontReference { url: String, reason: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    FileSystem,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl InlineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InlineError::Http(_) | InlineError::FetchStatus { .. } => ErrorCategory::Network,
            InlineError::ReadFailed { .. }
            | InlineError::WriteFailed { .. }
            | InlineError::CacheDirectoryMissing { .. } => ErrorCategory::FileSystem,
            InlineError::Serialization(_)
            | InlineError::InvalidStylesheet { .. }
            | InlineError::InvalidFontReference { .. } => ErrorCategory::Data,
            InlineError::ConfigValidationError { .. }
            | InlineError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重跑即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::FileSystem => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            InlineError::Http(_) => "Check network connectivity and the configured font origin",
            InlineError::FetchStatus { .. } => {
                "Verify the font exists at the origin or adjust --origin / --strip-prefix"
            }
            InlineError::CacheDirectoryMissing { .. } => {
                "Create the cache directory or pass --create-cache-dir"
            }
            InlineError::ReadFailed { .. } => "Make sure the input stylesheet exists and is readable",
            InlineError::WriteFailed { .. } => {
                "Check file permissions and available disk space"
            }
            InlineError::InvalidStylesheet { .. } => "Make sure the stylesheet is UTF-8 encoded",
            InlineError::InvalidFontReference { .. } => {
                "Check the url(...) paths in the stylesheet or set --strip-prefix"
            }
            InlineError::Serialization(_) => "Check the report path and try again",
            InlineError::ConfigValidationError { .. }
            | InlineError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            InlineError::ReadFailed { path, .. } => format!("無法讀取樣式表: {}", path),
            InlineError::WriteFailed { path, .. } => format!("無法寫入輸出檔案: {}", path),
            InlineError::CacheDirectoryMissing { path } => format!("快取目錄不存在: {}", path),
            InlineError::FetchStatus { url, status } => {
                format!("字型下載失敗 (HTTP {}): {}", status, url)
            }
            InlineError::Http(e) => format!("網路請求失敗: {}", e),
            other => other.to_string(),
        }
    }
}

impl ErrorSeverity {
    /// Process exit code the binary reports for a failed run.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2, // 網路錯誤，可重試
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3, // 檔案系統錯誤
        }
    }
}

pub type Result<T> = std::result::Result<T, InlineError>;
