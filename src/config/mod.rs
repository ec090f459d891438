#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url,
};
use crate::core::ConfigProvider;

pub const DEFAULT_INPUT: &str = "katex.min.css";
pub const DEFAULT_OUTPUT: &str = "new_styles.css";
pub const DEFAULT_CACHE_DIR: &str = "tmp";
pub const DEFAULT_ORIGIN: &str = "https://cdnjs.cloudflare.com/ajax/libs/KaTeX/0.11.1/fonts/";
pub const DEFAULT_STRIP_PREFIX: &str = "fonts/";

pub const MIN_TIMEOUT_SECONDS: u64 = 1;
pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

/// 兩種設定來源共用的檢查
pub(crate) fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_path("input", config.input_path())?;
    validate_path("output", config.output_path())?;
    validate_path("cache_dir", config.cache_dir())?;
    validate_url("origin", config.origin())?;

    if let Some(prefix) = config.strip_prefix() {
        validate_non_empty_string("strip_prefix", prefix)?;
    }
    if let Some(timeout) = config.timeout() {
        validate_range(
            "timeout_seconds",
            timeout.as_secs(),
            MIN_TIMEOUT_SECONDS,
            MAX_TIMEOUT_SECONDS,
        )?;
    }
    if let Some(report) = config.report_path() {
        validate_path("report", report)?;
    }

    Ok(())
}
