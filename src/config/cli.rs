use crate::config::{
    validate_provider, DEFAULT_CACHE_DIR, DEFAULT_INPUT, DEFAULT_ORIGIN, DEFAULT_OUTPUT,
    DEFAULT_STRIP_PREFIX,
};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "font-inliner")]
#[command(about = "Inline the web fonts of a CSS stylesheet as base64 data URIs")]
pub struct CliConfig {
    /// Stylesheet to rewrite
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: String,

    /// Where the rewritten stylesheet is written
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Directory holding downloaded fonts between runs
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: String,

    /// Base URL fonts are downloaded from
    #[arg(long, default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Path prefix removed from url(...) to get the font filename
    #[arg(long, default_value = DEFAULT_STRIP_PREFIX)]
    pub strip_prefix: String,

    /// Always use the last path component as the filename
    #[arg(long)]
    pub no_strip_prefix: bool,

    /// Create the cache directory if it does not exist
    #[arg(long)]
    pub create_cache_dir: bool,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Write a JSON summary of the inlined fonts to this path
    #[arg(long)]
    pub report: Option<String>,

    /// Load settings from a TOML file instead of the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    /// List the fonts that would be inlined without downloading or writing anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn cache_dir(&self) -> &str {
        &self.cache_dir
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn strip_prefix(&self) -> Option<&str> {
        if self.no_strip_prefix {
            None
        } else {
            Some(&self.strip_prefix)
        }
    }

    fn create_cache_dir(&self) -> bool {
        self.create_cache_dir
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn report_path(&self) -> Option<&str> {
        self.report.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
