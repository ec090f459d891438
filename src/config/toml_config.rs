use crate::config::{
    validate_provider, DEFAULT_CACHE_DIR, DEFAULT_INPUT, DEFAULT_ORIGIN, DEFAULT_OUTPUT,
    DEFAULT_STRIP_PREFIX,
};
use crate::core::ConfigProvider;
use crate::utils::error::{InlineError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub stylesheet: StylesheetConfig,
    #[serde(default)]
    pub fonts: FontsConfig,
    pub source: Option<SourceConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StylesheetConfig {
    #[serde(default = "default_input")]
    pub input: String,
    #[serde(default = "default_output")]
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontsConfig {
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    /// `""` turns prefix stripping off.
    #[serde(default = "default_strip_prefix")]
    pub strip_prefix: String,
    #[serde(default)]
    pub create_cache_dir: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub path: String,
}

fn default_input() -> String {
    DEFAULT_INPUT.to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_cache_dir() -> String {
    DEFAULT_CACHE_DIR.to_string()
}

fn default_strip_prefix() -> String {
    DEFAULT_STRIP_PREFIX.to_string()
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
        }
    }
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            cache_dir: default_cache_dir(),
            strip_prefix: default_strip_prefix(),
            create_cache_dir: false,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| InlineError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| InlineError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FONT_ORIGIN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.stylesheet.input
    }

    fn output_path(&self) -> &str {
        &self.stylesheet.output
    }

    fn cache_dir(&self) -> &str {
        &self.fonts.cache_dir
    }

    fn origin(&self) -> &str {
        &self.fonts.origin
    }

    fn strip_prefix(&self) -> Option<&str> {
        Some(self.fonts.strip_prefix.as_str()).filter(|prefix| !prefix.is_empty())
    }

    fn create_cache_dir(&self) -> bool {
        self.fonts.create_cache_dir
    }

    fn timeout(&self) -> Option<Duration> {
        self.source
            .as_ref()
            .and_then(|source| source.timeout_seconds)
            .map(Duration::from_secs)
    }

    fn report_path(&self) -> Option<&str> {
        self.report.as_ref().map(|report| report.path.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
