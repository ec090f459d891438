pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{LocalStorage, RemoteFontSource};
pub use crate::core::{
    engine::InlineEngine, font_cache::FontCache, pipeline::InlinePipeline,
    rewriter::FontRewriter,
};
pub use crate::utils::error::{InlineError, Result};
