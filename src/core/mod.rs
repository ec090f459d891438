pub mod engine;
pub mod font_cache;
pub mod pipeline;
pub mod rewriter;

pub use crate::domain::model::{
    DryRunEntry, EncodedFont, FontReference, InlineResult, InlinedFont, PlannedFont, Stylesheet,
};
pub use crate::domain::ports::{ConfigProvider, FontProvider, FontSource, Pipeline, Storage};
pub use crate::utils::error::Result;
