use crate::domain::model::{EncodedFont, InlineResult, Stylesheet};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where font bytes come from when the cache misses.
pub trait FontSource: Send + Sync {
    fn fetch(&self, filename: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Turns a font filename into its base64 content.
pub trait FontProvider: Send + Sync {
    fn encoded(
        &self,
        filename: &str,
    ) -> impl std::future::Future<Output = Result<EncodedFont>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn cache_dir(&self) -> &str;
    fn origin(&self) -> &str;
    fn strip_prefix(&self) -> Option<&str>;
    fn create_cache_dir(&self) -> bool;
    fn timeout(&self) -> Option<Duration>;
    fn report_path(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Stylesheet>;
    async fn transform(&self, stylesheet: Stylesheet) -> Result<InlineResult>;
    async fn load(&self, result: InlineResult) -> Result<String>;
}
