use crate::core::FontSource;
use crate::utils::error::{InlineError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Downloads fonts by filename from a fixed base URL.
#[derive(Debug, Clone)]
pub struct RemoteFontSource {
    client: Client,
    base_url: Url,
}

impl RemoteFontSource {
    pub fn new(origin: &str, timeout: Option<Duration>) -> Result<Self> {
        // 沒有結尾斜線時 Url::join 會吃掉最後一段路徑
        let normalized = if origin.ends_with('/') {
            origin.to_string()
        } else {
            format!("{}/", origin)
        };

        let base_url = Url::parse(&normalized).map_err(|e| InlineError::InvalidConfigValueError {
            field: "origin".to_string(),
            value: origin.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn font_url(&self, filename: &str) -> Result<Url> {
        self.base_url
            .join(filename)
            .map_err(|e| InlineError::InvalidFontReference {
                url: filename.to_string(),
                reason: format!("cannot be joined with origin: {}", e),
            })
    }
}

impl FontSource for RemoteFontSource {
    async fn fetch(&self, filename: &str) -> Result<Vec<u8>> {
        let url = self.font_url(filename)?;

        tracing::debug!("Downloading font from: {}", url);
        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("Font response status: {}", response.status());

        if !response.status().is_success() {
            return Err(InlineError::FetchStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes for {}", bytes.len(), filename);
        Ok(bytes.to_vec())
    }
}
