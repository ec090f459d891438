use crate::core::{InlineResult, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

pub struct InlineEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> InlineEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting font inlining...");

        // Extract
        let stylesheet = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded stylesheet {} ({} bytes)",
            stylesheet.path,
            stylesheet.text.len()
        );

        // Transform
        let result = self.pipeline.transform(stylesheet).await?;
        log_summary(&result);

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "Output saved to: {} in {:?}",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}

fn log_summary(result: &InlineResult) {
    let cached = result.inlined.iter().filter(|font| font.from_cache).count();
    let bytes: usize = result.inlined.iter().map(|font| font.byte_len).sum();
    tracing::info!(
        "Inlined {} fonts ({} from cache, {} downloaded, {} bytes), left {} references untouched",
        result.inlined.len(),
        cached,
        result.inlined.len() - cached,
        bytes,
        result.skipped.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InlinedFont, Stylesheet};
    use crate::utils::error::InlineError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPipeline {
        steps: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<Stylesheet> {
            self.steps.lock().unwrap().push("extract");
            Ok(Stylesheet {
                path: "in.css".to_string(),
                text: "body{}".to_string(),
            })
        }

        async fn transform(&self, stylesheet: Stylesheet) -> Result<InlineResult> {
            self.steps.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(InlineError::InvalidFontReference {
                    url: "fonts/".to_string(),
                    reason: "no filename".to_string(),
                });
            }
            Ok(InlineResult {
                css: stylesheet.text,
                inlined: vec![InlinedFont {
                    filename: "a.woff2".to_string(),
                    format: "woff2".to_string(),
                    byte_len: 4,
                    from_cache: true,
                }],
                skipped: vec![],
            })
        }

        async fn load(&self, _result: InlineResult) -> Result<String> {
            self.steps.lock().unwrap().push("load");
            Ok("out.css".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_executes_steps_in_order() {
        let engine = InlineEngine::new(RecordingPipeline::default());

        let output = engine.run().await.unwrap();

        assert_eq!(output, "out.css");
        assert_eq!(
            *engine.pipeline().steps.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_first_error() {
        let engine = InlineEngine::new(RecordingPipeline {
            fail_transform: true,
            ..Default::default()
        });

        assert!(engine.run().await.is_err());
        assert_eq!(
            *engine.pipeline().steps.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
