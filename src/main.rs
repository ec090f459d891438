use clap::Parser;
use font_inliner::core::pipeline::render_dry_run;
use font_inliner::core::ConfigProvider;
use font_inliner::utils::error::InlineError;
use font_inliner::utils::{logger, validation::Validate};
use font_inliner::{CliConfig, InlineEngine, InlinePipeline, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting font-inliner");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let outcome = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => run(config, cli.dry_run).await,
                Err(e) => Err(e),
            }
        }
        None => run(cli.clone(), cli.dry_run).await,
    };

    match outcome {
        Ok(Some(output_path)) => {
            tracing::info!("✅ Fonts inlined successfully");
            println!("✅ Fonts inlined successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(
                "❌ Font inlining failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}

/// Returns the output path, or `None` for a dry run.
async fn run<C>(config: C, dry_run: bool) -> Result<Option<String>, InlineError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    tracing::debug!(
        "Inlining {} -> {} (cache: {}, origin: {})",
        config.input_path(),
        config.output_path(),
        config.cache_dir(),
        config.origin()
    );

    let pipeline = InlinePipeline::from_config(config)?;

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be downloaded or written");
        let entries = pipeline.dry_run().await?;
        print!("{}", render_dry_run(&entries));
        return Ok(None);
    }

    let engine = InlineEngine::new(pipeline);
    engine.run().await.map(Some)
}
