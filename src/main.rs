use anyhow::Context;
use clap::Parser;
use magento_qty_xml::core::ConfigProvider;
use magento_qty_xml::utils::error::{BindError, ErrorSeverity};
use magento_qty_xml::utils::{logger, validation::Validate};
use magento_qty_xml::{CliConfig, ConversionEngine, ConversionPipeline, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting magento-qty-xml");
    tracing::debug!("CLI config: {:?}", cli);

    let result = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut config = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            config.apply_cli_overrides(&cli);
            convert(config).await
        }
        None => convert(cli.clone()).await,
    };

    match result {
        Ok(output_path) => {
            println!("✅ Conversion completed: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn convert<C: ConfigProvider + Validate>(config: C) -> Result<String, BindError> {
    config.validate()?;
    tracing::info!(
        "✅ Configuration validated: {:?} {} -> {}",
        config.direction(),
        config.input_path(),
        config.output_path()
    );

    let storage = LocalStorage::new(".".to_string());
    let pipeline = ConversionPipeline::new(storage, config);
    ConversionEngine::new(pipeline).run().await
}
