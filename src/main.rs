use clap::Parser;
use pvp_parts::core::report::{priced_text_table, OutputFormat};
use pvp_parts::core::ConfigProvider;
use pvp_parts::utils::error::PricingError;
use pvp_parts::utils::{logger, validation::Validate};
use pvp_parts::{CliConfig, LocalStorage, QuoteEngine, QuotePipeline, SourceCatalogProvider};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pvp-parts CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Quote failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: &CliConfig) -> Result<(), PricingError> {
    // 驗證配置
    cli.validate()?;
    let config = cli.resolve_config()?;
    config.validate()?;

    // 先確認有輸入再讀取目錄
    let request = cli.pricing_request(&config)?;
    let formats = config
        .output_formats()
        .iter()
        .map(|f| OutputFormat::parse(f))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(
        "🔎 Quoting {} part numbers against {} catalog",
        request.identifiers.len(),
        request.origin
    );

    let catalog_storage = LocalStorage::new(".");
    let output_storage = LocalStorage::new(config.output_path());
    let output_path = config.output_path().to_string();
    let provider = SourceCatalogProvider::new(catalog_storage, config);
    let pipeline = QuotePipeline::new(output_storage, provider, request, formats, output_path);

    let engine = QuoteEngine::new(pipeline);
    let outcome = engine.run().await?;

    print!("{}", priced_text_table(&outcome.result));

    if !outcome.result.unresolved.is_empty() {
        println!();
        println!(
            "⚠️  Los siguientes PART NUMBER no se encontraron o tienen valor cero. Consulte con el proveedor:"
        );
        for entry in &outcome.result.unresolved {
            println!("  {}", entry.identifier);
        }
    }

    println!();
    println!("📁 Reports saved to: {}", outcome.output_path);
    Ok(())
}
