use clap::Parser;
use copyguard::utils::error::ErrorSeverity;
use copyguard::utils::{logger, validation::Validate};
use copyguard::{CliConfig, LocalStorage, ReplayEngine, SuppressionPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting copyguard trace replay");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置，失敗時直接退出
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立存儲與重播管道
    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = SuppressionPipeline::new(storage, config);
    let engine = ReplayEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report_path) => {
            tracing::info!("✅ Trace replay completed successfully!");
            tracing::info!("📁 Guard report saved to: {}", report_path);
            println!("✅ Trace replay completed successfully!");
            println!("📁 Guard report saved to: {}", report_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Trace replay failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
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
