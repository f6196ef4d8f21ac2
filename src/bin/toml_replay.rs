use clap::Parser;
use copyguard::config::toml_config::TomlConfig;
use copyguard::utils::{logger, validation::Validate};
use copyguard::LocalStorage;
use copyguard::ReplayEngine;
use copyguard::SuppressionPipeline;

#[derive(Parser)]
#[command(name = "toml-replay")]
#[command(about = "Trace replay tool with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "guard-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override trace file path from config
    #[arg(long)]
    trace: Option<String>,

    /// Dry run - show what would be replayed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based trace replay tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(trace) = &args.trace {
        tracing::info!("🔧 Trace path overridden to: {}", trace);
        config.trace.path = trace.clone();
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual replay will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 創建存儲和重播管道
    let storage = LocalStorage::new(config.report.output_path.clone());
    let pipeline = SuppressionPipeline::new(storage, config);

    // 創建重播引擎並運行
    let engine = ReplayEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report_path) => {
            tracing::info!("✅ Trace replay completed successfully!");
            tracing::info!("📁 Guard report saved to: {}", report_path);
            println!("✅ Trace replay completed successfully!");
            println!("📁 Guard report saved to: {}", report_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Trace replay failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                copyguard::utils::error::ErrorSeverity::Low => 0, // 警告，但成功
                copyguard::utils::error::ErrorSeverity::Medium => 2, // 配置錯誤
                copyguard::utils::error::ErrorSeverity::High => 1, // 處理錯誤
                copyguard::utils::error::ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Trace: {}", config.trace.path);

    if let Some(origin) = &config.trace.expected_origin {
        println!("  Expected Origin: {}", origin);
    }

    println!("  Output: {}", config.report.output_path);
    println!(
        "  Context Menu: {}",
        if config.policy.block_context_menu {
            "blocked"
        } else {
            "allowed"
        }
    );
    println!("  Blocked Keys: {}", config.policy.blocked_keys.join(", "));
    println!("  Monitoring: {}", config.monitoring_enabled());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    // 輸入分析
    println!("📥 Trace Source Analysis:");
    println!("  Path: {}", config.trace.path);
    match &config.trace.expected_origin {
        Some(origin) => println!("  Origin check: enabled ({})", origin),
        None => println!("  Origin check: disabled"),
    }

    // 防護策略分析
    println!();
    println!("🛡️ Guard Policy:");
    if config.policy.block_context_menu {
        println!("  ✅ Context menu suppression enabled");
    } else {
        println!("  ⚠️ Context menu suppression disabled");
    }

    let shortcuts: Vec<String> = config
        .policy
        .blocked_keys
        .iter()
        .map(|k| format!("ctrl+{}", k))
        .collect();
    println!("  Blocked shortcuts: {}", shortcuts.join(", "));
    println!("  📊 Shortcut rules: {}", config.policy.blocked_keys.len());

    // 輸出分析
    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.report.output_path);
    println!("  Bundle: guard_report.zip");
    println!("  Members: report.csv, report.json (+ suppressed.json when events are blocked)");

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
