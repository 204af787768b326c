use clap::Parser;
use spec_compare::utils::{logger, validation::Validate};
use spec_compare::{CompareEngine, ComparePipeline, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-compare")]
#[command(about = "Datasheet comparison tool with TOML job configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "compare-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be compared without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based comparison tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

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
        tracing::info!("🔍 DRY RUN MODE - No comparison will be executed");
        perform_dry_run(&config);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 創建存儲和比較管道
    let storage = LocalStorage::new(config.load.output_path.clone());
    let pipeline = ComparePipeline::new(storage, config);

    // 創建比較引擎並運行
    let engine = CompareEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Comparison completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Comparison completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Comparison failed: {} (Category: {:?}, Severity: {:?})",
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
                spec_compare::utils::error::ErrorSeverity::Low => 0,
                spec_compare::utils::error::ErrorSeverity::Medium => 2,
                spec_compare::utils::error::ErrorSeverity::High => 1,
                spec_compare::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    use spec_compare::domain::ports::ConfigProvider;

    println!("📋 Configuration Summary:");
    println!("  Job: {} v{}", config.job.name, config.job.version);
    if config.entity_files().is_empty() {
        println!("  Source: {}", config.extractor_endpoint());
    } else {
        println!("  Source: {} entity files", config.entity_files().len());
    }
    println!("  Output: {}", config.output_path());
    println!("  Bundle: {}", config.bundle_name());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    use spec_compare::domain::ports::ConfigProvider;

    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Extraction Source:");
    if config.entity_files().is_empty() {
        println!("  Endpoint: {}", config.extractor_endpoint());
        println!("  Timeout: {}s", config.request_timeout_secs());
        if let Some(headers) = config.request_headers() {
            println!("  Headers: {} custom headers", headers.len());
        }
    } else {
        for file in config.entity_files() {
            println!("  File: {}", file);
        }
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Bundle: {}", config.bundle_name());

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
