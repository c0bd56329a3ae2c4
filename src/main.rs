use clap::Parser;
use txn_feed::utils::{logger, validation::Validate};
use txn_feed::{app, CliConfig, EtlError, RunSummary, TomlConfig};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting txn-feed");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let result = match &config.config {
        Some(path) => run_from_file(path, config.monitor),
        None => config
            .validate()
            .and_then(|_| app::run(&config, config.monitor)),
    };

    match result {
        Ok(summary) => {
            tracing::info!("✅ Processed {} transactions", summary.documents);
            if let Some(path) = &summary.output_path {
                tracing::info!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Transaction feed failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn run_from_file(path: &str, monitor: bool) -> Result<RunSummary, EtlError> {
    tracing::info!("📁 Loading job from: {}", path);
    let job = TomlConfig::from_file(path)?;
    job.validate()?;

    tracing::info!("🔧 Running job '{}'", job.job_name());
    app::run(&job, monitor || job.monitoring_enabled())
}
