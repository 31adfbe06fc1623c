use altitude_temp::core::ConfigProvider;
use altitude_temp::utils::{logger, validation::Validate};
use altitude_temp::{run_server, AppConfig, AppState, CliConfig, ReferenceStore};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            let config = match AppConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 {}", e.recovery_suggestion());
                    std::process::exit(1);
                }
            };
            logger::init_logger(cli.verbose, config.json_logs(), config.log_level());
            tracing::info!("📁 Configuration loaded from {}", path);
            serve(config).await
        }
        None => {
            logger::init_logger(cli.verbose, cli.json_logs, None);
            serve(cli).await
        }
    }
}

async fn serve<C: ConfigProvider + Validate>(config: C) -> anyhow::Result<()> {
    tracing::info!("Starting altitude-temp service");

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let store = Arc::new(ReferenceStore::new());
    let state = AppState::from_config(&config, store.clone())
        .context("failed to initialise HTTP clients")?;

    // 啟動前必須成功載入兩份參考資料
    state
        .loader
        .load_into(&store)
        .await
        .context("failed to load reference datasets")?;

    run_server(state, config.bind_address()).await?;
    Ok(())
}
