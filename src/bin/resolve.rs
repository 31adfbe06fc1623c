use altitude_temp::core::ConfigProvider;
use altitude_temp::domain::model::AddressRequest;
use altitude_temp::utils::{logger, validation::Validate};
use altitude_temp::{AppConfig, AppState, CliConfig, ReferenceStore};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "resolve")]
#[command(about = "Resolve one standard minimum temperature without starting the server")]
struct Args {
    #[command(flatten)]
    service: CliConfig,

    /// Postal code; only the first two characters are used
    #[arg(long)]
    postal_code: Option<String>,

    /// Free-text address used to look up the altitude
    #[arg(long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_logger(args.service.verbose, args.service.json_logs, None);

    match args.service.config.clone() {
        Some(path) => {
            let config = AppConfig::from_file(&path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            resolve_once(&config, &args).await
        }
        None => resolve_once(&args.service, &args).await,
    }
}

async fn resolve_once<C: ConfigProvider + Validate>(config: &C, args: &Args) -> anyhow::Result<()> {
    config.validate().context("invalid configuration")?;

    let request = AddressRequest {
        address: args.address.clone(),
        postal_code: args.postal_code.clone(),
    };
    if let Err(e) = request.validate() {
        anyhow::bail!(config.messages().describe(&e));
    }

    let store = Arc::new(ReferenceStore::new());
    let state = AppState::from_config(config, store.clone())?;
    state
        .loader
        .load_into(&store)
        .await
        .context("failed to load reference datasets")?;

    let reading = state
        .resolver
        .resolve(request.postal_code.as_deref(), request.address.as_deref())
        .await
        .map_err(|e| match e.is_validation() {
            true => anyhow::anyhow!(state.messages.describe(&e)),
            false => anyhow::Error::new(e),
        })?;

    println!("{}", serde_json::to_string_pretty(&reading)?);
    Ok(())
}
