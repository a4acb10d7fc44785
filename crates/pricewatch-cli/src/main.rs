use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod run;

#[derive(Debug, Parser)]
#[command(name = "pricewatch")]
#[command(about = "Scrape one store's daily price list and render a watch-list report")]
struct Args {
    /// Price-file date (YYYY-MM-DD). Defaults to today's local date.
    #[arg(long)]
    date: Option<String>,

    /// Store id to select from the manifest. Overrides PRICEWATCH_STORE_ID.
    #[arg(long)]
    store_id: Option<u16>,

    /// Output HTML path. Overrides PRICEWATCH_OUTPUT_PATH.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = pricewatch_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let args = Args::parse();
    let date = run::resolve_date(args.date.as_deref())?;
    let store_id = args.store_id.unwrap_or(config.store_id);
    let output = args.output.clone().unwrap_or_else(|| config.output_path.clone());

    run::run(&config, store_id, date, &output).await
}
