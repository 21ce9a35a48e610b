use anyhow::Context as _;
use chrono::Local;
use clap::{Parser, Subcommand};
use scry::services::{DriftForecaster, PredictionPipeline, SqliteFeatureStore, Synchronizer};
use scry::sources::YahooFinanceClient;
use scry::types::ForecastRequest;
use scry::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scry", about = "Equity feature pipeline and trade signals")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synchronize the feature table for the configured tickers.
    Sync {
        /// Clear the full feature store before synchronizing.
        #[arg(long)]
        reset: bool,
    },
    /// Run the prediction pipeline for one symbol and print the response.
    Predict {
        /// Ticker symbol, e.g. AAPL.
        #[arg(long)]
        symbol: String,
        /// Current market price of the symbol.
        #[arg(long)]
        price: f64,
        /// Requested horizon in days; snapped to the supported set.
        #[arg(long)]
        days: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scry=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let store = SqliteFeatureStore::new(&config.database_path)
        .with_context(|| format!("opening feature store at {}", config.database_path))?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Sync { reset } => {
            let source = YahooFinanceClient::new();
            let synchronizer = Synchronizer::new(&source, &store, &config);

            if reset {
                info!("Resetting feature store before sync");
                synchronizer.reset()?;
            }

            let report = synchronizer.sync_all(today)?;
            println!(
                "Synced {} tickers ({} rows), {} skipped",
                report.synced.len(),
                report.rows_written(),
                report.skipped.len()
            );
            for (ticker, reason) in &report.skipped {
                println!("  skipped {ticker}: {reason}");
            }
        }
        Command::Predict {
            symbol,
            price,
            days,
        } => {
            let forecaster = DriftForecaster;
            let pipeline = PredictionPipeline::new(&store, &forecaster, &config);
            let request = ForecastRequest {
                symbol,
                current_price: price,
                prediction_days: days,
            };

            let response = pipeline
                .predict(&request, today)
                .with_context(|| "prediction failed".to_string())?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
