//! fxsignals - M5 forex signal generator
//!
//! Generates one-shot signals from the command line, or runs the auto-mode
//! scheduler that produces a signal for every active pair on each 5-minute
//! boundary.
//!
//! # Usage
//! ```sh
//! cargo run -- generate --pair EUR/USD
//! AUTO_MODE=true ACTIVE_PAIRS="EUR/USD,USD/JPY" cargo run -- serve
//! cargo run -- status
//! ```
//!
//! # Environment Variables
//! - `FINNHUB_API_KEY` - Candle provider key (synthetic history when unset)
//! - `PROVIDER_VENUES` - Comma-separated venue prefixes (default: FX_IDC,FOREXCOM,OANDA,SAXO,ICM)
//! - `SYNTHETIC_FALLBACK` - Use synthetic history when every venue fails (default: true)
//! - `AI_INTEGRATIONS_OPENAI_API_KEY` - Enables the advisory opinion
//! - `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` - Notification target for auto mode
//! - `AUTO_MODE`, `TELEGRAM_ENABLED`, `ACTIVE_PAIRS`, `TICK_SECS` - Scheduler settings
//! - `SIGNAL_POLICY_FILE` - TOML file overriding weights and thresholds

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use fxsignals::application::bootstrap::ServicesBootstrap;
use fxsignals::config::Config;
use fxsignals::domain::market::MarketStatus;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "M5 forex signal generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one signal and print it as JSON
    Generate {
        /// Currency pair, e.g. EUR/USD
        #[arg(short, long, default_value = "EUR/USD")]
        pair: String,

        /// Mark the signal as manually requested
        #[arg(long)]
        manual: bool,

        /// Also print the notification text
        #[arg(long)]
        text: bool,
    },
    /// Run the auto-mode scheduler until Ctrl-C
    Serve,
    /// Print the current market session
    Status,
    /// Print the effective signal policy as JSON
    Policy,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Generate { pair, manual, text } => {
            let services = ServicesBootstrap::init(&config)?;
            let signal = services.generator.generate(&pair, manual).await;
            println!(
                "{}",
                serde_json::to_string_pretty(&signal).context("Failed to serialize signal")?
            );
            if text {
                println!("\n{}", signal.notification_text());
            }
        }
        Commands::Serve => {
            info!("fxsignals {} starting...", env!("CARGO_PKG_VERSION"));
            info!(
                "Configuration loaded: auto_mode={}, telegram_enabled={}, pairs={:?}",
                config.scheduler.auto_mode,
                config.scheduler.telegram_enabled,
                config
                    .scheduler
                    .active_pairs
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
            );

            let services = ServicesBootstrap::init(&config)?;
            let scheduler = services.scheduler(&config);

            scheduler
                .run_until(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!("Failed to listen for Ctrl-C: {}", e);
                    }
                })
                .await;

            info!("Shutdown signal received, exiting.");
        }
        Commands::Status => {
            let status = MarketStatus::at(Utc::now());
            println!(
                "{}",
                serde_json::to_string_pretty(&status).context("Failed to serialize status")?
            );
        }
        Commands::Policy => {
            println!(
                "{}",
                serde_json::to_string_pretty(&config.policy)
                    .context("Failed to serialize policy")?
            );
        }
    }

    Ok(())
}
