//! Dual-Class Arbitrage - Main Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dual_class_arbitrage::api::{self, AppState};
use dual_class_arbitrage::config::{Config, SecretSource};
use dual_class_arbitrage::live::LiveResultsClient;
use dual_class_arbitrage::market_data::{PriceProvider, StaticPriceFeed, YahooFinanceClient};
use dual_class_arbitrage::secrets;
use dual_class_arbitrage::strategy::{PlanError, SecurityRegistry, TradePlanner};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Dual-Class Arbitrage CLI
#[derive(Parser)]
#[command(name = "dual-class-arbitrage")]
#[command(version, about = "Dual-class share pairs trading API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Override the configured listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Plan a trade using live prices and print it as JSON
    Strategy {
        /// Company name, e.g. "Alphabet"
        #[arg(short, long)]
        security: String,

        /// Total capital to deploy across both legs
        #[arg(short, long)]
        amount: u64,
    },

    /// Plan a trade from prices given on the command line
    Allocate {
        /// Company name, e.g. "Berkshire Hathaway"
        #[arg(short, long)]
        security: String,

        /// Price of the first share class
        #[arg(long)]
        price_a: Decimal,

        /// Price of the second share class
        #[arg(long)]
        price_b: Decimal,

        /// Total capital to deploy across both legs
        #[arg(short, long)]
        amount: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    let mut config = Config::load()?;
    config.validate()?;

    match cli.command {
        Some(Commands::Strategy { security, amount }) => {
            let prices: Arc<dyn PriceProvider> =
                Arc::new(YahooFinanceClient::new(&config.market_data)?);
            run_plan(prices, &security, amount).await
        }
        Some(Commands::Allocate {
            security,
            price_a,
            price_b,
            amount,
        }) => {
            let pair = SecurityRegistry::builtin()
                .resolve_tickers(&security)
                .with_context(|| known_securities_hint())?;
            let feed = StaticPriceFeed::from_prices([
                (pair.class_a, price_a),
                (pair.class_b, price_b),
            ]);
            run_plan(Arc::new(feed), &security, amount).await
        }
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        None => serve(config).await,
    }
}

/// Run the HTTP API until shutdown.
async fn serve(config: Config) -> Result<()> {
    info!(
        "Dual-Class Arbitrage API v{} starting",
        env!("CARGO_PKG_VERSION")
    );
    log_config(&config);

    let prices: Arc<dyn PriceProvider> = Arc::new(YahooFinanceClient::new(&config.market_data)?);
    let secret_provider = secrets::from_config(&config.secrets);
    let live = LiveResultsClient::new(&config.live_results, secret_provider)?;

    let state = AppState {
        planner: Arc::new(TradePlanner::new(
            SecurityRegistry::builtin(),
            prices.clone(),
        )),
        prices,
        live: Arc::new(live),
    };
    let app = api::create_router(state, &config.cors)?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn run_plan(prices: Arc<dyn PriceProvider>, security: &str, amount: u64) -> Result<()> {
    let planner = TradePlanner::new(SecurityRegistry::builtin(), prices);
    let plan = match planner.plan(security, amount).await {
        Ok(plan) => plan,
        Err(e @ PlanError::UnknownSecurity(_)) => {
            return Err(anyhow::Error::new(e).context(known_securities_hint()));
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn known_securities_hint() -> String {
    let names: Vec<&str> = SecurityRegistry::builtin().names().collect();
    format!("Known securities: {}", names.join(", "))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize logging to stdout and an hourly rolling file.
fn init_logging() -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    std::fs::create_dir_all("logs")?;

    let file_appender = tracing_appender::rolling::hourly("logs", "dual-class-arbitrage.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer alive for the program duration
    Box::leak(Box::new(guard));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("dual_class_arbitrage=debug".parse()?)
                .add_directive(Level::INFO.into()),
        )
        .with_writer(std::io::stdout.and(file_writer))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .init();

    Ok(())
}

/// Log configuration on startup.
fn log_config(config: &Config) {
    info!("Configuration:");
    info!("   Listen: {}", config.bind_addr());
    info!("   CORS origins: {}", config.cors.allowed_origins.join(", "));
    info!(
        "   Market data: {} (timeout {}s, fallback {})",
        config.market_data.base_url,
        config.market_data.timeout_secs,
        config.market_data.fallback_period
    );
    info!(
        "   Live results: {} (timeout {}s)",
        config.live_results.base_url, config.live_results.timeout_secs
    );
    match config.secrets.source {
        SecretSource::Env => info!("   Secrets: environment"),
        SecretSource::Directory => {
            info!("   Secrets: directory {}", config.secrets.directory.display())
        }
    }
    info!("   Securities: {}", SecurityRegistry::builtin().len());
}
