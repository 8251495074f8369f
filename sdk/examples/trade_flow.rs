//! Quote and optionally execute a buy against a launched token

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use bonding_curve_sdk::{parse_identifier, BondingCurveClient, EngineConfig};
use clap::Parser;
use solana_sdk::signature::read_keypair_file;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "trade_flow")]
#[command(about = "Quote a buy on a launchpad pool and optionally execute it", long_about = None)]
struct Args {
    /// Engine configuration (TOML)
    #[arg(long, default_value = "launchpad.toml")]
    config: PathBuf,

    /// Payer keypair file
    #[arg(long)]
    keypair: PathBuf,

    /// Token mint to trade
    #[arg(long)]
    mint: String,

    /// Gross spend in lamports, fee included
    #[arg(long)]
    lamports: u64,

    /// Submit the buy after quoting
    #[arg(long)]
    execute: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bonding_curve_sdk=debug,trade_flow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = EngineConfig::from_file(&args.config).context("loading engine config")?;
    let payer = read_keypair_file(&args.keypair).map_err(|e| anyhow!("reading keypair: {}", e))?;
    let mint = parse_identifier(&args.mint)?;

    info!(rpc_url = %config.rpc_url, curve = config.curve.name(), "Connecting");
    let client = BondingCurveClient::connect(config, payer)?;

    let Some(pool) = client.get_pool(&mint).await? else {
        info!(%mint, "No pool exists for this mint");
        return Ok(());
    };
    info!(
        sold = pool.tokens_sold()?,
        progress_bps = pool.curve_state().progress_bps()?,
        spot_price = client.config().curve.spot_price(&pool.curve_state())?,
        "Pool state"
    );

    if let Some(quote) = client.quote_buy(&mint, args.lamports).await? {
        info!(
            gross = quote.gross_amount,
            fee = quote.platform_fee,
            net = quote.net_amount,
            tokens = quote.tokens_expected,
            "Buy quote"
        );
    }

    if args.execute {
        let signature = client.buy(&mint, args.lamports).await?;
        info!(%signature, "Buy settled");
    }

    Ok(())
}
