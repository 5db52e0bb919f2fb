use anyhow::Context;
use carrot_actions::{
    app::{
        App,
        actix_api::ActixActionApi,
        aggregator::JupiterAggregator,
        init_tracing,
        ledger::RpcLedger,
    },
    config::{
        Config,
        DEFAULT_AGGREGATOR_URL,
    },
};
use clap::Parser;
use url::Url;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Port to serve the actions endpoint on.
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Solana RPC endpoint for balance and blockhash queries.
    #[arg(short, long, default_value = "https://api.mainnet-beta.solana.com")]
    rpc_url: Url,

    /// Public base URL where the thumbnail and farm images are hosted.
    #[arg(short, long)]
    base_url: String,

    /// Swap aggregator base URL.
    #[arg(long, default_value = DEFAULT_AGGREGATOR_URL)]
    aggregator_url: String,

    #[arg(short, long, default_value = "false")]
    tracing: bool,
}

async fn handle_interrupt() {
    let res = tokio::signal::ctrl_c().await;
    match res {
        Ok(_) => {
            tracing::info!("Received interrupt, exiting");
        }
        Err(_) => {
            tracing::warn!("Received interrupt error, exiting anyway");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.tracing {
        init_tracing();
    }

    let config = Config::new(args.base_url, args.aggregator_url)
        .context("building configuration")?;
    let ledger = RpcLedger::new(args.rpc_url.as_str(), config.crt_mint);
    let aggregator = JupiterAggregator::new(config.aggregator_url.clone())
        .context("building aggregator client")?;
    let app = App::new(config, ledger, aggregator);

    let api = ActixActionApi::new(app, Some(args.port)).await?;
    tracing::info!("Starting actions service at {}", api.base_url());

    handle_interrupt().await;
    drop(api);
    Ok(())
}
