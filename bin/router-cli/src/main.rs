mod settings;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, U256};
use router_adapters::UniswapV2Source;
use router_core::domain::unix_now;
use router_core::math::apply_slippage_bps;
use router_core::{
    ChainId, LiquiditySource, Route, Router, SourceRegistry, SwapRequest, SwapRouter, Token,
};
use serde_json::json;
use settings::{AppConfig, NetworkConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Best-price swap routing across UniswapV2-style DEXes")]
struct Cli {
    /// Path to the router configuration file
    #[arg(long, global = true, default_value = "router.toml")]
    config: String,

    /// Network profile (overrides `network` in the configuration)
    #[arg(long, global = true)]
    network: Option<String>,

    /// Seconds from now until the request expires
    #[arg(long, global = true, default_value_t = 300)]
    deadline_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the best route without sending a transaction
    Quote {
        #[arg(long, value_parser = parse_address)]
        token_in: Address,

        #[arg(long, value_parser = parse_address)]
        token_out: Address,

        /// Exact input amount in base units
        #[arg(long, value_parser = parse_amount)]
        amount_in: U256,

        /// Tolerance used for the suggested minimum output
        #[arg(long, default_value_t = 50)]
        slippage_bps: u32,
    },

    /// Route and execute an exact-input swap
    Swap {
        #[arg(long, value_parser = parse_address)]
        token_in: Address,

        #[arg(long, value_parser = parse_address)]
        token_out: Address,

        /// Exact input amount in base units
        #[arg(long, value_parser = parse_amount)]
        amount_in: U256,

        /// Minimum acceptable output in base units
        #[arg(long, value_parser = parse_amount)]
        min_out: U256,
    },
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.parse::<Address>().map_err(|e| format!("invalid address {s}: {e}"))
}

// `U256::from_str` reads hex, amounts on the command line are decimal
fn parse_amount(s: &str) -> Result<U256, String> {
    U256::from_dec_str(s).map_err(|e| format!("invalid amount {s}: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cfg = AppConfig::load(&cli.config)?;
    let (network_name, network) = cfg.network(cli.network.as_deref())?;

    let provider = connect(network)?;
    let chain_id = provider
        .get_chainid()
        .await
        .with_context(|| format!("cannot reach {}", network.url))?
        .as_u64();
    if let Some(expected) = network.chain_id {
        if expected != chain_id {
            bail!("network {network_name} expects chain {expected}, node reports {chain_id}");
        }
    }

    let chain = ChainId::from_u64(chain_id);
    info!(
        "Connected to {} ({}, chain {}, wrapped native {})",
        network_name,
        chain.map_or("unknown", |c| c.name()),
        chain_id,
        chain.map_or("?", |c| c.wrapped_native_symbol())
    );

    // Poll pending transactions once per block
    let provider = match chain {
        Some(chain) => provider.interval(Duration::from_secs(chain.block_time())),
        None => provider,
    };

    let deadline = unix_now() + cli.deadline_secs;

    match cli.command {
        Command::Quote {
            token_in,
            token_out,
            amount_in,
            slippage_bps,
        } => {
            let router = build_router(&cfg, network, Arc::new(provider), Address::zero())?;
            let request = SwapRequest::new(
                Token::new(token_in),
                Token::new(token_out),
                amount_in,
                U256::zero(),
                deadline,
            );

            let route = router.find_best_route(request).await?;
            let mut output = route_json(&route);
            output["suggested_min_out"] =
                json!(apply_slippage_bps(route.amount_out(), slippage_bps).to_string());
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Swap {
            token_in,
            token_out,
            amount_in,
            min_out,
        } => {
            let key = cfg
                .private_key
                .as_deref()
                .context("ROUTER_PRIVATE_KEY is required to swap")?;
            let wallet = key
                .parse::<LocalWallet>()
                .context("invalid private key")?
                .with_chain_id(chain_id);
            let recipient = wallet.address();
            let client = Arc::new(SignerMiddleware::new(provider, wallet));

            let router = build_router(&cfg, network, client, recipient)?;
            let request = SwapRequest::new(
                Token::new(token_in),
                Token::new(token_out),
                amount_in,
                min_out,
                deadline,
            );

            let route = router.find_best_route(request).await?;
            info!(
                "Executing via {} on {}: expecting {}",
                route.source().display_name,
                route.path(),
                route.amount_out()
            );

            let receipt = router.execute(route).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
    }

    Ok(())
}

fn connect(network: &NetworkConfig) -> Result<Provider<Http>> {
    let url = reqwest::Url::parse(&network.url)
        .with_context(|| format!("invalid RPC url: {}", network.url))?;

    let mut client = reqwest::Client::builder();
    if let Some(ms) = network.timeout_ms {
        client = client.timeout(Duration::from_millis(ms));
    }
    let client = client.build().context("failed to build HTTP client")?;

    Ok(Provider::new(Http::new_with_client(url, client)))
}

fn build_router<M: Middleware + 'static>(
    cfg: &AppConfig,
    network: &NetworkConfig,
    client: Arc<M>,
    recipient: Address,
) -> Result<Router> {
    let gas_price = network.gas_price.map(U256::from);

    let registry = SourceRegistry::from_config(&cfg.registry, |entry| {
        let source = UniswapV2Source::new(entry.router, client.clone(), recipient)
            .with_gas_price(gas_price);
        Arc::new(source) as Arc<dyn LiquiditySource>
    })?;

    Ok(Router::new(Arc::new(registry), cfg.routing.clone()))
}

fn route_json(route: &Route) -> serde_json::Value {
    json!({
        "source": route.source().id,
        "source_name": route.source().display_name,
        "path": route.path().addresses(),
        "amount_in": route.amount_in().to_string(),
        "amount_out": route.amount_out().to_string(),
        "estimated_gas": route.estimated_cost(),
        "degraded": route
            .degradations()
            .iter()
            .map(|d| json!({
                "source": d.source_id,
                "path": d.path.addresses(),
                "failure": d.failure,
            }))
            .collect::<Vec<_>>(),
    })
}
