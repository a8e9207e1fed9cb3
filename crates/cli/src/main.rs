//! Operator toolkit for Golos-style Graphene chains.
//!
//! One binary with subcommands for payout estimation, emission simulation,
//! bandwidth and voting-power checks, witness feed surveys, debt analytics
//! and the price feed daemon.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use graphene_client::{
    survey, ChainDataClient, HttpDexClient, HttpTickerClient, JsonRpcChainClient,
};
use graphene_economics::{
    bandwidth, debt, inflation, reward, voting, BandwidthKind, ChainParams, CurveKind,
    EmissionPercents,
};
use graphene_feed::{FeedConfig, FeedPublisher, PriceSource};
use graphene_market::CbrRates;
use graphene_types::Amount;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gops")]
#[command(about = "Graphene chain operator toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Chain node RPC endpoint
    #[arg(long, alias = "rpc", default_value = "https://api.golos.id", global = true)]
    node: String,

    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate post payout from raw rshares
    Payout(PayoutCommand),
    /// Simulate emission over a block range
    Inflation(InflationCommand),
    /// Estimate account bandwidth usage
    Bandwidth(BandwidthCommand),
    /// Survey published witness price feeds
    Feeds,
    /// Debt asset analytics
    Debt(DebtCommand),
    /// Current voting power of an account
    VotingPower {
        /// Account name
        account: String,
    },
    /// Run the price feed daemon
    FeedDaemon(FeedDaemonCommand),
}

#[derive(Args)]
struct PayoutCommand {
    /// Net rshares of the post
    #[arg(long, allow_hyphen_values = true)]
    rshares: i64,
    /// Reward curve: linear or quadratic
    #[arg(long, default_value = "linear")]
    curve: String,
}

#[derive(Args)]
struct InflationCommand {
    /// Days to simulate from the current head block
    #[arg(long, default_value_t = 365)]
    days: u64,
    /// Per-block accounting with witness slot weighting
    #[arg(long)]
    precise: bool,
}

#[derive(Args)]
struct BandwidthCommand {
    /// Account name
    account: String,
    /// Bandwidth pool: market or forum
    #[arg(long, default_value = "market")]
    kind: String,
}

#[derive(Args)]
struct DebtCommand {
    /// Feed price for the conversion projection; defaults to the current
    /// conversion median
    #[arg(long)]
    price: Option<f64>,
    /// Conversion step in debt units
    #[arg(long, default_value_t = 10_000.0)]
    step: f64,
}

#[derive(Args)]
struct FeedDaemonCommand {
    /// YAML configuration file
    #[arg(long, short, value_name = "PATH")]
    config: PathBuf,
    /// Run one cycle and exit
    #[arg(long)]
    once: bool,
    /// Compute and decide without broadcasting
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Payout(cmd) => handle_payout(cmd, &cli.node).await,
        Commands::Inflation(cmd) => handle_inflation(cmd, &cli.node).await,
        Commands::Bandwidth(cmd) => handle_bandwidth(cmd, &cli.node).await,
        Commands::Feeds => handle_feeds(&cli.node).await,
        Commands::Debt(cmd) => handle_debt(cmd, &cli.node).await,
        Commands::VotingPower { account } => handle_voting_power(&account, &cli.node).await,
        Commands::FeedDaemon(cmd) => handle_feed_daemon(cmd).await,
    }
}

fn chain_client(node: &str) -> Result<JsonRpcChainClient> {
    Ok(JsonRpcChainClient::new(node)?)
}

async fn handle_payout(cmd: PayoutCommand, node: &str) -> Result<()> {
    let curve = match cmd.curve.as_str() {
        "linear" => CurveKind::Linear,
        "quadratic" => CurveKind::Quadratic,
        other => anyhow::bail!("unknown reward curve: {other}"),
    };

    let params = ChainParams::golos();
    let client = chain_client(node)?;
    let props = client.get_dynamic_global_properties().await?;
    let history = client.get_feed_history().await?;
    let median_price = history.current_median_history.price();

    let payout = reward::calc_payout(cmd.rshares, curve, &props, &params)?;
    println!("payout: {payout:.3} {}", params.native_symbol);

    if median_price > 0.0 {
        let pending = Amount::new(payout * median_price, params.debt_symbol.clone());
        let split = reward::estimate_author_payout(&pending, &props, median_price, &params)?;
        println!("author power:  {:.3} {}", split.power, params.native_symbol);
        println!("author debt:   {:.3} {}", split.debt, params.debt_symbol);
        println!("author liquid: {:.3} {}", split.liquid, params.native_symbol);
    } else {
        println!("no conversion median published, skipping author split");
    }
    Ok(())
}

async fn handle_inflation(cmd: InflationCommand, node: &str) -> Result<()> {
    let params = ChainParams::golos();
    let client = chain_client(node)?;
    let props = client.get_dynamic_global_properties().await?;
    let median = client.get_chain_median_props().await?;

    let percents = EmissionPercents {
        worker: median.worker_reward_percent,
        witness: median.witness_reward_percent,
        vesting: median.vesting_reward_percent,
    };

    let start = props.head_block_number;
    let stop = start + cmd.days * params.blocks_per_day() as u64;
    let emission = inflation::simulate(
        start,
        stop,
        props.virtual_supply.amount,
        percents,
        cmd.precise,
        &params,
    );

    println!("blocks:    {start}..{stop}");
    println!("worker:    {:.3} {}", emission.worker, params.native_symbol);
    println!("witness:   {:.3} {}", emission.witness, params.native_symbol);
    if cmd.precise {
        println!("  top19:     {:.3} {}", emission.top19, params.native_symbol);
        println!("  timeshare: {:.3} {}", emission.timeshare, params.native_symbol);
    }
    println!("vesting:   {:.3} {}", emission.vesting, params.native_symbol);
    println!("content:   {:.3} {}", emission.content, params.native_symbol);
    println!("total:     {:.3} {}", emission.total, params.native_symbol);
    println!(
        "inflation rate after range: {:.2}%",
        emission.current_inflation_rate * 100.0
    );
    println!(
        "virtual supply after range: {:.3} {}",
        emission.virtual_supply, params.native_symbol
    );
    Ok(())
}

async fn handle_bandwidth(cmd: BandwidthCommand, node: &str) -> Result<()> {
    let kind = match cmd.kind.as_str() {
        "market" => BandwidthKind::Market,
        "forum" => BandwidthKind::Forum,
        other => anyhow::bail!("unsupported bandwidth kind: {other}"),
    };

    let params = ChainParams::golos();
    let client = chain_client(node)?;
    let props = client.get_dynamic_global_properties().await?;
    let account = client.get_account(&cmd.account).await?;

    let snapshot = bandwidth::BandwidthSnapshot::from_account(&account, &props, kind)?;
    let usage = bandwidth::estimate(&snapshot, kind, Utc::now(), &params)?;

    println!("account:   {}", cmd.account);
    println!("used:      {:.2} KB", usage.used_kb);
    println!("available: {:.2} KB", usage.avail_kb);
    println!("ratio:     {:.2}%", usage.ratio * 100.0);
    if !usage.has_bandwidth() {
        println!("account is out of bandwidth");
    }
    Ok(())
}

async fn handle_feeds(node: &str) -> Result<()> {
    let client = chain_client(node)?;
    let feeds = survey::witness_feeds(&client).await?;
    if feeds.is_empty() {
        println!("no witness has published a feed");
        return Ok(());
    }

    for feed in &feeds {
        println!("{:<20} {:.3}", feed.owner, feed.price);
    }
    if let Some(median) = survey::estimate_next_median(&feeds) {
        println!("estimated next median: {median:.3}");
    }
    Ok(())
}

async fn handle_debt(cmd: DebtCommand, node: &str) -> Result<()> {
    let params = ChainParams::golos();
    let client = chain_client(node)?;
    let props = client.get_dynamic_global_properties().await?;
    let history = client.get_feed_history().await?;
    let median_price = history.current_median_history.price();

    let feed_price = match cmd.price.or(if median_price > 0.0 {
        Some(median_price)
    } else {
        None
    }) {
        Some(price) => price,
        None => anyhow::bail!("no conversion median published, pass --price"),
    };

    let floor = debt::min_median_price(&props);
    println!("debt supply:      {}", props.current_sbd_supply);
    println!("price floor:      {floor:.3}");
    println!(
        "debt percent:     {:.2}%",
        debt::debt_percent(&props, feed_price)
    );
    println!("print rate:       {:.2}%", props.sbd_print_rate as f64 / 100.0);
    if median_price > 0.0 {
        println!(
            "daily debt print: {:.3} {}",
            debt::daily_debt_emission(&props, median_price),
            params.debt_symbol
        );
    }

    let projection = debt::project_gradual_conversion(&props, feed_price, cmd.step);
    println!(
        "full conversion prints: {:.3} {}",
        projection.new_native_supply, params.native_symbol
    );
    if let (Some(debt_left), Some(printed)) = (
        projection.debt_at_20_percent,
        projection.native_at_20_percent,
    ) {
        println!(
            "debt drops under 20% at {:.3} {} left, {:.3} {} printed",
            debt_left, params.debt_symbol, printed, params.native_symbol
        );
    }
    Ok(())
}

async fn handle_voting_power(account: &str, node: &str) -> Result<()> {
    let params = ChainParams::golos();
    let client = chain_client(node)?;
    let account = client.get_account(account).await?;
    let power = voting::current_voting_power(&account, Utc::now(), &params);
    println!("{}: {power:.2}%", account.name);
    Ok(())
}

async fn handle_feed_daemon(cmd: FeedDaemonCommand) -> Result<()> {
    let raw = std::fs::read_to_string(&cmd.config)
        .with_context(|| format!("failed to read config {}", cmd.config.display()))?;
    let mut config = FeedConfig::from_yaml(&raw)?;
    if cmd.dry_run {
        config.dry_run = true;
    }

    let node = config
        .nodes
        .first()
        .cloned()
        .context("config has no nodes")?;
    let chain = Arc::new(JsonRpcChainClient::new(node)?);

    let dex = match (config.price_source(), &config.node_dex) {
        (PriceSource::Dex, Some(endpoint)) => Some(
            Arc::new(HttpDexClient::new(endpoint.clone())?) as Arc<dyn graphene_market::DexClient>,
        ),
        _ => None,
    };

    let publisher = FeedPublisher::new(
        config,
        chain,
        dex,
        Arc::new(HttpTickerClient::new()?),
        Arc::new(CbrRates::new()?),
    )?;

    if cmd.once {
        let outcome = publisher.run_cycle().await?;
        println!(
            "price: {:.3}, published: {}",
            outcome.price, outcome.published
        );
        return Ok(());
    }

    tokio::select! {
        _ = publisher.run_forever() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
        }
    }
    Ok(())
}
