use alloy::primitives::Address;
use alloy::providers::ProviderBuilder;
use anyhow::Context;
use poolcheck::banner::WarningBanner;
use poolcheck::config::chains;
use poolcheck::error::ConfigError;
use poolcheck::pool_type::prize_pool_type;
use poolcheck::reader::HttpChainReader;
use poolcheck::resolver::VersionResolver;
use std::env;

struct CliConfig {
    rpc_url: String,
    chain_id: u64,
    prize_pool: Address,
}

fn validate_http_url(name: &str, raw: &str) -> Result<(), ConfigError> {
    let parsed = raw.parse::<reqwest::Url>().map_err(|e| {
        ConfigError::InvalidConfig(format!("{name} must be a valid URL, got `{raw}`: {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidConfig(format!(
            "{name} must use http(s) scheme, got `{other}`"
        ))),
    }
}

impl CliConfig {
    /// Positional args override env: `poolcheck [chain-id] [pool-address]`.
    fn load() -> Result<Self, ConfigError> {
        let rpc_url = env::var("ETH_RPC_URL")
            .map_err(|_| ConfigError::MissingConfig("ETH_RPC_URL".to_string()))?;
        validate_http_url("ETH_RPC_URL", &rpc_url)?;

        let args: Vec<String> = env::args().skip(1).collect();

        let chain_id_raw = args
            .first()
            .cloned()
            .or_else(|| env::var("CHAIN_ID").ok())
            .ok_or_else(|| ConfigError::MissingConfig("CHAIN_ID".to_string()))?;
        let chain_id: u64 = chain_id_raw.trim().parse().map_err(|_| {
            ConfigError::InvalidConfig(format!("CHAIN_ID `{chain_id_raw}` is not a chain id"))
        })?;

        let pool_raw = args
            .get(1)
            .cloned()
            .or_else(|| env::var("PRIZE_POOL_ADDRESS").ok())
            .ok_or_else(|| ConfigError::MissingConfig("PRIZE_POOL_ADDRESS".to_string()))?;
        let prize_pool: Address = pool_raw.trim().parse().map_err(|_| {
            ConfigError::InvalidConfig(format!("PRIZE_POOL_ADDRESS `{pool_raw}` is not an address"))
        })?;

        Ok(Self {
            rpc_url,
            chain_id,
            prize_pool,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to `info` when `RUST_LOG` is unset or invalid to avoid silent startup.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cfg = CliConfig::load()?;
    tracing::info!(
        "[STARTUP] checking pool {} on {} (chain {})",
        cfg.prize_pool,
        chains::chain_name(cfg.chain_id),
        cfg.chain_id
    );

    let provider = ProviderBuilder::new().on_http(
        cfg.rpc_url
            .parse()
            .with_context(|| format!("parsing ETH_RPC_URL `{}`", cfg.rpc_url))?,
    );
    let reader = HttpChainReader::new(provider, cfg.chain_id);
    let resolver = VersionResolver::bundled();

    let resolution = resolver
        .resolve(&reader, cfg.chain_id, cfg.prize_pool)
        .await
        .context("resolution pass failed")?;

    match &resolution.versions {
        None => {
            println!(
                "connection is not on chain {}; nothing resolved (will self-correct once the network settles)",
                cfg.chain_id
            );
        }
        Some(versions) => {
            println!("prize pool:     {}", versions.prize_pool);
            println!("prize strategy: {}", versions.prize_strategy);
            match prize_pool_type(Some(versions)) {
                Some(pool_type) => println!("pool type:      {pool_type}"),
                None => println!("pool type:      unknown"),
            }
        }
    }

    if let Some(advisory) = &resolution.advisory {
        if let Some(banner) = WarningBanner::from_advisory(advisory, cfg.prize_pool) {
            println!();
            print!("{}", banner.render_text());
        }
    }

    Ok(())
}
