//! Near-miss address guesser
//!
//! Run with:
//! ```bash
//! cargo run --release -p nearmiss-guesser --bin nearmiss -- --strategy trie --timeout 60
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use nearmiss_core::{AddressIndex, Strategy, TargetList};
use nearmiss_guesser::{metrics, Console, KeypairSource, SearchConfig, Searcher};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nearmiss")]
#[command(about = "Guess Ethereum keypairs and score them against known addresses")]
struct Args {
    /// Target addresses; override the target file
    #[arg(value_name = "ETH_ADDRESS")]
    eth_address: Vec<String>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Index strategy: trie, nearest or bisect
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Target file (JSON, or one address per line)
    #[arg(long)]
    addresses: Option<PathBuf>,

    /// Stop after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Stop after this many guesses
    #[arg(long)]
    max_guesses: Option<u64>,

    /// Worker threads (default: available cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Progress lines per second
    #[arg(long)]
    fps: Option<u32>,

    /// Prometheus metrics port
    #[arg(long)]
    port: Option<u16>,

    /// Disable the metrics endpoint
    #[arg(long, conflicts_with = "port")]
    no_port: bool,

    /// Only print the summary
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn resolve(&self) -> anyhow::Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SearchConfig::default(),
        };

        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(path) = &self.addresses {
            config.addresses = Some(path.clone());
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = Some(secs);
        }
        if let Some(max) = self.max_guesses {
            config.max_guesses = Some(max);
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(port) = self.port {
            config.metrics_port = Some(port);
        }
        if self.no_port {
            config.metrics_port = None;
        }
        config.quiet |= self.quiet;
        Ok(config)
    }

    fn targets(&self, config: &SearchConfig) -> anyhow::Result<TargetList> {
        if !self.eth_address.is_empty() {
            return TargetList::from_strs(&self.eth_address).context("invalid target address");
        }
        match &config.addresses {
            Some(path) => TargetList::load(path)
                .with_context(|| format!("failed to load targets from {}", path.display())),
            None => Ok(TargetList::known()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nearmiss=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.resolve()?;
    let targets = args.targets(&config)?;
    let distinct = targets.distinct_count();

    let start = Instant::now();
    let index = config.strategy.build(targets).context("failed to build index")?;
    let load_time = start.elapsed();

    let bytes = index.memory_footprint();
    println!(
        "Loaded {} targets into {} in {:.3}s ({} bytes, {:.1} bytes/address)",
        distinct,
        config.strategy.structure_name(),
        load_time.as_secs_f64(),
        bytes,
        bytes as f64 / distinct.max(1) as f64
    );

    if let Some(port) = config.metrics_port {
        metrics::install_exporter(port).context("failed to start metrics exporter")?;
    }

    let summary = Searcher::new(&index, &config).run(|_| KeypairSource::from_entropy());
    Console::new(config.quiet).summary(&summary);
    Ok(())
}
