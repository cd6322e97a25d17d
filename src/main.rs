// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/main.rs
// Version: 3.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Entry point: mining mode runs one or more pool sessions, benchmark mode
// measures the search engine offline.

use anyhow::Context;
use clap::Parser;
use duco_miner::{
    benchmark::BenchmarkRunner,
    core::{Endpoint, types::Args},
    miner::{MinerStats, PoolMiner},
    pool::{EndpointResolver, HttpPoolResolver, StaticResolver},
    utils::logging::{init_logging, parse_level},
};
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const LOG_TARGET: &str = "duco::miner::main";
const STATS_INTERVAL: Duration = Duration::from_secs(30);
const BENCHMARK_ROUNDS: u32 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(err) = args.validate() {
        eprintln!("❌ Error: {}", err);
        std::process::exit(1);
    }

    init_logging(parse_level(&args.log_level)?)?;

    if args.benchmark {
        handle_benchmark(&args).await
    } else {
        handle_mining(&args).await
    }
}

async fn handle_benchmark(args: &Args) -> anyhow::Result<()> {
    let runner = BenchmarkRunner::new(args.threads, args.benchmark_difficulty, BENCHMARK_ROUNDS);
    let result = runner.run().await.context("benchmark failed")?;

    info!(target: LOG_TARGET, "📊 Benchmark Complete!");
    info!(target: LOG_TARGET, "🎯 Difficulty tested: {}", args.benchmark_difficulty);
    info!(target: LOG_TARGET, "⏱️ Duration: {:.2}s", result.duration.as_secs_f64());
    info!(target: LOG_TARGET, "⚡ Average hashrate: {}", result.format_hashrate());
    info!(target: LOG_TARGET, "🔥 Peak hashrate: {:.2} kH/s", result.peak_hashrate / 1_000.0);
    info!(target: LOG_TARGET, "📈 Total hashes: {}", result.total_hashes);
    info!(target: LOG_TARGET, "🧵 Threads used: {}", result.thread_count);
    Ok(())
}

async fn handle_mining(args: &Args) -> anyhow::Result<()> {
    info!(target: LOG_TARGET, "🚀 Starting DUCO Miner");
    info!(target: LOG_TARGET, "👤 User: {}", args.username.as_deref().unwrap_or_default());
    info!(target: LOG_TARGET, "📍 Pool: {}", args.pool.as_deref().unwrap_or(args.pool_api.as_str()));
    info!(target: LOG_TARGET, "🧵 Sessions: {}, search threads per session: {}", args.sessions,
        if args.threads == 0 { "auto".to_string() } else { args.threads.to_string() });

    let stats = Arc::new(MinerStats::new());
    start_stats_printer(Arc::clone(&stats));

    let fixed_pool = match args.pool {
        Some(ref pool) => Some(pool.parse::<Endpoint>()?),
        None => None,
    };

    let mut handles = Vec::with_capacity(args.sessions);
    for index in 0..args.sessions {
        let handle = match fixed_pool {
            Some(ref endpoint) => spawn_session(args, index, StaticResolver::new(endpoint.clone()), &stats),
            None => spawn_session(args, index, HttpPoolResolver::new(args.pool_api.clone())?, &stats),
        };
        handles.push(handle);
    }

    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await.with_context(|| format!("session-{} panicked", index))? {
            Ok(cycles) => info!(target: LOG_TARGET, "🏁 session-{} finished after {} cycles", index, cycles),
            Err(e) => {
                error!(target: LOG_TARGET, "❌ session-{} stopped: {}", index, e);
                return Err(e).with_context(|| format!("session-{} failed", index));
            }
        }
    }

    stats.display_dashboard();
    Ok(())
}

fn spawn_session<R>(
    args: &Args,
    index: usize,
    resolver: R,
    stats: &Arc<MinerStats>,
) -> JoinHandle<duco_miner::Result<u64>>
where
    R: EndpointResolver + 'static,
{
    let miner = PoolMiner::new(args.session_config(index), resolver)
        .with_stats(Arc::clone(stats))
        .with_label(format!("session-{}", index));
    tokio::spawn(async move { miner.run().await })
}

fn start_stats_printer(stats: Arc<MinerStats>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATS_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            stats.display_dashboard();
        }
    });
}
