// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/runner.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file runs the DUCO-S1 search benchmark: a number of worst-case jobs at
// one difficulty are solved with the configured worker count and the
// achieved rates are summarised.

use crate::Result;
use crate::benchmark::jobs::create_benchmark_job;
use crate::core::{DigestSearch, MinerError};
use crate::utils::format::FormatUtils;
use log::{debug, info};
use std::time::{Duration, Instant};

const LOG_TARGET: &str = "duco::miner::benchmark";

/// Configuration for benchmark execution
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub thread_count: usize,
    pub difficulty: u64,
    pub rounds: u32,
}

/// Benchmark results for performance testing
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub total_hashes: u64,
    pub duration: Duration,
    /// Average hashrate (H/s)
    pub hashrate: f64,
    /// Best single-round hashrate (H/s)
    pub peak_hashrate: f64,
    pub rounds: u32,
    pub thread_count: usize,
}

impl BenchmarkResult {
    /// Format hashrate for display
    pub fn format_hashrate(&self) -> String {
        FormatUtils::format_hashrate(self.hashrate)
    }
}

/// Main benchmark runner
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    pub fn new(threads: usize, difficulty: u64, rounds: u32) -> Self {
        let thread_count = if threads == 0 { num_cpus::get() } else { threads };
        Self {
            config: BenchmarkConfig {
                thread_count,
                difficulty: difficulty.max(1),
                rounds: rounds.max(1),
            },
        }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<BenchmarkResult> {
        info!(target: LOG_TARGET,
            "🧪 Starting benchmark with {} thread(s), difficulty {}, {} round(s)",
            self.config.thread_count, self.config.difficulty, self.config.rounds
        );

        let engine = DigestSearch::new(self.config.thread_count);
        let mut total_hashes = 0u64;
        let mut peak_hashrate = 0.0f64;
        let mut busy = Duration::ZERO;

        for round in 1..=self.config.rounds {
            let bench = create_benchmark_job(self.config.difficulty);
            debug!(target: LOG_TARGET, "Round {}: {}", round, bench.description);

            let job = bench.job.clone();
            let started = Instant::now();
            let solution = tokio::task::spawn_blocking(move || engine.solve(&job))
                .await
                .map_err(|e| MinerError::Search(e.to_string()))??;
            busy += started.elapsed();

            if solution.nonce != bench.expected_nonce {
                return Err(MinerError::Search(format!(
                    "benchmark round {} found nonce {}, expected {}",
                    round, solution.nonce, bench.expected_nonce
                )));
            }

            total_hashes += solution.nonce + 1;
            peak_hashrate = peak_hashrate.max(solution.hashrate);
            info!(target: LOG_TARGET, "⏱️ Round {}/{}: {}", round, self.config.rounds,
                FormatUtils::format_hashrate(solution.hashrate));
        }

        let secs = busy.as_secs_f64();
        let hashrate = if secs > 0.0 { total_hashes as f64 / secs } else { 0.0 };

        Ok(BenchmarkResult {
            total_hashes,
            duration: busy,
            hashrate,
            peak_hashrate,
            rounds: self.config.rounds,
            thread_count: self.config.thread_count,
        })
    }
}


// Changelog:
// - v2.0.0 (2026-10-17): Rewritten for DUCO-S1.
//   - Solves worst-case jobs on a blocking worker and checks each answer.
//   - Reports average and peak rate instead of share counts.
// - v1.0.24: SHA3x/SHA-256 thread benchmark with profiler.
