// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/jobs.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file builds synthetic DUCO-S1 jobs for testing search performance
// without requiring pool connectivity. The matching nonce of each job sits at
// the top of its range, so every benchmark round scans the whole range.

use crate::core::ducos1::ducos1_hex;
use crate::core::types::{Job, max_nonce};

/// Benchmark-specific job configuration
#[derive(Debug, Clone)]
pub struct BenchmarkJob {
    pub job: Job,

    /// Nonce the search must return
    pub expected_nonce: u64,

    /// Description of this benchmark job
    pub description: String,
}

/// Worst-case job for a difficulty: the answer is the last nonce in range
pub fn create_benchmark_job(difficulty: u64) -> BenchmarkJob {
    let last_block_hash = hex::encode(rand::random::<[u8; 20]>());
    let expected_nonce = max_nonce(difficulty);
    let expected_digest = ducos1_hex(&last_block_hash, expected_nonce);

    BenchmarkJob {
        job: Job {
            last_block_hash,
            expected_digest,
            difficulty,
        },
        expected_nonce,
        description: format!("difficulty {} ({} nonces)", difficulty, expected_nonce + 1),
    }
}


// Changelog:
// - v2.0.0 (2026-10-17): Replaced static SHA3x/SHA-256 headers with random
//   DUCO-S1 jobs whose answer is the last nonce in range.
// - v1.0.14: Static benchmark jobs for SHA3X and SHA-256.
