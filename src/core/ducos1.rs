// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/ducos1.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the DUCO-S1 nonce search, located in the core
// subdirectory of the DUCO miner source tree. A candidate is
// SHA-1(last_block_hash || decimal(nonce)); the first nonce in
// 0..=100 * difficulty whose hex digest equals the expected digest wins.
//
// Tree Location:
// - src/core/ducos1.rs (DUCO-S1 search engine)
// - Depends on: sha1, crossbeam, hex

use crate::core::error::MinerError;
use crate::core::types::{max_nonce, Job, Solution};
use crossbeam::thread;
use log::{debug, trace};
use sha1::{Digest, Sha1};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

const LOG_TARGET: &str = "duco::miner::ducos1";

/// SHA-1 output size
pub const DIGEST_LEN: usize = 20;

/// DUCO-S1 digest of one candidate
pub fn ducos1_hash(base: &str, nonce: u64) -> [u8; DIGEST_LEN] {
    let mut buf = [0u8; 20];
    let mut hasher = Sha1::new_with_prefix(base.as_bytes());
    hasher.update(decimal(nonce, &mut buf));
    hasher.finalize().into()
}

/// Hex form of [`ducos1_hash`], as the pool sends expected digests
pub fn ducos1_hex(base: &str, nonce: u64) -> String {
    hex::encode(ducos1_hash(base, nonce))
}

/// Search `0..=100 * difficulty` sequentially
pub fn search(base_input: &str, target_digest: &str, difficulty: u64) -> Option<Solution> {
    DigestSearch::new(1).search(base_input, target_digest, difficulty)
}

/// Nonce search with an optional split of the range across worker threads
#[derive(Debug, Clone, Copy)]
pub struct DigestSearch {
    workers: usize,
}

impl DigestSearch {
    pub fn new(workers: usize) -> Self {
        Self { workers: workers.max(1) }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// First matching nonce and the achieved rate, or `None` when the range
    /// holds no match
    pub fn search(&self, base_input: &str, target_digest: &str, difficulty: u64) -> Option<Solution> {
        let start_time = Instant::now();
        let max = max_nonce(difficulty);

        // Hex digests are always 40 lowercase characters, anything else never matches
        let Some(target) = decode_target(target_digest) else {
            debug!(target: LOG_TARGET, "Target digest '{}' is not a SHA-1 hex digest, nothing can match", target_digest);
            return None;
        };

        let prefix = Sha1::new_with_prefix(base_input.as_bytes());
        let nonce = if self.workers == 1 || max == 0 {
            scan_range(&prefix, &target, 0, max, None)
        } else {
            self.scan_parallel(&prefix, &target, max)
        }?;

        let elapsed = start_time.elapsed().as_secs_f64().max(f64::MIN_POSITIVE);
        let hashrate = nonce as f64 / elapsed;
        trace!(target: LOG_TARGET, "Nonce {} found in {:.6}s ({:.2} H/s)", nonce, elapsed, hashrate);

        Some(Solution { nonce, hashrate })
    }

    /// Like [`DigestSearch::search`], with exhaustion reported as an error
    pub fn solve(&self, job: &Job) -> Result<Solution, MinerError> {
        self.search(&job.last_block_hash, &job.expected_digest, job.difficulty)
            .ok_or(MinerError::SearchExhausted { max_nonce: job.max_nonce() })
    }

    fn scan_parallel(&self, prefix: &Sha1, target: &[u8; DIGEST_LEN], max: u64) -> Option<u64> {
        let total = max as u128 + 1;
        let chunk = total.div_ceil(self.workers as u128);
        let best = AtomicU64::new(u64::MAX);

        let result = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.workers);
            for worker in 0..self.workers as u128 {
                let start = worker * chunk;
                if start > max as u128 {
                    break;
                }
                let end = (start + chunk - 1).min(max as u128) as u64;
                let start = start as u64;
                let best = &best;
                handles.push(scope.spawn(move |_| {
                    let found = scan_range(prefix, target, start, end, Some(best));
                    if let Some(nonce) = found {
                        best.fetch_min(nonce, Ordering::Relaxed);
                    }
                    found
                }));
            }

            // Smallest match across workers, never the first worker to finish
            handles
                .into_iter()
                .filter_map(|handle| handle.join().ok().flatten())
                .min()
        });

        result.ok().flatten()
    }
}

/// Scan `start..=end` in order from a cloned prefix state. With `best`, stop
/// once another worker has matched a smaller nonce.
fn scan_range(
    prefix: &Sha1,
    target: &[u8; DIGEST_LEN],
    start: u64,
    end: u64,
    best: Option<&AtomicU64>,
) -> Option<u64> {
    let mut buf = [0u8; 20];
    let mut nonce = start;
    loop {
        if let Some(best) = best {
            if best.load(Ordering::Relaxed) < nonce {
                return None;
            }
        }

        let mut hasher = prefix.clone();
        hasher.update(decimal(nonce, &mut buf));
        if hasher.finalize().as_slice() == target.as_slice() {
            return Some(nonce);
        }

        if nonce == end {
            return None;
        }
        nonce += 1;
    }
}

fn decode_target(target: &str) -> Option<[u8; DIGEST_LEN]> {
    if target.len() != DIGEST_LEN * 2 || !target.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return None;
    }
    let mut out = [0u8; DIGEST_LEN];
    hex::decode_to_slice(target, &mut out).ok()?;
    Some(out)
}

/// ASCII decimal digits of `n`, written into the tail of `buf`
fn decimal(mut n: u64, buf: &mut [u8; 20]) -> &[u8] {
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[i..]
}


// Changelog:
// - v1.1.0 (2026-10-17): Added parallel range scanning.
//   - Workers scan contiguous sub-ranges under crossbeam scoped threads and
//     the smallest matching nonce wins, so results equal the sequential scan.
// - v1.0.0 (2026-10-17): Initial DUCO-S1 search.
//   - Prefix SHA-1 state is hashed once per job and cloned per candidate.
