// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/stats/miner_stats.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements miner-wide statistics tracking for the DUCO miner,
// located in the stats subdirectory of the miner module. It counts jobs,
// share verdicts, failed cycles and reconnects across every session.
//
// Tree Location:
// - src/miner/stats/miner_stats.rs (miner-wide statistics logic)
// - Depends on: std, crate::utils::format

use crate::core::ShareStatus;
use crate::utils::format::FormatUtils;
use log::info;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

const LOG_TARGET: &str = "duco::miner::stats";
const ACTIVITY_CAPACITY: usize = 50;

pub struct MinerStats {
    pub jobs_received: AtomicU64,
    pub shares_submitted: AtomicU64,
    pub shares_accepted: AtomicU64,
    pub shares_rejected: AtomicU64,
    pub blocks_found: AtomicU64,
    pub searches_exhausted: AtomicU64,
    pub protocol_errors: AtomicU64,
    pub reconnects: AtomicU64,
    pub hashes_computed: AtomicU64,
    last_hashrate: Mutex<f64>,
    start_time: Instant,
    recent_activity: Mutex<VecDeque<(Instant, String)>>,
}

impl MinerStats {
    pub fn new() -> Self {
        Self {
            jobs_received: AtomicU64::new(0),
            shares_submitted: AtomicU64::new(0),
            shares_accepted: AtomicU64::new(0),
            shares_rejected: AtomicU64::new(0),
            blocks_found: AtomicU64::new(0),
            searches_exhausted: AtomicU64::new(0),
            protocol_errors: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
            hashes_computed: AtomicU64::new(0),
            last_hashrate: Mutex::new(0.0),
            start_time: Instant::now(),
            recent_activity: Mutex::new(VecDeque::with_capacity(ACTIVITY_CAPACITY)),
        }
    }

    pub fn add_activity(&self, message: String) {
        let mut activity = self.recent_activity.lock().unwrap_or_else(|e| e.into_inner());
        activity.push_back((Instant::now(), message));
        if activity.len() > ACTIVITY_CAPACITY {
            activity.pop_front();
        }
    }

    pub fn recent_activity(&self) -> Vec<String> {
        let activity = self.recent_activity.lock().unwrap_or_else(|e| e.into_inner());
        activity.iter().map(|(_, message)| message.clone()).collect()
    }

    pub fn record_job(&self) {
        self.jobs_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Account a finished search; `hashes` is the number of candidates hashed
    pub fn record_search(&self, hashes: u64, hashrate: f64) {
        self.hashes_computed.fetch_add(hashes, Ordering::Relaxed);
        *self.last_hashrate.lock().unwrap_or_else(|e| e.into_inner()) = hashrate;
    }

    pub fn record_exhausted(&self) {
        self.searches_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_protocol_error(&self) {
        self.protocol_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_share(&self, status: &ShareStatus) {
        self.shares_submitted.fetch_add(1, Ordering::Relaxed);
        match status {
            ShareStatus::Accepted => {
                self.shares_accepted.fetch_add(1, Ordering::Relaxed);
            }
            ShareStatus::Block => {
                self.shares_accepted.fetch_add(1, Ordering::Relaxed);
                self.blocks_found.fetch_add(1, Ordering::Relaxed);
            }
            ShareStatus::Rejected(_) | ShareStatus::Other(_) => {
                self.shares_rejected.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn get_last_hashrate(&self) -> f64 {
        *self.last_hashrate.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Hashes per second averaged over the whole uptime
    pub fn get_average_hashrate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.hashes_computed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Accepted shares as a percentage of answered submissions
    pub fn acceptance_rate(&self) -> f64 {
        let accepted = self.shares_accepted.load(Ordering::Relaxed);
        let rejected = self.shares_rejected.load(Ordering::Relaxed);
        let total = accepted + rejected;
        if total == 0 {
            0.0
        } else {
            accepted as f64 * 100.0 / total as f64
        }
    }

    pub fn display_dashboard(&self) {
        info!(target: LOG_TARGET, "📊 ===== DUCO miner stats (uptime {}) =====", FormatUtils::format_uptime(self.start_time.elapsed()));
        info!(target: LOG_TARGET,
            "⚡ Hashrate: last {} | average {} | {} hashes",
            FormatUtils::format_hashrate(self.get_last_hashrate()),
            FormatUtils::format_hashrate(self.get_average_hashrate()),
            FormatUtils::format_number(self.hashes_computed.load(Ordering::Relaxed))
        );
        info!(target: LOG_TARGET,
            "📋 Jobs: {} | ✅ Accepted: {} | ❌ Rejected: {} | 💎 Blocks: {} | 🎯 {:.1}%",
            self.jobs_received.load(Ordering::Relaxed),
            self.shares_accepted.load(Ordering::Relaxed),
            self.shares_rejected.load(Ordering::Relaxed),
            self.blocks_found.load(Ordering::Relaxed),
            self.acceptance_rate()
        );
        info!(target: LOG_TARGET,
            "🕳️ Exhausted: {} | 🚫 Protocol errors: {} | 🔄 Reconnects: {}",
            self.searches_exhausted.load(Ordering::Relaxed),
            self.protocol_errors.load(Ordering::Relaxed),
            self.reconnects.load(Ordering::Relaxed)
        );
    }
}

impl Default for MinerStats {
    fn default() -> Self {
        Self::new()
    }
}


// Changelog:
// - v1.1.0 (2026-10-17): Reworked for the DUCO session loop.
//   - Dropped per-thread stats; counts jobs, share verdicts, blocks,
//     exhausted searches, protocol errors and reconnects miner-wide.
//   - Poisoned locks are recovered instead of panicking.
// - v1.0.3: Original miner-wide statistics.
