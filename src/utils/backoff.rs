// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/backoff.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides the capped linear backoff shared by pool discovery and
// session reconnects. The n-th consecutive failure waits min(n, cap) units.
//
// Tree Location:
// - src/utils/backoff.rs (retry delays)
// - Depends on: tokio

use std::time::Duration;

/// Failures after which the delay stops growing
pub const DEFAULT_BACKOFF_CAP: u32 = 60;

#[derive(Debug, Clone)]
pub struct Backoff {
    unit: Duration,
    cap: u32,
    attempt: u32,
}

impl Backoff {
    pub fn new(unit: Duration, cap: u32) -> Self {
        Self {
            unit,
            cap: cap.max(1),
            attempt: 1,
        }
    }

    /// Delay for the current failure; advances the attempt counter
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.unit * self.attempt.min(self.cap);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }

    /// Sleep for [`Backoff::next_delay`]
    pub async fn wait(&mut self) -> Duration {
        let delay = self.next_delay();
        tokio::time::sleep(delay).await;
        delay
    }

    pub fn reset(&mut self) {
        self.attempt = 1;
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}
