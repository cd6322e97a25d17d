// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/pool_miner.rs
// Version: 2.2.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file drives the DUCO mining loop, located in the miner subdirectory. It
// resolves the pool, establishes sessions and runs request/solve/submit cycles
// one at a time. Transport failures drop the session and reconnect with a
// capped backoff; malformed jobs and exhausted searches only skip the cycle.
//
// Tree Location:
// - src/miner/pool_miner.rs (session driver)
// - Depends on: tokio, crate::miner::session, crate::pool, crate::core

use crate::Result;
use crate::core::{DigestSearch, Job, MinerConfig, MinerError, Recovery, ShareStatus, Solution, Submission, SubmitPacing};
use crate::miner::session::{Session, SessionState};
use crate::miner::stats::MinerStats;
use crate::pool::resolver::EndpointResolver;
use crate::utils::backoff::{Backoff, DEFAULT_BACKOFF_CAP};
use crate::utils::format::FormatUtils;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const LOG_TARGET: &str = "duco::miner::pool_miner";

/// How a completed cycle ended
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A result was sent and the pool answered
    Submitted {
        job: Job,
        submission: Submission,
        status: ShareStatus,
    },
}

pub struct PoolMiner<R: EndpointResolver> {
    config: MinerConfig,
    resolver: R,
    engine: DigestSearch,
    stats: Arc<MinerStats>,
    label: String,
}

impl<R: EndpointResolver> PoolMiner<R> {
    pub fn new(config: MinerConfig, resolver: R) -> Self {
        let engine = DigestSearch::new(config.threads);
        Self {
            config,
            resolver,
            engine,
            stats: Arc::new(MinerStats::new()),
            label: "session-0".to_string(),
        }
    }

    /// Share a stats object between several miners
    pub fn with_stats(mut self, stats: Arc<MinerStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Name used to tell sessions apart in the logs
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn get_stats(&self) -> Arc<MinerStats> {
        Arc::clone(&self.stats)
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Mine until `max_cycles` cycles have run, or forever when unbounded.
    /// Returns the number of cycles run; only configuration errors end it early.
    pub async fn run(&self) -> Result<u64> {
        let mut backoff = Backoff::new(self.config.reconnect_unit, DEFAULT_BACKOFF_CAP);
        let mut cycles = 0u64;

        info!(target: LOG_TARGET, "🚀 [{}] Starting miner {} ({} search thread(s))",
            self.label, self.config.miner_id, self.engine.workers());

        loop {
            if self.cycles_done(cycles) {
                return Ok(cycles);
            }

            let mut session = self.connect(&mut backoff).await?;

            while !self.cycles_done(cycles) {
                match self.run_cycle(&mut session).await {
                    Ok(CycleOutcome::Submitted { .. }) => {
                        cycles += 1;
                    }
                    Err(e) => match e.recovery() {
                        Recovery::NextJob => {
                            cycles += 1;
                            warn!(target: LOG_TARGET, "⚠️ [{}] Cycle abandoned: {}", self.label, e);
                            if matches!(e, MinerError::Protocol(_)) {
                                self.stats.record_protocol_error();
                            }
                            if session.state() != SessionState::Ready {
                                warn!(target: LOG_TARGET, "⚠️ [{}] Session left in {}, reconnecting", self.label, session.state());
                                self.stats.record_reconnect();
                                break;
                            }
                        }
                        Recovery::Reconnect => {
                            error!(target: LOG_TARGET, "📡 [{}] Session lost: {}, reconnecting...", self.label, e);
                            self.stats.record_reconnect();
                            self.stats.add_activity(format!("🔄 [{}] Reconnecting after: {}", self.label, e));
                            break;
                        }
                        Recovery::Fatal => {
                            session.close().await;
                            return Err(e);
                        }
                    },
                }
            }

            if session.is_connected() {
                session.close().await;
            } else {
                let delay = backoff.wait().await;
                debug!(target: LOG_TARGET, "[{}] Waited {:?} before reconnecting", self.label, delay);
            }
        }
    }

    fn cycles_done(&self, cycles: u64) -> bool {
        self.config.max_cycles.is_some_and(|max| cycles >= max)
    }

    /// Resolve and handshake until a session is up
    async fn connect(&self, backoff: &mut Backoff) -> Result<Session> {
        loop {
            let attempt = self.resolver.resolve().await;
            let result = match attempt {
                Ok(endpoint) => {
                    info!(target: LOG_TARGET, "🔌 [{}] Connecting to {}", self.label, endpoint);
                    Session::establish(&endpoint, self.config.io_timeout).await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(session) => {
                    backoff.reset();
                    info!(target: LOG_TARGET, "✅ [{}] Connected to {} (pool v{})",
                        self.label, session.endpoint(), session.pool_version());
                    self.stats.add_activity(format!("🔐 [{}] Connected to {}", self.label, session.endpoint()));
                    return Ok(session);
                }
                Err(e) if e.recovery() == Recovery::Fatal => return Err(e),
                Err(e) => {
                    let delay = backoff.next_delay();
                    warn!(target: LOG_TARGET, "⚠️ [{}] Could not start session: {} (retrying in {:?})",
                        self.label, e, delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One job: request, solve, pace, submit, read the verdict
    pub async fn run_cycle(&self, session: &mut Session) -> Result<CycleOutcome> {
        let job = session.request_job(&self.config).await?;
        self.stats.record_job();
        info!(target: LOG_TARGET, "📋 [{}] New job: difficulty {} (up to {} nonces)",
            self.label, job.difficulty, FormatUtils::format_number(job.max_nonce()));

        let started = Instant::now();
        let (solution, hashes) = match self.solve(&job).await {
            Ok(solution) => {
                self.stats.record_search(solution.nonce + 1, solution.hashrate);
                info!(target: LOG_TARGET, "💎 [{}] Nonce {} found at {}",
                    self.label, solution.nonce, FormatUtils::format_hashrate(solution.hashrate));
                (solution, solution.nonce)
            }
            Err(MinerError::SearchExhausted { max_nonce }) => {
                self.stats.record_exhausted();
                self.stats.record_search(max_nonce.saturating_add(1), 0.0);
                warn!(target: LOG_TARGET, "🕳️ [{}] No nonce in 0..={} matched", self.label, max_nonce);
                if !self.config.submit_on_exhausted {
                    session.abandon_job()?;
                    return Err(MinerError::SearchExhausted { max_nonce });
                }
                (Solution { nonce: 0, hashrate: 0.0 }, max_nonce.saturating_add(1))
            }
            Err(e) => {
                session.abandon_job()?;
                return Err(e);
            }
        };

        session.begin_submit()?;
        let delay = self.config.pacing.delay(hashes, started.elapsed());
        if !delay.is_zero() {
            debug!(target: LOG_TARGET, "[{}] Holding result for {:?}", self.label, delay);
            tokio::time::sleep(delay).await;
        }

        let solution = match self.config.pacing {
            SubmitPacing::TargetRate(_) => Solution {
                nonce: solution.nonce,
                hashrate: apparent_rate(solution.nonce, started.elapsed()),
            },
            SubmitPacing::Fixed(_) => solution,
        };
        let submission = self.submission_for(&solution);
        let status = session.submit(&submission).await?;
        self.stats.record_share(&status);
        self.log_status(&status);

        Ok(CycleOutcome::Submitted { job, submission, status })
    }

    async fn solve(&self, job: &Job) -> Result<Solution> {
        let engine = self.engine;
        let job = job.clone();
        tokio::task::spawn_blocking(move || engine.solve(&job))
            .await
            .map_err(|e| MinerError::Search(e.to_string()))?
    }

    /// The reported rate overrides the measurement unless it is unset
    pub fn submission_for(&self, solution: &Solution) -> Submission {
        let reported_rate = match self.config.reported_rate {
            Some(ref rate) => rate.clone(),
            None => format!("{:.2}", solution.hashrate),
        };
        Submission {
            nonce: solution.nonce,
            reported_rate,
            client_version: self.config.client_version.clone(),
            share_flag: self.config.share_flag,
            miner_id: self.config.miner_id.clone(),
        }
    }

    fn log_status(&self, status: &ShareStatus) {
        match status {
            ShareStatus::Accepted => {
                info!(target: LOG_TARGET, "✅ [{}] Share accepted", self.label);
                self.stats.add_activity(format!("✅ [{}] Share accepted", self.label));
            }
            ShareStatus::Block => {
                info!(target: LOG_TARGET, "🏆 [{}] Share accepted and found a block!", self.label);
                self.stats.add_activity(format!("🏆 [{}] Block found", self.label));
            }
            ShareStatus::Rejected(reason) => {
                warn!(target: LOG_TARGET, "❌ [{}] Share rejected: {}", self.label, reason.as_deref().unwrap_or("no reason given"));
                self.stats.add_activity(format!("❌ [{}] Share rejected", self.label));
            }
            ShareStatus::Other(text) => {
                warn!(target: LOG_TARGET, "❓ [{}] Unrecognised pool answer: {}", self.label, text);
                self.stats.add_activity(format!("❓ [{}] Pool answered: {}", self.label, text));
            }
        }
    }
}

/// Rate a share appears to have been found at once pacing is included
fn apparent_rate(nonce: u64, since_start: Duration) -> f64 {
    let secs = since_start.as_secs_f64();
    if secs > 0.0 { nonce as f64 / secs } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Endpoint;
    use crate::pool::StaticResolver;

    fn miner(reported_rate: Option<&str>) -> PoolMiner<StaticResolver> {
        let mut config = MinerConfig::new("alice".into(), "key".into());
        config.miner_id = "DUCOIDtest".into();
        config.reported_rate = reported_rate.map(str::to_string);
        PoolMiner::new(config, StaticResolver::new(Endpoint::new("127.0.0.1", 1)))
    }

    #[test]
    fn configured_rate_overrides_measurement() {
        let submission = miner(Some("100")).submission_for(&Solution { nonce: 42, hashrate: 9876.5 });
        assert_eq!(submission.nonce, 42);
        assert_eq!(submission.reported_rate, "100");
        assert_eq!(submission.client_version, "Official AVR Miner 4.0");
        assert_eq!(submission.share_flag, 0);
        assert_eq!(submission.miner_id, "DUCOIDtest");
    }

    #[test]
    fn measured_rate_is_sent_without_override() {
        let submission = miner(None).submission_for(&Solution { nonce: 7, hashrate: 1234.567 });
        assert_eq!(submission.reported_rate, "1234.57");
    }

    #[test]
    fn apparent_rate_includes_the_wait() {
        assert_eq!(apparent_rate(80, Duration::from_secs(8)), 10.0);
        assert_eq!(apparent_rate(0, Duration::from_secs(3)), 0.0);
        assert_eq!(apparent_rate(5, Duration::ZERO), 0.0);
    }

    #[tokio::test]
    async fn zero_cycles_returns_without_connecting() {
        let mut miner = miner(None);
        miner.config.max_cycles = Some(0);
        assert_eq!(miner.run().await.unwrap(), 0);
    }
}

// Changelog:
// - v2.2.0 (2026-10-17): Submission pacing follows SubmitPacing; target-rate
//   pacing reports the apparent rate. A session left outside Ready after a
//   skipped cycle is dropped and reconnected.
// - v2.1.0 (2026-10-17): Rebuilt as the DUCO session driver.
//   - One job in flight at a time: request, solve on a blocking worker, pace
//     the submission, then read the verdict.
//   - Reconnect on transport failure with min(attempt, 60) x unit backoff;
//     protocol errors and exhausted ranges request a fresh job instead.
//   - Reported hashrate is a configurable override of the measured value.
// - v2.0.4-dns: Original CPU miner with Stratum pool loop.
