// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines core data structures for the DUCO miner, located in the
// core subdirectory. It includes types for command-line arguments, the pool
// endpoint, jobs, solutions, share submissions and pool acknowledgements.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: clap, rand, crate::core::error

use crate::core::error::MinerError;
use clap::Parser;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_POOL_API: &str = "https://server.duinocoin.com/getPool";
pub const DEFAULT_CLIENT_VERSION: &str = "Official AVR Miner 4.0";
pub const DEFAULT_DEVICE_CLASS: &str = "AVR";
pub const DEFAULT_REPORTED_RATE: &str = "100";
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_secs(8);
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(2);

/// Command-line arguments for the DUCO miner
#[derive(Parser, Debug)]
#[command(
    name = "duco-miner",
    version,
    about = "DUCO-S1 pool miner speaking the line-based JOB/submit protocol",
    long_about = "DUCO Miner requests DUCO-S1 jobs from a pool, searches the nonce range for the\n\
                  expected SHA-1 digest and submits the result, looping until stopped.\n\n\
                  MINING: Requires a username and mining key; the pool is discovered over HTTP\n\
                  unless --pool is given\n\
                  BENCHMARK: Measures search throughput without a pool connection\n\n\
                  Examples:\n\
                    Mining: duco-miner -u alice -k SECRET\n\
                    Fixed pool: duco-miner -u alice -k SECRET -o 162.55.103.174:6000\n\
                    Benchmark: duco-miner --benchmark --threads 4 --benchmark-difficulty 5000"
)]
pub struct Args {
    /// Account name sent as the session token of every job request
    #[arg(short = 'u', long = "username", value_name = "NAME")]
    pub username: Option<String>,

    /// Mining key (identity string) sent with every job request
    #[arg(short = 'k', long = "mining-key", value_name = "KEY")]
    pub mining_key: Option<String>,

    /// Device class label sent with job requests (e.g. AVR, ESP32)
    #[arg(long = "device", default_value = DEFAULT_DEVICE_CLASS, value_name = "LABEL")]
    pub device: String,

    /// Miner identifier attached to submissions (random DUCOID when omitted)
    #[arg(long = "miner-id", value_name = "ID")]
    pub miner_id: Option<String>,

    /// Fixed pool address, skips HTTP pool discovery
    #[arg(short = 'o', long = "pool", value_name = "HOST:PORT")]
    pub pool: Option<String>,

    /// Pool discovery endpoint
    #[arg(long = "pool-api", default_value = DEFAULT_POOL_API, value_name = "URL")]
    pub pool_api: String,

    /// Search worker threads per job (0 = auto-detect)
    #[arg(short, long, default_value = "1", value_name = "COUNT")]
    pub threads: usize,

    /// Independent pool sessions to run side by side
    #[arg(long, default_value = "1", value_name = "COUNT")]
    pub sessions: usize,

    /// Minimum delay between solving a job and submitting it
    #[arg(long = "submit-delay", default_value = "8", value_name = "SECONDS")]
    pub submit_delay: u64,

    /// Pace submissions so each share appears found at this rate (H/s) and
    /// report that rate; replaces --submit-delay and --reported-rate
    #[arg(long = "target-rate", value_name = "H/S")]
    pub target_rate: Option<f64>,

    /// Width of the random spread applied to --target-rate per session
    #[arg(long = "rate-jitter", default_value = "5.0", value_name = "H/S")]
    pub rate_jitter: f64,

    /// Hashrate string reported with each share
    #[arg(long = "reported-rate", default_value = DEFAULT_REPORTED_RATE, value_name = "RATE")]
    pub reported_rate: String,

    /// Report the measured hashrate instead of --reported-rate
    #[arg(long = "report-measured", default_value = "false")]
    pub report_measured: bool,

    /// Client version string attached to submissions
    #[arg(long = "client-version", default_value = DEFAULT_CLIENT_VERSION, value_name = "TEXT")]
    pub client_version: String,

    /// Share type flag attached to submissions
    #[arg(long = "share-flag", default_value = "0", value_name = "FLAG")]
    pub share_flag: u32,

    /// Job cycles per session before stopping (0 = unbounded)
    #[arg(long, default_value = "0", value_name = "COUNT")]
    pub cycles: u64,

    /// Socket I/O timeout
    #[arg(long, default_value = "20", value_name = "SECONDS")]
    pub timeout: u64,

    /// Abandon jobs whose range holds no match and request a new one. Without
    /// this flag nonce 0 is submitted for such jobs, as the stock AVR miner does
    #[arg(long = "skip-exhausted", default_value = "false")]
    pub skip_exhausted: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Run the search benchmark instead of mining
    #[arg(long, default_value = "false")]
    pub benchmark: bool,

    /// Difficulty factor used by the benchmark
    #[arg(long = "benchmark-difficulty", default_value = "1000", value_name = "DIFFICULTY")]
    pub benchmark_difficulty: u64,
}

impl Args {
    /// Validate arguments and return helpful errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.benchmark {
            match self.username.as_deref() {
                None | Some("") => {
                    return Err("Username is required for mining mode. Use --username NAME".to_string());
                }
                Some(name) if name.contains(',') => {
                    return Err("Username must not contain commas".to_string());
                }
                _ => {}
            }
            match self.mining_key.as_deref() {
                None => {
                    return Err("Mining key is required for mining mode. Use --mining-key KEY".to_string());
                }
                Some(key) if key.contains(',') => {
                    return Err("Mining key must not contain commas".to_string());
                }
                _ => {}
            }
            if let Some(ref pool) = self.pool {
                pool.parse::<Endpoint>().map_err(|e| e.to_string())?;
            }
        }

        for (name, value) in [
            ("Device label", self.device.as_str()),
            ("Client version", self.client_version.as_str()),
            ("Reported rate", self.reported_rate.as_str()),
            ("Miner id", self.miner_id.as_deref().unwrap_or_default()),
        ] {
            if value.contains(',') || value.contains('\n') {
                return Err(format!("{} must not contain commas or newlines", name));
            }
        }

        if self.sessions == 0 {
            return Err("At least one session is required".to_string());
        }
        if self.threads > 1024 {
            return Err("Thread count cannot exceed 1024".to_string());
        }
        if let Some(rate) = self.target_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err("Target rate must be a positive number of H/s".to_string());
            }
            if !self.rate_jitter.is_finite() || self.rate_jitter < 0.0 || self.rate_jitter >= rate * 2.0 {
                return Err("Rate jitter must be at least 0 and less than twice the target rate".to_string());
            }
        }
        if self.timeout == 0 {
            return Err("Socket timeout must be greater than 0 seconds".to_string());
        }
        if self.benchmark && self.benchmark_difficulty == 0 {
            return Err("Benchmark difficulty must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Build the library configuration for session `index`. A fixed miner id
    /// gets a `-<index>` suffix when several sessions run; a target rate gets
    /// its own random offset within the jitter window.
    pub fn session_config(&self, index: usize) -> MinerConfig {
        let mut config = MinerConfig::new(
            self.username.clone().unwrap_or_default(),
            self.mining_key.clone().unwrap_or_default(),
        );
        config.device_class = self.device.clone();
        if let Some(ref id) = self.miner_id {
            config.miner_id = if self.sessions > 1 { format!("{}-{}", id, index) } else { id.clone() };
        }
        config.client_version = self.client_version.clone();
        config.share_flag = self.share_flag;
        config.reported_rate = if self.report_measured {
            None
        } else {
            Some(self.reported_rate.clone())
        };
        config.pacing = match self.target_rate {
            Some(rate) => {
                config.reported_rate = None;
                SubmitPacing::TargetRate(jittered_rate(rate, self.rate_jitter))
            }
            None => SubmitPacing::Fixed(Duration::from_secs(self.submit_delay)),
        };
        config.io_timeout = Duration::from_secs(self.timeout);
        config.threads = if self.threads == 0 { num_cpus::get() } else { self.threads };
        config.max_cycles = if self.cycles == 0 { None } else { Some(self.cycles) };
        config.submit_on_exhausted = !self.skip_exhausted;
        config
    }
}

/// Target rate shifted by a uniform offset in `[-jitter/2, jitter/2)`
fn jittered_rate(rate: f64, jitter: f64) -> f64 {
    let half = jitter / 2.0;
    if half > 0.0 {
        rate + rand::thread_rng().gen_range(-half..half)
    } else {
        rate
    }
}

/// How long a solved result is held before it is submitted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmitPacing {
    /// Same delay after every search
    Fixed(Duration),
    /// Hold the result until `hashes / rate` seconds have passed since the
    /// search started, so the share looks found at `rate` H/s
    TargetRate(f64),
}

impl SubmitPacing {
    /// Delay still owed after a search that covered `hashes` candidates in `search_time`
    pub fn delay(&self, hashes: u64, search_time: Duration) -> Duration {
        match *self {
            SubmitPacing::Fixed(delay) => delay,
            SubmitPacing::TargetRate(rate) if rate > 0.0 => Duration::try_from_secs_f64(hashes as f64 / rate)
                .unwrap_or(Duration::MAX)
                .saturating_sub(search_time),
            SubmitPacing::TargetRate(_) => Duration::ZERO,
        }
    }
}

/// Everything a pool session needs that does not come from the pool
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Client-chosen token in the job request (the account name)
    pub session_token: String,
    pub identity_key: String,
    pub device_class: String,
    pub miner_id: String,
    pub client_version: String,
    pub share_flag: u32,
    /// Rate string sent instead of the measured one; `None` sends the measurement
    pub reported_rate: Option<String>,
    pub pacing: SubmitPacing,
    pub io_timeout: Duration,
    pub threads: usize,
    pub max_cycles: Option<u64>,
    pub submit_on_exhausted: bool,
    /// Unit of the capped reconnect backoff
    pub reconnect_unit: Duration,
}

impl MinerConfig {
    pub fn new(session_token: String, identity_key: String) -> Self {
        Self {
            session_token,
            identity_key,
            device_class: DEFAULT_DEVICE_CLASS.to_string(),
            miner_id: generate_miner_id(),
            client_version: DEFAULT_CLIENT_VERSION.to_string(),
            share_flag: 0,
            reported_rate: Some(DEFAULT_REPORTED_RATE.to_string()),
            pacing: SubmitPacing::Fixed(DEFAULT_SUBMIT_DELAY),
            io_timeout: DEFAULT_IO_TIMEOUT,
            threads: 1,
            max_cycles: None,
            submit_on_exhausted: true,
            reconnect_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

/// Random miner identifier in the `DUCOID<hex>` form pools expect
pub fn generate_miner_id() -> String {
    format!("DUCOID{:016x}", rand::random::<u64>())
}

/// Pool host and port, immutable once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = MinerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s.rsplit_once(':').ok_or_else(|| {
            MinerError::Config(format!("Pool address '{}' must be in format HOST:PORT", s))
        })?;
        if host.is_empty() {
            return Err(MinerError::Config(format!("Pool address '{}' has an empty host", s)));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| MinerError::Config(format!("Pool port '{}' must be a number (1-65535)", port)))?;
        Ok(Endpoint::new(host, port))
    }
}

/// One DUCO-S1 challenge as sent by the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub last_block_hash: String,
    pub expected_digest: String,
    pub difficulty: u64,
}

impl Job {
    /// Highest nonce the search may examine
    pub fn max_nonce(&self) -> u64 {
        max_nonce(self.difficulty)
    }
}

/// Upper bound of the inclusive nonce range for a difficulty factor
pub fn max_nonce(difficulty: u64) -> u64 {
    difficulty.saturating_mul(100)
}

/// A matching nonce and the rate the search ran at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub nonce: u64,
    /// Hashes per second, counted as the nonces tried before the match
    pub hashrate: f64,
}

/// Result line sent back to the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub nonce: u64,
    pub reported_rate: String,
    pub client_version: String,
    pub share_flag: u32,
    pub miner_id: String,
}

/// Pool verdict on a submitted share
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareStatus {
    Accepted,
    /// Accepted and it solved a block
    Block,
    Rejected(Option<String>),
    /// Anything the pool sent that is not a known verdict
    Other(String),
}

impl ShareStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ShareStatus::Accepted | ShareStatus::Block)
    }
}


// Changelog:
// - v1.1.0 (2026-10-17): Target-rate pacing with per-session jitter
//   (SubmitPacing); miner ids are validated and numbered per session.
// - v1.0.0 (2026-10-17): Initial DUCO types.
//   - Args with pool, identity, pacing and benchmark options, converted into
//     MinerConfig so the library never reads process state.
//   - Endpoint, Job, Solution, Submission and ShareStatus for the session.
