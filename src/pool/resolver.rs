// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/resolver.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements pool endpoint resolution for the DUCO miner, located in
// the pool subdirectory. A resolver hands the session a host and port; the
// HTTP resolver asks the pool discovery API and keeps retrying with a capped
// backoff until it gets an answer.
//
// Tree Location:
// - src/pool/resolver.rs (endpoint resolution)
// - Depends on: reqwest, serde, crate::utils::backoff

use crate::Result;
use crate::core::{Endpoint, MinerError};
use crate::core::types::{DEFAULT_BACKOFF_UNIT, DEFAULT_IO_TIMEOUT, DEFAULT_POOL_API};
use crate::utils::backoff::{Backoff, DEFAULT_BACKOFF_CAP};
use log::{debug, info, warn};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

const LOG_TARGET: &str = "duco::miner::pool::resolver";

/// Source of pool endpoints, consulted once per connection attempt
pub trait EndpointResolver: Send + Sync {
    fn resolve(&self) -> impl Future<Output = Result<Endpoint>> + Send;
}

/// Always returns the same endpoint
#[derive(Debug, Clone)]
pub struct StaticResolver {
    endpoint: Endpoint,
}

impl StaticResolver {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

impl EndpointResolver for StaticResolver {
    fn resolve(&self) -> impl Future<Output = Result<Endpoint>> + Send {
        let endpoint = self.endpoint.clone();
        async move { Ok(endpoint) }
    }
}

/// Body of the pool discovery response
#[derive(Debug, Clone, Deserialize)]
pub struct PoolInfo {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PoolInfo {
    pub fn into_endpoint(self) -> Result<Endpoint> {
        if self.success {
            match (self.ip, self.port) {
                (Some(ip), Some(port)) if !ip.is_empty() => Ok(Endpoint::new(ip, port)),
                _ => Err(MinerError::Resolution("pool discovery response lacks ip or port".to_string())),
            }
        } else if let Some(message) = self.message {
            Err(MinerError::Resolution(message))
        } else {
            Err(MinerError::Resolution("no response - IP ban or connection error".to_string()))
        }
    }
}

/// Resolves the pool through the discovery API
pub struct HttpPoolResolver {
    client: reqwest::Client,
    url: String,
    backoff_unit: Duration,
    max_attempts: Option<u32>,
}

impl HttpPoolResolver {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_IO_TIMEOUT)
            .build()
            .map_err(|e| MinerError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
            backoff_unit: DEFAULT_BACKOFF_UNIT,
            max_attempts: None,
        })
    }

    pub fn default_api() -> Result<Self> {
        Self::new(DEFAULT_POOL_API)
    }

    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Give up with the last error after `attempts` failures instead of retrying forever
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    /// One request to the discovery API
    pub async fn fetch_pool(&self) -> Result<Endpoint> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| MinerError::Resolution(format!("request to {} failed: {}", self.url, e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MinerError::Resolution(format!("pool discovery returned {}", status)));
        }
        let info: PoolInfo = response
            .json()
            .await
            .map_err(|e| MinerError::Resolution(format!("invalid pool discovery response: {}", e)))?;

        let name = info.name.clone();
        let endpoint = info.into_endpoint()?;
        info!(target: LOG_TARGET, "🌐 Pool selected: {} ({})", name.as_deref().unwrap_or("unnamed"), endpoint);
        Ok(endpoint)
    }
}

impl EndpointResolver for HttpPoolResolver {
    fn resolve(&self) -> impl Future<Output = Result<Endpoint>> + Send {
        async move {
            let mut backoff = Backoff::new(self.backoff_unit, DEFAULT_BACKOFF_CAP);
            let mut failures = 0u32;
            loop {
                match self.fetch_pool().await {
                    Ok(endpoint) => return Ok(endpoint),
                    Err(e) => {
                        failures += 1;
                        if self.max_attempts.is_some_and(|max| failures >= max) {
                            return Err(e);
                        }
                        let delay = backoff.next_delay();
                        warn!(target: LOG_TARGET, "⚠️ Pool discovery failed: {} (retrying in {:?})", e, delay);
                        tokio::time::sleep(delay).await;
                        debug!(target: LOG_TARGET, "Pool discovery attempt {}", failures + 1);
                    }
                }
            }
        }
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Initial endpoint resolution.
//   - EndpointResolver trait with static and HTTP discovery implementations.
//   - Discovery retries forever with min(attempt, 60) x 2s delays unless a
//     maximum attempt count is configured.
