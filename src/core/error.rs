// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/error.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the error taxonomy for the DUCO miner, located in the core
// subdirectory. Every failure the pool session can hit maps onto one variant,
// and each variant knows how the miner loop recovers from it.
//
// Tree Location:
// - src/core/error.rs (error types and recovery policy)
// - Depends on: thiserror

use std::time::Duration;
use thiserror::Error;

/// Failures of an established pool connection
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("connection closed by pool")]
    Closed,

    #[error("I/O failure on pool connection")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum MinerError {
    #[error("endpoint resolution failed: {0}")]
    Resolution(String),

    #[error("failed to connect to {endpoint}")]
    Connection {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("no nonce in 0..={max_nonce} matched the expected digest")]
    SearchExhausted { max_nonce: u64 },

    #[error("search worker failed: {0}")]
    Search(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// What the miner loop does after an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Drop the session, re-resolve the endpoint and handshake again
    Reconnect,
    /// Keep the session and ask the pool for a fresh job
    NextJob,
    /// Stop the miner
    Fatal,
}

impl MinerError {
    pub fn recovery(&self) -> Recovery {
        match self {
            MinerError::Resolution(_) | MinerError::Connection { .. } | MinerError::Transport(_) => {
                Recovery::Reconnect
            }
            MinerError::Protocol(_) | MinerError::SearchExhausted { .. } | MinerError::Search(_) => {
                Recovery::NextJob
            }
            MinerError::Config(_) => Recovery::Fatal,
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        MinerError::Protocol(message.into())
    }
}

impl From<std::io::Error> for MinerError {
    fn from(err: std::io::Error) -> Self {
        MinerError::Transport(TransportError::Io(err))
    }
}
