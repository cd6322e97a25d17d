// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/session.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements one pool session of the DUCO miner, located in the
// miner subdirectory. A session owns its connection, performs the version/MOTD
// handshake and runs strictly alternating job and submission exchanges. Any
// transport failure moves it to Disconnected; a disconnected session is never
// reused.
//
// Tree Location:
// - src/miner/session.rs (session state machine)
// - Depends on: crate::pool, crate::core

use crate::Result;
use crate::core::{Endpoint, Job, MinerConfig, MinerError, Recovery, ShareStatus, Submission};
use crate::pool::client::{DEFAULT_RECV_LIMIT, PoolConnection};
use crate::pool::protocol::{DucoProtocol, MOTD_COMMAND, MOTD_LIMIT, VERSION_LIMIT};
use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;

const LOG_TARGET: &str = "duco::miner::session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Handshaking,
    Ready,
    JobRequested,
    Solving,
    Submitting,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub struct Session {
    connection: PoolConnection,
    pool_version: String,
    motd: String,
    state: SessionState,
}

impl Session {
    /// Connect and handshake. A failed handshake drops the connection.
    pub async fn establish(endpoint: &Endpoint, io_timeout: Duration) -> Result<Self> {
        debug!(target: LOG_TARGET, "State {} -> {}", SessionState::Disconnected, SessionState::Connecting);
        let connection = PoolConnection::connect(endpoint, io_timeout).await?;

        let mut session = Self {
            connection,
            pool_version: String::new(),
            motd: String::new(),
            state: SessionState::Handshaking,
        };
        if let Err(e) = session.handshake().await {
            warn!(target: LOG_TARGET, "❌ Handshake with {} failed: {}", endpoint, e);
            session.close().await;
            return Err(e);
        }
        Ok(session)
    }

    async fn handshake(&mut self) -> Result<()> {
        self.pool_version = self.recv(VERSION_LIMIT).await?;
        info!(target: LOG_TARGET, "🏷️ Pool version: {}", self.pool_version);

        self.send(MOTD_COMMAND).await?;
        self.motd = self.recv(MOTD_LIMIT).await?;
        info!(target: LOG_TARGET, "📰 MOTD: {}", self.motd);

        self.transition(SessionState::Ready);
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pool_version(&self) -> &str {
        &self.pool_version
    }

    pub fn motd(&self) -> &str {
        &self.motd
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.connection.endpoint()
    }

    pub fn is_connected(&self) -> bool {
        self.state != SessionState::Disconnected
    }

    /// Ask for a job and parse the reply. A malformed reply leaves the session
    /// Ready so the caller can ask again on the same connection.
    pub async fn request_job(&mut self, config: &MinerConfig) -> Result<Job> {
        self.expect_state(SessionState::Ready, "request a job")?;

        self.send(&DucoProtocol::job_request(config)).await?;
        self.transition(SessionState::JobRequested);

        let line = self.recv_reply(DEFAULT_RECV_LIMIT).await?;
        match DucoProtocol::parse_job(&line) {
            Ok(job) => {
                self.transition(SessionState::Solving);
                Ok(job)
            }
            Err(e) => {
                self.transition(SessionState::Ready);
                Err(e)
            }
        }
    }

    /// Solving is over, the result is about to be sent
    pub fn begin_submit(&mut self) -> Result<()> {
        self.expect_state(SessionState::Solving, "submit")?;
        self.transition(SessionState::Submitting);
        Ok(())
    }

    /// Drop the current job without answering it
    pub fn abandon_job(&mut self) -> Result<()> {
        self.expect_state(SessionState::Solving, "abandon a job")?;
        self.transition(SessionState::Ready);
        Ok(())
    }

    /// Send the result line and read the pool's verdict
    pub async fn submit(&mut self, submission: &Submission) -> Result<ShareStatus> {
        if self.state == SessionState::Solving {
            self.begin_submit()?;
        }
        self.expect_state(SessionState::Submitting, "submit")?;

        self.send(&DucoProtocol::create_submission(submission)).await?;
        let ack = self.recv_reply(DEFAULT_RECV_LIMIT).await?;
        self.transition(SessionState::Ready);
        Ok(DucoProtocol::parse_share_status(&ack))
    }

    pub async fn close(mut self) {
        self.connection.shutdown().await;
        self.transition(SessionState::Disconnected);
    }

    async fn send(&mut self, line: &str) -> Result<()> {
        let result = self.connection.send_line(line).await;
        self.fail_on_transport(result)
    }

    async fn recv(&mut self, max_bytes: usize) -> Result<String> {
        let result = self.connection.recv_line(max_bytes).await;
        self.fail_on_transport(result)
    }

    /// Read a reply to a request. An unreadable reply ends the exchange but
    /// leaves a live connection Ready for the next request.
    async fn recv_reply(&mut self, max_bytes: usize) -> Result<String> {
        let result = self.recv(max_bytes).await;
        if result.is_err() && self.is_connected() {
            self.transition(SessionState::Ready);
        }
        result
    }

    fn fail_on_transport<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result {
            if e.recovery() == Recovery::Reconnect {
                self.transition(SessionState::Disconnected);
            }
        }
        result
    }

    fn expect_state(&self, expected: SessionState, action: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(MinerError::protocol(format!(
                "cannot {} while the session is {}",
                action, self.state
            )))
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(target: LOG_TARGET, "State {} -> {}", self.state, next);
            self.state = next;
        }
    }
}

// Changelog:
// - v1.0.1 (2026-10-17): An unreadable job or acknowledgement line returns a
//   live session to Ready instead of leaving it mid-exchange.
// - v1.0.0 (2026-10-17): Initial session state machine.
//   - Replaces the shared pool stream with a Session that owns its
//     connection and tracks Connecting through Submitting explicitly.
