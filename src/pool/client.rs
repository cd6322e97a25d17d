// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/client.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the TCP transport for communicating with the mining pool
// in the DUCO miner, located in the pool subdirectory. It owns one persistent
// connection and exchanges newline-terminated text lines with a fixed I/O
// timeout on every operation.
//
// The pool protocol has no length framing: each read is expected to return
// exactly one logical message because the pool writes one line per request and
// the client never pipelines. A pool that splits or coalesces lines breaks this.
//
// Tree Location:
// - src/pool/client.rs (pool TCP transport)
// - Depends on: tokio, crate::core

use crate::Result;
use crate::core::{Endpoint, MinerError, TransportError};
use log::{debug, trace};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const LOG_TARGET: &str = "duco::miner::pool::client";

/// Default read limit for job and acknowledgement lines
pub const DEFAULT_RECV_LIMIT: usize = 128;

/// One open connection to a pool endpoint
pub struct PoolConnection {
    stream: TcpStream,
    endpoint: Endpoint,
    io_timeout: Duration,
}

impl PoolConnection {
    /// Connect to the pool, resolving the host name if needed
    pub async fn connect(endpoint: &Endpoint, io_timeout: Duration) -> Result<Self> {
        let connection_error = |source: io::Error| MinerError::Connection {
            endpoint: endpoint.to_string(),
            source,
        };

        let stream = match timeout(io_timeout, TcpStream::connect((endpoint.host.as_str(), endpoint.port))).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(connection_error(e)),
            Err(_) => {
                return Err(connection_error(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connect timed out after {:?}", io_timeout),
                )));
            }
        };
        stream.set_nodelay(true).map_err(connection_error)?; // Disable Nagle's algorithm for low latency

        debug!(target: LOG_TARGET, "🔌 Connected to {}", endpoint);
        Ok(Self {
            stream,
            endpoint: endpoint.clone(),
            io_timeout,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn io_timeout(&self) -> Duration {
        self.io_timeout
    }

    /// Write `text` as one line, appending the newline when missing
    pub async fn send_line(&mut self, text: &str) -> Result<()> {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        if !line.ends_with('\n') {
            line.push('\n');
        }
        trace!(target: LOG_TARGET, "📤 {}", line.trim_end());

        let io_timeout = self.io_timeout;
        let stream = &mut self.stream;
        let write = async move {
            stream.write_all(line.as_bytes()).await?;
            stream.flush().await
        };
        match timeout(io_timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(TransportError::Io(e).into()),
            Err(_) => Err(TransportError::Timeout {
                operation: "send_line",
                timeout: io_timeout,
            }
            .into()),
        }
    }

    /// Read a single message of at most `max_bytes` and strip one trailing newline
    pub async fn recv_line(&mut self, max_bytes: usize) -> Result<String> {
        let mut buf = vec![0u8; max_bytes.max(1)];
        let read = match timeout(self.io_timeout, self.stream.read(&mut buf)).await {
            Ok(Ok(0)) => return Err(TransportError::Closed.into()),
            Ok(Ok(read)) => read,
            Ok(Err(e)) => return Err(TransportError::Io(e).into()),
            Err(_) => {
                return Err(TransportError::Timeout {
                    operation: "recv_line",
                    timeout: self.io_timeout,
                }
                .into());
            }
        };
        buf.truncate(read);

        let mut text = String::from_utf8(buf)
            .map_err(|e| MinerError::protocol(format!("pool sent non-UTF-8 data: {}", e)))?;
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        trace!(target: LOG_TARGET, "📥 {}", text);
        Ok(text)
    }

    /// Close the write side; errors are irrelevant once the session is dropped
    pub async fn shutdown(&mut self) {
        let _ = self.stream.shutdown().await;
    }
}


// Changelog:
// - v1.1.0 (2026-10-17): Line transport for the DUCO pool protocol.
//   - Replaced the bare connect helper with PoolConnection, which owns the
//     stream and applies one I/O timeout to connect, send_line and recv_line.
//   - Timeouts, resets and peer close map onto TransportError; refused or
//     unresolvable endpoints map onto MinerError::Connection.
// - v1.0.0 (2025-06-14): Extracted from monolithic main.rs.
