// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/common/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// Scripted in-process pool shared by the integration tests. It greets each
// connection with a version banner, answers MOTD, serves job replies from a
// queue shared by all connections and acknowledges every other line with GOOD.
//
// Tree Location:
// - tests/common/mod.rs (mock pool)
// - Depends on: tokio, duco-miner

#![allow(dead_code)]

use duco_miner::core::{Endpoint, MinerConfig, SubmitPacing, ducos1_hex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub const POOL_VERSION: &str = "4.0";
pub const POOL_MOTD: &str = "Welcome to the test pool";

/// Base string of [`solvable_job`]
pub const JOB_BASE: &str = "ba29a15896fd2d792d5c4b60668bf2b9feebc51d";
/// Nonce that solves [`solvable_job`]
pub const JOB_NONCE: u64 = 73;

/// What the pool does when it receives a job request
#[derive(Debug, Clone)]
pub enum Reply {
    Line(String),
    /// Raw bytes, written as they are
    Bytes(Vec<u8>),
    /// Read the request and never answer
    Silent,
    /// Drop the connection
    Close,
}

pub struct MockPool {
    pub endpoint: Endpoint,
    received: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
}

impl MockPool {
    /// Listen on an ephemeral port; job requests get `replies` in order and
    /// connections are dropped once the queue is empty
    pub async fn start(replies: Vec<Reply>) -> Self {
        Self::start_with_failed_handshakes(replies, 0).await
    }

    /// Like [`MockPool::start`], but the first `failed_handshakes` connections
    /// are dropped after the version banner, before the MOTD reply
    pub async fn start_with_failed_handshakes(replies: Vec<Reply>, failed_handshakes: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let replies = Arc::new(Mutex::new(VecDeque::from(replies)));
        let failed_handshakes = Arc::new(AtomicUsize::new(failed_handshakes));

        let (rx, conns) = (Arc::clone(&received), Arc::clone(&connections));
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                conns.fetch_add(1, Ordering::SeqCst);
                let drop_handshake = failed_handshakes
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                    .is_ok();
                tokio::spawn(serve(stream, Arc::clone(&replies), Arc::clone(&rx), drop_handshake));
            }
        });

        Self {
            endpoint: Endpoint::new("127.0.0.1", port),
            received,
            connections,
        }
    }

    /// Every line the pool has read, across all connections
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Lines that were neither MOTD nor job requests
    pub fn submissions(&self) -> Vec<String> {
        self.received()
            .into_iter()
            .filter(|line| line != "MOTD" && !line.starts_with("JOB,"))
            .collect()
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn job_requests(&self) -> usize {
        self.received().iter().filter(|line| line.starts_with("JOB,")).count()
    }
}

async fn serve(
    stream: TcpStream,
    replies: Arc<Mutex<VecDeque<Reply>>>,
    received: Arc<Mutex<Vec<String>>>,
    drop_handshake: bool,
) {
    let (read_half, mut write_half) = stream.into_split();
    if write_half.write_all(format!("{}\n", POOL_VERSION).as_bytes()).await.is_err() {
        return;
    }

    let mut lines = BufReader::new(read_half).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        received.lock().unwrap().push(line.clone());

        let answer = if line == "MOTD" {
            if drop_handshake {
                return;
            }
            Some(POOL_MOTD.as_bytes().to_vec())
        } else if line.starts_with("JOB,") {
            let reply = replies.lock().unwrap().pop_front().unwrap_or(Reply::Close);
            match reply {
                Reply::Line(text) => Some(text.into_bytes()),
                Reply::Bytes(bytes) => {
                    if write_half.write_all(&bytes).await.is_err() {
                        return;
                    }
                    None
                }
                Reply::Silent => None,
                Reply::Close => return,
            }
        } else {
            Some(b"GOOD".to_vec())
        };

        if let Some(mut text) = answer {
            text.push(b'\n');
            if write_half.write_all(&text).await.is_err() {
                return;
            }
        }
    }
}

/// Job line whose digest is reached at [`JOB_NONCE`] with difficulty 1
pub fn solvable_job() -> String {
    format!("{},{},1", JOB_BASE, ducos1_hex(JOB_BASE, JOB_NONCE))
}

/// Job line no nonce in 0..=100 can satisfy
pub fn unsolvable_job() -> String {
    format!("{},{},1", JOB_BASE, "0".repeat(40))
}

/// Test configuration: no pacing, short timeouts, fast reconnects
pub fn test_config(max_cycles: u64) -> MinerConfig {
    let mut config = MinerConfig::new("alice".to_string(), "secret".to_string());
    config.miner_id = "DUCOIDtest".to_string();
    config.pacing = SubmitPacing::Fixed(Duration::ZERO);
    config.io_timeout = Duration::from_millis(300);
    config.reconnect_unit = Duration::from_millis(10);
    config.max_cycles = Some(max_cycles);
    config
}
