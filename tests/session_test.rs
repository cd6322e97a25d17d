// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/session_test.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file contains integration tests for one pool session: the handshake,
// the job and submission exchange, and how transport and protocol failures
// move the session state.
//
// Tree Location:
// - tests/session_test.rs (session integration tests)
// - Depends on: duco-miner, tokio

mod common;

#[cfg(test)]
mod tests {
    use super::common::{self, JOB_BASE, JOB_NONCE, MockPool, POOL_MOTD, POOL_VERSION, Reply};
    use duco_miner::core::{DigestSearch, MinerError, ShareStatus, Submission, TransportError};
    use duco_miner::{Session, SessionState};

    fn submission(nonce: u64) -> Submission {
        Submission {
            nonce,
            reported_rate: "100".to_string(),
            client_version: "Official AVR Miner 4.0".to_string(),
            share_flag: 0,
            miner_id: "DUCOIDtest".to_string(),
        }
    }

    #[tokio::test]
    async fn test_full_exchange() {
        let pool = MockPool::start(vec![Reply::Line(common::solvable_job())]).await;
        let config = common::test_config(1);

        let mut session = Session::establish(&pool.endpoint, config.io_timeout).await.unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.pool_version(), POOL_VERSION);
        assert_eq!(session.motd(), POOL_MOTD);

        let job = session.request_job(&config).await.unwrap();
        assert_eq!(session.state(), SessionState::Solving);
        assert_eq!(job.last_block_hash, JOB_BASE);
        assert_eq!(job.difficulty, 1);

        let solution = DigestSearch::new(1).solve(&job).unwrap();
        assert_eq!(solution.nonce, JOB_NONCE);

        let status = session.submit(&submission(solution.nonce)).await.unwrap();
        assert_eq!(status, ShareStatus::Accepted);
        assert_eq!(session.state(), SessionState::Ready);

        assert_eq!(
            pool.received(),
            vec![
                "MOTD".to_string(),
                "JOB,alice,AVR,secret".to_string(),
                "73,100,Official AVR Miner 4.0,0,DUCOIDtest".to_string(),
            ]
        );
        session.close().await;
    }

    #[tokio::test]
    async fn test_malformed_job_keeps_connection() {
        let pool = MockPool::start(vec![
            Reply::Line("onlyonefield".to_string()),
            Reply::Line(common::solvable_job()),
        ])
        .await;
        let config = common::test_config(2);
        let mut session = Session::establish(&pool.endpoint, config.io_timeout).await.unwrap();

        let err = session.request_job(&config).await.unwrap_err();
        assert!(matches!(err, MinerError::Protocol(_)), "unexpected {:?}", err);
        assert_eq!(session.state(), SessionState::Ready);

        let job = session.request_job(&config).await.unwrap();
        assert_eq!(job.difficulty, 1);
        assert_eq!(pool.connections(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_job_keeps_session_ready() {
        let pool = MockPool::start(vec![
            Reply::Bytes(b"\xff\xfe,bad,1\n".to_vec()),
            Reply::Line(common::solvable_job()),
        ])
        .await;
        let config = common::test_config(2);
        let mut session = Session::establish(&pool.endpoint, config.io_timeout).await.unwrap();

        let err = session.request_job(&config).await.unwrap_err();
        assert!(matches!(err, MinerError::Protocol(_)), "unexpected {:?}", err);
        assert_eq!(session.state(), SessionState::Ready);

        let job = session.request_job(&config).await.unwrap();
        assert_eq!(job.last_block_hash, JOB_BASE);
        assert_eq!(pool.job_requests(), 2);
    }

    #[tokio::test]
    async fn test_silent_pool_times_out() {
        let pool = MockPool::start(vec![Reply::Silent]).await;
        let config = common::test_config(1);
        let mut session = Session::establish(&pool.endpoint, config.io_timeout).await.unwrap();

        let err = session.request_job(&config).await.unwrap_err();
        assert!(
            matches!(err, MinerError::Transport(TransportError::Timeout { operation: "recv_line", .. })),
            "unexpected {:?}",
            err
        );
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_closed_connection_disconnects() {
        let pool = MockPool::start(vec![Reply::Close]).await;
        let config = common::test_config(1);
        let mut session = Session::establish(&pool.endpoint, config.io_timeout).await.unwrap();

        let err = session.request_job(&config).await.unwrap_err();
        assert!(matches!(err, MinerError::Transport(_)), "unexpected {:?}", err);
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_submit_requires_a_job() {
        let pool = MockPool::start(vec![]).await;
        let config = common::test_config(1);
        let mut session = Session::establish(&pool.endpoint, config.io_timeout).await.unwrap();

        assert!(matches!(session.submit(&submission(0)).await, Err(MinerError::Protocol(_))));
        assert!(session.abandon_job().is_err());
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_unreachable_pool_is_a_connection_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = duco_miner::core::Endpoint::new("127.0.0.1", listener.local_addr().unwrap().port());
        drop(listener);

        let result = Session::establish(&endpoint, std::time::Duration::from_millis(300)).await;
        assert!(matches!(result, Err(MinerError::Connection { .. })));
    }
}
