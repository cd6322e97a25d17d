// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/pool_miner_test.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file contains end-to-end tests of the mining loop against the mock
// pool: skipping bad jobs, reconnecting after timeouts, handling exhausted
// ranges and reporting the measured hashrate.
//
// Tree Location:
// - tests/pool_miner_test.rs (mining loop integration tests)
// - Depends on: duco-miner, tokio

mod common;

#[cfg(test)]
mod tests {
    use super::common::{self, JOB_NONCE, MockPool, Reply};
    use duco_miner::core::SubmitPacing;
    use duco_miner::{PoolMiner, StaticResolver};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn miner(pool: &MockPool, config: duco_miner::core::MinerConfig) -> PoolMiner<StaticResolver> {
        PoolMiner::new(config, StaticResolver::new(pool.endpoint.clone()))
    }

    #[tokio::test]
    async fn test_malformed_job_then_good_job() {
        let pool = MockPool::start(vec![
            Reply::Line("onlyonefield".to_string()),
            Reply::Line(common::solvable_job()),
        ])
        .await;
        let miner = miner(&pool, common::test_config(2));

        assert_eq!(miner.run().await.unwrap(), 2);

        let stats = miner.get_stats();
        assert_eq!(stats.protocol_errors.load(Ordering::Relaxed), 1);
        assert_eq!(stats.shares_accepted.load(Ordering::Relaxed), 1);
        assert_eq!(stats.reconnects.load(Ordering::Relaxed), 0);
        assert_eq!(pool.connections(), 1);
        assert_eq!(pool.submissions(), vec![format!("{},100,Official AVR Miner 4.0,0,DUCOIDtest", JOB_NONCE)]);
    }

    /// Poll until the pool has handed out a job, in small steps of paused time
    async fn wait_for_job_request(pool: &MockPool) {
        while pool.job_requests() == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn test_unreadable_job_then_good_job() {
        let pool = MockPool::start(vec![
            Reply::Bytes(b"\xff\xfe,bad,1\n".to_vec()),
            Reply::Line(common::solvable_job()),
        ])
        .await;
        let miner = miner(&pool, common::test_config(2));

        assert_eq!(miner.run().await.unwrap(), 2);

        let stats = miner.get_stats();
        assert_eq!(stats.protocol_errors.load(Ordering::Relaxed), 1);
        assert_eq!(stats.shares_accepted.load(Ordering::Relaxed), 1);
        assert_eq!(pool.job_requests(), 2);
        assert_eq!(pool.connections(), 1);
    }

    #[tokio::test]
    async fn test_failed_handshake_reconnects() {
        let pool = MockPool::start_with_failed_handshakes(vec![Reply::Line(common::solvable_job())], 1).await;
        let miner = miner(&pool, common::test_config(1));

        assert_eq!(miner.run().await.unwrap(), 1);

        assert_eq!(pool.connections(), 2);
        assert_eq!(pool.job_requests(), 1);
        assert_eq!(miner.get_stats().shares_accepted.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_holds_the_share() {
        let pool = MockPool::start(vec![Reply::Line(common::solvable_job())]).await;
        let mut config = common::test_config(1);
        config.io_timeout = Duration::from_secs(60);
        config.pacing = SubmitPacing::Fixed(Duration::from_secs(8));
        let miner = miner(&pool, config);
        let handle = tokio::spawn(async move { miner.run().await });

        wait_for_job_request(&pool).await;
        tokio::time::sleep(Duration::from_secs(7)).await;
        assert!(pool.submissions().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(pool.submissions().len(), 1);
        assert_eq!(handle.await.unwrap().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_target_rate_paces_and_reports_apparent_rate() {
        let pool = MockPool::start(vec![Reply::Line(common::solvable_job())]).await;
        let mut config = common::test_config(1);
        config.io_timeout = Duration::from_secs(60);
        config.pacing = SubmitPacing::TargetRate(10.0);
        config.reported_rate = None;
        let miner = miner(&pool, config);
        let handle = tokio::spawn(async move { miner.run().await });

        // 73 hashes at 10 H/s: held for 7.3 s
        wait_for_job_request(&pool).await;
        tokio::time::sleep(Duration::from_millis(6500)).await;
        assert!(pool.submissions().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let submissions = pool.submissions();
        assert_eq!(submissions.len(), 1);
        let fields: Vec<&str> = submissions[0].split(',').collect();
        assert_eq!(fields[0], JOB_NONCE.to_string());
        let rate: f64 = fields[1].parse().unwrap();
        assert!((rate - 10.0).abs() < 0.05, "reported {}", rate);
        assert_eq!(handle.await.unwrap().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reconnects_after_timeout() {
        let pool = MockPool::start(vec![Reply::Silent, Reply::Line(common::solvable_job())]).await;
        let miner = miner(&pool, common::test_config(1));

        assert_eq!(miner.run().await.unwrap(), 1);

        let stats = miner.get_stats();
        assert_eq!(stats.reconnects.load(Ordering::Relaxed), 1);
        assert_eq!(stats.shares_accepted.load(Ordering::Relaxed), 1);
        assert_eq!(pool.connections(), 2);
        assert_eq!(pool.received().iter().filter(|line| *line == "MOTD").count(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_job_submits_nonce_zero() {
        let pool = MockPool::start(vec![Reply::Line(common::unsolvable_job())]).await;
        let miner = miner(&pool, common::test_config(1));

        assert_eq!(miner.run().await.unwrap(), 1);

        let stats = miner.get_stats();
        assert_eq!(stats.searches_exhausted.load(Ordering::Relaxed), 1);
        assert_eq!(stats.shares_submitted.load(Ordering::Relaxed), 1);
        assert_eq!(pool.submissions(), vec!["0,100,Official AVR Miner 4.0,0,DUCOIDtest".to_string()]);
    }

    #[tokio::test]
    async fn test_exhausted_job_can_be_skipped() {
        let pool = MockPool::start(vec![
            Reply::Line(common::unsolvable_job()),
            Reply::Line(common::solvable_job()),
        ])
        .await;
        let mut config = common::test_config(2);
        config.submit_on_exhausted = false;
        let miner = miner(&pool, config);

        assert_eq!(miner.run().await.unwrap(), 2);

        assert_eq!(miner.get_stats().searches_exhausted.load(Ordering::Relaxed), 1);
        assert_eq!(pool.connections(), 1);
        assert_eq!(pool.submissions().len(), 1);
        assert!(pool.submissions()[0].starts_with(&format!("{},", JOB_NONCE)));
    }

    #[tokio::test]
    async fn test_measured_rate_is_reported() {
        let pool = MockPool::start(vec![Reply::Line(common::solvable_job())]).await;
        let mut config = common::test_config(1);
        config.reported_rate = None;
        let miner = miner(&pool, config);

        assert_eq!(miner.run().await.unwrap(), 1);

        let submissions = pool.submissions();
        let fields: Vec<&str> = submissions[0].split(',').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], JOB_NONCE.to_string());
        let rate: f64 = fields[1].parse().unwrap();
        assert!(rate >= 0.0);
    }

    #[tokio::test]
    async fn test_sessions_share_stats() {
        let pool = MockPool::start(vec![
            Reply::Line(common::solvable_job()),
            Reply::Line(common::solvable_job()),
        ])
        .await;
        let first = miner(&pool, common::test_config(1)).with_label("session-0");
        let stats = first.get_stats();
        let second = miner(&pool, common::test_config(1))
            .with_label("session-1")
            .with_stats(std::sync::Arc::clone(&stats));

        let (a, b) = tokio::join!(first.run(), second.run());
        assert_eq!(a.unwrap() + b.unwrap(), 2);
        assert_eq!(stats.shares_accepted.load(Ordering::Relaxed), 2);
        assert_eq!(stats.jobs_received.load(Ordering::Relaxed), 2);
        assert_eq!(pool.connections(), 2);
    }
}
