// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/protocol.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the line protocol spoken with the DUCO pool, located in
// the pool subdirectory. It builds job requests and share submissions and
// parses job lines and share acknowledgements. All messages are comma-joined
// text; the transport adds the trailing newline.
//
// Tree Location:
// - src/pool/protocol.rs (DUCO line protocol)
// - Depends on: crate::core::types

use crate::Result;
use crate::core::{Job, MinerConfig, MinerError, ShareStatus, Submission};
use log::{debug, error};

const LOG_TARGET: &str = "duco::miner::pool::protocol";

/// Mining algorithm tag opening every job request
pub const JOB_COMMAND: &str = "JOB";

/// Message-of-the-day request
pub const MOTD_COMMAND: &str = "MOTD";

/// Read limit for the pool version banner
pub const VERSION_LIMIT: usize = 5;

/// Read limit for the message of the day
pub const MOTD_LIMIT: usize = 512;

/// Builds and parses DUCO pool messages
pub struct DucoProtocol;

impl DucoProtocol {
    /// `JOB,<session token>,<device class>,<identity key>`
    pub fn create_job_request(session_token: &str, device_class: &str, identity_key: &str) -> String {
        format!("{},{},{},{}", JOB_COMMAND, session_token, device_class, identity_key)
    }

    /// Job request for a configured session
    pub fn job_request(config: &MinerConfig) -> String {
        Self::create_job_request(&config.session_token, &config.device_class, &config.identity_key)
    }

    /// `<last block hash>,<expected digest>,<difficulty>`
    pub fn parse_job(line: &str) -> Result<Job> {
        let fields: Vec<&str> = line.trim_end().split(',').collect();
        if fields.len() != 3 {
            error!(target: LOG_TARGET, "Malformed job line, expected 3 fields got {}: {:?}", fields.len(), line);
            return Err(MinerError::protocol(format!(
                "job line has {} fields, expected 3: {:?}",
                fields.len(),
                line
            )));
        }

        let difficulty = fields[2].trim().parse::<u64>().map_err(|e| {
            error!(target: LOG_TARGET, "Malformed job difficulty {:?}: {}", fields[2], e);
            MinerError::protocol(format!("job difficulty {:?} is not a non-negative integer", fields[2]))
        })?;

        let job = Job {
            last_block_hash: fields[0].to_string(),
            expected_digest: fields[1].to_string(),
            difficulty,
        };
        debug!(target: LOG_TARGET, "Parsed job: {:?}", job);
        Ok(job)
    }

    /// Inverse of [`DucoProtocol::parse_job`]
    pub fn encode_job(job: &Job) -> String {
        format!("{},{},{}", job.last_block_hash, job.expected_digest, job.difficulty)
    }

    /// `<nonce>,<rate>,<client version>,<share flag>,<miner id>`
    pub fn create_submission(submission: &Submission) -> String {
        format!(
            "{},{},{},{},{}",
            submission.nonce,
            submission.reported_rate,
            submission.client_version,
            submission.share_flag,
            submission.miner_id
        )
    }

    /// Classify the free-form acknowledgement line
    pub fn parse_share_status(line: &str) -> ShareStatus {
        let line = line.trim();
        let (verdict, detail) = match line.split_once(',') {
            Some((verdict, detail)) => (verdict, Some(detail.trim().to_string()).filter(|d| !d.is_empty())),
            None => (line, None),
        };
        match verdict {
            "GOOD" => ShareStatus::Accepted,
            "BLOCK" => ShareStatus::Block,
            "BAD" => ShareStatus::Rejected(detail),
            _ => ShareStatus::Other(line.to_string()),
        }
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Replaced the JSON Stratum builder with the DUCO line
//   protocol.
//   - Job request, job line and submission encoders with a 3-field job parser
//     that reports wrong field counts and bad difficulties as protocol errors.
//   - GOOD/BLOCK/BAD acknowledgement classification.
