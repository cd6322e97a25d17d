// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file serves as the main library entry point for the DUCO miner,
// located at the root of the source tree. It exports all public modules
// and types that other crates or binaries can use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: core, miner, pool, utils, benchmark

pub mod benchmark;
pub mod core;
pub mod miner;
pub mod pool;
pub mod utils;

// Re-export commonly used types at the crate root for convenience
pub use crate::benchmark::BenchmarkRunner;
pub use crate::core::{DigestSearch, MinerError};
pub use crate::miner::{MinerStats, PoolMiner, Session, SessionState};
pub use crate::pool::{HttpPoolResolver, PoolConnection, StaticResolver};

pub type Result<T> = std::result::Result<T, MinerError>;

// Changelog:
// - v1.0.0 (2026-10-17): Initial DUCO miner library root.
//   - Organizes the project into core, miner, pool, utils and benchmark
//     modules and defines the crate Result over MinerError.
