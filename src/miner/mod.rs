// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/miner/mod.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the miner functionality of the DUCO
// miner, located in the miner subdirectory. It declares submodules and re-exports
// key types for use throughout the project.
//
// Tree Location:
// - src/miner/mod.rs (miner module entry point)
// - Submodules: pool_miner, session, stats

pub mod pool_miner;
pub mod session;
pub mod stats;

// Re-export key types for convenience
pub use pool_miner::{CycleOutcome, PoolMiner};
pub use session::{Session, SessionState};
pub use stats::MinerStats;

// Changelog:
// - v2.0.0 (2026-10-17): Replaced the CPU/GPU thread miners with the DUCO
//   session driver and session state machine.
// - v1.0.0 (2025-06-14): Extracted from monolithic main.rs.
