// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the core functionality of the DUCO
// miner, located in the core subdirectory. It declares submodules and re-exports
// key types for use throughout the project.

pub mod ducos1;
pub mod error;
pub mod types;

// Re-export the most commonly used items
pub use ducos1::{DigestSearch, ducos1_hex, search};
pub use error::{MinerError, Recovery, TransportError};
pub use types::{Args, Endpoint, Job, MinerConfig, ShareStatus, Solution, Submission, SubmitPacing};
