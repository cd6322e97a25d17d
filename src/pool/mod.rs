// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/mod.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the pool communication functionality
// of the DUCO miner, located in the pool subdirectory. It declares submodules
// and re-exports key types for use throughout the project.
//
// Tree Location:
// - src/pool/mod.rs (pool module entry point)
// - Submodules: client, protocol, resolver

pub mod client;
pub mod protocol;
pub mod resolver;

// Re-export key types for convenience
pub use client::PoolConnection;
pub use protocol::DucoProtocol;
pub use resolver::{EndpointResolver, HttpPoolResolver, StaticResolver};

// Changelog:
// - v1.1.0 (2026-10-17): Swapped the Stratum messages module for the DUCO line
//   protocol and added endpoint resolvers.
// - v1.0.0 (2025-06-14): Extracted from monolithic main.rs.
