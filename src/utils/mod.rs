// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/mod.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for utility functions in the DUCO miner,
// located in the utils subdirectory.
//
// Tree Location:
// - src/utils/mod.rs (utils module entry point)
// - Submodules: backoff, format, logging

pub mod backoff;
pub mod format;
pub mod logging;

// Changelog:
// - v1.1.0 (2026-10-17): Added backoff and logging; dropped user_agent.
// - v1.0.0 (2025-06-14): Extracted from monolithic main.rs.
