// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/mod.rs
// Version: 2.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the benchmark functionality of the
// DUCO miner. It measures search throughput on synthetic jobs, no pool needed.
//
// Tree Location:
// - src/benchmark/mod.rs (benchmark module entry point)
// - Submodules: jobs, runner

pub mod jobs;
pub mod runner;

// Re-export key benchmark types and functions
pub use jobs::{BenchmarkJob, create_benchmark_job};
pub use runner::{BenchmarkConfig, BenchmarkResult, BenchmarkRunner};

// Changelog:
// - v2.0.0 (2026-10-17): DUCO-S1 search benchmark; profiler dropped.
// - v1.0.0 (2025-06-14): Initial benchmark module creation.
