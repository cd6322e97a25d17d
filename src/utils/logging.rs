// DUCO Miner - Free and Open Source Software Statement
//
// This project, duco-miner, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/logging.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file sets up log4rs for the DUCO miner binary: one console appender
// with timestamps and log targets, filtered at the requested level.
//
// Tree Location:
// - src/utils/logging.rs (log4rs initialisation)
// - Depends on: log, log4rs

use crate::Result;
use crate::core::MinerError;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}";

pub fn parse_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| MinerError::Config(format!("unknown log level '{}'", level)))
}

/// Install the console logger; call once at startup
pub fn init_logging(level: LevelFilter) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .map_err(|e| MinerError::Config(format!("invalid logging configuration: {}", e)))?;
    log4rs::init_config(config).map_err(|e| MinerError::Config(format!("logger already installed: {}", e)))?;
    Ok(())
}
