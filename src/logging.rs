// src/logging.rs

//! Global logging setup for host applications, driven by the `[logging]`
//! config table.  Lines carry timestamp, level, target, pid and tid so
//! per-camera detection threads can be told apart.

use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::{process, thread};

use crate::config::LoggingConfig;

fn level_filter(level: &str) -> LevelFilter {
    match level.to_uppercase().as_str() {
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Configure the global logger.  Call once, early, from the host `main`.
pub fn setup(cfg: &LoggingConfig) -> Result<(), fern::InitError> {
    let level = level_filter(&cfg.level);

    let log_file = cfg
        .enable
        .then(|| cfg.file.as_deref().unwrap_or("alerter.log").to_owned());

    let mut dispatch = Dispatch::new()
        .format(|out, msg, record| {
            out.finish(format_args!(
                "[{}][{:5}][{}][pid={}][tid={:?}] {}",
                Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                process::id(),
                thread::current().id(),
                msg
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}
