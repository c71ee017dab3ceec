use std::env;
use std::io::Write;

use console::Style;
use log::Log;
use simplelog::{CombinedLogger, SharedLogger};

use crate::prelude::*;

const LOG_LEVEL_ENV: &str = "GOBENCH_LOG";

/// Console logger writing every record to stderr, stdout being reserved for the bulk stream.
pub struct LocalLogger {
    log_level: log::LevelFilter,
}

impl LocalLogger {
    pub fn new(verbose: bool) -> Self {
        let default_level = if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        let log_level = env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|log_level| log_level.parse::<log::LevelFilter>().ok())
            .unwrap_or(default_level);

        LocalLogger { log_level }
    }
}

impl Log for LocalLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.log_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!("{}", format_record(record));
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Style a log record for the console
fn format_record(record: &log::Record) -> String {
    let error_style = Style::new().for_stderr().red();
    let info_style = Style::new().for_stderr().white();
    let warn_style = Style::new().for_stderr().yellow();
    let debug_style = Style::new().for_stderr().blue().dim();
    let trace_style = Style::new().for_stderr().black().dim();

    match record.level() {
        log::Level::Error => error_style.apply_to(record.args()).to_string(),
        log::Level::Warn => warn_style.apply_to(record.args()).to_string(),
        log::Level::Info => info_style.apply_to(record.args()).to_string(),
        log::Level::Debug => debug_style
            .apply_to(format!("[DEBUG::{}] {}", record.target(), record.args()))
            .to_string(),
        log::Level::Trace => trace_style
            .apply_to(format!("[TRACE::{}] {}", record.target(), record.args()))
            .to_string(),
    }
}

impl SharedLogger for LocalLogger {
    fn level(&self) -> log::LevelFilter {
        self.log_level
    }

    fn config(&self) -> Option<&simplelog::Config> {
        None
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}

pub fn init_local_logger(verbose: bool) -> Result<()> {
    let logger: Box<dyn SharedLogger> = Box::new(LocalLogger::new(verbose));
    CombinedLogger::init(vec![logger]).context("Failed to init logger")?;
    Ok(())
}
