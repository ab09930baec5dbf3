//! Minimal stderr backend for the `log` facade.
//! Level comes from `HYDROGENIC_LOG` (error, warn, info, debug, trace), default info.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

pub const LEVEL_VAR: &str = "HYDROGENIC_LOG";

static LOGGER: StderrLogger = StderrLogger;
// LevelFilter as usize, read on every record
static MAX_LEVEL: AtomicUsize = AtomicUsize::new(LevelFilter::Info as usize);

struct StderrLogger;

pub fn parse_level(value: Option<&str>) -> LevelFilter {
    match value.unwrap_or("info").trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

pub fn init() -> Result<(), SetLoggerError> {
    let level = parse_level(std::env::var(LEVEL_VAR).ok().as_deref());
    MAX_LEVEL.store(level as usize, Ordering::Relaxed);
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        (metadata.level() as usize) <= MAX_LEVEL.load(Ordering::Relaxed)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let tag = match record.level() {
                Level::Error => "error",
                Level::Warn => "warn",
                Level::Info => "info",
                Level::Debug => "debug",
                Level::Trace => "trace",
            };
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "[{tag}] {}: {}", record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
