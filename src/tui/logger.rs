use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::sync::{Arc, Mutex};

/// Most recent log lines kept for the log panel.
pub const LOG_CAPACITY: usize = 100;

/// Shared handle to the lines captured by [`TuiLogger`].
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<String>>>);

impl LogBuffer {
    pub fn push(&self, line: String) {
        if let Ok(mut lines) = self.0.lock() {
            lines.push(line);
            if lines.len() > LOG_CAPACITY {
                lines.remove(0);
            }
        }
    }

    /// The last `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> Vec<String> {
        match self.0.lock() {
            Ok(lines) => lines[lines.len().saturating_sub(n)..].to_vec(),
            Err(_) => Vec::new(),
        }
    }
}

/// Captures log records in memory so they can be drawn inside the alternate screen.
#[derive(Debug)]
pub struct TuiLogger {
    level: LevelFilter,
    buffer: LogBuffer,
}

impl TuiLogger {
    pub fn new(level: LevelFilter) -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        (Self { level, buffer: buffer.clone() }, buffer)
    }

    /// Install as the global logger and return the buffer it writes to.
    pub fn install(level: LevelFilter) -> Result<LogBuffer, SetLoggerError> {
        let (logger, buffer) = Self::new(level);
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
        Ok(buffer)
    }
}

impl Log for TuiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.buffer.push(format!("{:<5} {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}
