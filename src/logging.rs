//! File-backed diagnostics for the `log` facade.
//!
//! The TUI owns the terminal, so log output goes to `folio.log` in the temp
//! directory instead of stdout/stderr. Level comes from `FOLIO_LOG`
//! (error/warn/info/debug/trace/off); unset means warn. If the log file
//! cannot be opened, logging stays disabled rather than disturbing the UI.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

struct FileLogger {
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "[{:<5}] [{}] {}",
                record.level(),
                record.target(),
                record.args()
            );
            let _ = file.flush();
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub fn init() {
    let level = match std::env::var("FOLIO_LOG") {
        Ok(value) => value.trim().parse().unwrap_or(LevelFilter::Warn),
        Err(_) => LevelFilter::Warn,
    };
    if level == LevelFilter::Off {
        return;
    }

    let path = std::env::temp_dir().join("folio.log");
    let Ok(file) = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
    else {
        return;
    };

    let logger = FileLogger {
        file: Mutex::new(file),
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
