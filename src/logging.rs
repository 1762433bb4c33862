use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
struct SimpleLogger {
    log_path: PathBuf,
}

static LOGGER: OnceCell<SimpleLogger> = OnceCell::new();

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let log_entry = format!("[{}] {} - {}\n", timestamp, record.level(), record.args());
            let log_file = self.log_path.join("log.txt");

            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_file) {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

/// Routes `log` output to `log.txt` under the given data directory.
pub fn init(data_dir: impl Into<PathBuf>) -> Result<(), SetLoggerError> {
    let log_path = data_dir.into();
    let _ = create_dir_all(&log_path);

    if LOGGER.set(SimpleLogger { log_path }).is_err() {
        // Already initialized; keep the first destination.
        return Ok(());
    }

    log::set_logger(LOGGER.get().expect("logger was just set"))
        .map(|()| log::set_max_level(LevelFilter::Debug))
}
