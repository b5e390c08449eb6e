use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, Log, Metadata, Record};

// stdout carries the module result, logs never go there
enum Sink {
    Stderr,
    File(Mutex<File>),
}

pub struct Logger {
    level: Level,
    sink: Sink,
}

impl Logger {
    pub fn stderr(level: Level) -> Self {
        Self {
            level,
            sink: Sink::Stderr,
        }
    }

    pub fn file(level: Level, path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            sink: Sink::File(Mutex::new(file)),
        })
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("{:<5} {}", record.level(), record.args());
        match &self.sink {
            Sink::Stderr => eprintln!("{line}"),
            Sink::File(file) => {
                if let Ok(mut file) = file.lock() {
                    let _ = writeln!(file, "{line}");
                }
            }
        }
    }

    fn flush(&self) {
        if let Sink::File(file) = &self.sink {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Opens `path` when given, falling back to stderr if it cannot be opened.
pub fn open(level: Level, path: Option<&Path>) -> Logger {
    let Some(path) = path else {
        return Logger::stderr(level);
    };

    Logger::file(level, path).unwrap_or_else(|e| {
        eprintln!("cannot open log file {}: {e}, logging to stderr", path.display());
        Logger::stderr(level)
    })
}

pub fn init(logger: Logger) -> Result<(), log::SetLoggerError> {
    let filter = logger.level.to_level_filter();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(filter);
    Ok(())
}

pub fn level_from_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    }
}
