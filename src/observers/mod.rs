// Copyright 2024-2026 NFM developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The logging sink: a `slog`-based destination with `Off/Normal/
//! Verbose` levels, plus a process-wide default alongside the
//! per-instance override the rest of this crate favors.

use crate::noisy::{NoisyGradient, NoisyIOPair, NoisyValue};
#[cfg(feature = "slog-logger")]
use slog::Drain;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// How much detail a [`LogSink`] emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Normal,
    Verbose,
}

#[cfg(feature = "slog-logger")]
#[derive(Clone)]
enum SinkInner {
    Off,
    Slog { logger: slog::Logger, marker: bool },
}

#[cfg(not(feature = "slog-logger"))]
#[derive(Clone)]
enum SinkInner {
    Off,
}

/// A logging destination. Construction never fails due to logging
/// configuration reaching a driver: drivers hold `Option<LogSink>` and treat
/// `None` the same as `LogSink::off()`.
#[derive(Clone)]
pub struct LogSink {
    level: LogLevel,
    inner: SinkInner,
}

impl LogSink {
    /// A sink that discards everything.
    pub fn off() -> Self {
        LogSink { level: LogLevel::Off, inner: SinkInner::Off }
    }

    /// Logs to stderr. Each record is prefixed with the `--NFM--    ` marker.
    #[cfg(feature = "slog-logger")]
    pub fn term(level: LogLevel) -> Self {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).use_original_order().build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        let logger = slog::Logger::root(drain, slog::o!());
        LogSink { level, inner: SinkInner::Slog { logger, marker: true } }
    }

    #[cfg(not(feature = "slog-logger"))]
    pub fn term(level: LogLevel) -> Self {
        LogSink { level, inner: SinkInner::Off }
    }

    /// Appends records to a file, with no marker prefix. Only available with
    /// the `slog-logger` feature.
    #[cfg(feature = "slog-logger")]
    pub fn file(path: impl AsRef<Path>, level: LogLevel) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        let decorator = slog_term::PlainDecorator::new(file);
        let drain = slog_term::FullFormat::new(decorator).use_original_order().build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        let logger = slog::Logger::root(drain, slog::o!());
        Ok(LogSink { level, inner: SinkInner::Slog { logger, marker: false } })
    }

    fn emit(&self, msg: &str) {
        #[cfg(feature = "slog-logger")]
        if let SinkInner::Slog { logger, marker } = &self.inner {
            if *marker {
                slog::info!(logger, "--NFM--    {}", msg);
            } else {
                slog::info!(logger, "{}", msg);
            }
        }
        #[cfg(not(feature = "slog-logger"))]
        let _ = msg;
    }

    pub fn log_value(&self, label: &str, v: &NoisyValue) {
        if self.level == LogLevel::Off {
            return;
        }
        self.emit(&format!("{label}: {v}"));
    }

    pub fn log_pair(&self, label: &str, p: &NoisyIOPair) {
        if self.level == LogLevel::Off {
            return;
        }
        self.emit(&format!("{label}: {p}"));
    }

    pub fn log_vector(&self, label: &str, v: &[f64]) {
        if self.level != LogLevel::Verbose {
            return;
        }
        self.emit(&format!("{label}: {v:?}"));
    }

    pub fn log_gradient(&self, label: &str, g: &NoisyGradient) {
        if self.level != LogLevel::Verbose {
            return;
        }
        self.emit(&format!("{label}: {:?}", g.val));
    }
}

static GLOBAL_LOGGER: OnceLock<Mutex<Option<LogSink>>> = OnceLock::new();

/// Installs a process-wide default sink, consulted by drivers that were not
/// given a per-instance sink.
pub fn set_global_logger(sink: LogSink) {
    let cell = GLOBAL_LOGGER.get_or_init(|| Mutex::new(None));
    *cell.lock().unwrap() = Some(sink);
}

/// Returns a clone of the global sink, if one has been installed.
pub fn global_logger() -> Option<LogSink> {
    GLOBAL_LOGGER.get().and_then(|m| m.lock().unwrap().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::send_sync_test!(log_sink_is_send, LogSink);

    #[test]
    fn off_sink_never_panics() {
        let sink = LogSink::off();
        sink.log_value("x", &NoisyValue::new(1.0, 0.1));
        sink.log_vector("x", &[1.0, 2.0]);
    }
}
