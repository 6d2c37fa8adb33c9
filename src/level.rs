use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

use crate::Error;

/// Severity of a log entry.
///
/// Levels are ordered `Debug < Info < Warn < Error < Fatal`; an entry is
/// emitted only when its level is at or above the logger's minimum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Verbose diagnostics, usually disabled in production.
    Debug,
    /// The default logging priority.
    #[default]
    Info,
    /// More important than Info, but doesn't need individual human review.
    Warn,
    /// High-priority entries; a healthy application shouldn't produce them.
    Error,
    /// Logs the entry and then terminates the process.
    Fatal,
}

impl Level {
    /// All levels, lowest first.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// Resolve a level name case-insensitively.
    ///
    /// Unknown names fall back to [`Level::Info`] instead of failing. Use
    /// [`str::parse`] when a typo should be reported.
    pub fn from_name(name: &str) -> Level {
        name.parse().unwrap_or(Level::Info)
    }

    /// Lowercase name, as rendered by the JSON encoder.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Uppercase name, as rendered by the console encoder.
    pub fn capital(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Whether an entry at `self` passes a logger configured with `min`.
    pub fn enabled(&self, min: Level) -> bool {
        *self >= min
    }

    /// The engine level used to dispatch this entry. `tracing` has no fatal
    /// level, so fatal entries travel as ERROR and carry their own severity.
    pub fn as_tracing(&self) -> tracing::Level {
        match self {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error | Level::Fatal => tracing::Level::ERROR,
        }
    }

    pub(crate) fn from_tracing(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }

    pub(crate) fn as_filter(&self) -> LevelFilter {
        LevelFilter::from_level(self.as_tracing())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(format!("unknown log level: {}", s)))
    }
}
