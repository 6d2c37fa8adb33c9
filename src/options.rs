//! Builder for [`Logger`] instances.
//!
//! # Example
//!
//! ```rust
//! use sugarlog::{Field, Level, Options};
//!
//! let logger = Options::new()
//!     .with_level(Level::Debug)
//!     .with_encoding("json")
//!     .with_stdout()
//!     .build();
//!
//! logger.debug("cache warmed", &[Field::u32("entries", 512)]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::MakeWriter;

#[cfg(feature = "file")]
use crate::rotation::FileOptions;
#[cfg(feature = "file")]
use crate::writer::RotatingWriter;
use crate::writer::Sink;
use crate::{Level, Logger};

/// Output layout of encoded entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Tab separated, human readable lines with ISO-8601 timestamps.
    #[default]
    Console,
    /// One JSON object per line with epoch timestamps.
    Json,
}

impl Encoding {
    /// Resolve an encoding name; anything other than `json` is console.
    pub fn from_name(name: &str) -> Encoding {
        if name.trim().eq_ignore_ascii_case("json") {
            Encoding::Json
        } else {
            Encoding::Console
        }
    }

    /// Lowercase name, as accepted by [`Encoding::from_name`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Console => "console",
            Encoding::Json => "json",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Encoding {
    fn from(name: &str) -> Self {
        Encoding::from_name(name)
    }
}

impl From<String> for Encoding {
    fn from(name: String) -> Self {
        Encoding::from_name(&name)
    }
}

/// Options for building a [`Logger`].
///
/// Each `with_*` call overrides earlier ones; anything left unset is filled
/// in by [`Options::resolve`] (stderr, info, console).
#[derive(Debug, Clone, Default)]
pub struct Options {
    writer: Option<Sink>,
    level: Option<Level>,
    encoding: Option<Encoding>,
}

/// [`Options`] with every default applied.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub writer: Sink,
    pub level: Level,
    pub encoding: Encoding,
}

impl Options {
    /// Empty options; every value takes its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write entries to any [`MakeWriter`], e.g. an in-memory buffer.
    pub fn with_writer<W>(self, make_writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.with_sink(Sink::custom(make_writer))
    }

    /// Write entries to an already built [`Sink`].
    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.writer = Some(sink);
        self
    }

    /// Write entries to standard error (the default).
    pub fn with_stderr(self) -> Self {
        self.with_sink(Sink::Stderr)
    }

    /// Write entries to standard output.
    pub fn with_stdout(self) -> Self {
        self.with_sink(Sink::Stdout)
    }

    /// Minimum level to emit.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Minimum level by name. Unknown names silently mean [`Level::Info`].
    pub fn with_level_str(self, level: &str) -> Self {
        self.with_level(Level::from_name(level))
    }

    /// Output layout, as an [`Encoding`] or a name (`"console"`, `"json"`).
    pub fn with_encoding(mut self, encoding: impl Into<Encoding>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Write entries to a size-rotated file.
    ///
    /// The file is not opened until the first entry is written.
    #[cfg(feature = "file")]
    pub fn with_file_writer(self, file: FileOptions) -> Self {
        self.with_sink(Sink::File(RotatingWriter::new(file.resolve())))
    }

    /// Apply defaults to unset options.
    pub fn resolve(self) -> ResolvedOptions {
        ResolvedOptions {
            writer: self.writer.unwrap_or(Sink::Stderr),
            level: self.level.unwrap_or_default(),
            encoding: self.encoding.unwrap_or_default(),
        }
    }

    /// Construct a [`Logger`] from these options.
    pub fn build(self) -> Logger {
        Logger::new(self.resolve())
    }
}
