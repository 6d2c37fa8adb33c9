//! # Sugarlog
//!
//! A small structured logging facade over `tracing`, with console and JSON
//! encoders and an optional size-rotated log file.
//!
//! ## Features
//!
//! - Leveled logging with typed fields ([`Logger`])
//! - Free-form and printf-style logging ([`SugaredLogger`], the free
//!   functions and the `info!`/`infof!` family of macros)
//! - A replaceable process-wide logger ([`set_options`])
//! - Log files rotated by size, with retention and gzip compression
//!   (`file` feature, on by default)
//!
//! ## Example
//!
//! ```rust
//! use sugarlog::{Field, Options};
//!
//! let logger = Options::new().with_encoding("json").build();
//! logger.info("user logged in", &[Field::u64("user_id", 123)]);
//!
//! sugarlog::infof!("{} workers started", 4);
//! sugarlog::sync()?;
//! # Ok::<(), sugarlog::Error>(())
//! ```
//!
//! ## Runnable examples
//!
//! The example programs live in `demos/` rather than `examples/` and are
//! registered as `[[example]]` targets in `Cargo.toml`, so they still run with
//! `cargo run --example <name>`: `basic`, `json_logging`, `rotation` and
//! `config_yaml`.

pub mod config;
pub mod encoder;
pub mod error;
pub mod field;
pub mod global;
pub mod level;
pub mod logger;
mod macros;
pub mod options;
#[cfg(feature = "file")]
pub mod rotation;
pub mod writer;

pub use config::LogConfig;
#[cfg(feature = "file")]
pub use config::FileLogConfig;
pub use error::{Error, Result};
pub use field::{Field, FieldValue};
pub use global::{
    debug, debugf, error, errorf, fatal, fatalf, info, infof, logger, set_logger, set_options,
    sync, warn, warnf,
};
pub use level::Level;
#[doc(hidden)]
pub use logger::Concat;
pub use logger::{Logger, SugaredLogger};
pub use options::{Encoding, Options, ResolvedOptions};
#[cfg(feature = "file")]
pub use rotation::{FileOptions, RotationPolicy};
#[cfg(feature = "file")]
pub use writer::RotatingWriter;
pub use writer::Sink;

/// Start building a logger with default options.
pub fn builder() -> Options {
    Options::new()
}
