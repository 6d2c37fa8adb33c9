//! Process-wide default logger.
//!
//! The default logger is built from [`Options::new`] the first time it is
//! used. [`set_options`] and [`set_logger`] replace it at any time: the new
//! logger is fully built before it is swapped in, and calls already in
//! flight keep using the instance they started with.
//!
//! ```rust
//! sugarlog::set_options(sugarlog::Options::new().with_level_str("debug"));
//! sugarlog::infof(format_args!("listening on {}", 8080));
//! sugarlog::debug("ready");
//! ```

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::{Logger, Options, Result};

static LOGGER: Lazy<RwLock<Arc<Logger>>> =
    Lazy::new(|| RwLock::new(Arc::new(Options::new().build())));

/// The current process-wide logger.
pub fn logger() -> Arc<Logger> {
    Arc::clone(&LOGGER.read().unwrap_or_else(PoisonError::into_inner))
}

/// Install `logger` as the process-wide logger and return the previous one.
pub fn set_logger(logger: Logger) -> Arc<Logger> {
    let logger = Arc::new(logger);
    let mut current = LOGGER.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *current, logger)
}

/// Rebuild the process-wide logger from `options`.
pub fn set_options(options: Options) {
    set_logger(options.build());
}

/// Logs a message at Debug level on the process-wide logger.
#[track_caller]
pub fn debug(msg: impl fmt::Display) {
    logger().sugar().debug(msg);
}

/// Logs a message at Info level on the process-wide logger.
#[track_caller]
pub fn info(msg: impl fmt::Display) {
    logger().sugar().info(msg);
}

/// Logs a message at Warn level on the process-wide logger.
#[track_caller]
pub fn warn(msg: impl fmt::Display) {
    logger().sugar().warn(msg);
}

/// Logs a message at Error level on the process-wide logger.
#[track_caller]
pub fn error(msg: impl fmt::Display) {
    logger().sugar().error(msg);
}

/// Logs a message at Fatal level on the process-wide logger, then exits the
/// process with status 1.
#[track_caller]
pub fn fatal(msg: impl fmt::Display) -> ! {
    logger().sugar().fatal(msg)
}

/// Logs a formatted message at Debug level on the process-wide logger.
#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    logger().sugar().debugf(args);
}

/// Logs a formatted message at Info level on the process-wide logger.
#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    logger().sugar().infof(args);
}

/// Logs a formatted message at Warn level on the process-wide logger.
#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    logger().sugar().warnf(args);
}

/// Logs a formatted message at Error level on the process-wide logger.
#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    logger().sugar().errorf(args);
}

/// Logs a formatted message at Fatal level on the process-wide logger, then
/// exits the process with status 1.
#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) -> ! {
    logger().sugar().fatalf(args)
}

/// Flush the process-wide logger's sink.
pub fn sync() -> Result<()> {
    logger().sync()
}
