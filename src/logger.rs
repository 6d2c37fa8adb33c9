use std::fmt;
use std::panic::Location;

use tracing::Dispatch;

use crate::encoder::EntryFormat;
use crate::field::render_fields;
use crate::options::ResolvedOptions;
use crate::writer::Sink;
use crate::{Encoding, Field, Level, Result};

macro_rules! emit_event {
    ($tracing_level:expr, $level:expr, $caller:expr, $fields:expr, $message:expr) => {
        tracing::event!(
            target: "sugarlog",
            $tracing_level,
            severity = $level.as_str(),
            caller = $caller,
            fields = $fields,
            "{}",
            $message
        )
    };
}

/// A configured logging pipeline: encoder, sink and minimum level.
///
/// Immutable once built. Every entry records the file and line of the code
/// that called the logging method.
pub struct Logger {
    dispatch: Dispatch,
    writer: Sink,
    level: Level,
    encoding: Encoding,
}

impl Logger {
    /// Build a logger from fully resolved options.
    ///
    /// Nothing is opened here; a sink that cannot be written to fails on the
    /// first entry.
    pub fn new(options: ResolvedOptions) -> Self {
        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .with_writer(options.writer.clone())
            .with_max_level(options.level.as_filter())
            .event_format(EntryFormat::new(options.encoding))
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
            writer: options.writer,
            level: options.level,
            encoding: options.encoding,
        }
    }

    /// Minimum level this logger emits.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Encoder profile used for every entry.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Whether an entry at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level.enabled(self.level)
    }

    /// Logs a message at Debug level with the given fields.
    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Debug, &msg, fields, Location::caller());
    }

    /// Logs a message at Info level with the given fields.
    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Info, &msg, fields, Location::caller());
    }

    /// Logs a message at Warn level with the given fields.
    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Warn, &msg, fields, Location::caller());
    }

    /// Logs a message at Error level with the given fields.
    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Error, &msg, fields, Location::caller());
    }

    /// Logs a message at Fatal level, flushes the sink and exits the process
    /// with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        self.emit(Level::Fatal, &msg, fields, Location::caller());
        self.exit()
    }

    /// Logs a message at a level chosen at runtime.
    ///
    /// This never terminates the process, not even for [`Level::Fatal`];
    /// only [`Logger::fatal`] does.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        self.emit(level, &msg, fields, Location::caller());
    }

    /// Flush the sink. This is the only logging operation that can fail.
    pub fn sync(&self) -> Result<()> {
        Ok(self.writer.sync()?)
    }

    /// Printf-style and free-form logging on top of this logger.
    pub fn sugar(&self) -> SugaredLogger<'_> {
        SugaredLogger { logger: self }
    }

    fn exit(&self) -> ! {
        let _ = self.sync();
        std::process::exit(1)
    }

    fn emit(
        &self,
        level: Level,
        message: &dyn fmt::Display,
        fields: &[Field],
        location: &Location<'_>,
    ) {
        if !self.enabled(level) {
            return;
        }

        // Everything user supplied is rendered before dispatch. A `Display`
        // impl that logs must not run while the dispatcher is entered.
        let message = message.to_string();
        let caller = short_caller(location);
        // Tracing field names are static, so user fields travel as one JSON
        // object string that the encoders splice in as is.
        let fields = render_fields(fields);
        let (message, caller, fields) = (message.as_str(), caller.as_str(), fields.as_str());

        tracing::dispatcher::with_default(&self.dispatch, || match level {
            Level::Debug => emit_event!(tracing::Level::DEBUG, level, caller, fields, message),
            Level::Info => emit_event!(tracing::Level::INFO, level, caller, fields, message),
            Level::Warn => emit_event!(tracing::Level::WARN, level, caller, fields, message),
            Level::Error | Level::Fatal => {
                emit_event!(tracing::Level::ERROR, level, caller, fields, message)
            }
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("writer", &self.writer)
            .field("level", &self.level)
            .field("encoding", &self.encoding)
            .finish()
    }
}

/// Keep the last directory and the file name: `src/main.rs:12`.
pub(crate) fn short_caller(location: &Location<'_>) -> String {
    let file = location.file();
    let mut separators = file.rmatch_indices(['/', '\\']);
    let file = match (separators.next(), separators.next()) {
        (Some(_), Some((idx, _))) => &file[idx + 1..],
        _ => file,
    };
    format!("{}:{}", file, location.line())
}

/// Logging with free-form or template-formatted messages instead of fields.
#[derive(Debug, Clone, Copy)]
pub struct SugaredLogger<'a> {
    logger: &'a Logger,
}

impl SugaredLogger<'_> {
    /// Logs a free-form message at Debug level.
    #[track_caller]
    pub fn debug(&self, msg: impl fmt::Display) {
        self.logger.emit(Level::Debug, &msg, &[], Location::caller());
    }

    /// Logs a free-form message at Info level.
    #[track_caller]
    pub fn info(&self, msg: impl fmt::Display) {
        self.logger.emit(Level::Info, &msg, &[], Location::caller());
    }

    /// Logs a free-form message at Warn level.
    #[track_caller]
    pub fn warn(&self, msg: impl fmt::Display) {
        self.logger.emit(Level::Warn, &msg, &[], Location::caller());
    }

    /// Logs a free-form message at Error level.
    #[track_caller]
    pub fn error(&self, msg: impl fmt::Display) {
        self.logger.emit(Level::Error, &msg, &[], Location::caller());
    }

    /// Logs at Fatal level, then exits the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: impl fmt::Display) -> ! {
        self.logger.emit(Level::Fatal, &msg, &[], Location::caller());
        self.logger.exit()
    }

    /// Logs a formatted message at Debug level: `sugar.debugf(format_args!(..))`.
    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.logger.emit(Level::Debug, &args, &[], Location::caller());
    }

    /// Logs a formatted message at Info level.
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.logger.emit(Level::Info, &args, &[], Location::caller());
    }

    /// Logs a formatted message at Warn level.
    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.logger.emit(Level::Warn, &args, &[], Location::caller());
    }

    /// Logs a formatted message at Error level.
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.logger.emit(Level::Error, &args, &[], Location::caller());
    }

    /// Logs at Fatal level, then exits the process with status 1.
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.logger.emit(Level::Fatal, &args, &[], Location::caller());
        self.logger.exit()
    }

    /// Flush the underlying logger's sink.
    pub fn sync(&self) -> Result<()> {
        self.logger.sync()
    }
}

/// Concatenates `Display` operands without separators. Built by the
/// `debug!`..`fatal!` macros.
#[doc(hidden)]
pub struct Concat<'a>(pub &'a [&'a dyn fmt::Display]);

impl fmt::Display for Concat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|part| part.fmt(f))
    }
}
