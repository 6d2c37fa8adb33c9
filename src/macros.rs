//! Macros over the process-wide logger.
//!
//! `debug!`..`fatal!` concatenate their operands, which may be any mix of
//! `Display` values. `debugf!`..`fatalf!` take a `format!` template.
//!
//! ```rust
//! let attempts = 3;
//! sugarlog::warn!("gave up after ", attempts, " attempts");
//! sugarlog::warnf!("gave up after {} attempts", attempts);
//! ```

#[macro_export]
macro_rules! debug {
    ($($arg:expr),+ $(,)?) => {
        $crate::debug($crate::Concat(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:expr),+ $(,)?) => {
        $crate::info($crate::Concat(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:expr),+ $(,)?) => {
        $crate::warn($crate::Concat(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:expr),+ $(,)?) => {
        $crate::error($crate::Concat(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

/// Logs at Fatal level, then exits the process with status 1.
#[macro_export]
macro_rules! fatal {
    ($($arg:expr),+ $(,)?) => {
        $crate::fatal($crate::Concat(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::debugf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::infof(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::warnf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::errorf(::std::format_args!($($arg)+))
    };
}

/// Logs at Fatal level, then exits the process with status 1.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::fatalf(::std::format_args!($($arg)+))
    };
}
