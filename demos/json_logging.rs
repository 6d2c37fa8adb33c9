//! Structured JSON logging with typed fields.
//!
//! Each entry is one JSON object per line on stdout.

use sugarlog::{Field, Options};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = Options::new().with_encoding("json").with_stdout().build();

    logger.info(
        "User logged in",
        &[
            Field::u64("user_id", 12345),
            Field::string("username", "admin"),
            Field::string("ip_address", "192.168.1.100"),
        ],
    );

    logger.warn(
        "Request slow",
        &[
            Field::namespace("http"),
            Field::string("method", "GET"),
            Field::f64("elapsed_ms", 812.5),
        ],
    );

    logger.error(
        "Database connection failed",
        &[
            Field::string("database", "postgres"),
            Field::i32("retry_count", 3),
            Field::any("last_error", &std::io::ErrorKind::TimedOut),
        ],
    );

    let sugar = logger.sugar();
    sugar.infof(format_args!("{} jobs queued", 42));

    logger.sync()?;
    Ok(())
}
