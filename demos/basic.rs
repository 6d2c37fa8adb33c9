//! Basic console logging through the process-wide logger.
//!
//! Entries go to stderr as tab separated lines.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    sugarlog::set_options(sugarlog::builder().with_level_str("debug"));

    sugarlog::debug("This is a debug message");
    sugarlog::info!("Listening on port ", 8080);
    sugarlog::warnf!("{} of {} workers busy", 7, 8);
    sugarlog::error("This is an error message");

    sugarlog::sync()?;
    Ok(())
}
