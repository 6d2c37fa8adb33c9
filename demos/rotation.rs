//! Size-based file rotation with gzip-compressed backups.
//!
//! Writes a little over 2 MB to `./logs/rotation.log` with a 1 MB limit, so
//! two backups are left next to the active file.

use sugarlog::{FileOptions, Options};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = Options::new()
        .with_encoding("json")
        .with_file_writer(
            FileOptions::new()
                .with_filename("logs/rotation.log")
                .with_max_size(1)
                .with_max_backups(3)
                .with_compress(true),
        )
        .build();

    let sugar = logger.sugar();
    let payload = "r".repeat(1024);
    for i in 0..2200 {
        sugar.infof(format_args!("line {} {}", i, payload));
    }

    logger.sync()?;
    println!("Logs written to ./logs/");
    Ok(())
}
