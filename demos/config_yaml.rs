//! Build a logger from a YAML configuration document.

const CONFIG: &str = r#"
level: debug
encoding: console
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: sugarlog::LogConfig = serde_yaml::from_str(CONFIG)?;

    println!("Configuration loaded successfully:");
    println!("  Level: {}", config.level);
    println!("  Encoding: {}", config.encoding);
    #[cfg(feature = "file")]
    if let Some(ref file) = config.file {
        println!("  File: {:?}", file.filename);
    }

    sugarlog::set_options(config.into_options());

    sugarlog::debug("Debug level message");
    sugarlog::info("Info level message");
    sugarlog::warn("Warning level message");

    sugarlog::sync()?;
    Ok(())
}
