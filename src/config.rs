use serde::{Deserialize, Serialize};

#[cfg(feature = "file")]
use crate::rotation::FileOptions;
use crate::{Encoding, Level, Options};

/// Configuration for logging, loadable from any serde format.
///
/// ```yaml
/// level: debug
/// encoding: json
/// file:
///   filename: /var/log/app.log
///   max_size: 100
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level name. Unknown names mean "info".
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output encoding ("console" or "json")
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Rotating file output; entries go to stderr when absent.
    #[cfg(feature = "file")]
    #[serde(default)]
    pub file: Option<FileLogConfig>,
}

impl LogConfig {
    /// Create a new LogConfig with defaults
    pub fn new() -> Self {
        Self {
            level: default_log_level(),
            encoding: default_encoding(),
            #[cfg(feature = "file")]
            file: None,
        }
    }

    /// Set log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set output encoding
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set file logging configuration
    #[cfg(feature = "file")]
    pub fn with_file(mut self, file: FileLogConfig) -> Self {
        self.file = Some(file);
        self
    }

    /// Translate into builder [`Options`].
    pub fn into_options(self) -> Options {
        let options = Options::new()
            .with_level(Level::from_name(&self.level))
            .with_encoding(Encoding::from_name(&self.encoding));

        #[cfg(feature = "file")]
        let options = match self.file {
            Some(file) => options.with_file_writer(file.into_file_options()),
            None => options,
        };

        options
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_encoding() -> String {
    "console".to_string()
}

/// Configuration for the rotating file sink. Zero or missing values take the
/// sink's defaults.
#[cfg(feature = "file")]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileLogConfig {
    /// Path to the log file
    #[serde(default)]
    pub filename: Option<std::path::PathBuf>,
    /// Megabytes before rotation
    #[serde(default)]
    pub max_size: u64,
    /// Days to keep backups
    #[serde(default)]
    pub max_age: u64,
    /// Number of backups to keep
    #[serde(default)]
    pub max_backups: usize,
    /// Gzip rotated files (default true)
    #[serde(default)]
    pub compress: Option<bool>,
    /// Stamp backups with local time (default true)
    #[serde(default)]
    pub local_time: Option<bool>,
}

#[cfg(feature = "file")]
impl FileLogConfig {
    /// Create a new FileLogConfig
    pub fn new<P: Into<std::path::PathBuf>>(filename: P) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Default::default()
        }
    }

    /// Translate into [`FileOptions`].
    pub fn into_file_options(self) -> FileOptions {
        let mut options = FileOptions::new()
            .with_max_size(self.max_size)
            .with_max_age(self.max_age)
            .with_max_backups(self.max_backups);
        if let Some(filename) = self.filename {
            options = options.with_filename(filename);
        }
        if let Some(compress) = self.compress {
            options = options.with_compress(compress);
        }
        if let Some(local_time) = self.local_time {
            options = options.with_local_time(local_time);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_new() {
        let config = LogConfig::new();
        assert_eq!(config.level, "info");
        assert_eq!(config.encoding, "console");
        #[cfg(feature = "file")]
        assert!(config.file.is_none());
    }

    #[test]
    fn test_log_config_into_options() {
        let logger = LogConfig::new()
            .with_level("ERROR")
            .with_encoding("json")
            .into_options()
            .build();
        assert_eq!(logger.level(), Level::Error);
        assert_eq!(logger.encoding(), Encoding::Json);
    }

    #[test]
    fn test_log_config_unknown_level_is_info() {
        let logger = LogConfig::new().with_level("chatty").into_options().build();
        assert_eq!(logger.level(), Level::Info);
    }

    #[test]
    fn test_log_config_from_yaml_defaults() {
        let config: LogConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.encoding, "console");
    }

    #[cfg(feature = "file")]
    #[test]
    fn test_log_config_from_yaml_with_file() {
        let yaml = r#"
level: warn
encoding: json
file:
  filename: /var/log/app.log
  max_size: 5
  compress: false
"#;
        let config: LogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.level, "warn");
        let file = config.file.expect("file section");
        let policy = file.into_file_options().resolve();
        assert_eq!(policy.filename, std::path::PathBuf::from("/var/log/app.log"));
        assert_eq!(policy.max_size, 5);
        assert_eq!(policy.max_age, 7);
        assert_eq!(policy.max_backups, 10);
        assert!(!policy.compress);
        assert!(policy.local_time);
    }

    #[cfg(feature = "file")]
    #[test]
    fn test_log_config_from_toml() {
        let toml_str = r#"
level = "debug"

[file]
filename = "app.log"
max_backups = 2
"#;
        let config: LogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.encoding, "console");
        let policy = config.file.unwrap().into_file_options().resolve();
        assert_eq!(policy.filename, std::path::PathBuf::from("app.log"));
        assert_eq!(policy.max_backups, 2);
        assert_eq!(policy.max_size, 200);
    }

    #[cfg(feature = "file")]
    #[test]
    fn test_file_log_config_new() {
        let config = FileLogConfig::new("test.log");
        assert_eq!(config.filename, Some(std::path::PathBuf::from("test.log")));
        assert_eq!(config.max_size, 0);
        assert!(config.compress.is_none());
    }
}
