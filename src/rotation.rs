use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Default maximum size of the active file, in megabytes.
pub const DEFAULT_MAX_SIZE: u64 = 200;
/// Default retention of backups, in days.
pub const DEFAULT_MAX_AGE: u64 = 7;
/// Default number of backups kept.
pub const DEFAULT_MAX_BACKUPS: usize = 10;

const MEGABYTE: u64 = 1024 * 1024;
const COMPRESS_SUFFIX: &str = ".gz";
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Default log file location: `<tmp>/log/sugarlog.log`.
pub fn default_filename() -> PathBuf {
    std::env::temp_dir().join("log").join("sugarlog.log")
}

/// Options for the rotating file sink.
///
/// Zero numeric values and unset flags are replaced with defaults by
/// [`FileOptions::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOptions {
    filename: Option<PathBuf>,
    max_size: u64,
    max_age: u64,
    max_backups: usize,
    compress: Option<bool>,
    local_time: Option<bool>,
}

impl FileOptions {
    /// Options with every value unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// File to write logs to. Backups are created in the same directory.
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Maximum size in megabytes of the file before it gets rotated.
    pub fn with_max_size(mut self, megabytes: u64) -> Self {
        self.max_size = megabytes;
        self
    }

    /// Maximum number of days to retain backups, based on the timestamp
    /// encoded in their filename.
    pub fn with_max_age(mut self, days: u64) -> Self {
        self.max_age = days;
        self
    }

    /// Maximum number of backups to retain.
    pub fn with_max_backups(mut self, backups: usize) -> Self {
        self.max_backups = backups;
        self
    }

    /// Whether rotated files are gzip-compressed.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = Some(compress);
        self
    }

    /// Whether backup timestamps use local time instead of UTC.
    pub fn with_local_time(mut self, local_time: bool) -> Self {
        self.local_time = Some(local_time);
        self
    }

    /// Fill unset values with defaults.
    pub fn resolve(self) -> RotationPolicy {
        RotationPolicy {
            filename: self.filename.unwrap_or_else(default_filename),
            max_size: if self.max_size == 0 {
                DEFAULT_MAX_SIZE
            } else {
                self.max_size
            },
            max_age: if self.max_age == 0 {
                DEFAULT_MAX_AGE
            } else {
                self.max_age
            },
            max_backups: if self.max_backups == 0 {
                DEFAULT_MAX_BACKUPS
            } else {
                self.max_backups
            },
            compress: self.compress.unwrap_or(true),
            local_time: self.local_time.unwrap_or(true),
        }
    }
}

/// Fully resolved parameters of a rotating file sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Path of the active log file.
    pub filename: PathBuf,
    /// Rotate once the active file would exceed this many megabytes.
    pub max_size: u64,
    /// Remove backups older than this many days.
    pub max_age: u64,
    /// Keep at most this many backups.
    pub max_backups: usize,
    /// Gzip backups after rotation.
    pub compress: bool,
    /// Stamp backups with local time rather than UTC.
    pub local_time: bool,
}

/// A retired log file found next to the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub path: PathBuf,
    /// Rotation time parsed from the file name.
    pub timestamp: OffsetDateTime,
    /// Whether the file carries the `.gz` suffix.
    pub compressed: bool,
}

impl RotationPolicy {
    /// Size threshold in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_size.saturating_mul(MEGABYTE)
    }

    fn dir(&self) -> PathBuf {
        match self.filename.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Split `dir/app.log` into the backup prefix `app-` and extension `.log`.
    fn prefix_and_ext(&self) -> (String, String) {
        let name = self
            .filename
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .filename
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let stem = &name[..name.len() - ext.len()];
        (format!("{}-", stem), ext)
    }

    /// Name a backup rotated at `at`: `dir/app-2026-01-09T10-30-00.000.log`.
    pub fn backup_name(&self, at: OffsetDateTime) -> io::Result<PathBuf> {
        let (prefix, ext) = self.prefix_and_ext();
        let stamp = at
            .format(time::macros::format_description!(
                "[year]-[month]-[day]T[hour]-[minute]-[second].[subsecond digits:3]"
            ))
            .map_err(io::Error::other)?;
        Ok(self.dir().join(format!("{}{}{}", prefix, stamp, ext)))
    }

    fn parse_backup(&self, name: &str, offset: UtcOffset) -> Option<(OffsetDateTime, bool)> {
        let (prefix, ext) = self.prefix_and_ext();
        let (plain, compressed) = match name.strip_suffix(COMPRESS_SUFFIX) {
            Some(plain) => (plain, true),
            None => (name, false),
        };
        let stamp = plain.strip_prefix(&prefix)?.strip_suffix(&ext)?;
        let parsed = PrimitiveDateTime::parse(
            stamp,
            time::macros::format_description!(
                "[year]-[month]-[day]T[hour]-[minute]-[second].[subsecond digits:3]"
            ),
        )
        .ok()?;
        Some((parsed.assume_offset(offset), compressed))
    }

    /// List backups, newest first.
    pub fn backups(&self, offset: UtcOffset) -> io::Result<Vec<Backup>> {
        let mut backups = Vec::new();
        for entry in fs::read_dir(self.dir())?.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some((timestamp, compressed)) = self.parse_backup(&name, offset) {
                backups.push(Backup {
                    path: entry.path(),
                    timestamp,
                    compressed,
                });
            }
        }
        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    /// Backups stamped before this instant have expired. `None` when
    /// `max_age` reaches past the representable date range, which disables
    /// age expiry.
    fn age_cutoff(&self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        let days = i64::try_from(self.max_age).ok()?;
        let seconds = days.checked_mul(SECONDS_PER_DAY)?;
        now.checked_sub(Duration::seconds(seconds))
    }

    /// Enforce retention and compression on existing backups.
    ///
    /// Backups beyond `max_backups` are removed first, then any older than
    /// `max_age` days, then the remainder is compressed when enabled. A backup
    /// and its `.gz` twin count as one.
    pub fn mill(&self, now: OffsetDateTime) -> io::Result<()> {
        let offset = now.offset();
        let mut kept = Vec::new();
        let mut remove = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for backup in self.backups(offset)? {
            let key = backup
                .path
                .to_string_lossy()
                .trim_end_matches(COMPRESS_SUFFIX)
                .to_string();
            seen.insert(key);
            if seen.len() > self.max_backups {
                remove.push(backup);
            } else {
                kept.push(backup);
            }
        }

        let cutoff = self.age_cutoff(now);
        let (expired, kept): (Vec<_>, Vec<_>) = kept
            .into_iter()
            .partition(|b| cutoff.is_some_and(|cutoff| b.timestamp < cutoff));
        remove.extend(expired);

        for backup in &remove {
            match fs::remove_file(&backup.path) {
                Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err),
                _ => {}
            }
        }

        if self.compress {
            for backup in kept.iter().filter(|b| !b.compressed) {
                compress(&backup.path)?;
            }
        }

        Ok(())
    }
}

/// Gzip `path` into `path.gz` and remove the original.
fn compress(path: &Path) -> io::Result<()> {
    let compressed = PathBuf::from(format!("{}{}", path.display(), COMPRESS_SUFFIX));
    let mut reader = BufReader::new(File::open(path)?);
    let out = File::create(&compressed)?;
    let mut encoder = GzEncoder::new(out, flate2::Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?.sync_all()?;
    fs::remove_file(path)
}
