use std::fmt;
#[cfg(feature = "file")]
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Arc;
#[cfg(feature = "file")]
use std::sync::{Mutex, PoisonError};

#[cfg(feature = "file")]
use time::{OffsetDateTime, UtcOffset};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[cfg(feature = "file")]
use crate::rotation::RotationPolicy;

/// Where encoded entries end up.
#[derive(Clone)]
pub enum Sink {
    Stderr,
    Stdout,
    #[cfg(feature = "file")]
    File(RotatingWriter),
    /// Any caller-supplied [`MakeWriter`].
    Custom(Arc<BoxMakeWriter>),
}

impl Sink {
    /// Wrap an arbitrary writer factory.
    pub fn custom<W>(make_writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Sink::Custom(Arc::new(BoxMakeWriter::new(make_writer)))
    }

    /// Flush buffered output down to the underlying device.
    pub fn sync(&self) -> io::Result<()> {
        self.make_writer().flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stderr => f.write_str("Stderr"),
            Sink::Stdout => f.write_str("Stdout"),
            #[cfg(feature = "file")]
            Sink::File(writer) => f.debug_tuple("File").field(writer).finish(),
            Sink::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Writer handed out by [`Sink`] for a single entry.
pub enum SinkWriter<'a> {
    Stderr(io::Stderr),
    Stdout(io::Stdout),
    #[cfg(feature = "file")]
    File(RotatingWriter),
    Custom(Box<dyn Write + 'a>),
}

impl Write for SinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SinkWriter::Stderr(w) => w.write(buf),
            SinkWriter::Stdout(w) => w.write(buf),
            #[cfg(feature = "file")]
            SinkWriter::File(w) => w.write(buf),
            SinkWriter::Custom(w) => w.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            SinkWriter::Stderr(w) => w.write_all(buf),
            SinkWriter::Stdout(w) => w.write_all(buf),
            #[cfg(feature = "file")]
            SinkWriter::File(w) => w.write_all(buf),
            SinkWriter::Custom(w) => w.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkWriter::Stderr(w) => w.flush(),
            SinkWriter::Stdout(w) => w.flush(),
            #[cfg(feature = "file")]
            SinkWriter::File(w) => w.flush(),
            SinkWriter::Custom(w) => w.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for Sink {
    type Writer = SinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            Sink::Stderr => SinkWriter::Stderr(io::stderr()),
            Sink::Stdout => SinkWriter::Stdout(io::stdout()),
            #[cfg(feature = "file")]
            Sink::File(writer) => SinkWriter::File(writer.clone()),
            Sink::Custom(make_writer) => SinkWriter::Custom((**make_writer).make_writer()),
        }
    }
}

/// State of the active log file.
#[cfg(feature = "file")]
#[derive(Debug)]
struct FileState {
    file: File,
    size: u64,
}

#[cfg(feature = "file")]
#[derive(Debug)]
struct Inner {
    policy: RotationPolicy,
    max_bytes: u64,
    offset: UtcOffset,
    state: Mutex<Option<FileState>>,
    mill: Mutex<()>,
}

/// A writer that rotates its file once a size threshold would be exceeded.
///
/// The file is opened lazily on the first write, so building a writer never
/// touches the filesystem. Clones share the same file. Retention and
/// compression of backups run on a background thread after each rotation.
#[cfg(feature = "file")]
#[derive(Debug, Clone)]
pub struct RotatingWriter {
    inner: Arc<Inner>,
}

#[cfg(feature = "file")]
impl RotatingWriter {
    /// Create a new rotating writer.
    pub fn new(policy: RotationPolicy) -> Self {
        let max_bytes = policy.max_bytes();
        Self::with_max_bytes(policy, max_bytes)
    }

    pub(crate) fn with_max_bytes(policy: RotationPolicy, max_bytes: u64) -> Self {
        let offset = if policy.local_time {
            crate::encoder::local_offset()
        } else {
            UtcOffset::UTC
        };
        Self {
            inner: Arc::new(Inner {
                policy,
                max_bytes,
                offset,
                state: Mutex::new(None),
                mill: Mutex::new(()),
            }),
        }
    }

    /// The resolved rotation parameters.
    pub fn policy(&self) -> &RotationPolicy {
        &self.inner.policy
    }

    /// Close the active file, move it aside as a backup and start a new one.
    pub fn rotate(&self) -> io::Result<()> {
        let mut guard = self.lock();
        *guard = None;
        *guard = Some(self.open_new()?);
        self.spawn_mill();
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<FileState>> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.inner.offset)
    }

    /// Open the configured file for appending, rotating first when the
    /// pending write would not fit.
    fn open_existing_or_new(&self, write_len: u64) -> io::Result<FileState> {
        let path = &self.inner.policy.filename;
        let size = match path.metadata() {
            Ok(meta) => meta.len(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return self.open_new(),
            Err(err) => return Err(err),
        };

        if size + write_len > self.inner.max_bytes {
            let state = self.open_new()?;
            self.spawn_mill();
            return Ok(state);
        }

        let file = OpenOptions::new().append(true).open(path)?;
        Ok(FileState { file, size })
    }

    /// Move any existing file to a backup name and create an empty one.
    fn open_new(&self) -> io::Result<FileState> {
        let path = &self.inner.policy.filename;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        if path.exists() {
            let backup = self.inner.policy.backup_name(self.now())?;
            std::fs::rename(path, backup)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(FileState { file, size: 0 })
    }

    fn spawn_mill(&self) {
        let inner = Arc::clone(&self.inner);
        std::thread::spawn(move || {
            let _serial = inner.mill.lock().unwrap_or_else(PoisonError::into_inner);
            let now = OffsetDateTime::now_utc().to_offset(inner.offset);
            if let Err(err) = inner.policy.mill(now) {
                eprintln!(
                    "sugarlog: failed to process backups of '{}': {}",
                    inner.policy.filename.display(),
                    err
                );
            }
        });
    }
}

#[cfg(feature = "file")]
impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let write_len = buf.len() as u64;
        if write_len > self.inner.max_bytes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write length {} exceeds maximum file size {}",
                    write_len, self.inner.max_bytes
                ),
            ));
        }

        let mut guard = self.lock();
        let state = match guard.take() {
            None => self.open_existing_or_new(write_len)?,
            Some(state) if state.size + write_len > self.inner.max_bytes => {
                drop(state);
                let state = self.open_new()?;
                self.spawn_mill();
                state
            }
            Some(state) => state,
        };
        let state = guard.insert(state);

        let written = state.file.write(buf)?;
        state.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self.lock();
        if let Some(state) = guard.as_mut() {
            state.file.flush()?;
            state.file.sync_all()
        } else {
            Ok(())
        }
    }
}
