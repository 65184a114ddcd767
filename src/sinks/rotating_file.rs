//! Rotating file sink
//!
//! Appends to a base file and moves it aside when the rotation strategy
//! fires. Backups are named `<file>.1` (newest) through `<file>.N`, each
//! optionally gzip-compressed to `<file>.N.gz`.

use crate::core::{LoggerError, Result, Sink};
use chrono::{DateTime, Local, Timelike};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const HOUR: Duration = Duration::from_secs(3600);

/// When to rotate the log file
///
/// # Examples
///
/// ```
/// use rust_batch_logger::sinks::RotationStrategy;
///
/// // Rotate when the file reaches 100 MB
/// let by_size = RotationStrategy::Size { max_bytes: 100 * 1024 * 1024 };
///
/// // Rotate once a day, at 02:00 or later
/// let daily = RotationStrategy::daily(2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationStrategy {
    /// Rotate once the file holds at least `max_bytes`
    Size { max_bytes: u64 },

    /// Rotate on the first write of a new day at or after `hour` (0-23)
    Daily { hour: u8 },

    /// Rotate when an hour has passed since the last rotation
    Hourly,

    /// Leave rotation to an external tool
    Never,
}

impl Default for RotationStrategy {
    fn default() -> Self {
        RotationStrategy::Size {
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

impl RotationStrategy {
    #[must_use]
    pub fn size(max_bytes: u64) -> Self {
        RotationStrategy::Size { max_bytes }
    }

    /// # Panics
    ///
    /// Panics if hour is greater than 23
    #[must_use]
    pub fn daily(hour: u8) -> Self {
        assert!(hour <= 23, "Hour must be between 0 and 23");
        RotationStrategy::Daily { hour }
    }
}

/// Rotation settings for [`RotatingFileSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    pub strategy: RotationStrategy,
    /// Rotated files kept on disk; older ones are deleted
    pub max_backups: usize,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::default(),
            max_backups: 5,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_strategy(mut self, strategy: RotationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(self, max_bytes: u64) -> Self {
        self.with_strategy(RotationStrategy::Size { max_bytes })
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// File sink that rotates according to a [`RotationPolicy`]
///
/// # Examples
///
/// ```no_run
/// use rust_batch_logger::sinks::{RotatingFileSink, RotationPolicy};
///
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_compression(true);
/// let sink = RotatingFileSink::with_policy("/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    last_rotation: SystemTime,
}

impl RotatingFileSink {
    /// Open `path` with the default policy: 10 MB files, five backups.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "create log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let (file, current_size, last_rotation) = Self::open(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
            last_rotation,
        })
    }

    fn open(path: &Path) -> Result<(File, u64, SystemTime)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let metadata = file.metadata().map_err(|e| {
            LoggerError::file_sink(
                path.display().to_string(),
                format!("Cannot access file metadata: {}", e),
            )
        })?;
        // an existing file counts as rotated when it was last written
        let last_rotation = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        Ok((file, metadata.len(), last_rotation))
    }

    fn should_rotate(&self) -> bool {
        match self.policy.strategy {
            RotationStrategy::Never => false,
            RotationStrategy::Size { max_bytes } => self.current_size >= max_bytes,
            RotationStrategy::Daily { hour } => {
                let now = Local::now();
                let last: DateTime<Local> = self.last_rotation.into();
                now.date_naive() != last.date_naive() && now.hour() >= u32::from(hour)
            }
            RotationStrategy::Hourly => {
                SystemTime::now()
                    .duration_since(self.last_rotation)
                    .unwrap_or(Duration::ZERO)
                    >= HOUR
            }
        }
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.policy.max_backups == 0 {
            fs::remove_file(&self.base_path).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to discard current log file: {}", e),
                )
            })?;
        } else {
            self.shift_backups();

            let first = self.backup_path(1);
            fs::rename(&self.base_path, &first).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;

            if self.policy.compress {
                if let Err(e) = compress_file(&first) {
                    // the uncompressed backup stays in place
                    eprintln!("[LOGGER WARNING] Backup compression failed: {}", e);
                }
            }
        }

        let (file, size, _) = Self::open(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        self.last_rotation = SystemTime::now();
        Ok(())
    }

    /// Move `.i` to `.i+1`, dropping whatever falls off the end.
    fn shift_backups(&self) {
        let max = self.policy.max_backups;
        for path in [self.backup_path(max), gz_path(&self.backup_path(max))] {
            if path.exists() {
                if let Err(e) = fs::remove_file(&path) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove oldest backup {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }

        for i in (1..max).rev() {
            let from = self.backup_path(i);
            let to = self.backup_path(i + 1);
            for (from, to) in [(gz_path(&from), gz_path(&to)), (from, to)] {
                if from.exists() {
                    if let Err(e) = fs::rename(&from, &to) {
                        eprintln!(
                            "[LOGGER WARNING] Failed to shift backup {}: {}",
                            from.display(),
                            e
                        );
                    }
                }
            }
        }
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let filename = self
            .base_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        self.base_path.with_file_name(format!("{}.{}", filename, index))
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz` and remove the original once the compressed
/// copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    let target = gz_path(path);
    let mut temp = target.as_os_str().to_os_string();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    let result = (|| -> std::io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&temp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        std::io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&temp, &target)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compressed {} but could not remove it: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

impl Sink for RotatingFileSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.should_rotate() {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );
                if self.writer.is_none() {
                    let (file, size, last_rotation) = Self::open(&self.base_path)?;
                    self.writer = Some(BufWriter::new(file));
                    self.current_size = size;
                    self.last_rotation = last_rotation;
                }
                // let the file outgrow its limit instead of retrying every write
                self.current_size = 0;
                self.last_rotation = SystemTime::now();
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;
        writer.write_all(bytes)?;
        writer.flush()?;
        self.current_size += bytes.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
