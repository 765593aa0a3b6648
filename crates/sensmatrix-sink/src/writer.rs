use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use jiff::civil::DateTime;
use jiff::fmt::strtime;
use jiff::Zoned;
use sensmatrix_frame::CHANNEL_COUNT;

use crate::config::LogConfig;
use crate::error::{Result, SinkError};

/// Timestamp plus one field per channel.
pub const FIELDS_PER_ROW: usize = CHANNEL_COUNT + 1;

/// Appends one CSV row per sweep to a timestamped log file.
///
/// Construction only resolves the file name. The directory and file are
/// created on the first successful `write`; dropping the writer closes it.
///
/// The first open truncates whatever the path already holds. Reopening after
/// `close` appends to the rows this writer has already written.
pub struct LogWriter {
    basedir: PathBuf,
    path: PathBuf,
    file: Option<BufWriter<File>>,
    opened: bool,
    rows: u64,
}

impl LogWriter {
    /// Resolve the log path from `config` using the current local time.
    pub fn new(config: LogConfig) -> Result<Self> {
        Self::at(config, &Zoned::now())
    }

    /// Resolve the log path from `config` as of `created`.
    pub fn at(config: LogConfig, created: &Zoned) -> Result<Self> {
        let filename = strtime::format(&config.filename_template, created).map_err(|err| {
            SinkError::Template {
                template: config.filename_template.clone(),
                message: err.to_string(),
            }
        })?;
        if filename.chars().any(std::path::is_separator) {
            return Err(SinkError::Template {
                template: config.filename_template,
                message: format!("rendered file name {filename:?} contains a path separator"),
            });
        }
        let path = config.basedir.join(filename);
        tracing::info!(path = %path.display(), "logging sweeps");

        Ok(Self {
            basedir: config.basedir,
            path,
            file: None,
            opened: false,
            rows: 0,
        })
    }

    /// Full path of the log file, whether or not it exists yet.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written since construction.
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Write one sweep stamped with the current local time.
    pub fn write(&mut self, values: &[u16]) -> Result<()> {
        self.write_at(values, Zoned::now().datetime())
    }

    /// Write one sweep with an explicit timestamp.
    ///
    /// `values` must hold exactly one entry per channel; anything else fails
    /// before the file is touched.
    pub fn write_at(&mut self, values: &[u16], timestamp: DateTime) -> Result<()> {
        let row = format_row(values, timestamp)?;
        let file = self.ensure_open()?;
        if let Err(err) = file.write_all(row.as_bytes()).and_then(|()| file.flush()) {
            // Drop the handle without flushing so no more bytes follow a torn row.
            if let Some(file) = self.file.take() {
                let _ = file.into_parts();
            }
            tracing::warn!(error = %err, path = %self.path.display(), "log write failed");
            return Err(SinkError::Io(err));
        }
        self.rows += 1;
        tracing::debug!(rows = self.rows, "sweep written");
        Ok(())
    }

    /// Flush and release the file. Safe to call repeatedly or before any write.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            tracing::debug!(path = %self.path.display(), rows = self.rows, "log closed");
        }
        Ok(())
    }

    fn ensure_open(&mut self) -> Result<&mut BufWriter<File>> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                let file = self.open()?;
                self.opened = true;
                file
            }
        };
        Ok(self.file.insert(file))
    }

    fn open(&self) -> Result<BufWriter<File>> {
        if !self.basedir.is_dir() {
            std::fs::create_dir_all(&self.basedir).map_err(|source| SinkError::CreateDir {
                path: self.basedir.clone(),
                source,
            })?;
            tracing::debug!(dir = %self.basedir.display(), "created log directory");
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if self.opened {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.clone(),
                source,
            })?;
        Ok(BufWriter::new(file))
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(error = %err, path = %self.path.display(), "failed to close log");
        }
    }
}

/// Render a sweep as `<timestamp>,<v0>,...,<v63>\n`.
pub fn format_row(values: &[u16], timestamp: DateTime) -> Result<String> {
    if values.len() != CHANNEL_COUNT {
        return Err(SinkError::Length {
            expected: CHANNEL_COUNT,
            actual: values.len(),
        });
    }

    let mut row = String::with_capacity(32 + values.len() * 5);
    row.push_str(&format_timestamp(timestamp));
    for value in values {
        let _ = write!(row, ",{value}");
    }
    row.push('\n');
    Ok(row)
}

/// ISO-8601 local timestamp with microseconds, e.g. `2024-05-01T12:00:00.000123`.
pub fn format_timestamp(timestamp: DateTime) -> String {
    format!(
        "{}.{:06}",
        timestamp.strftime("%Y-%m-%dT%H:%M:%S"),
        timestamp.subsec_nanosecond() / 1_000
    )
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "sensmatrix-sink-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ))
    }

    fn sweep() -> Vec<u16> {
        (0..CHANNEL_COUNT as u16).map(|v| v * 16).collect()
    }

    #[test]
    fn timestamp_has_microseconds() {
        let ts = date(2024, 1, 2).at(3, 4, 5, 123_456_789);
        assert_eq!(format_timestamp(ts), "2024-01-02T03:04:05.123456");

        let ts = date(2024, 12, 31).at(23, 59, 59, 0);
        assert_eq!(format_timestamp(ts), "2024-12-31T23:59:59.000000");
    }

    #[test]
    fn row_shape() {
        let ts = date(2024, 1, 2).at(3, 4, 5, 0);
        let row = format_row(&sweep(), ts).unwrap();
        assert!(row.ends_with('\n'));
        assert_eq!(row.matches('\n').count(), 1);

        let fields: Vec<&str> = row.trim_end().split(',').collect();
        assert_eq!(fields.len(), FIELDS_PER_ROW);
        assert_eq!(fields[0], "2024-01-02T03:04:05.000000");
        assert_eq!(fields[1], "0");
        assert_eq!(fields[64], "1008");
    }

    #[test]
    fn construction_does_no_io() {
        let dir = unique_temp_dir("lazy");
        let writer = LogWriter::new(LogConfig::default().with_basedir(&dir)).unwrap();
        assert!(!dir.exists());
        assert!(!writer.is_open());
        drop(writer);
        assert!(!dir.exists());
    }

    #[test]
    fn path_uses_template_at_creation() {
        let created: Zoned = "2024-03-04T05:06:07[UTC]".parse().unwrap();
        let writer = LogWriter::at(LogConfig::default().with_basedir("/tmp/x"), &created).unwrap();
        assert_eq!(
            writer.path(),
            Path::new("/tmp/x/dump_2024-03-04_05-06-07.csv")
        );
    }

    #[test]
    fn invalid_template_is_rejected() {
        let cfg = LogConfig::default().with_filename_template("dump_%");
        assert!(matches!(
            LogWriter::new(cfg),
            Err(SinkError::Template { .. })
        ));
    }

    #[test]
    fn template_rendering_to_subpath_is_rejected() {
        let cfg = LogConfig::default().with_filename_template("logs/dump_%Y.csv");
        let err = LogWriter::new(cfg).err().unwrap();
        assert!(matches!(
            err,
            SinkError::Template { ref template, .. } if template == "logs/dump_%Y.csv"
        ));
    }

    #[test]
    fn write_creates_directory_and_appends_rows() {
        let dir = unique_temp_dir("rows").join("nested");
        let mut writer = LogWriter::new(LogConfig::default().with_basedir(&dir)).unwrap();

        writer.write(&sweep()).unwrap();
        writer.write(&sweep()).unwrap();
        assert!(writer.is_open());
        assert_eq!(writer.rows_written(), 2);

        let path = writer.path().to_path_buf();
        writer.close().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert_eq!(line.split(',').count(), FIELDS_PER_ROW);
        }
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn wrong_length_writes_nothing() {
        let dir = unique_temp_dir("length");
        let mut writer = LogWriter::new(LogConfig::default().with_basedir(&dir)).unwrap();

        for len in [63usize, 65] {
            let values = vec![1u16; len];
            let err = writer.write(&values).unwrap_err();
            assert!(matches!(
                err,
                SinkError::Length { expected: 64, actual } if actual == len
            ));
        }
        assert!(!writer.is_open());
        assert!(!writer.path().exists());
        assert_eq!(writer.rows_written(), 0);

        writer.write(&sweep()).unwrap();
        writer.close().unwrap();
        let contents = std::fs::read_to_string(writer.path()).unwrap();
        assert_eq!(contents.lines().count(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn close_is_idempotent() {
        let dir = unique_temp_dir("close");
        let mut writer = LogWriter::new(LogConfig::default().with_basedir(&dir)).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
        assert!(!writer.path().exists());

        writer.write(&sweep()).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();

        let contents = std::fs::read_to_string(writer.path()).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert_eq!(
            contents.lines().next().unwrap().split(',').count(),
            FIELDS_PER_ROW
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_after_close_reopens_for_append() {
        let dir = unique_temp_dir("reopen");
        let mut writer = LogWriter::new(LogConfig::default().with_basedir(&dir)).unwrap();
        writer.write(&sweep()).unwrap();
        writer.close().unwrap();
        writer.write(&sweep()).unwrap();
        writer.close().unwrap();

        let contents = std::fs::read_to_string(writer.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn fresh_writer_truncates_existing_log() {
        let dir = unique_temp_dir("truncate");
        let config = LogConfig::default()
            .with_basedir(&dir)
            .with_filename_template("run.csv");

        for _ in 0..2 {
            let mut writer = LogWriter::new(config.clone()).unwrap();
            writer.write(&sweep()).unwrap();
            writer.close().unwrap();
        }

        let contents = std::fs::read_to_string(dir.join("run.csv")).unwrap();
        assert_eq!(contents.lines().count(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_releases_handle() {
        if !Path::new("/dev/full").exists() {
            return;
        }
        let config = LogConfig::default()
            .with_basedir("/dev")
            .with_filename_template("full");
        let mut writer = LogWriter::new(config).unwrap();

        let err = writer.write(&sweep()).unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
        assert!(!writer.is_open());
        assert_eq!(writer.rows_written(), 0);
        writer.close().unwrap();
    }

    #[test]
    fn drop_flushes() {
        let dir = unique_temp_dir("drop");
        let path = {
            let mut writer = LogWriter::new(LogConfig::default().with_basedir(&dir)).unwrap();
            writer.write(&sweep()).unwrap();
            writer.path().to_path_buf()
        };
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
