//! Per-probe event log
//!
//! Every probe produces one [`ProbeEvent`], written as a single JSON line.
//! [`FileEventLog`] appends to one file per UTC day inside a log directory;
//! [`cleanup_logs`] prunes files past the retention window at startup.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use vigil_core::{ComponentStatus, EndpointStatus, Error, HealthRecord, Result};

/// One probe, as recorded in the event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeEvent {
    /// When the probe completed (UTC)
    pub time: DateTime<Utc>,
    /// Component name
    pub component: String,
    /// Overall verdict
    pub status: ComponentStatus,
    /// Binary endpoint view
    pub endpoint_status: EndpointStatus,
    /// Status line or transport error text
    pub http_result: String,
    /// Classification or transport error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&HealthRecord> for ProbeEvent {
    fn from(record: &HealthRecord) -> Self {
        Self {
            time: record.last_checked,
            component: record.name.clone(),
            status: record.status,
            endpoint_status: record.endpoint_status,
            http_result: record.http_result.clone(),
            error: record.error.clone(),
        }
    }
}

/// Destination for probe events
pub trait EventSink: Send + Sync + fmt::Debug {
    /// Record one event
    fn record(&self, event: &ProbeEvent) -> Result<()>;
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventLog;

impl EventSink for NullEventLog {
    fn record(&self, _event: &ProbeEvent) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct DailyFile {
    date: NaiveDate,
    file: File,
}

/// Appends events as JSON lines to `<directory>/<YYYY-MM-DD>.log`
#[derive(Debug)]
pub struct FileEventLog {
    directory: PathBuf,
    current: Mutex<DailyFile>,
}

impl FileEventLog {
    /// Open the log, creating the directory and today's file
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();

        fs::create_dir_all(&directory).map_err(|e| {
            Error::EventLog(format!(
                "Failed to create log directory {}: {e}",
                directory.display()
            ))
        })?;

        let today = Utc::now().date_naive();
        let file = open_day(&directory, today)?;

        info!(directory = %directory.display(), "Probe event log opened");

        Ok(Self {
            directory,
            current: Mutex::new(DailyFile { date: today, file }),
        })
    }

    /// Directory holding the daily files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file for a given UTC date
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        day_path(&self.directory, date)
    }
}

impl EventSink for FileEventLog {
    fn record(&self, event: &ProbeEvent) -> Result<()> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let date = event.time.date_naive();
        let mut current = self.current.lock();

        if current.date != date {
            debug!(%date, "Rotating probe event log");
            *current = DailyFile {
                date,
                file: open_day(&self.directory, date)?,
            };
        }

        current.file.write_all(&line)?;

        Ok(())
    }
}

fn day_path(directory: &Path, date: NaiveDate) -> PathBuf {
    directory.join(format!("{}.log", date.format("%Y-%m-%d")))
}

fn open_day(directory: &Path, date: NaiveDate) -> Result<File> {
    let path = day_path(directory, date);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| Error::EventLog(format!("Failed to open {}: {e}", path.display())))
}

/// Remove regular files in `directory` last modified more than `retention_days` ago
///
/// A retention of 0 keeps everything. Entries that cannot be inspected are
/// skipped. Returns the number of files removed.
pub fn cleanup_logs(directory: &Path, retention_days: u32) -> usize {
    if retention_days == 0 {
        return 0;
    }

    let retention = Duration::from_secs(u64::from(retention_days) * 24 * 60 * 60);
    let Some(cutoff) = SystemTime::now().checked_sub(retention) else {
        return 0;
    };

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(directory = %directory.display(), error = %e, "Failed to read log directory");
            return 0;
        }
    };

    let mut removed = 0;

    for entry in entries.flatten() {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };

        if metadata.is_file() && modified < cutoff {
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Failed to remove old log file");
                }
            }
        }
    }

    if removed > 0 {
        info!(removed, retention_days, "Cleaned up old probe event logs");
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(time: DateTime<Utc>, error: Option<&str>) -> ProbeEvent {
        ProbeEvent {
            time,
            component: "cache".to_string(),
            status: if error.is_some() {
                ComponentStatus::Unreachable
            } else {
                ComponentStatus::Ok
            },
            endpoint_status: if error.is_some() {
                EndpointStatus::NotOk
            } else {
                EndpointStatus::Ok
            },
            http_result: error.unwrap_or("200 OK").to_string(),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_event_shape() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_value(event(time, Some("connection refused"))).unwrap();

        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            ["component", "endpoint_status", "error", "http_result", "status", "time"]
        );
        assert_eq!(json["time"], "2024-03-01T12:00:00Z");
        assert_eq!(json["status"], "unreachable");
        assert_eq!(json["endpoint_status"], "not_ok");

        let ok = serde_json::to_value(event(time, None)).unwrap();
        assert!(ok.get("error").is_none());
    }

    #[test]
    fn test_event_from_record() {
        let record = HealthRecord {
            name: "db".to_string(),
            status: ComponentStatus::InvalidResponse,
            endpoint_status: EndpointStatus::NotOk,
            http_result: "500 Internal Server Error".to_string(),
            last_checked: Utc::now(),
            error: Some("EOF while parsing a value at line 1 column 0".to_string()),
        };

        let event = ProbeEvent::from(&record);
        assert_eq!(event.component, "db");
        assert_eq!(event.time, record.last_checked);
        assert_eq!(event.status, record.status);
        assert_eq!(event.error, record.error);
    }

    #[test]
    fn test_file_log_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileEventLog::open(dir.path().join("logs")).unwrap();

        let now = Utc::now();
        log.record(&event(now, None)).unwrap();
        log.record(&event(now, Some("timeout"))).unwrap();

        let content = fs::read_to_string(log.path_for(now.date_naive())).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: ProbeEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_file_log_rotates_by_event_date() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileEventLog::open(dir.path()).unwrap();

        let earlier = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
        log.record(&event(earlier, None)).unwrap();
        log.record(&event(later, None)).unwrap();

        let first = fs::read_to_string(dir.path().join("2023-12-31.log")).unwrap();
        let second = fs::read_to_string(dir.path().join("2024-01-01.log")).unwrap();
        assert_eq!(first.lines().count(), 1);
        assert_eq!(second.lines().count(), 1);
    }

    #[test]
    fn test_open_fails_when_directory_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = FileEventLog::open(file.path());
        assert!(matches!(result, Err(Error::EventLog(_))));
    }

    #[test]
    fn test_cleanup_removes_only_old_files() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("2020-01-01.log");
        let fresh = dir.path().join("today.log");
        File::create(&fresh).unwrap();
        let handle = File::create(&old).unwrap();
        handle
            .set_modified(SystemTime::now() - Duration::from_secs(10 * 24 * 60 * 60))
            .unwrap();
        drop(handle);
        fs::create_dir(dir.path().join("archive")).unwrap();

        assert_eq!(cleanup_logs(dir.path(), 7), 1);
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(dir.path().join("archive").exists());
    }

    #[test]
    fn test_cleanup_zero_retention_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let handle = File::create(dir.path().join("old.log")).unwrap();
        handle
            .set_modified(SystemTime::now() - Duration::from_secs(400 * 24 * 60 * 60))
            .unwrap();

        assert_eq!(cleanup_logs(dir.path(), 0), 0);
    }

    #[test]
    fn test_cleanup_missing_directory() {
        assert_eq!(cleanup_logs(Path::new("/nonexistent/vigil/logs"), 7), 0);
    }
}
