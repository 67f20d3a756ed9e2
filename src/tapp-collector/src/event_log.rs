use crate::error::CollectorError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tapp_common::{ReportPayload, TrackedEvent};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only daily CSV log of received events.
///
/// Line layout: `date,remote_addr,unique_id,event,value`.
pub struct EventLog {
    dir: PathBuf,
    file_prefix: String,
    write_lock: Mutex<()>,
}

impl EventLog {
    pub fn new(dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_prefix: file_prefix.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}{}.log", self.file_prefix, date.format("%Y-%m-%d")))
    }

    /// Writes every event of `payload` in one append, into the file for the day of
    /// `received_at`. Returns the number of lines written.
    pub async fn append(
        &self,
        payload: &ReportPayload,
        remote_addr: &str,
        received_at: DateTime<Utc>,
    ) -> Result<usize, CollectorError> {
        if payload.is_empty() {
            return Ok(0);
        }

        let unique_id = payload.unique_id_or_unknown();
        let data: String = payload
            .events
            .iter()
            .map(|event| format_log_line(event, remote_addr, unique_id))
            .collect();
        let path = self.path_for(received_at.date_naive());

        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| CollectorError::Write {
                path: self.dir.clone(),
                source,
            })?;

        let write = async {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await?;
            file.write_all(data.as_bytes()).await?;
            file.flush().await
        };
        write
            .await
            .map_err(|source| CollectorError::Write { path, source })?;

        Ok(payload.len())
    }
}

pub fn format_log_line(event: &TrackedEvent, remote_addr: &str, unique_id: &str) -> String {
    format!(
        "{},{},{},{},{}\n",
        event.timestamp().to_rfc3339_opts(SecondsFormat::Secs, false),
        remote_addr,
        unique_id,
        event.name(),
        event.value().unwrap_or_default()
    )
}
