//! Artifact garbage collection.
//!
//! Rendered worksheets are temporary. The janitor removes those whose
//! modification time is more than the retention window in the past. It is the
//! only component that deletes artifacts.
//!
//! Selection ([`select_expired`]) is a pure function over a snapshot of
//! directory entries, so the retention policy is testable without a
//! filesystem or a clock. Deletion ([`sweep`]) is best-effort: every I/O
//! failure is logged and swallowed, including files removed concurrently by
//! another sweep.

use crate::pipeline::render::{ARTIFACT_PREFIX, ARTIFACT_SUFFIX};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

static RE_ARTIFACT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{}[0-9A-Za-z]+{}$",
        regex::escape(ARTIFACT_PREFIX),
        regex::escape(ARTIFACT_SUFFIX)
    ))
    .unwrap()
});

/// A snapshot of one artifact file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Whether a file name looks like a rendered worksheet.
pub fn is_artifact_name(name: &str) -> bool {
    RE_ARTIFACT_NAME.is_match(name)
}

/// Pick the entries older than `retention` at `now`.
///
/// Strictly older: an entry exactly `retention` old is kept. Entries with a
/// modification time after `now` (clock skew) are kept.
pub fn select_expired(entries: &[ArtifactEntry], now: SystemTime, retention: Duration) -> Vec<PathBuf> {
    entries
        .iter()
        .filter(|e| match now.duration_since(e.modified) {
            Ok(age) => age > retention,
            Err(_) => false,
        })
        .map(|e| e.path.clone())
        .collect()
}

/// Snapshot the artifacts currently in `dir`.
///
/// Unreadable directories and entries are skipped.
pub fn scan_artifacts(dir: &Path) -> Vec<ArtifactEntry> {
    let read_dir = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            debug!("Janitor: cannot read {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    read_dir
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_str().is_some_and(is_artifact_name))
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            if !meta.is_file() {
                return None;
            }
            Some(ArtifactEntry {
                path: entry.path(),
                modified: meta.modified().ok()?,
            })
        })
        .collect()
}

/// Remove expired artifacts from `dir` as of `now`. Returns how many were removed.
pub fn sweep_at(dir: &Path, retention: Duration, now: SystemTime) -> usize {
    let entries = scan_artifacts(dir);
    let expired = select_expired(&entries, now, retention);

    let removed = expired
        .iter()
        .filter(|path| match std::fs::remove_file(path) {
            Ok(()) => {
                debug!("Janitor: removed {}", path.display());
                true
            }
            Err(e) => {
                warn!("Janitor: could not remove {}: {}", path.display(), e);
                false
            }
        })
        .count();

    if removed > 0 {
        info!(
            "Janitor: removed {}/{} artifacts from {}",
            removed,
            entries.len(),
            dir.display()
        );
    }
    removed
}

/// Remove artifacts in `dir` older than `retention`. Never fails.
pub fn sweep(dir: &Path, retention: Duration) -> usize {
    sweep_at(dir, retention, SystemTime::now())
}

/// Sweep `dir` every `every`, starting immediately, until the task is aborted.
///
/// Each sweep runs on the blocking pool.
pub fn spawn_janitor(dir: PathBuf, retention: Duration, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = IntervalStream::new(tokio::time::interval(every));
        while ticks.next().await.is_some() {
            let dir = dir.clone();
            if let Err(e) = tokio::task::spawn_blocking(move || sweep(&dir, retention)).await {
                warn!("Janitor: sweep task failed: {}", e);
            }
        }
    })
}
