use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;

/// TTL-based eviction for generated-output directories.
///
/// Token-named outputs accumulate without bound, so callers schedule this
/// sweep out-of-band; it never runs on the rendering hot path.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    max_age: Duration,
}

impl RetentionPolicy {
    pub fn from_hours(hours: u64) -> Self {
        Self {
            max_age: Duration::hours(hours as i64),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self {
            max_age: Duration::seconds(secs as i64),
        }
    }
}

/// Outcome of one sweep pass
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepStats {
    pub removed: usize,
    pub kept: usize,
    pub reclaimed_bytes: u64,
}

/// Remove regular files in `dir` older than the policy's TTL.
///
/// Subdirectories are left in place, and a missing directory is an empty
/// sweep rather than an error. Individual removal failures are logged and
/// skipped so one stuck file cannot wedge the sweep.
pub fn sweep<P: AsRef<Path>>(dir: P, policy: &RetentionPolicy) -> Result<SweepStats> {
    let dir = dir.as_ref();
    let mut stats = SweepStats::default();

    if !dir.exists() {
        debug!("Sweep target {:?} does not exist, nothing to do", dir);
        return Ok(stats);
    }

    let now = Utc::now();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = match entry.metadata() {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => continue,
        };

        let modified: DateTime<Utc> = match metadata.modified() {
            Ok(modified) => modified.into(),
            Err(e) => {
                warn!("No modification time for {:?}: {}", entry.path(), e);
                continue;
            }
        };

        if now.signed_duration_since(modified) >= policy.max_age {
            match std::fs::remove_file(entry.path()) {
                Ok(()) => {
                    debug!("Evicted {:?}", entry.path());
                    stats.removed += 1;
                    stats.reclaimed_bytes += metadata.len();
                }
                Err(e) => {
                    warn!("Failed to evict {:?}: {}", entry.path(), e);
                    stats.kept += 1;
                }
            }
        } else {
            stats.kept += 1;
        }
    }

    info!(
        "Sweep of {:?} complete: {} removed, {} kept, {} bytes reclaimed",
        dir, stats.removed, stats.kept, stats.reclaimed_bytes
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sweep_removes_expired_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("video_landscape_aa.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("video_portrait_bb.mp4"), b"yy").unwrap();

        // Zero TTL makes every file expired
        let stats = sweep(dir.path(), &RetentionPolicy::from_secs(0)).unwrap();

        assert_eq!(stats.removed, 2);
        assert_eq!(stats.kept, 0);
        assert_eq!(stats.reclaimed_bytes, 3);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_sweep_keeps_fresh_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("video_landscape_cc.mp4"), b"x").unwrap();

        let stats = sweep(dir.path(), &RetentionPolicy::from_hours(24)).unwrap();

        assert_eq!(stats.removed, 0);
        assert_eq!(stats.kept, 1);
    }

    #[test]
    fn test_sweep_skips_subdirectories() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let stats = sweep(dir.path(), &RetentionPolicy::from_secs(0)).unwrap();

        assert_eq!(stats.removed, 0);
        assert!(dir.path().join("nested").exists());
    }

    #[test]
    fn test_sweep_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let stats = sweep(dir.path().join("absent"), &RetentionPolicy::from_secs(0)).unwrap();

        assert_eq!(stats.removed, 0);
        assert_eq!(stats.kept, 0);
    }
}
