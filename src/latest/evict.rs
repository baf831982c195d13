//! Best-effort pruning of the latest area.
//!
//! Copies into the latest set keep their source's modification time, so a
//! collection whose source stops being regenerated ages out of the latest
//! set while its files remain in the amended area.

use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

/// How long a latest entry stays before it is considered outdated.
pub const STALENESS_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Delete every `.yaml` file in `latest_dir` whose modification time is
/// strictly older than `now - window`. Returns the number removed.
///
/// A stat or delete failure on one entry is logged and does not stop the
/// scan; only an unreadable directory is fatal.
pub fn evict_stale(latest_dir: &Path, now: SystemTime, window: Duration) -> Result<usize> {
    let cutoff = now.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH);

    let entries = fs::read_dir(latest_dir)
        .with_context(|| format!("read latest directory {}", latest_dir.display()))?;

    let mut removed = 0;
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping unreadable directory entry: {err:#}");
                continue;
            }
        };
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(err) => {
                warn!("skipping {}: {err:#}", path.display());
                continue;
            }
        };

        if modified < cutoff {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!("evicted stale latest entry {}", path.display());
                    removed += 1;
                }
                Err(err) => warn!("could not evict {}: {err:#}", path.display()),
            }
        }
    }

    Ok(removed)
}
