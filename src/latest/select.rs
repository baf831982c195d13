//! Per-collection latest-version selection over the amended output area.

use crate::Result;
use crate::latest::identity::{collection_identity, version_ordinal};
use anyhow::{Context, bail};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Map each collection to its highest-versioned file.
///
/// Partitions `paths` by collection identity, finds the maximum version
/// ordinal per partition, and picks the member whose filename carries that
/// version token. Duplicate claims on the maximum resolve to the
/// lexicographically first path, so selection is stable across runs.
pub fn select_latest(paths: &[PathBuf]) -> Result<BTreeMap<String, PathBuf>> {
    let mut groups: BTreeMap<String, Vec<&PathBuf>> = BTreeMap::new();
    for path in paths {
        let name = file_name(path)?;
        groups
            .entry(collection_identity(name)?)
            .or_default()
            .push(path);
    }

    let mut selected = BTreeMap::new();
    for (collection, mut members) in groups {
        members.sort();

        let max = members
            .iter()
            .filter_map(|p| file_name(p).ok().and_then(|n| version_ordinal(n).ok()))
            .max()
            .with_context(|| {
                format!("no parseable version ordinal in collection {collection:?}")
            })?;

        let token = format!("-v{max}");
        let Some(best) = members
            .iter()
            .find(|p| file_name(p).map(|n| n.contains(&token)).unwrap_or(false))
        else {
            bail!("collection {collection:?} has no file carrying token {token:?}");
        };

        selected.insert(collection, (*best).clone());
    }

    Ok(selected)
}

/// Copy each selected file into the latest area, overwriting same-named
/// entries and carrying the source's modification time onto the copy. The
/// evictor judges staleness by that timestamp, so a copy must not look
/// freshly written. Failures are logged and skipped: the latest set is a
/// derived convenience, not the primary output.
pub fn copy_latest(selection: &BTreeMap<String, PathBuf>, latest_dir: &Path) -> usize {
    let mut copied = 0;
    for (collection, source) in selection {
        match copy_preserving_mtime(source, latest_dir) {
            Ok(dest) => {
                info!("latest for {collection}: {}", dest.display());
                copied += 1;
            }
            Err(err) => warn!("skipping latest copy for {collection}: {err:#}"),
        }
    }
    copied
}

fn copy_preserving_mtime(source: &Path, latest_dir: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .with_context(|| format!("source has no filename: {}", source.display()))?;
    let dest = latest_dir.join(name);

    fs::copy(source, &dest)
        .with_context(|| format!("copy {} to {}", source.display(), dest.display()))?;

    let mtime = fs::metadata(source)
        .and_then(|m| m.modified())
        .with_context(|| format!("read mtime of {}", source.display()))?;
    fs::File::options()
        .write(true)
        .open(&dest)
        .and_then(|f| f.set_modified(mtime))
        .with_context(|| format!("set mtime on {}", dest.display()))?;

    Ok(dest)
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("path has no UTF-8 filename: {}", path.display()))
}
