//! End-to-end run: validate directories, amend every spec file into the
//! amended area, then refresh and prune the latest area.

use crate::Result;
use crate::amend::{AmendRules, SpecFile};
use crate::latest;
use anyhow::{Context, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;

/// Counts reported back to the driver after a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub amended: usize,
    pub latest_copied: usize,
    pub evicted: usize,
}

/// Amend every `.yaml` file under `input_dir` into `<output_dir>/amended`.
/// When `copy_latest` is set, also refresh `<output_dir>/latest` with the
/// highest-versioned file per collection and evict stale entries there.
pub fn run(input_dir: &Path, output_dir: &Path, copy_latest: bool) -> Result<RunSummary> {
    if !input_dir.is_dir() {
        bail!(
            "input directory is missing or not a directory: {}",
            input_dir.display()
        );
    }

    let amended_dir = output_dir.join("amended");
    let latest_dir = output_dir.join("latest");
    fs::create_dir_all(&amended_dir)
        .with_context(|| format!("create output directory {}", amended_dir.display()))?;
    if copy_latest {
        fs::create_dir_all(&latest_dir)
            .with_context(|| format!("create output directory {}", latest_dir.display()))?;
    }

    // 1) Enumerate inputs. Sorted so logs and failures are reproducible.
    let inputs = yaml_files_in(input_dir)?;
    if inputs.is_empty() {
        bail!("no .yaml files found in {}", input_dir.display());
    }

    // 2) Amend each file. A content error (missing version or title line)
    //    aborts the run; the error names the offending file.
    let rules = AmendRules::default();
    let mut summary = RunSummary::default();
    for input in &inputs {
        let out = SpecFile::load(input, &amended_dir)?.amend_and_save(&rules)?;
        info!("amended {} -> {}", input.display(), out.display());
        summary.amended += 1;
    }

    // 3) Latest-set maintenance runs over the amended output, not the inputs.
    if copy_latest {
        let amended = yaml_files_in(&amended_dir)?;
        let selection = latest::select_latest(&amended)?;
        summary.latest_copied = latest::copy_latest(&selection, &latest_dir);
        summary.evicted =
            latest::evict_stale(&latest_dir, SystemTime::now(), latest::STALENESS_WINDOW)?;
    }

    Ok(summary)
}

/// Non-recursive listing of `.yaml` files in `dir`, sorted by path.
fn yaml_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("yaml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
