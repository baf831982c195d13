//! A single spec file's lifecycle: read, amend in memory, write out.

mod edits;
mod rules;

pub use edits::amend;
pub use rules::{AmendRules, UrlPlaceholder};

use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// One YAML file moving through the pipeline. Holds the working copy of its
/// lines between load and save; nothing survives the run.
pub struct SpecFile {
    input: PathBuf,
    output: PathBuf,
    lines: Vec<String>,
}

impl SpecFile {
    /// Read `input` fully and derive the output path by re-rooting its
    /// filename under `out_dir`.
    pub fn load(input: &Path, out_dir: &Path) -> Result<Self> {
        let text = fs::read_to_string(input)
            .with_context(|| format!("read spec file {}", input.display()))?;
        let file_name = input
            .file_name()
            .with_context(|| format!("path has no filename: {}", input.display()))?;

        Ok(Self {
            input: input.to_path_buf(),
            output: out_dir.join(file_name),
            lines: text.lines().map(str::to_string).collect(),
        })
    }

    /// Run the amendment sequence and write the result to the output path.
    /// Returns the output path on success.
    pub fn amend_and_save(mut self, rules: &AmendRules) -> Result<PathBuf> {
        amend(&mut self.lines, rules)
            .with_context(|| format!("amend {}", self.input.display()))?;

        let mut text = self.lines.join("\n");
        text.push('\n');
        fs::write(&self.output, text)
            .with_context(|| format!("write amended file {}", self.output.display()))?;

        Ok(self.output)
    }
}
