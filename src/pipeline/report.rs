//! Change-log emission for filtered datasets

use crate::io::error::{Result, fs_error};
use std::path::{Path, PathBuf};

/// Record of one exclusion run, written next to the source image
///
/// The log is `key = value` text, one entry per line, so it stays easy to
/// grep and to diff between QC passes.
#[derive(Debug, Clone)]
pub struct ChangeReport {
    /// Path of the source image
    pub source_image: PathBuf,
    /// Path of the filtered image
    pub new_image: PathBuf,
    /// Path of the source b-values table
    pub source_bvals: PathBuf,
    /// Path of the filtered b-values table
    pub new_bvals: PathBuf,
    /// Path of the source b-vectors table
    pub source_bvecs: PathBuf,
    /// Path of the filtered b-vectors table
    pub new_bvecs: PathBuf,
    /// Path of the generated pipeline script, if one was written
    pub script: Option<PathBuf>,
    /// Direction indices that were dropped, in ascending order
    pub excluded: Vec<usize>,
    /// Number of non-positive intensities replaced, if repair ran
    pub nonpositive_replaced: Option<usize>,
}

impl ChangeReport {
    /// Render the report as `key = value` lines
    pub fn render(&self) -> String {
        let script = self
            .script
            .as_ref()
            .map_or_else(|| "none".to_string(), |path| path.display().to_string());

        let mut out = format!(
            "orig_nifti = {}\n\
             new_nifti = {}\n\
             orig_bvals = {}\n\
             new_bvals = {}\n\
             orig_bvecs = {}\n\
             new_bvecs = {}\n\
             fsl_processing_script = {script}\n\
             imageno_excluded = {}\n",
            self.source_image.display(),
            self.new_image.display(),
            self.source_bvals.display(),
            self.new_bvals.display(),
            self.source_bvecs.display(),
            self.new_bvecs.display(),
            format_indices(&self.excluded),
        );
        if let Some(count) = self.nonpositive_replaced {
            out.push_str(&format!("nonpositive_replaced = {count}\n"));
        }
        out
    }

    /// Write the report to the given path
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())
            .map_err(|source| fs_error(path, "write change log", source))
    }
}

fn format_indices(indices: &[usize]) -> String {
    let body = indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{body}]")
}
