//! Command-line interface for excluding volumes from DTI datasets

use crate::dataset::exclusion::ExclusionSet;
use crate::dataset::volume::DtiDataset;
use crate::io::configuration::{
    BVALS_EXTENSION, BVECS_EXTENSION, DEFAULT_SUFFIX, LOG_SUFFIX, NIFTI_MARKER,
};
use crate::io::error::{Result, fs_error, invalid_parameter};
use crate::io::naming;
use crate::io::progress::ProgressManager;
use crate::pipeline::report::ChangeReport;
use crate::pipeline::script::write_fsl_script;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dtitrim")]
#[command(
    author,
    version,
    about = "Exclude diffusion-gradient volumes from DTI datasets and regenerate FSL fitting scripts"
)]
/// Command-line arguments for the volume exclusion tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input NIfTI file or directory of datasets to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Diffusion direction indices to exclude (repeatable, comma separated)
    #[arg(short = 'x', long = "exclude", value_name = "INDEX", value_delimiter = ',')]
    pub exclude: Vec<usize>,

    /// Path to the b-values table (defaults to <image>.bvals)
    #[arg(long, value_name = "FILE")]
    pub bvals: Option<PathBuf>,

    /// Path to the b-vectors table (defaults to <image>.bvecs)
    #[arg(long, value_name = "FILE")]
    pub bvecs: Option<PathBuf>,

    /// Suffix inserted into output filenames
    #[arg(short, long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// Skip writing the FSL pipeline script
    #[arg(long)]
    pub no_script: bool,

    /// Replace non-positive intensities before writing
    #[arg(long)]
    pub fix_nonpositive: bool,

    /// Suppress per-dataset summaries
    #[arg(short, long)]
    pub quiet: bool,

    /// Process datasets even if filtered output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Orchestrates filtering of one dataset or a directory of datasets
pub struct DatasetProcessor {
    cli: Cli,
    progress: Option<ProgressManager>,
}

impl DatasetProcessor {
    /// Create a new processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress = cli.should_show_progress().then(ProgressManager::new);

        Self { cli, progress }
    }

    /// Process datasets according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, dataset loading, filtering,
    /// or output emission fails.
    pub fn process(&mut self) -> Result<()> {
        if self.cli.exclude.is_empty() {
            // Allow print for user feedback
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("No directions excluded, nothing to do.");
            }
            return Ok(());
        }

        if self.cli.target.is_dir() && (self.cli.bvals.is_some() || self.cli.bvecs.is_some()) {
            return Err(invalid_parameter(
                "bvals/bvecs",
                &self.cli.target.display(),
                &"explicit table paths only apply to a single dataset, not a directory",
            ));
        }

        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress {
            pm.initialize(files.len());
        }

        for file in &files {
            self.process_file(file)?;
        }

        if let Some(ref pm) = self.progress {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if Self::is_nifti_name(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"target must be a NIfTI file (.nii or .nii.gz)",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            let entries = std::fs::read_dir(&self.cli.target)
                .map_err(|source| fs_error(&self.cli.target, "read directory", source))?;
            for entry in entries {
                let path = entry
                    .map_err(|source| fs_error(&self.cli.target, "read directory", source))?
                    .path();
                // Outputs of earlier runs are never picked up as inputs
                if Self::is_nifti_name(&path)
                    && !Self::is_filtered_output(&path, &self.cli.suffix)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"target must be a NIfTI file or a directory",
            ))
        }
    }

    fn is_nifti_name(path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.ends_with(NIFTI_MARKER) || name.ends_with(".nii.gz")
    }

    fn is_filtered_output(path: &Path, suffix: &str) -> bool {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
            .contains(suffix)
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = naming::derive_image_path(input_path, &self.cli.suffix);
        if output_path.exists() {
            // Allow print for user feedback
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    // Allow print for the per-dataset summary
    #[allow(clippy::print_stderr)]
    fn process_file(&self, input_path: &Path) -> Result<()> {
        if let Some(ref pm) = self.progress {
            pm.start_file(input_path);
        }

        let bvals_path = self
            .cli
            .bvals
            .clone()
            .unwrap_or_else(|| naming::default_table_path(input_path, BVALS_EXTENSION));
        let bvecs_path = self
            .cli
            .bvecs
            .clone()
            .unwrap_or_else(|| naming::default_table_path(input_path, BVECS_EXTENSION));

        let dataset = DtiDataset::load(input_path, &bvals_path, &bvecs_path)?;
        let exclusions = ExclusionSet::from_indices(self.cli.exclude.iter().copied());

        // Filtering validates the exclusion list before anything is written
        let mut filtered = dataset.filter(&exclusions)?;

        let mut replaced = None;
        if self.cli.fix_nonpositive {
            replaced = Some(filtered.fix_nonpositive()?);
        }

        let image_out = naming::derive_image_path(input_path, &self.cli.suffix);
        crate::io::image::write_image(&image_out, dataset.header(), filtered.image())?;

        let bvals_out = naming::append_suffix(&bvals_path, &self.cli.suffix);
        let bvecs_out = naming::append_suffix(&bvecs_path, &self.cli.suffix);
        crate::io::gradients::write_table(filtered.gradients(), &bvals_out, &bvecs_out)?;

        let mut script = None;
        if !self.cli.no_script {
            script = Some(write_fsl_script(&image_out, &bvals_out, &bvecs_out)?);
        }

        let log_path =
            naming::append_suffix(input_path, &format!("{}{LOG_SUFFIX}", self.cli.suffix));
        let report = ChangeReport {
            source_image: input_path.to_path_buf(),
            new_image: image_out.clone(),
            source_bvals: bvals_path,
            new_bvals: bvals_out,
            source_bvecs: bvecs_path,
            new_bvecs: bvecs_out,
            script,
            excluded: filtered.excluded().to_vec(),
            nonpositive_replaced: replaced,
        };
        report.write(&log_path)?;

        if !self.cli.quiet {
            eprintln!(
                "{}: excluded {} of {} directions, wrote {}",
                input_path.display(),
                filtered.excluded().len(),
                dataset.direction_count(),
                image_out.display()
            );
        }

        if let Some(ref pm) = self.progress {
            pm.complete_file();
        }

        Ok(())
    }
}
