//! Output naming constants and runtime configuration defaults

/// Suffix inserted into output filenames for filtered data
pub const DEFAULT_SUFFIX: &str = ".exc";

/// Suffix appended to the filtered image path for the pipeline script
pub const SCRIPT_SUFFIX: &str = ".fsl_dtifit.sh";

/// Suffix appended to the exclusion suffix for the change log
pub const LOG_SUFFIX: &str = ".log";

/// Extension appended to the image path for the b-values table
pub const BVALS_EXTENSION: &str = "bvals";

/// Extension appended to the image path for the b-vectors table
pub const BVECS_EXTENSION: &str = "bvecs";

/// Marker that locates the NIfTI extension inside a filename
pub const NIFTI_MARKER: &str = ".nii";

/// Number of spatial components per diffusion gradient vector
pub const BVEC_COMPONENTS: usize = 3;

// Progress bar display settings
/// Minimum batch size before a progress bar is shown
pub const MIN_FILES_FOR_PROGRESS: usize = 2;
