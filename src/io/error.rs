//! Error types for dataset loading, filtering, and output emission

use std::fmt;
use std::path::PathBuf;

/// Main error type for all dataset operations
#[derive(Debug)]
pub enum DtiError {
    /// Failed to load a NIfTI image from the filesystem
    NiftiRead {
        /// Path to the image file
        path: PathBuf,
        /// Underlying NIfTI error
        source: nifti::NiftiError,
    },

    /// Failed to write a NIfTI image to disk
    NiftiWrite {
        /// Path where the write was attempted
        path: PathBuf,
        /// Underlying NIfTI error
        source: nifti::NiftiError,
    },

    /// Image doesn't have the shape of a diffusion series
    InvalidImage {
        /// Path to the offending image
        path: PathBuf,
        /// Description of what's wrong with the image
        reason: String,
    },

    /// Gradient table file could not be parsed
    GradientParse {
        /// Path to the table file
        path: PathBuf,
        /// One-based line number where parsing failed
        line: usize,
        /// Description of the parse failure
        reason: String,
    },

    /// Image and gradient tables disagree about the dataset
    InconsistentDataset {
        /// Description of the mismatch
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Numerical operation on the image data failed
    Computation {
        /// Name of the operation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for DtiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NiftiRead { path, source } => {
                write!(f, "Failed to read NIfTI '{}': {source}", path.display())
            }
            Self::NiftiWrite { path, source } => {
                write!(f, "Failed to write NIfTI '{}': {source}", path.display())
            }
            Self::InvalidImage { path, reason } => {
                write!(f, "Invalid image '{}': {reason}", path.display())
            }
            Self::GradientParse { path, line, reason } => {
                write!(
                    f,
                    "Failed to parse gradient table '{}' at line {line}: {reason}",
                    path.display()
                )
            }
            Self::InconsistentDataset { reason } => {
                write!(f, "Inconsistent dataset: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for DtiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NiftiRead { source, .. } | Self::NiftiWrite { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for dataset operation results
pub type Result<T> = std::result::Result<T, DtiError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> DtiError {
    DtiError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error for an operation on a path
pub fn fs_error(path: &std::path::Path, operation: &'static str, source: std::io::Error) -> DtiError {
    DtiError::FileSystem {
        path: path.to_path_buf(),
        operation,
        source,
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> DtiError {
    DtiError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
