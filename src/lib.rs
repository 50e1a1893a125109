//! Volume exclusion for diffusion-tensor imaging datasets
//!
//! Removes selected diffusion-gradient directions from a 4D NIfTI series,
//! writes the filtered image and gradient tables back to disk, and emits a
//! shell script that re-runs the FSL fitting pipeline on the cleaned data.

#![forbid(unsafe_code)]

/// Dataset model, exclusion bookkeeping, and volume filtering
pub mod dataset;
/// Input/output operations and error handling
pub mod io;
/// FSL pipeline script and change-log emission
pub mod pipeline;

pub use io::error::{DtiError, Result};
