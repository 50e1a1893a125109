//! Dataset model and volume filtering
//!
//! This module contains the in-memory side of volume exclusion:
//! - Exclusion-set bookkeeping over direction indices
//! - The gradient table in FSL layout
//! - The 4D diffusion series and consistent image/gradient slicing

/// Excluded-direction bookkeeping
pub mod exclusion;
/// Diffusion gradient tables (b-values and b-vectors)
pub mod gradients;
/// The 4D diffusion series and filtering operations
pub mod volume;

pub use exclusion::ExclusionSet;
pub use gradients::GradientTable;
pub use volume::{DtiDataset, FilteredDataset};
