//! Input/output operations and error handling
//!
//! This module contains the filesystem-facing functionality:
//! - NIfTI image loading and export
//! - Gradient-table parsing and emission
//! - Output filename derivation
//! - The command-line interface and batch orchestration

/// Command-line interface and batch dataset processing
pub mod cli;
/// Output naming constants and configuration defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// FSL gradient-table file I/O
pub mod gradients;
/// NIfTI image file I/O
pub mod image;
/// Output filename derivation
pub mod naming;
/// Batch progress display
pub mod progress;
