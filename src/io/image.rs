//! NIfTI image loading and filtered-series export

use crate::io::error::{DtiError, Result, fs_error};
use ndarray::{Array4, Ix4};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use std::path::Path;

/// Load a 4D NIfTI image together with its header
///
/// Accepts `.nii` and `.nii.gz` files. The header is returned separately
/// so it can be reused as the reference when writing filtered output,
/// carrying the affine and voxel metadata over unchanged.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded, or if the
/// volume doesn't have exactly four dimensions.
pub fn load_image(path: &Path) -> Result<(NiftiHeader, Array4<f64>)> {
    let object = ReaderOptions::new()
        .read_file(path)
        .map_err(|source| DtiError::NiftiRead {
            path: path.to_path_buf(),
            source,
        })?;
    let header = object.header().clone();
    let data = object
        .into_volume()
        .into_ndarray::<f64>()
        .map_err(|source| DtiError::NiftiRead {
            path: path.to_path_buf(),
            source,
        })?;

    let found = data.ndim();
    if found != 4 {
        return Err(DtiError::InvalidImage {
            path: path.to_path_buf(),
            reason: format!("expected a 4D diffusion series, found {found} dimension(s)"),
        });
    }
    let image = data
        .into_dimensionality::<Ix4>()
        .map_err(|err| DtiError::InvalidImage {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    Ok((header, image))
}

/// Write a 4D image to disk, reusing a source header as reference
///
/// The writer derives shape and datatype from the array; everything else
/// (affine, voxel sizes, intent) comes from the reference header. The
/// parent directory is created when missing.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the image
/// cannot be encoded and written.
pub fn write_image(path: &Path, header: &NiftiHeader, image: &Array4<f64>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|source| fs_error(parent, "create directory", source))?;
        }
    }

    WriterOptions::new(path)
        .reference_header(header)
        .write_nifti(image)
        .map_err(|source| DtiError::NiftiWrite {
            path: path.to_path_buf(),
            source,
        })
}
