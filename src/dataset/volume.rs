//! The 4D diffusion series and volume filtering

use crate::dataset::exclusion::ExclusionSet;
use crate::dataset::gradients::GradientTable;
use crate::io::error::{DtiError, Result, computation_error, invalid_parameter};
use ndarray::{Array4, Axis};
use nifti::NiftiHeader;
use std::path::{Path, PathBuf};

// Diffusion directions are stacked along the fourth image axis
const DIRECTION_AXIS: Axis = Axis(3);

/// A loaded DTI dataset: 4D image, source header, and gradient table
#[derive(Debug, Clone)]
pub struct DtiDataset {
    image: Array4<f64>,
    header: NiftiHeader,
    gradients: GradientTable,
    image_path: PathBuf,
    bvals_path: PathBuf,
    bvecs_path: PathBuf,
}

impl DtiDataset {
    /// Load a dataset from a NIfTI image and its FSL gradient tables
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or parsed, if the image
    /// is not 4D, or if the gradient tables disagree with the image about
    /// the number of diffusion directions.
    pub fn load(image_path: &Path, bvals_path: &Path, bvecs_path: &Path) -> Result<Self> {
        let (header, image) = crate::io::image::load_image(image_path)?;
        let gradients = crate::io::gradients::load_table(bvals_path, bvecs_path)?;
        Self::from_parts(
            image,
            header,
            gradients,
            image_path.to_path_buf(),
            bvals_path.to_path_buf(),
            bvecs_path.to_path_buf(),
        )
    }

    /// Assemble a dataset from already-loaded components
    ///
    /// # Errors
    ///
    /// Returns an error if the gradient table length doesn't match the
    /// fourth image dimension.
    pub fn from_parts(
        image: Array4<f64>,
        header: NiftiHeader,
        gradients: GradientTable,
        image_path: PathBuf,
        bvals_path: PathBuf,
        bvecs_path: PathBuf,
    ) -> Result<Self> {
        let directions = image.dim().3;
        if gradients.len() != directions {
            return Err(DtiError::InconsistentDataset {
                reason: format!(
                    "image has {directions} diffusion directions but the gradient tables describe {}",
                    gradients.len()
                ),
            });
        }
        Ok(Self {
            image,
            header,
            gradients,
            image_path,
            bvals_path,
            bvecs_path,
        })
    }

    /// Number of diffusion directions (length of the fourth image axis)
    pub fn direction_count(&self) -> usize {
        self.image.dim().3
    }

    /// The full 4D image data
    pub const fn image(&self) -> &Array4<f64> {
        &self.image
    }

    /// Header of the source image, reused when writing filtered output
    pub const fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// The gradient table matching the image
    pub const fn gradients(&self) -> &GradientTable {
        &self.gradients
    }

    /// Path the image was loaded from
    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    /// Path the b-values were loaded from
    pub fn bvals_path(&self) -> &Path {
        &self.bvals_path
    }

    /// Path the b-vectors were loaded from
    pub fn bvecs_path(&self) -> &Path {
        &self.bvecs_path
    }

    /// Drop the excluded directions from the image and gradient table
    ///
    /// The same retained index list drives both the image slicing and the
    /// gradient slicing, so the two can never fall out of step.
    ///
    /// # Errors
    ///
    /// Returns an error if an excluded index is out of range, or if the
    /// exclusion set would remove every direction.
    pub fn filter(&self, exclusions: &ExclusionSet) -> Result<FilteredDataset> {
        let directions = self.direction_count();
        exclusions.validate(directions)?;

        let retained = exclusions.retained(directions);
        if retained.is_empty() {
            return Err(invalid_parameter(
                "exclude",
                &format!("{:?}", exclusions.to_vec()),
                &"every diffusion direction would be removed",
            ));
        }

        let image = self.image.select(DIRECTION_AXIS, &retained);
        let gradients = self.gradients.select(&retained)?;

        Ok(FilteredDataset {
            image,
            gradients,
            excluded: exclusions.to_vec(),
            retained,
        })
    }
}

/// The result of dropping excluded directions from a dataset
#[derive(Debug, Clone)]
pub struct FilteredDataset {
    image: Array4<f64>,
    gradients: GradientTable,
    excluded: Vec<usize>,
    retained: Vec<usize>,
}

impl FilteredDataset {
    /// The filtered 4D image data
    pub const fn image(&self) -> &Array4<f64> {
        &self.image
    }

    /// The filtered gradient table
    pub const fn gradients(&self) -> &GradientTable {
        &self.gradients
    }

    /// Indices that were dropped, in ascending order
    pub fn excluded(&self) -> &[usize] {
        &self.excluded
    }

    /// Indices that were kept, in ascending order
    pub fn retained(&self) -> &[usize] {
        &self.retained
    }

    /// Number of diffusion directions left after filtering
    pub fn direction_count(&self) -> usize {
        self.image.dim().3
    }

    /// Replace non-positive intensities with the smallest positive value
    ///
    /// Log-domain tensor fitting cannot handle zero or negative signal, so
    /// offending voxels are clamped to the smallest positive intensity
    /// present in the filtered image. Returns the number of replaced
    /// values.
    ///
    /// # Errors
    ///
    /// Returns an error if the image contains no positive intensity at all.
    pub fn fix_nonpositive(&mut self) -> Result<usize> {
        let floor = self
            .image
            .iter()
            .copied()
            .filter(|value| *value > 0.0)
            .fold(f64::INFINITY, f64::min);
        if !floor.is_finite() {
            return Err(computation_error(
                "fix_nonpositive",
                &"image contains no positive intensity to substitute",
            ));
        }

        let mut replaced = 0_usize;
        self.image.mapv_inplace(|value| {
            if value <= 0.0 {
                replaced += 1;
                floor
            } else {
                value
            }
        });
        Ok(replaced)
    }
}
