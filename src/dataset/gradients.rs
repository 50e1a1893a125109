//! Diffusion gradient table: b-values and b-vectors in FSL layout

use crate::io::configuration::BVEC_COMPONENTS;
use crate::io::error::{DtiError, Result, invalid_parameter};
use ndarray::{Array2, Axis};

/// Per-direction diffusion weighting and gradient orientation
///
/// Mirrors the FSL file layout: one b-value per direction, and a b-vector
/// matrix with one row per spatial component and one column per direction.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientTable {
    bvals: Vec<f64>,
    bvecs: Array2<f64>,
}

impl GradientTable {
    /// Build a table from raw b-values and a component-by-direction matrix
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix doesn't have exactly three component
    /// rows, or if the number of columns disagrees with the b-value count.
    pub fn new(bvals: Vec<f64>, bvecs: Array2<f64>) -> Result<Self> {
        if bvecs.nrows() != BVEC_COMPONENTS {
            return Err(DtiError::InconsistentDataset {
                reason: format!(
                    "b-vector table has {} component rows, expected {BVEC_COMPONENTS}",
                    bvecs.nrows()
                ),
            });
        }
        if bvecs.ncols() != bvals.len() {
            return Err(DtiError::InconsistentDataset {
                reason: format!(
                    "{} b-values describe {} b-vector columns",
                    bvals.len(),
                    bvecs.ncols()
                ),
            });
        }
        Ok(Self { bvals, bvecs })
    }

    /// Number of diffusion directions in the table
    pub fn len(&self) -> usize {
        self.bvals.len()
    }

    /// Check whether the table describes no directions at all
    pub fn is_empty(&self) -> bool {
        self.bvals.is_empty()
    }

    /// The b-value of each direction
    pub fn bvals(&self) -> &[f64] {
        &self.bvals
    }

    /// The component-by-direction b-vector matrix
    pub const fn bvecs(&self) -> &Array2<f64> {
        &self.bvecs
    }

    /// Keep only the listed directions, preserving their order
    ///
    /// # Errors
    ///
    /// Returns an error if any index is out of range for this table.
    pub fn select(&self, retained: &[usize]) -> Result<Self> {
        if let Some(&index) = retained.iter().find(|&&index| index >= self.len()) {
            return Err(invalid_parameter(
                "retained",
                &index,
                &format!("gradient table has only {} directions", self.len()),
            ));
        }
        let bvals = retained
            .iter()
            .filter_map(|&index| self.bvals.get(index).copied())
            .collect();
        let bvecs = self.bvecs.select(Axis(1), retained);
        Ok(Self { bvals, bvecs })
    }
}
