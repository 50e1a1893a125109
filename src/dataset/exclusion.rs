//! Bookkeeping for the set of excluded diffusion directions

use crate::io::error::{Result, invalid_parameter};
use std::collections::BTreeSet;

/// Set of diffusion-direction indices marked for exclusion
///
/// Indices refer to positions along the fourth image axis. The set keeps
/// them ordered so exclusion lists render deterministically in logs and
/// error messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    indices: BTreeSet<usize>,
}

impl ExclusionSet {
    /// Create an empty exclusion set
    pub const fn new() -> Self {
        Self {
            indices: BTreeSet::new(),
        }
    }

    /// Create a set from a list of indices, ignoring duplicates
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }

    /// Mark a direction for exclusion
    ///
    /// Returns `false` when the index was already excluded.
    pub fn add(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    /// Unmark a previously excluded direction
    ///
    /// # Errors
    ///
    /// Returns an error if the index is not currently excluded.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        if self.indices.remove(&index) {
            Ok(())
        } else {
            Err(invalid_parameter(
                "exclude",
                &index,
                &"index is not currently excluded",
            ))
        }
    }

    /// Unmark every excluded direction
    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Check whether any direction is excluded
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of excluded directions
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check whether a specific direction is excluded
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Iterate over the excluded indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Excluded indices as a sorted vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// Check that every excluded index fits a dataset of the given size
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range index.
    pub fn validate(&self, directions: usize) -> Result<()> {
        match self.indices.iter().find(|&&index| index >= directions) {
            Some(&index) => Err(invalid_parameter(
                "exclude",
                &index,
                &format!("dataset has only {directions} diffusion directions"),
            )),
            None => Ok(()),
        }
    }

    /// Indices kept after exclusion, in ascending order
    pub fn retained(&self, directions: usize) -> Vec<usize> {
        (0..directions)
            .filter(|index| !self.indices.contains(index))
            .collect()
    }
}
