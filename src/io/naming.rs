//! Filename derivation for filtered outputs and pipeline intermediates
//!
//! Output names are derived from the source names rather than taken from
//! configuration, so a dataset and all of its derived files sort together
//! in a directory listing. The filtered image keeps its NIfTI extension
//! (`dwi.nii.gz` becomes `dwi.exc.nii.gz`) while table and log names are
//! plain appends.

use crate::io::configuration::NIFTI_MARKER;
use std::path::{Path, PathBuf};

/// Insert an infix before the NIfTI extension of a filename
///
/// Falls back to appending when the name carries no `.nii` marker, so
/// callers never lose the infix entirely.
pub fn with_infix(file_name: &str, infix: &str) -> String {
    file_name.find(NIFTI_MARKER).map_or_else(
        || format!("{file_name}{infix}"),
        |position| {
            let (head, tail) = file_name.split_at(position);
            format!("{head}{infix}{tail}")
        },
    )
}

/// Derive the filtered-image path by inserting the suffix before `.nii`
pub fn derive_image_path(input: &Path, suffix: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output_name = with_infix(&name, suffix);

    input.parent().map_or_else(
        || PathBuf::from(&output_name),
        |parent| parent.join(&output_name),
    )
}

/// Append a suffix to a full path, keeping the directory untouched
pub fn append_suffix(input: &Path, suffix: &str) -> PathBuf {
    let mut raw = input.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Default gradient-table path: the image path plus `.{extension}`
pub fn default_table_path(image: &Path, extension: &str) -> PathBuf {
    append_suffix(image, &format!(".{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_infix_plain_nifti() {
        assert_eq!(with_infix("dwi.nii", ".exc"), "dwi.exc.nii");
    }

    #[test]
    fn test_with_infix_compressed_nifti() {
        assert_eq!(with_infix("dwi.nii.gz", ".exc"), "dwi.exc.nii.gz");
    }

    #[test]
    fn test_with_infix_without_marker_appends() {
        assert_eq!(with_infix("dwi.img", ".exc"), "dwi.img.exc");
    }

    #[test]
    fn test_with_infix_underscore_infix() {
        assert_eq!(with_infix("dwi.brain.nii.gz", "_mask"), "dwi.brain_mask.nii.gz");
    }

    #[test]
    fn test_derive_image_path_keeps_directory() {
        let derived = derive_image_path(Path::new("study/dwi.nii.gz"), ".exc");
        assert_eq!(derived, PathBuf::from("study/dwi.exc.nii.gz"));
    }

    #[test]
    fn test_append_suffix() {
        let appended = append_suffix(Path::new("study/dwi.nii.bvals"), ".exc");
        assert_eq!(appended, PathBuf::from("study/dwi.nii.bvals.exc"));
    }

    #[test]
    fn test_default_table_path() {
        let table = default_table_path(Path::new("dwi.nii.gz"), "bvecs");
        assert_eq!(table, PathBuf::from("dwi.nii.gz.bvecs"));
    }
}
