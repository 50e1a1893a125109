//! Emission of the FSL brain-extraction/eddy-correction/fitting script

use crate::io::configuration::SCRIPT_SUFFIX;
use crate::io::error::{Result, fs_error};
use crate::io::naming;
use std::path::{Path, PathBuf};

/// Render the shell script that re-runs the FSL fitting pipeline
///
/// Takes basenames rather than full paths: every file reference inside
/// the script is relative, so the script runs from the dataset directory
/// and the directory stays relocatable.
pub fn render_script(image: &str, bvals: &str, bvecs: &str) -> String {
    let brain = naming::with_infix(image, ".brain");
    let mask = naming::with_infix(&brain, "_mask");
    let corrected = naming::with_infix(image, ".ec");
    let fit = format!("{image}.dtifit");

    format!(
        r#"#!/bin/sh

# abort unless FSL is configured

if [ -z "$FSLDIR" ]
then
    echo "FSL is not properly installed/configured. Please set the FSLDIR environment variable"
    exit 1
fi

echo "processing file: {image}"

# brain extraction

bet {image} {brain} -m -R
echo "brain extraction completed: {brain}, {mask}"

# eddy current correction

eddy_correct {image} {corrected} 0
echo "eddy current correction completed: {corrected}"

# tensor model fit

dtifit --data={corrected} --out={fit} --mask={mask} --bvecs={bvecs} --bvals={bvals}
echo "dti fit completed: {fit}_(FA, MD, Ln, Vn)"

# view results

fslview {fit}_FA {fit}_V1
"#
    )
}

/// Write the pipeline script next to the filtered image
///
/// The script is named `<image>.fsl_dtifit.sh` and marked executable.
///
/// # Errors
///
/// Returns an error if the script cannot be written or its permissions
/// cannot be set.
pub fn write_fsl_script(image: &Path, bvals: &Path, bvecs: &Path) -> Result<PathBuf> {
    let script_path = naming::append_suffix(image, SCRIPT_SUFFIX);
    let content = render_script(&basename(image), &basename(bvals), &basename(bvecs));
    std::fs::write(&script_path, content)
        .map_err(|source| fs_error(&script_path, "write script", source))?;
    mark_executable(&script_path)?;
    Ok(script_path)
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata =
        std::fs::metadata(path).map_err(|source| fs_error(path, "read metadata", source))?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    std::fs::set_permissions(path, permissions)
        .map_err(|source| fs_error(path, "set permissions", source))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
