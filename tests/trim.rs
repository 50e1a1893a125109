//! End-to-end exclusion runs over datasets written to a temporary directory

use dtitrim::Result;
use dtitrim::dataset::DtiDataset;
use dtitrim::io::cli::{Cli, DatasetProcessor};
use ndarray::Array4;
use nifti::NiftiHeader;
use std::path::{Path, PathBuf};

const DIRECTIONS: usize = 6;

fn write_dataset(dir: &Path, stem: &str) -> Result<PathBuf> {
    let voxels = 2 * 3 * 2 * DIRECTIONS;
    let image = match Array4::from_shape_vec(
        (2, 3, 2, DIRECTIONS),
        (0..voxels).map(|v| v as f64 + 1.0).collect(),
    ) {
        Ok(image) => image,
        Err(err) => unreachable!("shape matches element count: {err}"),
    };

    let image_path = dir.join(format!("{stem}.nii"));
    dtitrim::io::image::write_image(&image_path, &NiftiHeader::default(), &image)?;

    let bvals: Vec<String> = (0..DIRECTIONS).map(|d| (d * 500).to_string()).collect();
    std::fs::write(
        dir.join(format!("{stem}.nii.bvals")),
        format!("{}\n", bvals.join(" ")),
    )
    .map_err(|source| dtitrim::io::error::fs_error(dir, "write b-values", source))?;

    let mut bvecs = String::new();
    for component in 0..3 {
        let row: Vec<String> = (0..DIRECTIONS)
            .map(|d| if d % 3 == component { "1" } else { "0" }.to_string())
            .collect();
        bvecs.push_str(&row.join(" "));
        bvecs.push('\n');
    }
    std::fs::write(dir.join(format!("{stem}.nii.bvecs")), bvecs)
        .map_err(|source| dtitrim::io::error::fs_error(dir, "write b-vectors", source))?;

    Ok(image_path)
}

fn quiet_cli(target: PathBuf, exclude: Vec<usize>) -> Cli {
    Cli {
        target,
        exclude,
        bvals: None,
        bvecs: None,
        suffix: ".exc".to_string(),
        no_script: false,
        fix_nonpositive: false,
        quiet: true,
        no_skip: false,
    }
}

#[test]
fn test_image_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()
        .map_err(|source| dtitrim::io::error::fs_error(Path::new("."), "create tempdir", source))?;
    let image_path = write_dataset(dir.path(), "dwi")?;

    let dataset = DtiDataset::load(
        &image_path,
        &dir.path().join("dwi.nii.bvals"),
        &dir.path().join("dwi.nii.bvecs"),
    )?;

    assert_eq!(dataset.direction_count(), DIRECTIONS);
    assert_eq!(dataset.image().dim(), (2, 3, 2, DIRECTIONS));
    assert_eq!(dataset.gradients().bvals().len(), DIRECTIONS);
    // first voxel of the first direction survives the disk round trip
    assert_eq!(dataset.image().get([0, 0, 0, 0]).copied(), Some(1.0));
    Ok(())
}

#[test]
fn test_single_dataset_run_writes_all_outputs() -> Result<()> {
    let dir = tempfile::tempdir()
        .map_err(|source| dtitrim::io::error::fs_error(Path::new("."), "create tempdir", source))?;
    let image_path = write_dataset(dir.path(), "dwi")?;

    let mut processor = DatasetProcessor::new(quiet_cli(image_path, vec![1, 4]));
    processor.process()?;

    let filtered_image = dir.path().join("dwi.exc.nii");
    let filtered_bvals = dir.path().join("dwi.nii.bvals.exc");
    let filtered_bvecs = dir.path().join("dwi.nii.bvecs.exc");
    let script = dir.path().join("dwi.exc.nii.fsl_dtifit.sh");
    let log = dir.path().join("dwi.nii.exc.log");

    assert!(filtered_image.is_file());
    assert!(filtered_bvals.is_file());
    assert!(filtered_bvecs.is_file());
    assert!(script.is_file());
    assert!(log.is_file());

    // the filtered dataset loads back consistently
    let filtered = DtiDataset::load(&filtered_image, &filtered_bvals, &filtered_bvecs)?;
    assert_eq!(filtered.direction_count(), DIRECTIONS - 2);
    assert_eq!(
        filtered.gradients().bvals(),
        &[0.0, 1000.0, 1500.0, 2500.0]
    );

    let log_text = std::fs::read_to_string(&log)
        .map_err(|source| dtitrim::io::error::fs_error(&log, "read change log", source))?;
    assert!(log_text.contains("imageno_excluded = [1, 4]"));
    assert!(log_text.contains("new_nifti = "));
    assert!(log_text.contains("dwi.exc.nii"));

    let script_text = std::fs::read_to_string(&script)
        .map_err(|source| dtitrim::io::error::fs_error(&script, "read script", source))?;
    assert!(script_text.contains("bet dwi.exc.nii dwi.exc.brain.nii -m -R"));
    assert!(script_text.contains("--bvals=dwi.nii.bvals.exc"));
    Ok(())
}

#[test]
fn test_rerun_skips_existing_output() -> Result<()> {
    let dir = tempfile::tempdir()
        .map_err(|source| dtitrim::io::error::fs_error(Path::new("."), "create tempdir", source))?;
    let image_path = write_dataset(dir.path(), "dwi")?;

    let mut first = DatasetProcessor::new(quiet_cli(image_path.clone(), vec![0]));
    first.process()?;

    let log = dir.path().join("dwi.nii.exc.log");
    std::fs::remove_file(&log)
        .map_err(|source| dtitrim::io::error::fs_error(&log, "remove change log", source))?;

    // output exists, so the second run must not recreate the log
    let mut second = DatasetProcessor::new(quiet_cli(image_path, vec![0]));
    second.process()?;
    assert!(!log.exists());
    Ok(())
}

#[test]
fn test_directory_run_processes_every_dataset() -> Result<()> {
    let dir = tempfile::tempdir()
        .map_err(|source| dtitrim::io::error::fs_error(Path::new("."), "create tempdir", source))?;
    write_dataset(dir.path(), "subj01")?;
    write_dataset(dir.path(), "subj02")?;

    let mut processor = DatasetProcessor::new(quiet_cli(dir.path().to_path_buf(), vec![2]));
    processor.process()?;

    assert!(dir.path().join("subj01.exc.nii").is_file());
    assert!(dir.path().join("subj02.exc.nii").is_file());

    // filtered images are not treated as fresh inputs on a second pass
    let mut again = DatasetProcessor::new(quiet_cli(dir.path().to_path_buf(), vec![2]));
    again.process()?;
    assert!(!dir.path().join("subj01.exc.exc.nii").exists());
    Ok(())
}

#[test]
fn test_fix_nonpositive_is_recorded_in_log() -> Result<()> {
    let dir = tempfile::tempdir()
        .map_err(|source| dtitrim::io::error::fs_error(Path::new("."), "create tempdir", source))?;
    let voxels = 2 * 2 * 2 * DIRECTIONS;
    let image = match Array4::from_shape_vec(
        (2, 2, 2, DIRECTIONS),
        (0..voxels).map(|v| v as f64).collect(),
    ) {
        Ok(image) => image,
        Err(err) => unreachable!("shape matches element count: {err}"),
    };
    // voxel 0 of direction 0 is 0.0 and direction 0 is retained
    let image_path = dir.path().join("dwi.nii");
    dtitrim::io::image::write_image(&image_path, &NiftiHeader::default(), &image)?;
    write_tables(dir.path())?;

    let mut cli = quiet_cli(image_path, vec![3]);
    cli.fix_nonpositive = true;
    let mut processor = DatasetProcessor::new(cli);
    processor.process()?;

    let log = dir.path().join("dwi.nii.exc.log");
    let log_text = std::fs::read_to_string(&log)
        .map_err(|source| dtitrim::io::error::fs_error(&log, "read change log", source))?;
    assert!(log_text.contains("nonpositive_replaced = 1"));
    Ok(())
}

fn write_tables(dir: &Path) -> Result<()> {
    let bvals: Vec<String> = (0..DIRECTIONS).map(|d| (d * 500).to_string()).collect();
    std::fs::write(
        dir.join("dwi.nii.bvals"),
        format!("{}\n", bvals.join(" ")),
    )
    .map_err(|source| dtitrim::io::error::fs_error(dir, "write b-values", source))?;

    let mut bvecs = String::new();
    for component in 0..3 {
        let row: Vec<String> = (0..DIRECTIONS)
            .map(|d| if d % 3 == component { "1" } else { "0" }.to_string())
            .collect();
        bvecs.push_str(&row.join(" "));
        bvecs.push('\n');
    }
    std::fs::write(dir.join("dwi.nii.bvecs"), bvecs)
        .map_err(|source| dtitrim::io::error::fs_error(dir, "write b-vectors", source))
}

#[test]
fn test_excluding_every_direction_fails_before_writing() -> Result<()> {
    let dir = tempfile::tempdir()
        .map_err(|source| dtitrim::io::error::fs_error(Path::new("."), "create tempdir", source))?;
    let image_path = write_dataset(dir.path(), "dwi")?;

    let mut processor =
        DatasetProcessor::new(quiet_cli(image_path, (0..DIRECTIONS).collect()));
    assert!(processor.process().is_err());
    assert!(!dir.path().join("dwi.exc.nii").exists());
    assert!(!dir.path().join("dwi.nii.exc.log").exists());
    Ok(())
}

#[test]
fn test_out_of_range_exclusion_fails_before_writing() -> Result<()> {
    let dir = tempfile::tempdir()
        .map_err(|source| dtitrim::io::error::fs_error(Path::new("."), "create tempdir", source))?;
    let image_path = write_dataset(dir.path(), "dwi")?;

    let mut processor = DatasetProcessor::new(quiet_cli(image_path, vec![DIRECTIONS]));
    assert!(processor.process().is_err());
    assert!(!dir.path().join("dwi.exc.nii").exists());
    Ok(())
}
