//! Reading and writing FSL gradient-table files
//!
//! `bvals` holds one whitespace-separated row of diffusion weightings;
//! `bvecs` holds three rows (x, y, z components), one column per
//! direction. Values are written back in minimal decimal form, matching
//! the `%g`-style tables FSL tools produce.

use crate::dataset::gradients::GradientTable;
use crate::io::configuration::BVEC_COMPONENTS;
use crate::io::error::{DtiError, Result, fs_error};
use ndarray::Array2;
use std::path::Path;

/// Load a gradient table from its b-values and b-vectors files
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed, or if the
/// two files disagree about the number of directions.
pub fn load_table(bvals_path: &Path, bvecs_path: &Path) -> Result<GradientTable> {
    let bvals_text = std::fs::read_to_string(bvals_path)
        .map_err(|source| fs_error(bvals_path, "read b-values", source))?;
    let bvals = parse_bvals(&bvals_text, bvals_path)?;

    let bvecs_text = std::fs::read_to_string(bvecs_path)
        .map_err(|source| fs_error(bvecs_path, "read b-vectors", source))?;
    let bvecs = parse_bvecs(&bvecs_text, bvecs_path)?;

    GradientTable::new(bvals, bvecs)
}

/// Write a gradient table to its b-values and b-vectors files
///
/// # Errors
///
/// Returns an error if either file cannot be written.
pub fn write_table(table: &GradientTable, bvals_path: &Path, bvecs_path: &Path) -> Result<()> {
    let mut bvals_out = format_row(table.bvals().iter().copied());
    bvals_out.push('\n');
    std::fs::write(bvals_path, bvals_out)
        .map_err(|source| fs_error(bvals_path, "write b-values", source))?;

    let mut bvecs_out = String::new();
    for row in table.bvecs().rows() {
        bvecs_out.push_str(&format_row(row.iter().copied()));
        bvecs_out.push('\n');
    }
    std::fs::write(bvecs_path, bvecs_out)
        .map_err(|source| fs_error(bvecs_path, "write b-vectors", source))
}

/// Parse a b-values file: every number on every non-blank line
///
/// # Errors
///
/// Returns an error naming the line of the first token that isn't a
/// number.
pub fn parse_bvals(text: &str, path: &Path) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (number, line) in numbered_lines(text) {
        values.extend(parse_line(line, path, number)?);
    }
    Ok(values)
}

/// Parse a b-vectors file: three equal-length component rows
///
/// # Errors
///
/// Returns an error on unparsable tokens, a row count other than three,
/// or rows of differing length.
pub fn parse_bvecs(text: &str, path: &Path) -> Result<Array2<f64>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut last_line = 1;
    for (number, line) in numbered_lines(text) {
        let row = parse_line(line, path, number)?;
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(DtiError::GradientParse {
                    path: path.to_path_buf(),
                    line: number,
                    reason: format!(
                        "row has {} values, previous rows have {}",
                        row.len(),
                        first.len()
                    ),
                });
            }
        }
        last_line = number;
        rows.push(row);
    }

    if rows.len() != BVEC_COMPONENTS {
        return Err(DtiError::GradientParse {
            path: path.to_path_buf(),
            line: last_line,
            reason: format!(
                "expected {BVEC_COMPONENTS} component rows, found {}",
                rows.len()
            ),
        });
    }

    let columns = rows.first().map_or(0, Vec::len);
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((BVEC_COMPONENTS, columns), flat).map_err(|err| {
        DtiError::GradientParse {
            path: path.to_path_buf(),
            line: last_line,
            reason: err.to_string(),
        }
    })
}

// Non-blank lines with their one-based line numbers
fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn parse_line(line: &str, path: &Path, number: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_err| DtiError::GradientParse {
                path: path.to_path_buf(),
                line: number,
                reason: format!("'{token}' is not a number"),
            })
        })
        .collect()
}

// Minimal decimal rendering: integral values drop the fraction entirely
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1.0e12 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn format_row(values: impl Iterator<Item = f64>) -> String {
    values
        .map(format_value)
        .collect::<Vec<_>>()
        .join(" ")
}
