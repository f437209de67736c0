//! Delimited matrix files.
//!
//! One row per city, no header, fields separated by a single delimiter
//! character (`;` by convention). Blank lines are skipped, fields are
//! trimmed, and a single trailing delimiter is tolerated. A whitespace
//! delimiter splits on runs of whitespace.

use std::path::Path;

use super::{DistanceMatrix, MatrixInstance, NoLinkPolicy};
use crate::error::{TspError, TspResult};

/// Field separator used by the course matrix files.
pub const DEFAULT_DELIMITER: char = ';';

/// Parse matrix text.
///
/// # Errors
///
/// Returns [`TspError::Parse`] for non-numeric tokens and any shape or
/// value error from [`DistanceMatrix::from_rows`].
pub fn parse_delimited(text: &str, delimiter: char) -> TspResult<DistanceMatrix> {
    let mut rows = Vec::new();

    for (line_idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = if delimiter.is_whitespace() {
            line.split_whitespace().collect()
        } else {
            line.strip_suffix(delimiter)
                .unwrap_or(line)
                .split(delimiter)
                .map(str::trim)
                .collect()
        };

        let row = fields
            .iter()
            .enumerate()
            .map(|(col_idx, token)| {
                token.parse::<f64>().map_err(|_| TspError::Parse {
                    line: line_idx + 1,
                    column: col_idx + 1,
                    token: (*token).to_string(),
                })
            })
            .collect::<TspResult<Vec<f64>>>()?;

        rows.push(row);
    }

    DistanceMatrix::from_rows(rows)
}

/// Read and parse a matrix file.
///
/// # Errors
///
/// Returns [`TspError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_delimited`].
pub fn load_matrix<P: AsRef<Path>>(path: P, delimiter: char) -> TspResult<DistanceMatrix> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_delimited(&content, delimiter)
}

/// A matrix read from disk, with whatever metadata its format carries.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMatrix {
    /// Instance name, or the file stem for delimited files.
    pub name: String,
    /// The distances.
    pub matrix: DistanceMatrix,
    /// No-link rule declared by the file itself.
    pub policy: Option<NoLinkPolicy>,
    /// Known optimum declared by the file itself.
    pub optimal_known: Option<f64>,
}

/// Load a `.yaml`/`.yml` instance or, for any other extension, a
/// delimited matrix.
///
/// # Errors
///
/// Returns the errors of [`MatrixInstance::from_yaml_file`] or
/// [`load_matrix`], plus shape and value errors of the YAML matrix.
pub fn load_any<P: AsRef<Path>>(path: P, delimiter: char) -> TspResult<LoadedMatrix> {
    let path = path.as_ref();

    if is_yaml(path) {
        let instance = MatrixInstance::from_yaml_file(path)?;
        return Ok(LoadedMatrix {
            matrix: instance.distance_matrix()?,
            policy: instance.policy()?,
            optimal_known: instance.optimal_known,
            name: instance.name,
        });
    }

    let name = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
    Ok(LoadedMatrix {
        name,
        matrix: load_matrix(path, delimiter)?,
        policy: None,
        optimal_known: None,
    })
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
