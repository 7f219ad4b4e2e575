//! CSV Data Loader Module
//! Reads header-based CSV files into a column table of `f64` values using Polars.

use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("{path}: row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        path: PathBuf,
        column: String,
        row: usize,
        value: String,
    },
    #[error("{path}: row {row} has no value for column '{column}'")]
    MissingField {
        path: PathBuf,
        column: String,
        row: usize,
    },
    #[error("{path}: no columns in header")]
    NoColumns { path: PathBuf },
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),
    #[error("Column '{column}' has {found} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
}

/// Column name to ordered values, one entry per data row.
///
/// All columns share the same length. Header order is kept for iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTable {
    names: Vec<String>,
    columns: HashMap<String, Vec<f64>>,
    rows: usize,
}

impl ColumnTable {
    /// Build a table from `(name, values)` pairs in header order.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self, LoaderError> {
        let rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut table = Self {
            names: Vec::with_capacity(columns.len()),
            columns: HashMap::with_capacity(columns.len()),
            rows,
        };

        for (name, values) in columns {
            if values.len() != rows {
                return Err(LoaderError::LengthMismatch {
                    column: name,
                    expected: rows,
                    found: values.len(),
                });
            }
            if table.columns.contains_key(&name) {
                return Err(LoaderError::DuplicateColumn(name));
            }
            table.names.push(name.clone());
            table.columns.insert(name, values);
        }

        Ok(table)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Like [`ColumnTable::column`], but a missing column is an error.
    pub fn require(&self, name: &str) -> Result<&[f64], LoaderError> {
        self.column(name)
            .ok_or_else(|| LoaderError::MissingColumn(name.to_string()))
    }

    /// Column names in header order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Loads CSV files with Polars and converts every field to `f64`.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file. The first row is the header; every other field must parse as `f64`.
    pub fn load_csv(file_path: impl AsRef<Path>) -> Result<ColumnTable, LoaderError> {
        let path = file_path.as_ref();
        Self::check_header(path)?;
        let df = Self::read_frame(path)?;
        let table = Self::frame_to_table(&df, path)?;

        log::debug!(
            "Loaded {} rows from {} (columns: {})",
            table.row_count(),
            path.display(),
            table.column_names().join(",")
        );

        Ok(table)
    }

    /// Polars renames repeated header names, so duplicates are caught on the raw line.
    fn check_header(path: &Path) -> Result<(), LoaderError> {
        let io_error = |source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        let mut header = String::new();
        BufReader::new(file)
            .read_line(&mut header)
            .map_err(io_error)?;

        let mut seen = HashSet::new();
        for name in header.trim_end_matches(['\r', '\n']).split(',') {
            let name = name.trim().trim_matches('"');
            if !seen.insert(name) {
                return Err(LoaderError::DuplicateColumn(name.to_string()));
            }
        }
        Ok(())
    }

    /// Read every column as text so that numeric conversion stays strict.
    /// The file handle is dropped before this returns.
    fn read_frame(path: &Path) -> Result<DataFrame, LoaderError> {
        let file = File::open(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|source| LoaderError::Csv {
                path: path.to_path_buf(),
                source,
            })
    }

    fn frame_to_table(df: &DataFrame, path: &Path) -> Result<ColumnTable, LoaderError> {
        if df.width() == 0 {
            return Err(LoaderError::NoColumns {
                path: path.to_path_buf(),
            });
        }

        let mut fields = Vec::with_capacity(df.width());
        for col in df.get_columns() {
            let text = col
                .as_materialized_series()
                .str()
                .map_err(|source| LoaderError::Csv {
                    path: path.to_path_buf(),
                    source,
                })?;
            fields.push((col.name().to_string(), text));
        }

        // Blank lines come back as rows with every field null.
        let blank: Vec<bool> = (0..df.height())
            .map(|i| fields.iter().all(|(_, text)| text.get(i).is_none()))
            .collect();
        let skipped = blank.iter().filter(|&&b| b).count();
        if skipped > 0 {
            log::debug!("{}: skipped {} blank lines", path.display(), skipped);
        }

        let mut columns = Vec::with_capacity(fields.len());
        for (name, text) in fields {
            let mut values = Vec::with_capacity(text.len() - skipped);
            for (i, field) in text.into_iter().enumerate() {
                if blank[i] {
                    continue;
                }
                let row = i + 1;
                let field = field.ok_or_else(|| LoaderError::MissingField {
                    path: path.to_path_buf(),
                    column: name.clone(),
                    row,
                })?;
                let value = Self::parse_field(field).ok_or_else(|| LoaderError::InvalidNumber {
                    path: path.to_path_buf(),
                    column: name.clone(),
                    row,
                    value: field.to_string(),
                })?;
                values.push(value);
            }

            columns.push((name, values));
        }

        ColumnTable::from_columns(columns)
    }

    fn parse_field(field: &str) -> Option<f64> {
        field.trim().parse::<f64>().ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_keeps_columns_and_row_order() {
        let dir = tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "abc.csv",
            "a,b,c\n0,0.01,-0.1\n1,0.02,-0.2\n2,0.03,-0.3\n",
        );

        let table = DataLoader::load_csv(&path).unwrap();

        assert_eq!(table.column_names(), ["a", "b", "c"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("a").unwrap(), [0.0, 1.0, 2.0]);
        let b = table.column("b").unwrap();
        assert_relative_eq!(b[0], 0.01);
        assert_relative_eq!(b[1], 0.02);
        assert_relative_eq!(b[2], 0.03);
        assert_eq!(table.column("c").unwrap(), [-0.1, -0.2, -0.3]);
        assert!(table.column("d").is_none());
    }

    #[test]
    fn test_load_accepts_scientific_notation_and_padding() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "sci.csv", "x,y,z\n1e-3, 2.5 ,-4E2\n");

        let table = DataLoader::load_csv(&path).unwrap();

        assert_relative_eq!(table.column("x").unwrap()[0], 0.001);
        assert_relative_eq!(table.column("y").unwrap()[0], 2.5);
        assert_relative_eq!(table.column("z").unwrap()[0], -400.0);
    }

    #[test]
    fn test_header_only_file_gives_empty_columns() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "empty.csv", "x,y,z\n");

        let table = DataLoader::load_csv(&path).unwrap();

        assert_eq!(table.column_count(), 3);
        assert!(table.is_empty());
        assert_eq!(table.column("z").unwrap().len(), 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.csv");

        let err = DataLoader::load_csv(&path).unwrap_err();

        match err {
            LoaderError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_field_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "bad.csv", "x,y,z\n1,2,3\n4,five,6\n");

        let err = DataLoader::load_csv(&path).unwrap_err();

        match err {
            LoaderError::InvalidNumber {
                column, row, value, ..
            } => {
                assert_eq!(column, "y");
                assert_eq!(row, 2);
                assert_eq!(value, "five");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
        assert!(DataLoader::load_csv(&path)
            .unwrap_err()
            .to_string()
            .contains("bad.csv"));
    }

    #[test]
    fn test_short_row_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "short.csv", "x,y,z\n1,2,3\n4,5\n");

        let err = DataLoader::load_csv(&path).unwrap_err();

        assert!(matches!(
            err,
            LoaderError::MissingField { ref column, row: 2, .. } if column == "z"
        ));
    }

    #[test]
    fn test_long_row_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "long.csv", "x,y,z\n1,2,3\n4,5,6,7\n");

        assert!(DataLoader::load_csv(&path).is_err());
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let trailing = write_csv(dir.path(), "trailing.csv", "x,y,z\n1,2,3\n\n");
        let inner = write_csv(dir.path(), "inner.csv", "x,y,z\n1,2,3\n\n4,5,6\n");

        let table = DataLoader::load_csv(&trailing).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column("z").unwrap(), [3.0]);

        let table = DataLoader::load_csv(&inner).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("x").unwrap(), [1.0, 4.0]);
        assert_eq!(table.column("z").unwrap(), [3.0, 6.0]);
    }

    #[test]
    fn test_duplicate_header_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_csv(dir.path(), "dup.csv", "x,x,z\n1,2,3\n");

        let err = DataLoader::load_csv(&path).unwrap_err();

        assert!(matches!(err, LoaderError::DuplicateColumn(ref n) if n == "x"));
    }

    #[test]
    fn test_from_columns_checks_lengths_and_names() {
        let err = ColumnTable::from_columns(vec![
            ("x".to_string(), vec![1.0, 2.0]),
            ("y".to_string(), vec![1.0]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            LoaderError::LengthMismatch { expected: 2, found: 1, .. }
        ));

        let err = ColumnTable::from_columns(vec![
            ("x".to_string(), vec![1.0]),
            ("x".to_string(), vec![2.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, LoaderError::DuplicateColumn(ref n) if n == "x"));
    }

    #[test]
    fn test_require_reports_missing_column() {
        let table = ColumnTable::from_columns(vec![("x".to_string(), vec![1.0])]).unwrap();

        assert_eq!(table.require("x").unwrap(), [1.0]);
        assert!(matches!(
            table.require("z"),
            Err(LoaderError::MissingColumn(ref n)) if n == "z"
        ));
    }
}
