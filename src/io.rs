//! Dataset load/save over delimited text files.
//!
//! Comma-separated files with a header row naming the columns. Loading
//! infers column types unless the caller supplies explicit overrides;
//! saving writes the header and omits any row-index column.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;
use tracing::debug;

use crate::error::{EdaError, Result};
use crate::utils::log_outcome;

/// Load a dataset from a CSV file, inferring column types.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<DataFrame> {
    log_outcome("load_dataset", read_csv(path.as_ref(), None))
}

/// Load a dataset from a CSV file with explicit column type overrides.
///
/// Columns named in `schema` are coerced to the declared type at read
/// time; all other columns keep their inferred type.
pub fn load_dataset_with_schema(path: impl AsRef<Path>, schema: Schema) -> Result<DataFrame> {
    log_outcome("load_dataset", read_csv(path.as_ref(), Some(schema)))
}

fn read_csv(path: &Path, schema: Option<Schema>) -> Result<DataFrame> {
    if !path.exists() {
        return Err(EdaError::FileNotFound(path.display().to_string()));
    }

    let mut options = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')));

    if let Some(schema) = schema {
        options = options.with_schema_overwrite(Some(Arc::new(schema)));
    }

    let df = options
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| EdaError::Parse(e.to_string()))?
        .finish()
        .map_err(|e| EdaError::Parse(e.to_string()))?;

    debug!("Loaded dataset {:?} from {}", df.shape(), path.display());
    Ok(df)
}

/// Save a dataset to a CSV file with a header row.
pub fn save_dataset(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    log_outcome("save_dataset", write_csv(df, path.as_ref()))
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .map_err(|e| match e {
            PolarsError::IO { .. } => {
                EdaError::Io(std::io::Error::other(e.to_string()))
            }
            other => EdaError::Polars(other),
        })?;

    debug!("Saved dataset {:?} to {}", df.shape(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_dataset_missing_file() {
        let result = load_dataset("does/not/exist.csv");
        assert!(matches!(result, Err(EdaError::FileNotFound(_))));
    }

    #[test]
    fn test_round_trip_preserves_values_and_order() {
        let mut df = df![
            "b_col" => [1i64, 2, 3],
            "a_col" => ["x", "y", "z"],
            "score" => [0.5f64, 1.5, 2.5],
        ]
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round_trip.csv");

        save_dataset(&mut df, &path).unwrap();
        let loaded = load_dataset(&path).unwrap();

        assert_eq!(
            loaded.get_column_names(),
            vec!["b_col", "a_col", "score"],
            "column order must survive the round trip"
        );
        assert!(loaded.equals(&df));
    }

    #[test]
    fn test_load_with_schema_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typed.csv");
        std::fs::write(&path, "id,amount\n1,10\n2,20\n").unwrap();

        let schema = Schema::from_iter([
            (PlSmallStr::from_static("id"), DataType::String),
            (PlSmallStr::from_static("amount"), DataType::Float64),
        ]);

        let df = load_dataset_with_schema(&path, schema).unwrap();
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("amount").unwrap().dtype(), &DataType::Float64);
    }
}
