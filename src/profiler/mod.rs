//! Missing-value statistics and column classification.
//!
//! Columns are classified by their declared dtype, never by inspecting
//! the data: a numeric column is one whose dtype is an integer or float
//! type, everything else (string, date/time, boolean, categorical) is
//! treated as a discrete-category feature.

use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::{EdaError, Result};
use crate::utils::{is_numeric_dtype, log_outcome, round2};

/// Per-column missing-value summary row.
#[derive(Debug, Clone, Serialize)]
pub struct MissingColumnSummary {
    /// Column name
    pub column: String,
    /// Number of null cells
    pub missing_count: usize,
    /// Percentage of null cells, rounded to two decimals
    pub missing_percentage: f64,
    /// Declared dtype of the column
    pub dtype: String,
}

/// Percentage of null cells across the whole dataset, rounded to two
/// decimals. An empty dataset has no missing cells.
pub fn percent_missing(df: &DataFrame) -> f64 {
    let total_cells = df.height() * df.width();
    if total_cells == 0 {
        return 0.0;
    }

    let total_missing: usize = df
        .get_columns()
        .iter()
        .map(|col| col.null_count())
        .sum();

    info!("percent_missing executed successfully");
    round2(total_missing as f64 / total_cells as f64 * 100.0)
}

/// Percentage of null cells in one column, rounded to two decimals.
pub fn percent_missing_column(df: &DataFrame, column: &str) -> Result<f64> {
    log_outcome("percent_missing_column", column_missing_pct(df, column))
}

fn column_missing_pct(df: &DataFrame, column: &str) -> Result<f64> {
    let col = df
        .column(column)
        .map_err(|_| EdaError::ColumnNotFound(column.to_string()))?;

    if col.len() == 0 {
        return Ok(0.0);
    }
    Ok(round2(col.null_count() as f64 / col.len() as f64 * 100.0))
}

/// Names of the numeric columns, in first-occurrence order.
pub fn get_numerical_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Names of the categorical (non-numeric) columns, in first-occurrence
/// order.
pub fn get_categorical_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| !is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Per-column missing-value report.
///
/// Covers only columns with at least one null, sorted by missing
/// percentage descending.
pub fn missing_value_report(df: &DataFrame) -> Vec<MissingColumnSummary> {
    let height = df.height();
    let mut rows: Vec<MissingColumnSummary> = df
        .get_columns()
        .iter()
        .filter(|col| col.null_count() > 0)
        .map(|col| MissingColumnSummary {
            column: col.name().to_string(),
            missing_count: col.null_count(),
            missing_percentage: if height == 0 {
                0.0
            } else {
                round2(col.null_count() as f64 / height as f64 * 100.0)
            },
            dtype: col.dtype().to_string(),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.missing_percentage
            .partial_cmp(&a.missing_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    info!(
        "missing_value_report executed successfully: {} of {} columns have missing values",
        rows.len(),
        df.width()
    );
    rows
}
