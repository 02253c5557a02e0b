//! Data cleaning operations for tabular datasets.
//!
//! This module provides functionality for:
//! - Removing duplicate rows
//! - Column type coercion (datetime, string)
//! - Column name normalization
//! - Dropping rows with residual categorical nulls
//! - Scaling/normalization of numeric columns
//! - IQR-based outlier clipping

mod converters;
mod outliers;
mod scaling;

pub use converters::{convert_to_datetime, convert_to_string};
pub use outliers::{clip_outliers, OutlierPolicy};
pub use scaling::{min_max_scale, normalize, standard_scale};

use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::profiler::get_categorical_columns;
use crate::utils::{is_null_marker, log_outcome};

/// Remove rows that are exact duplicates of an earlier row, keeping the
/// first occurrence and preserving row order. Idempotent.
pub fn drop_duplicate(df: DataFrame) -> Result<DataFrame> {
    log_outcome("drop_duplicate", dedup(df))
}

fn dedup(df: DataFrame) -> Result<DataFrame> {
    let before = df.height();
    let deduped = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
    let removed = before - deduped.height();
    if removed > 0 {
        debug!("Removed {} duplicate rows", removed);
    }
    Ok(deduped)
}

/// Lowercase all column names and replace spaces with underscores.
pub fn normalize_column_names(df: &mut DataFrame) -> Result<()> {
    log_outcome("normalize_column_names", rename_columns(df))
}

fn rename_columns(df: &mut DataFrame) -> Result<()> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_lowercase().replace(' ', "_"))
        .collect();
    df.set_column_names(names)?;
    Ok(())
}

/// Drop any row where a categorical column still holds a null or a
/// residual placeholder value ("nan", "n/a", ...) after filling.
pub fn drop_residual_categorical_nulls(df: DataFrame) -> Result<DataFrame> {
    log_outcome("drop_residual_categorical_nulls", drop_residual_rows(df))
}

fn drop_residual_rows(df: DataFrame) -> Result<DataFrame> {
    let categorical_columns = get_categorical_columns(&df);
    let mut keep = vec![true; df.height()];

    for col_name in &categorical_columns {
        let column = df.column(col_name)?;
        let series = column.as_materialized_series();
        let str_series = series.cast(&DataType::String)?;
        let str_chunked = str_series.str()?;

        for (i, opt_val) in str_chunked.into_iter().enumerate() {
            match opt_val {
                Some(val) if !is_null_marker(val) => {}
                _ => keep[i] = false,
            }
        }
    }

    let before = df.height();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let filtered = df.filter(&mask)?;
    let removed = before - filtered.height();
    if removed > 0 {
        debug!("Dropped {} rows with residual categorical nulls", removed);
    }
    Ok(filtered)
}
