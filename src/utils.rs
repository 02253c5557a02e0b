//! Shared utilities for the EDA helpers.
//!
//! Common dtype classification, series fill helpers and the quantile
//! definition used by outlier clipping and box plots.

use polars::prelude::*;
use tracing::{error, info};

use crate::error::Result;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a column dtype for cleaning purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date or time type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Placeholder Markers
// =============================================================================

/// Residual null placeholders that survive string coercion of missing cells.
pub const NULL_MARKERS: [&str; 8] = ["nan", "null", "none", "n/a", "na", "missing", "#n/a", ""];

/// Check if a string is a residual null/placeholder value.
pub fn is_null_marker(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    NULL_MARKERS.iter().any(|&marker| lower == marker)
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Calculate the mode (most frequent value) of a Series, as a string.
///
/// Ties are broken by first occurrence in the column.
pub fn string_mode(series: &Series) -> Option<String> {
    let str_series = series.cast(&DataType::String).ok()?;
    let str_chunked = str_series.str().ok()?;

    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for val in str_chunked.into_iter().flatten() {
        let entry = counts.entry(val.to_string()).or_insert(0);
        if *entry == 0 {
            order.push(val.to_string());
        }
        *entry += 1;
    }

    // max_by_key keeps the last maximum, reversing keeps the first occurrence
    order.into_iter().rev().max_by_key(|v| counts[v])
}

/// Calculate the mode of a numeric Series.
pub fn numeric_mode(series: &Series) -> Option<f64> {
    let float_series = series.cast(&DataType::Float64).ok()?;
    let chunked = float_series.f64().ok()?;

    let mut counts: std::collections::HashMap<u64, usize> = std::collections::HashMap::new();
    let mut order: Vec<f64> = Vec::new();

    for val in chunked.into_iter().flatten() {
        let key = val.to_bits();
        let entry = counts.entry(key).or_insert(0);
        if *entry == 0 {
            order.push(val);
        }
        *entry += 1;
    }

    order
        .into_iter()
        .rev()
        .max_by_key(|v| counts[&v.to_bits()])
}

/// Linear-interpolation quantile over a non-empty sorted slice.
///
/// Matches the `(n - 1) * q` positional definition, so for
/// `[1, 2, 3, 100]` the 0.25 quantile is 1.75 and the 0.75 quantile 51.5.
pub fn quantile_linear(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (pos - lower as f64) * (sorted[upper] - sorted[lower])
    }
}

/// Collect the non-null values of a column as sorted f64s.
pub fn sorted_numeric_values(series: &Series) -> Result<Vec<f64>> {
    let float_series = series.drop_nulls().cast(&DataType::Float64)?;
    let mut values: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(values)
}

/// Round to two decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let mask = series.is_null();
    let len = series.len();
    let mut result_vec = Vec::with_capacity(len);

    for i in 0..len {
        if mask.get(i).unwrap_or(false) {
            result_vec.push(Some(fill_value));
        } else {
            let val = series.get(i)?;
            result_vec.push(Some(val.try_extract::<f64>()?));
        }
    }

    Ok(Series::new(series.name().clone(), result_vec))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = series.cast(&DataType::String)?;
    let str_chunked = str_series.str()?;
    let mut result_vec: Vec<Option<String>> = Vec::with_capacity(str_chunked.len());

    for opt_val in str_chunked.into_iter() {
        match opt_val {
            Some(val) => result_vec.push(Some(val.to_string())),
            None => result_vec.push(Some(fill_value.to_string())),
        }
    }

    Ok(Series::new(series.name().clone(), result_vec))
}

// =============================================================================
// Logging
// =============================================================================

/// Log a one-line success or failure note for an operation, then pass the
/// result through unchanged.
pub(crate) fn log_outcome<T>(operation: &str, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => info!("{} executed successfully", operation),
        Err(e) => error!("Error in {}: {}", operation, e),
    }
    result
}

// =============================================================================
// Tests
// =============================================================================
