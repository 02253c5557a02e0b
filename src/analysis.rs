//! Grouped aggregation and unit conversion helpers.

use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{EdaError, Result};
use crate::utils::log_outcome;

/// Bytes per megabyte used by [`bytes_to_megabytes`].
const MEGABYTE: f64 = 1e6;

/// Aggregation metric applied to the grouped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggMetric {
    Sum,
    Mean,
    Count,
    Min,
    Max,
}

impl FromStr for AggMetric {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(Self::Sum),
            "mean" => Ok(Self::Mean),
            "count" => Ok(Self::Count),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(EdaError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Group rows by `group_column`, apply `metric` to that same column,
/// name the result `result_name`, sort by it and keep the first `top_n`
/// rows.
pub fn aggregate(
    df: &DataFrame,
    group_column: &str,
    metric: AggMetric,
    result_name: &str,
    top_n: usize,
    ascending: bool,
) -> Result<DataFrame> {
    log_outcome(
        "aggregate",
        group_and_rank(df, group_column, metric, result_name, top_n, ascending),
    )
}

fn group_and_rank(
    df: &DataFrame,
    group_column: &str,
    metric: AggMetric,
    result_name: &str,
    top_n: usize,
    ascending: bool,
) -> Result<DataFrame> {
    if df.column(group_column).is_err() {
        return Err(EdaError::ColumnNotFound(group_column.to_string()));
    }

    let metric_expr = match metric {
        AggMetric::Sum => col(group_column).sum(),
        AggMetric::Mean => col(group_column).mean(),
        AggMetric::Count => col(group_column).count(),
        AggMetric::Min => col(group_column).min(),
        AggMetric::Max => col(group_column).max(),
    }
    .alias(result_name);

    let result = df
        .clone()
        .lazy()
        .group_by([col(group_column)])
        .agg([metric_expr])
        .sort(
            [result_name],
            SortMultipleOptions::default().with_order_descending(!ascending),
        )
        .limit(top_n as IdxSize)
        .collect()?;

    Ok(result)
}

/// Convert a column of byte counts to megabytes in place, returning the
/// converted column.
pub fn bytes_to_megabytes(df: &mut DataFrame, column: &str) -> Result<Series> {
    log_outcome("bytes_to_megabytes", to_megabytes(df, column))
}

fn to_megabytes(df: &mut DataFrame, column: &str) -> Result<Series> {
    let series = df
        .column(column)
        .map_err(|_| EdaError::ColumnNotFound(column.to_string()))?
        .as_materialized_series()
        .clone();

    if !crate::utils::is_numeric_dtype(series.dtype()) {
        return Err(EdaError::TypeConversion {
            column: column.to_string(),
            target_type: "float".to_string(),
            reason: format!("column has non-numeric dtype {}", series.dtype()),
        });
    }
    let float_series = series.cast(&DataType::Float64)?;

    let converted = float_series
        .f64()?
        .apply(|opt_val| opt_val.map(|val| val / MEGABYTE))
        .into_series();

    df.replace(column, converted.clone())?;
    Ok(converted)
}
