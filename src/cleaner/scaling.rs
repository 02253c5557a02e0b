//! Rescaling of numeric columns.
//!
//! Each function returns a new DataFrame containing only the rescaled
//! numeric columns, in their original order. Null cells pass through
//! untouched.

use polars::prelude::*;

use crate::error::Result;
use crate::profiler::get_numerical_columns;
use crate::utils::log_outcome;

/// Rescale every row of the numeric columns to a unit L2 vector.
pub fn normalize(df: &DataFrame) -> Result<DataFrame> {
    log_outcome("normalize", unit_normalize(df))
}

fn unit_normalize(df: &DataFrame) -> Result<DataFrame> {
    let columns = numeric_matrix(df)?;
    let height = df.height();

    let mut norms = vec![0.0f64; height];
    for (_, values) in &columns {
        for (i, opt_val) in values.iter().enumerate() {
            if let Some(val) = opt_val {
                norms[i] += val * val;
            }
        }
    }
    for norm in &mut norms {
        *norm = norm.sqrt();
    }

    let scaled = columns
        .into_iter()
        .map(|(name, values)| {
            let rescaled: Vec<Option<f64>> = values
                .into_iter()
                .enumerate()
                .map(|(i, opt_val)| {
                    opt_val.map(|val| if norms[i] > 0.0 { val / norms[i] } else { 0.0 })
                })
                .collect();
            (name, rescaled)
        })
        .collect();

    build_frame(scaled)
}

/// Rescale each numeric column to the [0, 1] range.
///
/// A constant column maps to 0.0 everywhere.
pub fn min_max_scale(df: &DataFrame) -> Result<DataFrame> {
    log_outcome("min_max_scale", min_max(df))
}

fn min_max(df: &DataFrame) -> Result<DataFrame> {
    let scaled = numeric_matrix(df)?
        .into_iter()
        .map(|(name, values)| {
            let non_null: Vec<f64> = values.iter().flatten().copied().collect();
            let min = non_null.iter().copied().fold(f64::INFINITY, f64::min);
            let max = non_null.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let range = max - min;

            let rescaled: Vec<Option<f64>> = values
                .into_iter()
                .map(|opt_val| {
                    opt_val.map(|val| if range > 0.0 { (val - min) / range } else { 0.0 })
                })
                .collect();
            (name, rescaled)
        })
        .collect();

    build_frame(scaled)
}

/// Rescale each numeric column to zero mean and unit variance
/// (population standard deviation).
///
/// A constant column maps to 0.0 everywhere.
pub fn standard_scale(df: &DataFrame) -> Result<DataFrame> {
    log_outcome("standard_scale", standardize(df))
}

fn standardize(df: &DataFrame) -> Result<DataFrame> {
    let scaled = numeric_matrix(df)?
        .into_iter()
        .map(|(name, values)| {
            let non_null: Vec<f64> = values.iter().flatten().copied().collect();
            let n = non_null.len() as f64;
            let mean = if n > 0.0 {
                non_null.iter().sum::<f64>() / n
            } else {
                0.0
            };
            let variance = if n > 0.0 {
                non_null.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
            } else {
                0.0
            };
            let std = variance.sqrt();

            let rescaled: Vec<Option<f64>> = values
                .into_iter()
                .map(|opt_val| {
                    opt_val.map(|val| if std > 0.0 { (val - mean) / std } else { 0.0 })
                })
                .collect();
            (name, rescaled)
        })
        .collect();

    build_frame(scaled)
}

/// Extract the numeric columns as (name, values) pairs in column order.
fn numeric_matrix(df: &DataFrame) -> Result<Vec<(String, Vec<Option<f64>>)>> {
    let mut columns = Vec::new();
    for col_name in get_numerical_columns(df) {
        let column = df.column(&col_name)?;
        let float_series = column.as_materialized_series().cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> = float_series.f64()?.into_iter().collect();
        columns.push((col_name, values));
    }
    Ok(columns)
}

fn build_frame(columns: Vec<(String, Vec<Option<f64>>)>) -> Result<DataFrame> {
    let series: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.as_str().into(), values).into_column())
        .collect();
    Ok(DataFrame::new(series)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_min_max_scale_range() {
        let df = df![
            "x" => [0.0f64, 5.0, 10.0],
            "label" => ["a", "b", "c"],
        ]
        .unwrap();

        let scaled = min_max_scale(&df).unwrap();
        // Only the numeric column survives
        assert_eq!(scaled.get_column_names(), vec!["x"]);

        let x = scaled.column("x").unwrap();
        assert!(approx_eq(x.get(0).unwrap().try_extract::<f64>().unwrap(), 0.0));
        assert!(approx_eq(x.get(1).unwrap().try_extract::<f64>().unwrap(), 0.5));
        assert!(approx_eq(x.get(2).unwrap().try_extract::<f64>().unwrap(), 1.0));
    }

    #[test]
    fn test_min_max_scale_constant_column() {
        let df = df![
            "x" => [7.0f64, 7.0, 7.0],
        ]
        .unwrap();

        let scaled = min_max_scale(&df).unwrap();
        let x = scaled.column("x").unwrap();
        for i in 0..3 {
            assert!(approx_eq(x.get(i).unwrap().try_extract::<f64>().unwrap(), 0.0));
        }
    }

    #[test]
    fn test_standard_scale_zero_mean_unit_variance() {
        let df = df![
            "x" => [2.0f64, 4.0, 6.0],
        ]
        .unwrap();

        let scaled = standard_scale(&df).unwrap();
        let x = scaled.column("x").unwrap();
        let values: Vec<f64> = (0..3)
            .map(|i| x.get(i).unwrap().try_extract::<f64>().unwrap())
            .collect();

        let mean: f64 = values.iter().sum::<f64>() / 3.0;
        let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0;
        assert!(approx_eq(mean, 0.0));
        assert!(approx_eq(variance, 1.0));
    }

    #[test]
    fn test_normalize_unit_rows() {
        let df = df![
            "a" => [3.0f64, 0.0],
            "b" => [4.0f64, 5.0],
        ]
        .unwrap();

        let scaled = normalize(&df).unwrap();
        let a = scaled.column("a").unwrap();
        let b = scaled.column("b").unwrap();

        // Row 0: [3, 4] -> [0.6, 0.8]
        assert!(approx_eq(a.get(0).unwrap().try_extract::<f64>().unwrap(), 0.6));
        assert!(approx_eq(b.get(0).unwrap().try_extract::<f64>().unwrap(), 0.8));

        // Row 1: [0, 5] -> [0.0, 1.0]
        assert!(approx_eq(a.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0));
        assert!(approx_eq(b.get(1).unwrap().try_extract::<f64>().unwrap(), 1.0));
    }

    #[test]
    fn test_scaling_preserves_nulls() {
        let df = df![
            "x" => [Some(1.0f64), None, Some(3.0)],
        ]
        .unwrap();

        let scaled = min_max_scale(&df).unwrap();
        assert_eq!(scaled.column("x").unwrap().null_count(), 1);
    }
}
