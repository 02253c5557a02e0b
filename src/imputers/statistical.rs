//! Statistical imputation of missing values.

use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EdaError, Result};
use crate::profiler::{get_categorical_columns, get_numerical_columns};
use crate::utils::{fill_numeric_nulls, fill_string_nulls, log_outcome, string_mode};

/// Fill policy for missing numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumericFillPolicy {
    /// Use the mean of non-null values
    Mean,
    /// Use the median of non-null values
    #[default]
    Median,
}

impl FromStr for NumericFillPolicy {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            other => Err(EdaError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Fill policy for missing categorical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CategoricalFillPolicy {
    /// Propagate the nearest earlier non-null value
    Forward,
    /// Propagate the nearest later non-null value
    Backward,
    /// Substitute the most frequent value in the column
    #[default]
    Mode,
}

impl FromStr for CategoricalFillPolicy {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ffill" | "forward-fill" => Ok(Self::Forward),
            "bfill" | "backward-fill" => Ok(Self::Backward),
            "mode" | "mode-fill" => Ok(Self::Mode),
            other => Err(EdaError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Fill missing values in numeric columns with the requested statistic.
///
/// Applies to every numeric column when `columns` is None. A column whose
/// values are all null is left as-is (the statistic is undefined).
pub fn fill_missing_numeric(
    df: &mut DataFrame,
    policy: NumericFillPolicy,
    columns: Option<&[&str]>,
) -> Result<()> {
    log_outcome("fill_missing_numeric", fill_numeric(df, policy, columns))
}

fn fill_numeric(
    df: &mut DataFrame,
    policy: NumericFillPolicy,
    columns: Option<&[&str]>,
) -> Result<()> {
    let target_columns: Vec<String> = match columns {
        Some(names) => {
            for name in names {
                if df.column(name).is_err() {
                    return Err(EdaError::ColumnNotFound(name.to_string()));
                }
            }
            names.iter().map(|s| s.to_string()).collect()
        }
        None => get_numerical_columns(df),
    };

    for col_name in &target_columns {
        let series = df.column(col_name)?.as_materialized_series().clone();

        let fill_value = match policy {
            NumericFillPolicy::Mean => series.mean(),
            NumericFillPolicy::Median => series.median(),
        };

        if let Some(fill_value) = fill_value {
            let filled = fill_numeric_nulls(&series, fill_value)?;
            df.replace(col_name, filled)?;
            debug!(
                "Filled '{}' with {:?}: {:.4}",
                col_name, policy, fill_value
            );
        }
    }
    Ok(())
}

/// Fill missing values in every categorical column with the requested policy.
pub fn fill_missing_categorical(df: &mut DataFrame, policy: CategoricalFillPolicy) -> Result<()> {
    log_outcome("fill_missing_categorical", fill_categorical(df, policy))
}

fn fill_categorical(df: &mut DataFrame, policy: CategoricalFillPolicy) -> Result<()> {
    let categorical_columns = get_categorical_columns(df);

    for col_name in &categorical_columns {
        let series = df.column(col_name)?.as_materialized_series().clone();

        let filled = match policy {
            CategoricalFillPolicy::Forward => {
                series.fill_null(FillNullStrategy::Forward(None))?
            }
            CategoricalFillPolicy::Backward => {
                series.fill_null(FillNullStrategy::Backward(None))?
            }
            CategoricalFillPolicy::Mode => match string_mode(&series) {
                Some(mode_val) => fill_string_nulls(&series, &mode_val)?,
                None => continue,
            },
        };

        df.replace(col_name, filled)?;
        debug!("Filled '{}' with {:?}", col_name, policy);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_policy_from_str() {
        assert_eq!(
            "mean".parse::<NumericFillPolicy>().unwrap(),
            NumericFillPolicy::Mean
        );
        assert_eq!(
            "median".parse::<NumericFillPolicy>().unwrap(),
            NumericFillPolicy::Median
        );
        assert!(matches!(
            "mode".parse::<NumericFillPolicy>(),
            Err(EdaError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_categorical_policy_from_str() {
        assert_eq!(
            "ffill".parse::<CategoricalFillPolicy>().unwrap(),
            CategoricalFillPolicy::Forward
        );
        assert_eq!(
            "bfill".parse::<CategoricalFillPolicy>().unwrap(),
            CategoricalFillPolicy::Backward
        );
        assert_eq!(
            "mode".parse::<CategoricalFillPolicy>().unwrap(),
            CategoricalFillPolicy::Mode
        );
        assert!(matches!(
            "interpolate".parse::<CategoricalFillPolicy>(),
            Err(EdaError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_fill_numeric_mean() {
        let mut df = df![
            "values" => [Some(1.0f64), None, Some(5.0)],
        ]
        .unwrap();

        fill_missing_numeric(&mut df, NumericFillPolicy::Mean, None).unwrap();

        let values = df.column("values").unwrap();
        assert_eq!(values.null_count(), 0);
        // Mean of [1, 5] = 3
        assert_eq!(values.get(1).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_numeric_median() {
        let mut df = df![
            "values" => [Some(1.0f64), None, Some(3.0), None, Some(5.0)],
        ]
        .unwrap();

        fill_missing_numeric(&mut df, NumericFillPolicy::Median, None).unwrap();

        let values = df.column("values").unwrap();
        assert_eq!(values.null_count(), 0);
        // Median of [1, 3, 5] = 3
        assert_eq!(values.get(1).unwrap().try_extract::<f64>().unwrap(), 3.0);
        assert_eq!(values.get(3).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_numeric_mean_clears_all_numeric_nulls() {
        let mut df = df![
            "a" => [Some(1.0f64), None, Some(3.0)],
            "b" => [None, Some(10.0f64), None],
            "label" => [Some("x"), None, Some("y")],
        ]
        .unwrap();

        fill_missing_numeric(&mut df, NumericFillPolicy::Mean, None).unwrap();

        assert_eq!(df.column("a").unwrap().null_count(), 0);
        assert_eq!(df.column("b").unwrap().null_count(), 0);
        // Categorical column untouched
        assert_eq!(df.column("label").unwrap().null_count(), 1);
    }

    #[test]
    fn test_fill_numeric_explicit_columns() {
        let mut df = df![
            "a" => [Some(1.0f64), None],
            "b" => [Some(2.0f64), None],
        ]
        .unwrap();

        fill_missing_numeric(&mut df, NumericFillPolicy::Mean, Some(&["a"])).unwrap();

        assert_eq!(df.column("a").unwrap().null_count(), 0);
        assert_eq!(df.column("b").unwrap().null_count(), 1);
    }

    #[test]
    fn test_fill_numeric_unknown_column() {
        let mut df = df![
            "a" => [1.0f64],
        ]
        .unwrap();

        let result = fill_missing_numeric(&mut df, NumericFillPolicy::Mean, Some(&["zzz"]));
        assert!(matches!(result, Err(EdaError::ColumnNotFound(_))));
    }

    #[test]
    fn test_fill_numeric_all_null_column_untouched() {
        let mut df = df![
            "a" => [Option::<f64>::None, None],
        ]
        .unwrap();

        fill_missing_numeric(&mut df, NumericFillPolicy::Median, None).unwrap();
        assert_eq!(df.column("a").unwrap().null_count(), 2);
    }

    #[test]
    fn test_fill_categorical_mode() {
        let mut df = df![
            "category" => [Some("a"), Some("a"), None, Some("b")],
        ]
        .unwrap();

        fill_missing_categorical(&mut df, CategoricalFillPolicy::Mode).unwrap();

        let category = df.column("category").unwrap();
        assert_eq!(category.null_count(), 0);
        assert!(category.get(2).unwrap().to_string().contains('a'));
    }

    #[test]
    fn test_fill_categorical_forward() {
        let mut df = df![
            "category" => [Some("a"), None, None, Some("b")],
        ]
        .unwrap();

        fill_missing_categorical(&mut df, CategoricalFillPolicy::Forward).unwrap();

        let category = df.column("category").unwrap();
        assert_eq!(category.null_count(), 0);
        assert!(category.get(1).unwrap().to_string().contains('a'));
        assert!(category.get(2).unwrap().to_string().contains('a'));
    }

    #[test]
    fn test_fill_categorical_backward() {
        let mut df = df![
            "category" => [Some("a"), None, Some("b")],
        ]
        .unwrap();

        fill_missing_categorical(&mut df, CategoricalFillPolicy::Backward).unwrap();

        let category = df.column("category").unwrap();
        assert_eq!(category.null_count(), 0);
        assert!(category.get(1).unwrap().to_string().contains('b'));
    }

    #[test]
    fn test_fill_categorical_leading_null_forward_stays() {
        // Forward fill has nothing to propagate into a leading null
        let mut df = df![
            "category" => [Option::<&str>::None, Some("a"), None],
        ]
        .unwrap();

        fill_missing_categorical(&mut df, CategoricalFillPolicy::Forward).unwrap();

        let category = df.column("category").unwrap();
        assert_eq!(category.null_count(), 1);
        assert!(category.get(0).unwrap().to_string().contains("null"));
    }
}
