//! IQR-based outlier clipping for numeric columns.

use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EdaError, Result};
use crate::utils::{log_outcome, numeric_mode, quantile_linear, sorted_numeric_values};

/// Replacement policy for values outside the IQR bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutlierPolicy {
    /// Clamp outliers to the violated bound
    #[default]
    ClipToBound,
    /// Replace outliers with the column mode
    ReplaceWithMode,
    /// Replace outliers with the column median
    ReplaceWithMedian,
}

impl FromStr for OutlierPolicy {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "clip-to-bound" => Ok(Self::ClipToBound),
            "replace-with-mode" => Ok(Self::ReplaceWithMode),
            "replace-with-median" => Ok(Self::ReplaceWithMedian),
            other => Err(EdaError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Clip outliers of the named column using Tukey's IQR rule.
///
/// Computes Q1 and Q3 with linear interpolation, bound = 1.5 * (Q3 - Q1),
/// and replaces every value outside [Q1 - bound, Q3 + bound] according to
/// the policy.
pub fn clip_outliers(df: &mut DataFrame, column: &str, policy: OutlierPolicy) -> Result<()> {
    log_outcome("clip_outliers", clip(df, column, policy))
}

fn clip(df: &mut DataFrame, column: &str, policy: OutlierPolicy) -> Result<()> {
    let series = df
        .column(column)
        .map_err(|_| EdaError::ColumnNotFound(column.to_string()))?
        .as_materialized_series()
        .clone();

    let sorted = sorted_numeric_values(&series)?;
    if sorted.is_empty() {
        return Err(EdaError::NoValidValues(column.to_string()));
    }

    let q1 = quantile_linear(&sorted, 0.25);
    let q3 = quantile_linear(&sorted, 0.75);
    let bound = 1.5 * (q3 - q1);
    let lower_bound = q1 - bound;
    let upper_bound = q3 + bound;

    // The replacement the policy substitutes for an out-of-bound entry.
    // The median here is the computed value, not a deferred computation.
    let replacement = match policy {
        OutlierPolicy::ClipToBound => None,
        OutlierPolicy::ReplaceWithMode => numeric_mode(&series),
        OutlierPolicy::ReplaceWithMedian => Some(quantile_linear(&sorted, 0.5)),
    };

    let float_series = series.cast(&DataType::Float64)?;
    let chunked = float_series.f64()?;
    let clipped_count = chunked
        .into_iter()
        .flatten()
        .filter(|val| *val < lower_bound || *val > upper_bound)
        .count();

    let clipped = chunked.apply(|opt_val| {
        opt_val.map(|val| {
            if val < lower_bound || val > upper_bound {
                replacement.unwrap_or_else(|| val.clamp(lower_bound, upper_bound))
            } else {
                val
            }
        })
    });

    df.replace(column, clipped.into_series())?;
    debug!(
        "Clipped {} outliers in '{}' outside [{:.3}, {:.3}]",
        clipped_count, column, lower_bound, upper_bound
    );
    Ok(())
}
