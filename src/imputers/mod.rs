//! Imputation of missing values.
//!
//! Statistical strategies per column class:
//! - numeric: mean, median
//! - categorical: forward fill, backward fill, mode

mod statistical;

pub use statistical::{
    fill_missing_categorical, fill_missing_numeric, CategoricalFillPolicy, NumericFillPolicy,
};
