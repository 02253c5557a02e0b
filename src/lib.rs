//! Exploratory Data Analysis Toolkit
//!
//! Helpers for cleaning, profiling and visualizing tabular datasets built
//! on Polars.
//!
//! # Overview
//!
//! This library provides:
//!
//! - **Cleaning**: Duplicate removal, column name normalization, type
//!   coercion to datetime or string, residual null-row filtering
//! - **Imputation**: Mean/median fills for numeric columns,
//!   forward/backward/mode fills for categorical columns
//! - **Outlier handling**: IQR-based clipping with selectable replacement
//!   policies
//! - **Scaling**: Row-wise normalization, min-max and standard scaling
//! - **Profiling**: Missing-value percentages and per-column reports,
//!   dtype-declared column classification
//! - **Analysis**: Grouped aggregation with top-N ranking, byte-to-megabyte
//!   conversion
//! - **Plotting**: Histograms, count/bar charts, heatmaps, box plots and
//!   scatter plots rendered as SVG
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use eda_toolkit::{
//!     cleaner, imputers, io, profiler,
//!     CategoricalFillPolicy, NumericFillPolicy, OutlierPolicy,
//! };
//!
//! let mut df = io::load_dataset("telecom.csv")?;
//!
//! cleaner::normalize_column_names(&mut df)?;
//! let mut df = cleaner::drop_duplicate(df)?;
//! cleaner::convert_to_datetime(&mut df, &["start_time", "end_time"])?;
//!
//! println!("{}% of cells missing", profiler::percent_missing(&df));
//!
//! imputers::fill_missing_categorical(&mut df, CategoricalFillPolicy::Mode)?;
//! imputers::fill_missing_numeric(&mut df, NumericFillPolicy::Mean, None)?;
//! cleaner::clip_outliers(&mut df, "dl_bytes", OutlierPolicy::ClipToBound)?;
//!
//! io::save_dataset(&mut df, "telecom_clean.csv")?;
//! ```

pub mod analysis;
pub mod cleaner;
pub mod error;
pub mod imputers;
pub mod io;
pub mod plot;
pub mod profiler;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{aggregate, bytes_to_megabytes, AggMetric};
pub use cleaner::{
    clip_outliers, convert_to_datetime, convert_to_string, drop_duplicate,
    drop_residual_categorical_nulls, min_max_scale, normalize, normalize_column_names,
    standard_scale, OutlierPolicy,
};
pub use error::{EdaError, Result};
pub use imputers::{
    fill_missing_categorical, fill_missing_numeric, CategoricalFillPolicy, NumericFillPolicy,
};
pub use io::{load_dataset, load_dataset_with_schema, save_dataset};
pub use profiler::{
    get_categorical_columns, get_numerical_columns, missing_value_report, percent_missing,
    percent_missing_column, MissingColumnSummary,
};
pub use utils::{get_dtype_category, is_numeric_dtype, DtypeCategory};
