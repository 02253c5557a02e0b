//! Type coercion for named columns.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::error::{EdaError, Result};
use crate::utils::log_outcome;

/// Datetime layouts accepted by [`convert_to_datetime`], tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts, parsed as midnight.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Coerce the named columns to Datetime (millisecond precision).
///
/// Nulls pass through; any non-null value that fails every supported
/// layout aborts the conversion with a `TypeConversion` error.
pub fn convert_to_datetime(df: &mut DataFrame, columns: &[&str]) -> Result<()> {
    log_outcome("convert_to_datetime", to_datetime(df, columns))
}

fn to_datetime(df: &mut DataFrame, columns: &[&str]) -> Result<()> {
    for col_name in columns {
        let column = df
            .column(col_name)
            .map_err(|_| EdaError::ColumnNotFound(col_name.to_string()))?;
        let series = column.as_materialized_series().clone();

        // Already a temporal column, nothing to do.
        if matches!(series.dtype(), DataType::Datetime(_, _) | DataType::Date) {
            continue;
        }

        let str_series = series.cast(&DataType::String)?;
        let str_chunked = str_series.str()?;
        let mut timestamps: Vec<Option<i64>> = Vec::with_capacity(str_chunked.len());

        for opt_val in str_chunked.into_iter() {
            match opt_val {
                Some(val) => {
                    let parsed = parse_datetime_ms(val.trim()).ok_or_else(|| {
                        EdaError::TypeConversion {
                            column: col_name.to_string(),
                            target_type: "datetime".to_string(),
                            reason: format!("unparseable value '{}'", val),
                        }
                    })?;
                    timestamps.push(Some(parsed));
                }
                None => timestamps.push(None),
            }
        }

        let converted = Series::new(series.name().clone(), timestamps)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        df.replace(col_name, converted)?;
    }
    Ok(())
}

/// Parse a single datetime string to epoch milliseconds.
fn parse_datetime_ms(value: &str) -> Option<i64> {
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(
                date.and_hms_opt(0, 0, 0)?
                    .and_utc()
                    .timestamp_millis(),
            );
        }
    }
    None
}

/// Coerce the named columns to String.
pub fn convert_to_string(df: &mut DataFrame, columns: &[&str]) -> Result<()> {
    log_outcome("convert_to_string", to_string(df, columns))
}

fn to_string(df: &mut DataFrame, columns: &[&str]) -> Result<()> {
    for col_name in columns {
        let column = df
            .column(col_name)
            .map_err(|_| EdaError::ColumnNotFound(col_name.to_string()))?;
        let series = column.as_materialized_series();

        let converted =
            series
                .cast(&DataType::String)
                .map_err(|e| EdaError::TypeConversion {
                    column: col_name.to_string(),
                    target_type: "string".to_string(),
                    reason: e.to_string(),
                })?;
        df.replace(col_name, converted)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_to_datetime_basic() {
        let mut df = df![
            "start" => ["2020-01-01 10:30:00", "2020-01-02 12:00:00"],
        ]
        .unwrap();

        convert_to_datetime(&mut df, &["start"]).unwrap();
        assert!(matches!(
            df.column("start").unwrap().dtype(),
            DataType::Datetime(_, _)
        ));
    }

    #[test]
    fn test_convert_to_datetime_date_only() {
        let mut df = df![
            "day" => ["2020-01-01", "2020-06-15"],
        ]
        .unwrap();

        convert_to_datetime(&mut df, &["day"]).unwrap();
        assert!(matches!(
            df.column("day").unwrap().dtype(),
            DataType::Datetime(_, _)
        ));
    }

    #[test]
    fn test_convert_to_datetime_preserves_nulls() {
        let mut df = df![
            "start" => [Some("2020-01-01"), None],
        ]
        .unwrap();

        convert_to_datetime(&mut df, &["start"]).unwrap();
        assert_eq!(df.column("start").unwrap().null_count(), 1);
    }

    #[test]
    fn test_convert_to_datetime_unparseable_fails() {
        let mut df = df![
            "start" => ["2020-01-01", "not a date"],
        ]
        .unwrap();

        let result = convert_to_datetime(&mut df, &["start"]);
        assert!(matches!(result, Err(EdaError::TypeConversion { .. })));
    }

    #[test]
    fn test_convert_to_datetime_missing_column() {
        let mut df = df![
            "other" => ["2020-01-01"],
        ]
        .unwrap();

        let result = convert_to_datetime(&mut df, &["start"]);
        assert!(matches!(result, Err(EdaError::ColumnNotFound(_))));
    }

    #[test]
    fn test_convert_to_string() {
        let mut df = df![
            "bearer_id" => [101i64, 102, 103],
            "imsi" => [1.5f64, 2.5, 3.5],
        ]
        .unwrap();

        convert_to_string(&mut df, &["bearer_id", "imsi"]).unwrap();
        assert_eq!(df.column("bearer_id").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("imsi").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_convert_to_string_missing_column() {
        let mut df = df![
            "a" => [1i64],
        ]
        .unwrap();

        let result = convert_to_string(&mut df, &["missing"]);
        assert!(matches!(result, Err(EdaError::ColumnNotFound(_))));
    }

    #[test]
    fn test_parse_datetime_ms_epoch() {
        // 2020-01-01 00:00:00 UTC
        assert_eq!(parse_datetime_ms("2020-01-01"), Some(1_577_836_800_000));
    }
}
