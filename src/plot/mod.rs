//! Chart rendering for dataset columns.
//!
//! Each function renders one chart to the given output path as an SVG
//! document via plotters. Rendering is purely a visual side effect; the
//! dataset is never modified.

use std::collections::HashMap;
use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use polars::prelude::*;

use crate::error::{EdaError, Result};
use crate::profiler::get_numerical_columns;
use crate::utils::{is_numeric_dtype, log_outcome, quantile_linear};

const CHART_SIZE: (u32, u32) = (900, 600);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);
const LABEL_FONT: (&str, u32) = ("sans-serif", 14);

fn plot_err(e: impl std::fmt::Display) -> EdaError {
    EdaError::Plot(e.to_string())
}

/// Non-null values of a numeric column as f64.
fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let col = df
        .column(column)
        .map_err(|_| EdaError::ColumnNotFound(column.to_string()))?;
    let series = col.as_materialized_series();

    if !is_numeric_dtype(series.dtype()) {
        return Err(EdaError::TypeConversion {
            column: column.to_string(),
            target_type: "float".to_string(),
            reason: format!("column has non-numeric dtype {}", series.dtype()),
        });
    }

    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().flatten().collect())
}

/// Per-row string rendering of a column (nulls become None).
fn string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let col = df
        .column(column)
        .map_err(|_| EdaError::ColumnNotFound(column.to_string()))?;
    let str_series = col.as_materialized_series().cast(&DataType::String)?;
    let str_chunked = str_series.str()?;
    Ok(str_chunked
        .into_iter()
        .map(|opt| opt.map(|s| s.to_string()))
        .collect())
}

/// Per-row (string, f64) pairs of two columns, skipping rows with a null
/// on either side.
fn category_value_pairs(df: &DataFrame, x_col: &str, y_col: &str) -> Result<Vec<(String, f64)>> {
    let labels = string_values(df, x_col)?;

    let col = df
        .column(y_col)
        .map_err(|_| EdaError::ColumnNotFound(y_col.to_string()))?;
    let float_series = col.as_materialized_series().cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = float_series.f64()?.into_iter().collect();

    Ok(labels
        .into_iter()
        .zip(values)
        .filter_map(|(label, value)| Some((label?, value?)))
        .collect())
}

/// Box-and-whisker statistics with whiskers capped at 1.5 * IQR.
struct BoxStats {
    lower_whisker: f64,
    q1: f64,
    median: f64,
    q3: f64,
    upper_whisker: f64,
}

impl BoxStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = quantile_linear(&sorted, 0.25);
        let median = quantile_linear(&sorted, 0.5);
        let q3 = quantile_linear(&sorted, 0.75);
        let bound = 1.5 * (q3 - q1);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= q1 - bound)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= q3 + bound)
            .unwrap_or(q3);

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

/// Category frequencies, first-occurrence order preserved.
fn category_counts(labels: &[Option<String>]) -> (Vec<String>, Vec<usize>) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for label in labels.iter().flatten() {
        let entry = counts.entry(label.clone()).or_insert(0);
        if *entry == 0 {
            order.push(label.clone());
        }
        *entry += 1;
    }

    let frequencies = order.iter().map(|label| counts[label]).collect();
    (order, frequencies)
}

/// Two-point color ramp used by the heatmap (dark violet to yellow).
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + t * (b as f64 - a as f64)).round() as u8;
    RGBColor(lerp(68, 253), lerp(1, 231), lerp(84, 37))
}

/// Bar chart skeleton shared by count, bar and box-multi plots: a
/// cartesian plane with one slot per category and category names on the
/// x axis.
fn draw_category_bars(
    out: &Path,
    title: &str,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    heights: &[f64],
) -> Result<()> {
    let y_max = heights.iter().copied().fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = SVGBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let names = categories.to_vec();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..categories.len() as f64, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_labels(categories.len().max(1))
        .x_label_formatter(&move |x| {
            let idx = x.floor() as usize;
            if idx < names.len() && (x - idx as f64).abs() < 0.5 {
                names[idx].clone()
            } else {
                String::new()
            }
        })
        .label_style(LABEL_FONT)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(heights.iter().enumerate().map(|(i, height)| {
            Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, *height)],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render a histogram of a numeric column.
pub fn plot_histogram(df: &DataFrame, column: &str, bins: usize, out: &Path) -> Result<()> {
    log_outcome("plot_histogram", histogram(df, column, bins, out))
}

fn histogram(df: &DataFrame, column: &str, bins: usize, out: &Path) -> Result<()> {
    let values = numeric_values(df, column)?;
    if values.is_empty() {
        return Err(EdaError::NoValidValues(column.to_string()));
    }
    let bins = bins.max(1);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (min, max) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let bin_width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for val in &values {
        let idx = (((val - min) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let y_max = *counts.iter().max().unwrap_or(&1) as f64 * 1.1;

    let root = SVGBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Distribution of {}", column), CAPTION_FONT)
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(min..max, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(column)
        .y_desc("Frequency")
        .label_style(LABEL_FONT)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, count)| {
            let x0 = min + i as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0.0), (x1, *count as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render per-category frequency bars for a categorical column.
pub fn plot_count(df: &DataFrame, column: &str, out: &Path) -> Result<()> {
    log_outcome("plot_count", count(df, column, out))
}

fn count(df: &DataFrame, column: &str, out: &Path) -> Result<()> {
    let labels = string_values(df, column)?;
    let (categories, frequencies) = category_counts(&labels);
    if categories.is_empty() {
        return Err(EdaError::NoValidValues(column.to_string()));
    }

    let heights: Vec<f64> = frequencies.iter().map(|c| *c as f64).collect();
    draw_category_bars(
        out,
        &format!("Distribution of {}", column),
        column,
        "Count",
        &categories,
        &heights,
    )
}

/// Render a bar chart of `y_col` per `x_col` category.
#[allow(clippy::too_many_arguments)]
pub fn plot_bar(
    df: &DataFrame,
    x_col: &str,
    y_col: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
    out: &Path,
) -> Result<()> {
    log_outcome("plot_bar", bar(df, x_col, y_col, title, x_label, y_label, out))
}

fn bar(
    df: &DataFrame,
    x_col: &str,
    y_col: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
    out: &Path,
) -> Result<()> {
    let pairs = category_value_pairs(df, x_col, y_col)?;
    if pairs.is_empty() {
        return Err(EdaError::NoValidValues(x_col.to_string()));
    }

    let (categories, heights): (Vec<String>, Vec<f64>) = pairs.into_iter().unzip();
    draw_category_bars(out, title, x_label, y_label, &categories, &heights)
}

/// Render the numeric columns of the dataset as an annotated heatmap
/// with a fixed [0, 1] color scale.
pub fn plot_heatmap(df: &DataFrame, title: &str, out: &Path) -> Result<()> {
    log_outcome("plot_heatmap", heatmap(df, title, out))
}

fn heatmap(df: &DataFrame, title: &str, out: &Path) -> Result<()> {
    let columns = get_numerical_columns(df);
    if columns.is_empty() || df.height() == 0 {
        return Err(EdaError::NoValidValues("<numeric columns>".to_string()));
    }

    let mut matrix: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for col_name in &columns {
        let float_series = df
            .column(col_name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        matrix.push(float_series.f64()?.into_iter().collect());
    }

    let n_cols = columns.len();
    let n_rows = df.height();

    let root = SVGBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let names = columns.clone();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..n_cols as f64, 0.0..n_rows as f64)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n_cols.max(1))
        .x_label_formatter(&move |x| {
            let idx = x.floor() as usize;
            if idx < names.len() && (x - idx as f64).abs() < 0.5 {
                names[idx].clone()
            } else {
                String::new()
            }
        })
        .label_style(LABEL_FONT)
        .draw()
        .map_err(plot_err)?;

    for (col_idx, column_values) in matrix.iter().enumerate() {
        for (row_idx, opt_val) in column_values.iter().enumerate() {
            let x0 = col_idx as f64;
            let y0 = row_idx as f64;
            let color = match opt_val {
                Some(val) => heat_color(*val),
                None => RGBColor(220, 220, 220),
            };
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x0 + 0.02, y0 + 0.02), (x0 + 0.98, y0 + 0.98)],
                    color.filled(),
                )))
                .map_err(plot_err)?;

            if let Some(val) = opt_val {
                chart
                    .draw_series(std::iter::once(Text::new(
                        format!("{:.2}", val),
                        (x0 + 0.35, y0 + 0.5),
                        LABEL_FONT.into_font().color(&BLACK),
                    )))
                    .map_err(plot_err)?;
            }
        }
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render a single box-and-whisker plot for a numeric column.
pub fn plot_box(df: &DataFrame, column: &str, title: &str, out: &Path) -> Result<()> {
    log_outcome("plot_box", box_single(df, column, title, out))
}

fn box_single(df: &DataFrame, column: &str, title: &str, out: &Path) -> Result<()> {
    let values = numeric_values(df, column)?;
    let stats =
        BoxStats::from_values(&values).ok_or_else(|| EdaError::NoValidValues(column.to_string()))?;

    let y_min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let y_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((y_max - y_min).abs()).max(1.0) * 0.1;

    let root = SVGBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0f64, (y_min - pad)..(y_max + pad))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(column)
        .label_style(LABEL_FONT)
        .draw()
        .map_err(plot_err)?;

    draw_box(&mut chart, 0.5, 0.3, &stats)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render one box-and-whisker plot of `y_col` per `x_col` category.
pub fn plot_box_multi(
    df: &DataFrame,
    x_col: &str,
    y_col: &str,
    title: &str,
    out: &Path,
) -> Result<()> {
    log_outcome("plot_box_multi", box_multi(df, x_col, y_col, title, out))
}

fn box_multi(df: &DataFrame, x_col: &str, y_col: &str, title: &str, out: &Path) -> Result<()> {
    let pairs = category_value_pairs(df, x_col, y_col)?;
    if pairs.is_empty() {
        return Err(EdaError::NoValidValues(y_col.to_string()));
    }

    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for (label, value) in pairs {
        let entry = groups.entry(label.clone()).or_default();
        if entry.is_empty() {
            order.push(label);
        }
        entry.push(value);
    }

    let y_min = groups
        .values()
        .flatten()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let y_max = groups
        .values()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = ((y_max - y_min).abs()).max(1.0) * 0.1;

    let root = SVGBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let names = order.clone();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..order.len() as f64, (y_min - pad)..(y_max + pad))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(x_col)
        .y_desc(y_col)
        .x_labels(order.len().max(1))
        .x_label_formatter(&move |x| {
            let idx = x.floor() as usize;
            if idx < names.len() && (x - idx as f64).abs() < 0.5 {
                names[idx].clone()
            } else {
                String::new()
            }
        })
        .label_style(LABEL_FONT)
        .draw()
        .map_err(plot_err)?;

    for (i, label) in order.iter().enumerate() {
        if let Some(stats) = BoxStats::from_values(&groups[label]) {
            draw_box(&mut chart, i as f64 + 0.5, 0.3, &stats)?;
        }
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Draw one box-and-whisker glyph centered at `x` with half-width `hw`.
fn draw_box<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x: f64,
    hw: f64,
    stats: &BoxStats,
) -> Result<()> {
    // IQR box
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x - hw, stats.q1), (x + hw, stats.q3)],
            BLUE.mix(0.4).filled(),
        )))
        .map_err(plot_err)?;

    // Median line plus whisker stems and caps
    let segments = [
        vec![(x - hw, stats.median), (x + hw, stats.median)],
        vec![(x, stats.q3), (x, stats.upper_whisker)],
        vec![(x, stats.q1), (x, stats.lower_whisker)],
        vec![
            (x - hw / 2.0, stats.upper_whisker),
            (x + hw / 2.0, stats.upper_whisker),
        ],
        vec![
            (x - hw / 2.0, stats.lower_whisker),
            (x + hw / 2.0, stats.lower_whisker),
        ],
    ];
    for segment in segments {
        chart
            .draw_series(std::iter::once(PathElement::new(segment, BLACK.stroke_width(2))))
            .map_err(plot_err)?;
    }
    Ok(())
}

/// Render a scatter plot of two numeric columns.
pub fn plot_scatter(
    df: &DataFrame,
    x_col: &str,
    y_col: &str,
    title: &str,
    out: &Path,
) -> Result<()> {
    log_outcome("plot_scatter", scatter(df, x_col, y_col, title, out))
}

fn scatter(df: &DataFrame, x_col: &str, y_col: &str, title: &str, out: &Path) -> Result<()> {
    let xs = numeric_values(df, x_col)?;
    let ys = numeric_values(df, y_col)?;

    let points: Vec<(f64, f64)> = {
        let x_series = df
            .column(x_col)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let y_series = df
            .column(y_col)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        x_series
            .f64()?
            .into_iter()
            .zip(y_series.f64()?.into_iter())
            .filter_map(|(x, y)| Some((x?, y?)))
            .collect()
    };
    if points.is_empty() {
        return Err(EdaError::NoValidValues(x_col.to_string()));
    }

    let (x_min, x_max) = axis_range(&xs);
    let (y_min, y_max) = axis_range(&ys);

    let root = SVGBackend::new(out, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(x_col)
        .y_desc(y_col)
        .label_style(LABEL_FONT)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 3, BLUE.mix(0.7).filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Padded axis range for a non-empty value list.
fn axis_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min).abs()).max(1.0) * 0.05;
    (min - pad, max + pad)
}
