//! Long to wide time series reshaping
//!
//! A long frame has one row per (timestamp, series) pair: a time column,
//! string label columns that identify the series, and number/boolean value
//! columns. The wide frame has one row per distinct timestamp and one column
//! per (series, value column).

use crate::coerce::Cell;
use crate::error::{FramerError, Result};
use crate::frame::{Field, FieldType, FieldValues, Frame};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Shape of a frame with respect to time series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSeriesType {
    /// No time column
    Not,
    /// Time column and no label columns
    Wide,
    /// Time column, string label columns and number/boolean value columns
    Long,
}

pub fn classify(frame: &Frame) -> TimeSeriesType {
    let has_time = frame.fields().iter().any(|f| f.field_type() == FieldType::Time);
    if !has_time {
        return TimeSeriesType::Not;
    }
    let has_labels = frame.fields().iter().any(|f| f.field_type() == FieldType::String);
    let has_values = frame
        .fields()
        .iter()
        .any(|f| matches!(f.field_type(), FieldType::Number | FieldType::Boolean));
    match (has_labels, has_values) {
        (false, _) => TimeSeriesType::Wide,
        (true, true) => TimeSeriesType::Long,
        (true, false) => TimeSeriesType::Not,
    }
}

/// Pivot a long frame to wide.
///
/// The first time column is the index; it must not contain nulls. Rows are
/// stably sorted by time, series are numbered in first-seen order and, when
/// several rows share a timestamp and series, the last one wins. Columns that
/// are neither time, label nor value columns are dropped.
pub fn long_to_wide(frame: &Frame) -> Result<Frame> {
    let fields = frame.fields();
    let (time_name, time_values) = fields
        .iter()
        .find_map(|f| match &f.values {
            FieldValues::Time(values) => Some((&f.name, values)),
            _ => None,
        })
        .ok_or_else(|| FramerError::Reshape(format!("frame `{}` has no time column", frame.name())))?;

    let times: Vec<DateTime<Utc>> = time_values
        .iter()
        .map(|t| {
            t.ok_or_else(|| {
                FramerError::Reshape(format!("time column `{}` contains null values", time_name))
            })
        })
        .collect::<Result<_>>()?;

    let label_fields: Vec<&Field> = fields
        .iter()
        .filter(|f| f.field_type() == FieldType::String)
        .collect();
    let value_fields: Vec<&Field> = fields
        .iter()
        .filter(|f| matches!(f.field_type(), FieldType::Number | FieldType::Boolean))
        .collect();
    if value_fields.is_empty() {
        return Err(FramerError::Reshape(format!(
            "frame `{}` has no number or boolean columns",
            frame.name()
        )));
    }

    let mut order: Vec<usize> = (0..times.len()).collect();
    order.sort_by_key(|&row| times[row]);

    let mut distinct_times: Vec<DateTime<Utc>> = Vec::new();
    let mut series: IndexMap<Vec<Option<String>>, Vec<Vec<Cell>>> = IndexMap::new();

    for row in order {
        let time = times[row];
        if distinct_times.last() != Some(&time) {
            distinct_times.push(time);
            for columns in series.values_mut() {
                for cells in columns.iter_mut() {
                    cells.push(Cell::Null);
                }
            }
        }
        let slot = distinct_times.len() - 1;

        let key: Vec<Option<String>> = label_fields
            .iter()
            .map(|f| f.values.cell(row).render())
            .collect();
        let columns = series
            .entry(key)
            .or_insert_with(|| vec![vec![Cell::Null; slot + 1]; value_fields.len()]);

        for (cells, field) in columns.iter_mut().zip(&value_fields) {
            cells[slot] = field.values.cell(row);
        }
    }

    tracing::debug!(
        frame = %frame.name(),
        rows = times.len(),
        timestamps = distinct_times.len(),
        series = series.len(),
        "reshaped long time series to wide"
    );

    let mut wide = Vec::with_capacity(1 + series.len() * value_fields.len());
    wide.push(Field::new(
        time_name.clone(),
        FieldValues::Time(distinct_times.into_iter().map(Some).collect()),
    ));

    for (key, columns) in series {
        let labels: BTreeMap<String, String> = label_fields
            .iter()
            .zip(key)
            .filter_map(|(field, value)| value.map(|v| (field.name.clone(), v)))
            .collect();

        for (cells, field) in columns.into_iter().zip(&value_fields) {
            let values = FieldValues::from_cells(field.field_type(), cells, &field.name)?;
            wide.push(Field::new(field.name.clone(), values).with_labels(labels.clone()));
        }
    }

    Frame::from_fields(frame.name(), wide)
}
