//! Typed, rectangular frames
//!
//! A [`Frame`] is a named list of equally long, typed columns ([`Field`]).
//! Frames are produced by [`FrameBuilder`] and are not modified afterwards;
//! overrides and time series reshaping produce new frames.

pub mod builder;
pub mod overrides;
pub mod timeseries;

pub use builder::{FrameBuilder, Row};
pub use timeseries::{TimeSeriesType, long_to_wide};

use crate::coerce::{format_time, Cell};
use crate::error::{FramerError, Result};
use crate::types::ColumnType;
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    String,
    Boolean,
    Time,
    /// Nested values, and the untyped representation of all-null columns
    Json,
}

impl FieldType {
    /// The storage type a declared column type maps to, `None` for `auto`
    pub fn from_column_type(column_type: ColumnType) -> Option<Self> {
        match column_type {
            ColumnType::Auto => None,
            ColumnType::String => Some(FieldType::String),
            ColumnType::Number => Some(FieldType::Number),
            ColumnType::Boolean => Some(FieldType::Boolean),
            ColumnType::Timestamp | ColumnType::TimestampEpochMs | ColumnType::TimestampEpochS => {
                Some(FieldType::Time)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Time => "time",
            FieldType::Json => "json",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column values; `None` is a null cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValues {
    Number(Vec<Option<f64>>),
    String(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
    Time(Vec<Option<DateTime<Utc>>>),
    Json(Vec<Option<Value>>),
}

impl FieldValues {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValues::Number(_) => FieldType::Number,
            FieldValues::String(_) => FieldType::String,
            FieldValues::Boolean(_) => FieldType::Boolean,
            FieldValues::Time(_) => FieldType::Time,
            FieldValues::Json(_) => FieldType::Json,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldValues::Number(v) => v.len(),
            FieldValues::String(v) => v.len(),
            FieldValues::Boolean(v) => v.len(),
            FieldValues::Time(v) => v.len(),
            FieldValues::Json(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cell at `index`, `Cell::Null` when out of range
    pub fn cell(&self, index: usize) -> Cell {
        let cell = match self {
            FieldValues::Number(v) => v.get(index).copied().flatten().map(Cell::Number),
            FieldValues::String(v) => v.get(index).cloned().flatten().map(Cell::String),
            FieldValues::Boolean(v) => v.get(index).copied().flatten().map(Cell::Bool),
            FieldValues::Time(v) => v.get(index).copied().flatten().map(Cell::Time),
            FieldValues::Json(v) => v.get(index).cloned().flatten().map(Cell::from_value),
        };
        cell.unwrap_or(Cell::Null)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.len()).map(move |i| self.cell(i))
    }

    /// Materialize `cells` as a column of `field_type`.
    ///
    /// Fails when a cell holds a value the column type cannot store, such as
    /// an object in a number column.
    pub fn from_cells(
        field_type: FieldType,
        cells: impl IntoIterator<Item = Cell>,
        column: &str,
    ) -> Result<Self> {
        let mismatch = |row: usize, cell: &Cell| {
            FramerError::FrameBuild(format!(
                "column `{}` is {} but row {} holds {}",
                column,
                field_type,
                row,
                describe(cell)
            ))
        };

        let cells = cells.into_iter().enumerate();
        let values = match field_type {
            FieldType::Number => FieldValues::Number(
                cells
                    .map(|(row, cell)| match cell {
                        Cell::Null => Ok(None),
                        Cell::Number(n) => Ok(Some(n)),
                        other => Err(mismatch(row, &other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            FieldType::Boolean => FieldValues::Boolean(
                cells
                    .map(|(row, cell)| match cell {
                        Cell::Null => Ok(None),
                        Cell::Bool(b) => Ok(Some(b)),
                        other => Err(mismatch(row, &other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            FieldType::Time => FieldValues::Time(
                cells
                    .map(|(row, cell)| match cell {
                        Cell::Null => Ok(None),
                        Cell::Time(t) => Ok(Some(t)),
                        other => Err(mismatch(row, &other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            FieldType::String => FieldValues::String(
                cells
                    .map(|(row, cell)| match cell {
                        Cell::Null => Ok(None),
                        Cell::Nested(_) => Err(mismatch(row, &cell)),
                        Cell::String(s) => Ok(Some(s)),
                        scalar => Ok(scalar.render()),
                    })
                    .collect::<Result<_>>()?,
            ),
            FieldType::Json => FieldValues::Json(
                cells
                    .map(|(_, cell)| match cell {
                        Cell::Null => None,
                        Cell::Time(t) => Some(Value::String(format_time(&t))),
                        other => Some(other.into_value()),
                    })
                    .collect(),
            ),
        };
        Ok(values)
    }
}

fn describe(cell: &Cell) -> &'static str {
    match cell {
        Cell::Null => "null",
        Cell::Bool(_) => "a boolean",
        Cell::Number(_) => "a number",
        Cell::String(_) => "a string",
        Cell::Time(_) => "a timestamp",
        Cell::Nested(Value::Array(_)) => "an array",
        Cell::Nested(_) => "an object",
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    /// Series labels, set on the value columns of wide time series
    pub labels: BTreeMap<String, String>,
    pub values: FieldValues,
}

impl Field {
    pub fn new(name: impl Into<String>, values: FieldValues) -> Self {
        Field {
            name: name.into(),
            labels: BTreeMap::new(),
            values,
        }
    }

    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.values.field_type()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name plus labels, e.g. `queryCount {queryName="example.com"}`
    pub fn display_name(&self) -> String {
        if self.labels.is_empty() {
            return self.name.clone();
        }
        let labels: Vec<String> = self
            .labels
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, v))
            .collect();
        format!("{} {{{}}}", self.name, labels.join(", "))
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.labels.is_empty() { 3 } else { 4 };
        let mut state = serializer.serialize_struct("Field", len)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.field_type())?;
        if !self.labels.is_empty() {
            state.serialize_field("labels", &self.labels)?;
        }
        state.serialize_field("values", &self.values)?;
        state.end()
    }
}

/// A named table of equally long columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    name: String,
    fields: Vec<Field>,
}

impl Frame {
    /// Build a frame from finished columns, checking they are equally long
    pub fn from_fields(name: impl Into<String>, fields: Vec<Field>) -> Result<Self> {
        if let Some(first) = fields.first() {
            let rows = first.len();
            if let Some(bad) = fields.iter().find(|f| f.len() != rows) {
                return Err(FramerError::FrameBuild(format!(
                    "column `{}` has {} values, expected {}",
                    bad.name,
                    bad.len(),
                    rows
                )));
            }
        }
        Ok(Frame {
            name: name.into(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.fields.first().map(Field::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    /// One row as (column, cell) pairs in column order
    pub fn row(&self, index: usize) -> Vec<(&str, Cell)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.values.cell(index)))
            .collect()
    }

    pub fn time_series_type(&self) -> TimeSeriesType {
        timeseries::classify(self)
    }
}
