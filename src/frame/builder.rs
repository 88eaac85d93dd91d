//! Frame assembly with schema inference
//!
//! Two passes over the row-set: `add_row` records the column order and
//! accumulates per-column statistics about the cells it sees, `build` decides
//! each column's type once and materializes the typed value arrays.

use crate::coerce::Cell;
use crate::error::Result;
use crate::frame::{Field, FieldType, FieldValues, Frame};
use indexmap::IndexMap;
use serde_json::Value;

/// Output column name → cell, for one row
pub type Row = IndexMap<String, Cell>;

/// Name of the single column produced from scalar rows
pub const SCALAR_COLUMN: &str = "value";

/// Counts of the kinds of cells seen in one column
#[derive(Debug, Default)]
struct ColumnStats {
    declared: Option<FieldType>,
    nulls: usize,
    booleans: usize,
    numbers: usize,
    strings: usize,
    times: usize,
    nested: usize,
}

impl ColumnStats {
    fn declared(field_type: Option<FieldType>) -> Self {
        ColumnStats {
            declared: field_type,
            ..Default::default()
        }
    }

    fn add_cell(&mut self, cell: &Cell) {
        match cell {
            Cell::Null => self.nulls += 1,
            Cell::Bool(_) => self.booleans += 1,
            Cell::Number(_) => self.numbers += 1,
            Cell::String(_) => self.strings += 1,
            Cell::Time(_) => self.times += 1,
            Cell::Nested(_) => self.nested += 1,
        }
    }

    /// Declared type, or the narrowest type holding every non-null cell.
    ///
    /// Any nested value makes the column JSON; any mix of scalar kinds makes
    /// it a string column.
    fn field_type(&self) -> FieldType {
        if let Some(declared) = self.declared {
            return declared;
        }
        let non_null = self.booleans + self.numbers + self.strings + self.times + self.nested;
        if non_null == 0 || self.nested > 0 {
            FieldType::Json
        } else if self.numbers == non_null {
            FieldType::Number
        } else if self.booleans == non_null {
            FieldType::Boolean
        } else if self.times == non_null {
            FieldType::Time
        } else {
            FieldType::String
        }
    }
}

/// Accumulates rows and builds one [`Frame`]
#[derive(Debug)]
pub struct FrameBuilder {
    name: String,
    columns: IndexMap<String, ColumnStats>,
    rows: Vec<Row>,
}

impl FrameBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        FrameBuilder {
            name: name.into(),
            columns: IndexMap::new(),
            rows: Vec::new(),
        }
    }

    /// Fix a column's position (and type, when given) before any rows arrive
    pub fn declare_column(&mut self, name: impl Into<String>, field_type: Option<FieldType>) {
        let name = name.into();
        match self.columns.get_mut(&name) {
            Some(stats) => stats.declared = field_type,
            None => {
                self.columns.insert(name, ColumnStats::declared(field_type));
            }
        }
    }

    /// First pass: record new columns in first-seen order and count cell kinds
    pub fn add_row(&mut self, row: Row) {
        for (name, cell) in row.iter() {
            self.columns
                .entry(name.clone())
                .or_default()
                .add_cell(cell);
        }
        self.rows.push(row);
    }

    /// Add a raw JSON row: object keys, array indices or a single scalar
    /// column become the row's columns
    pub fn add_value(&mut self, value: Value) {
        self.add_row(row_from_value(value));
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Second pass: decide column types and emit aligned value arrays
    pub fn build(self) -> Result<Frame> {
        let FrameBuilder { name, columns, mut rows } = self;

        let mut fields = Vec::with_capacity(columns.len());
        for (column, stats) in columns {
            let field_type = stats.field_type();
            tracing::trace!(frame = %name, column = %column, field_type = %field_type, "column type decided");

            let cells = rows
                .iter_mut()
                .map(|row| row.swap_remove(&column).unwrap_or(Cell::Null));
            let values = FieldValues::from_cells(field_type, cells, &column)?;
            fields.push(Field::new(column, values));
        }

        Frame::from_fields(name, fields)
    }
}

/// Turn one raw row into cells keyed by column name
pub fn row_from_value(value: Value) -> Row {
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| (key, Cell::from_value(value)))
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), Cell::from_value(value)))
            .collect(),
        scalar => {
            let mut row = Row::new();
            row.insert(SCALAR_COLUMN.to_string(), Cell::from_value(scalar));
            row
        }
    }
}
