//! Column projection and coercion
//!
//! With declared columns every row is reduced to exactly those columns, in
//! declaration order, each value navigated by its selector and converted to
//! its declared type. Only an object (one row) or an array (one row per
//! element) holds rows to project; any other root holds none. Without declared
//! columns rows pass through untouched and the frame builder infers the schema.

use crate::coerce::coerce;
use crate::error::Result;
use crate::frame::{FieldType, FrameBuilder, Row};
use crate::path;
use crate::types::{CoercionMode, ColumnSelector};
use serde_json::Value;

/// Split a row-set value into its rows: an array holds one row per element,
/// null holds none and anything else is a single row
pub fn rows_of(root: Value) -> Vec<Value> {
    match root {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Rows available to declared columns: an object is one row, an array one
/// row per element, and scalars or null hold none
pub fn projectable_rows(root: Value) -> Vec<Value> {
    match root {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => Vec::new(),
    }
}

pub struct ColumnProjector<'a> {
    columns: &'a [ColumnSelector],
    mode: CoercionMode,
}

impl<'a> ColumnProjector<'a> {
    pub fn new(columns: &'a [ColumnSelector], mode: CoercionMode) -> Self {
        ColumnProjector { columns, mode }
    }

    pub fn is_passthrough(&self) -> bool {
        self.columns.is_empty()
    }

    /// Project one raw row onto the declared columns.
    ///
    /// Missing paths are null. When two columns share an output name the
    /// later one wins.
    pub fn project_row(&self, row: &Value) -> Result<Row> {
        let mut out = Row::with_capacity(self.columns.len());
        for column in self.columns {
            let raw = path::resolve_or_null(row, &column.selector);
            let cell = coerce(raw, column, self.mode)?;
            out.insert(column.name().to_string(), cell);
        }
        Ok(out)
    }

    /// Feed a row-set into `builder`, declaring the column schema first
    pub fn project_into(&self, row_set: Value, builder: &mut FrameBuilder) -> Result<()> {
        if self.is_passthrough() {
            for row in rows_of(row_set) {
                builder.add_value(row);
            }
            return Ok(());
        }

        let rows = projectable_rows(row_set);
        for column in self.columns {
            builder.declare_column(column.name(), FieldType::from_column_type(column.column_type));
        }
        for row in &rows {
            builder.add_row(self.project_row(row)?);
        }
        tracing::trace!(rows = rows.len(), columns = self.columns.len(), "rows projected");
        Ok(())
    }
}
