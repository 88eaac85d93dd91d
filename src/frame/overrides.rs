//! Re-typing columns of an already built frame

use crate::coerce::coerce_cell;
use crate::error::Result;
use crate::frame::{Field, FieldType, FieldValues, Frame};
use crate::types::{CoercionMode, ColumnSelector};

/// Apply `overrides` to `frame`, returning a new frame.
///
/// Each override targets the column named by its selector and re-coerces that
/// column's cells to the override's type, renaming it when an alias is given.
/// Row count, column order and every other column are left as they were.
pub fn apply_overrides(frame: Frame, overrides: &[ColumnSelector], mode: CoercionMode) -> Result<Frame> {
    if overrides.is_empty() {
        return Ok(frame);
    }

    let name = frame.name().to_string();
    let mut fields = frame.into_fields();

    for column in overrides {
        let Some(position) = fields.iter().position(|f| f.name == column.selector) else {
            tracing::debug!(frame = %name, column = %column.selector, "override target not found, skipping");
            continue;
        };

        let field = &fields[position];
        let target = FieldType::from_column_type(column.column_type);
        let output_name = column.name().to_string();

        let cells = field
            .values
            .cells()
            .map(|cell| {
                coerce_cell(
                    cell,
                    column.column_type,
                    column.time_format.as_deref(),
                    &output_name,
                    mode,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        // `auto` keeps the column's current storage type
        let field_type = target.unwrap_or_else(|| field.field_type());
        let values = FieldValues::from_cells(field_type, cells, &output_name)?;

        tracing::debug!(
            frame = %name,
            column = %column.selector,
            from = %field.field_type(),
            to = %field_type,
            "column overridden"
        );
        let labels = field.labels.clone();
        fields[position] = Field::new(output_name, values).with_labels(labels);
    }

    Frame::from_fields(name, fields)
}
