//! # jsonframer - JSON to typed frames
//!
//! Turns arbitrary JSON documents into named, rectangular tables of typed
//! columns ("frames") ready for visualization or analysis.
//!
//! ## Pipeline
//!
//! - **root**: locate the rows, by literal path or by expression
//! - **splitter**: an array of arrays becomes one frame per inner array
//! - **projector**: pick, rename and coerce columns
//! - **frame**: infer the schema, build the frame, apply overrides and reshape
//!   long time series to wide
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonframer::{to_frame, ColumnSelector, ColumnType, FramerOptions};
//!
//! # fn main() -> jsonframer::Result<()> {
//! let json = r#"{
//!     "meta": {},
//!     "data": [
//!         {"username": "foo", "age": 1, "joined": "2011-01-01T00:00:00Z"},
//!         {"username": "bar", "age": 2, "joined": "2012-01-01T00:00:00Z"}
//!     ]
//! }"#;
//!
//! let options = FramerOptions::new("users")
//!     .with_root_selector("data")
//!     .with_column(ColumnSelector::new("username").with_alias("user-name"))
//!     .with_column(ColumnSelector::new("joined").with_type(ColumnType::Timestamp));
//!
//! let frame = to_frame(json, &options)?;
//! assert_eq!(frame.field_names(), vec!["user-name", "joined"]);
//! assert_eq!(frame.row_count(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ### Expression selectors
//!
//! Selectors that are not literal paths are evaluated by the built-in
//! expression language:
//!
//! ```rust
//! use jsonframer::get_root_data;
//!
//! let json = r#"{"sss": [{"bar1": 4}, {"bar1": 5.6}]}"#;
//! assert_eq!(get_root_data(json, "$sum(sss.bar1)").unwrap(), "9.6");
//! ```

pub mod coerce;
pub mod error;
pub mod expression;
pub mod frame;
pub mod framer;
pub mod path;
pub mod projector;
pub mod root;
pub mod splitter;
pub mod types;

// Re-export commonly used types for convenience
pub use coerce::Cell;
pub use error::{ExpressionError, FramerError, Result};
pub use expression::{BuiltinEngine, ExpressionEngine};
pub use frame::{Field, FieldType, FieldValues, Frame, TimeSeriesType};
pub use framer::{get_root_data, to_frame, to_frames, Framer};
pub use types::{CoercionMode, ColumnSelector, ColumnType, FrameFormat, FramerOptions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_and_array_frames() {
        let options = FramerOptions::default();
        for json in ["{}", "[]"] {
            let frame = to_frame(json, &options).unwrap();
            assert_eq!(frame.row_count(), 0);
        }
        assert_eq!(to_frames("[]", &options).unwrap().len(), 1);
    }

    #[test]
    fn test_frames_serialize_deterministically() {
        let json = r#"[{"b": 1, "a": "x"}, {"a": "y", "c": true}]"#;
        let options = FramerOptions::new("det");
        let first = serde_json::to_string(&to_frames(json, &options).unwrap()).unwrap();
        let second = serde_json::to_string(&to_frames(json, &options).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
