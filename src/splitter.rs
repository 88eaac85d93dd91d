//! Deciding between one frame and many
//!
//! A root that is a non-empty array of arrays holds one row-set per inner
//! array. Anything else, including an array mixing arrays with other values,
//! is a single row-set.

use serde_json::Value;

pub fn is_multi_frame(root: &Value) -> bool {
    match root {
        // `[]` is one empty row-set and frames as a single zero-row frame,
        // never as zero frames
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_array),
        _ => false,
    }
}

/// Split the resolved root into the row-sets that each become a frame
pub fn split(root: Value) -> Vec<Value> {
    if !is_multi_frame(&root) {
        return vec![root];
    }
    match root {
        Value::Array(items) => items,
        other => vec![other],
    }
}
