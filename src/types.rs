use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic type a column's cells are coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Pass values through; the frame builder infers the column type
    #[default]
    Auto,
    String,
    Number,
    Boolean,
    /// Date-time text (optionally with an explicit layout) or epoch milliseconds
    Timestamp,
    TimestampEpochMs,
    TimestampEpochS,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Auto => "auto",
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::TimestampEpochMs => "timestamp_epoch_ms",
            ColumnType::TimestampEpochS => "timestamp_epoch_s",
        }
    }

    pub fn is_time(self) -> bool {
        matches!(
            self,
            ColumnType::Timestamp | ColumnType::TimestampEpochMs | ColumnType::TimestampEpochS
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(ColumnType::Auto),
            "string" => Ok(ColumnType::String),
            "number" => Ok(ColumnType::Number),
            "boolean" => Ok(ColumnType::Boolean),
            "timestamp" => Ok(ColumnType::Timestamp),
            // "timestamp_epoch" is the older name for millisecond epochs
            "timestamp_epoch" | "timestamp_epoch_ms" => Ok(ColumnType::TimestampEpochMs),
            "timestamp_epoch_s" => Ok(ColumnType::TimestampEpochS),
            other => Err(format!("unknown column type: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|err: String| {
            tracing::debug!(column_type = %raw, %err, "unknown column type, using auto");
            ColumnType::Auto
        }))
    }
}

/// Selects one column out of each row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSelector {
    /// Structural path into the row, e.g. "user.name" or "0"
    pub selector: String,

    /// Output column name; the selector is used when empty
    pub alias: String,

    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Explicit timestamp layout, either strftime (`%Y%m%d`) or a Go-style
    /// reference layout (`20060102`)
    pub time_format: Option<String>,
}

impl ColumnSelector {
    pub fn new(selector: impl Into<String>) -> Self {
        ColumnSelector {
            selector: selector.into(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    pub fn with_time_format(mut self, format: impl Into<String>) -> Self {
        self.time_format = Some(format.into());
        self
    }

    /// Name of the output column
    pub fn name(&self) -> &str {
        if self.alias.is_empty() {
            &self.selector
        } else {
            &self.alias
        }
    }
}

/// Parses the compact `selector[:type[:alias]]` form used on the command line
impl FromStr for ColumnSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let selector = parts.next().unwrap_or_default().trim();
        if selector.is_empty() {
            return Err("column selector must not be empty".to_string());
        }
        let mut column = ColumnSelector::new(selector);
        if let Some(ty) = parts.next() {
            column.column_type = ty.parse()?;
        }
        if let Some(alias) = parts.next() {
            column.alias = alias.trim().to_string();
        }
        Ok(column)
    }
}

/// Output shape requested for each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    #[default]
    Table,
    /// Long time series frames are pivoted to wide
    #[serde(alias = "time_series")]
    TimeSeries,
}

/// What happens when a cell cannot be converted to its declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// The cell becomes null
    #[default]
    Permissive,
    /// The call fails with a coercion error
    Strict,
}

/// Configuration for turning a JSON document into frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramerOptions {
    /// Name given to every produced frame
    pub frame_name: String,

    /// Literal path or expression locating the rows; empty means the whole document
    pub root_selector: String,

    /// Columns to project; empty means infer the schema from the data
    pub columns: Vec<ColumnSelector>,

    /// Re-typing applied to already built columns
    pub override_columns: Vec<ColumnSelector>,

    pub frame_format: FrameFormat,

    pub coercion: CoercionMode,
}

impl FramerOptions {
    pub fn new(frame_name: impl Into<String>) -> Self {
        FramerOptions {
            frame_name: frame_name.into(),
            ..Default::default()
        }
    }

    pub fn with_root_selector(mut self, selector: impl Into<String>) -> Self {
        self.root_selector = selector.into();
        self
    }

    pub fn with_column(mut self, column: ColumnSelector) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_override(mut self, column: ColumnSelector) -> Self {
        self.override_columns.push(column);
        self
    }

    pub fn with_format(mut self, format: FrameFormat) -> Self {
        self.frame_format = format;
        self
    }

    pub fn strict(mut self) -> Self {
        self.coercion = CoercionMode::Strict;
        self
    }
}
