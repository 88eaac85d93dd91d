//! The JSON → frames pipeline
//!
//! validate → resolve root → (split) → project → build → overrides → reshape

use crate::error::{FramerError, Result};
use crate::expression::{BuiltinEngine, ExpressionEngine};
use crate::frame::overrides::apply_overrides;
use crate::frame::{long_to_wide, Frame, FrameBuilder, TimeSeriesType};
use crate::projector::ColumnProjector;
use crate::root::RootResolver;
use crate::splitter;
use crate::types::{FrameFormat, FramerOptions};
use serde_json::Value;

/// Reusable pipeline for one set of options.
///
/// Compiled root selector programs are cached for the lifetime of the framer,
/// so converting many documents with the same options compiles once.
pub struct Framer<E: ExpressionEngine = BuiltinEngine> {
    options: FramerOptions,
    resolver: RootResolver<E>,
}

impl Framer<BuiltinEngine> {
    pub fn new(options: FramerOptions) -> Self {
        Framer::with_engine(options, BuiltinEngine)
    }
}

impl<E: ExpressionEngine> Framer<E> {
    /// Use `engine` for root selectors that are not literal paths
    pub fn with_engine(options: FramerOptions, engine: E) -> Self {
        Framer {
            options,
            resolver: RootResolver::new(engine),
        }
    }

    pub fn options(&self) -> &FramerOptions {
        &self.options
    }

    pub fn resolver(&self) -> &RootResolver<E> {
        &self.resolver
    }

    /// Convert `json` into a single frame; the resolved root is one row-set
    #[tracing::instrument(
        skip(self, json),
        fields(frame = %self.options.frame_name, selector = %self.options.root_selector)
    )]
    pub fn to_frame(&self, json: &str) -> Result<Frame> {
        let document = validate(json)?;
        let root = self.resolver.resolve(&document, &self.options.root_selector)?;
        self.build_frame(root.into_owned())
    }

    /// Convert `json` into one frame per row-set; an array of arrays yields
    /// one frame per inner array
    #[tracing::instrument(
        skip(self, json),
        fields(frame = %self.options.frame_name, selector = %self.options.root_selector)
    )]
    pub fn to_frames(&self, json: &str) -> Result<Vec<Frame>> {
        let document = validate(json)?;
        let root = self.resolver.resolve(&document, &self.options.root_selector)?;
        let row_sets = splitter::split(root.into_owned());
        tracing::debug!(row_sets = row_sets.len(), "root split into row-sets");

        row_sets
            .into_iter()
            .map(|row_set| self.build_frame(row_set))
            .collect()
    }

    /// The resolved root as JSON text. An empty selector returns `json` as given.
    pub fn root_data(&self, json: &str) -> Result<String> {
        let document = validate(json)?;
        if self.options.root_selector.is_empty() {
            return Ok(json.to_string());
        }
        self.resolver.resolve_to_string(&document, &self.options.root_selector)
    }

    fn build_frame(&self, row_set: Value) -> Result<Frame> {
        let options = &self.options;
        let mut builder = FrameBuilder::new(options.frame_name.as_str());
        ColumnProjector::new(&options.columns, options.coercion).project_into(row_set, &mut builder)?;

        let frame = builder.build()?;
        let frame = apply_overrides(frame, &options.override_columns, options.coercion)?;
        let shape = frame.time_series_type();
        tracing::debug!(
            rows = frame.row_count(),
            columns = frame.column_count(),
            shape = ?shape,
            "frame built"
        );

        if options.frame_format == FrameFormat::TimeSeries && shape == TimeSeriesType::Long {
            return long_to_wide(&frame);
        }
        Ok(frame)
    }
}

/// Parse `json`, rejecting blank and malformed input
pub fn validate(json: &str) -> Result<Value> {
    if json.trim().is_empty() {
        return Err(FramerError::InvalidInput("empty json received".to_string()));
    }
    serde_json::from_str(json)
        .map_err(|err| FramerError::InvalidInput(format!("invalid json response received: {}", err)))
}

/// Convert `json` into a single frame
pub fn to_frame(json: &str, options: &FramerOptions) -> Result<Frame> {
    Framer::new(options.clone()).to_frame(json)
}

/// Convert `json` into one frame per row-set
pub fn to_frames(json: &str, options: &FramerOptions) -> Result<Vec<Frame>> {
    Framer::new(options.clone()).to_frames(json)
}

/// Resolve `selector` against `json` and return the result as JSON text
pub fn get_root_data(json: &str, selector: &str) -> Result<String> {
    Framer::new(FramerOptions::default().with_root_selector(selector)).root_data(json)
}
