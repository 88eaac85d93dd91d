//! Root selection: locating the subtree that holds the rows
//!
//! Selectors are tried as literal paths first. Only when the path does not
//! resolve is the selector compiled as an expression, and compiled programs
//! are kept per resolver so repeated selectors compile once.

use crate::error::{FramerError, Result};
use crate::expression::ExpressionEngine;
use crate::path;
use serde_json::Value;
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub struct RootResolver<E: ExpressionEngine> {
    engine: E,
    programs: RefCell<HashMap<String, Rc<E::Program>>>,
}

impl<E: ExpressionEngine> RootResolver<E> {
    pub fn new(engine: E) -> Self {
        RootResolver {
            engine,
            programs: RefCell::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Resolve `selector` against `document`
    pub fn resolve<'a>(&self, document: &'a Value, selector: &str) -> Result<Cow<'a, Value>> {
        if selector.is_empty() {
            tracing::debug!(strategy = "identity", "root resolved");
            return Ok(Cow::Borrowed(document));
        }

        if let Some(found) = path::resolve(document, selector) {
            tracing::debug!(strategy = "path", selector, "root resolved");
            return Ok(Cow::Borrowed(found));
        }

        let program = self.compile(selector)?;
        let value = self
            .engine
            .evaluate(&program, document)
            .map_err(|source| FramerError::RootSelectorEval {
                selector: selector.to_string(),
                source,
            })?;
        tracing::debug!(strategy = "expression", selector, "root resolved");
        Ok(Cow::Owned(value))
    }

    /// Resolve and serialize the result as JSON text
    pub fn resolve_to_string(&self, document: &Value, selector: &str) -> Result<String> {
        let root = self.resolve(document, selector)?;
        Ok(serde_json::to_string(root.as_ref())?)
    }

    /// Number of distinct selectors compiled so far
    pub fn cached_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    fn compile(&self, selector: &str) -> Result<Rc<E::Program>> {
        if let Some(program) = self.programs.borrow().get(selector) {
            tracing::trace!(selector, "compiled program cache hit");
            return Ok(Rc::clone(program));
        }

        let program = self
            .engine
            .compile(selector)
            .map_err(|source| FramerError::RootSelectorCompile {
                selector: selector.to_string(),
                source,
            })?;
        let program = Rc::new(program);
        self.programs
            .borrow_mut()
            .insert(selector.to_string(), Rc::clone(&program));
        Ok(program)
    }
}
