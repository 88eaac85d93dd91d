use thiserror::Error;

/// Errors produced while turning JSON text into frames
#[derive(Debug, Error)]
pub enum FramerError {
    /// Empty or syntactically invalid JSON
    #[error("invalid JSON input: {0}")]
    InvalidInput(String),

    #[error("failed to compile root selector `{selector}`: {source}")]
    RootSelectorCompile {
        selector: String,
        #[source]
        source: ExpressionError,
    },

    #[error("failed to evaluate root selector `{selector}`: {source}")]
    RootSelectorEval {
        selector: String,
        #[source]
        source: ExpressionError,
    },

    #[error("failed to serialize root data: {0}")]
    RootSerialization(#[from] serde_json::Error),

    /// Rows could not be reconciled into one rectangular, typed frame
    #[error("failed to build frame: {0}")]
    FrameBuild(String),

    /// Long to wide conversion preconditions were not met
    #[error("failed to reshape time series: {0}")]
    Reshape(String),

    /// A cell could not be converted while coercion is strict
    #[error("cannot convert {value} to {target} in column `{column}`")]
    Coercion {
        column: String,
        value: String,
        target: String,
    },
}

/// Errors reported by an expression engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("syntax error: {message}")]
    Compile { message: String },

    #[error("{message}")]
    Eval { message: String },
}

impl ExpressionError {
    pub fn compile(message: impl Into<String>) -> Self {
        ExpressionError::Compile {
            message: message.into(),
        }
    }

    pub fn eval(message: impl Into<String>) -> Self {
        ExpressionError::Eval {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FramerError>;
