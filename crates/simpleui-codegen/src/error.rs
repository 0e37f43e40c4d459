use std::fmt;

use thiserror::Error;

/// A fatal generation failure. Any of these aborts the whole run; no
/// artifact produced by a failed run is valid.
#[derive(Debug, Error, PartialEq)]
pub enum GenError {
    /// The expression kind has no meaning in the context it was found in
    /// (e.g. a textbox lookup outside a script).
    #[error("unhandled expression kind `{kind}` in {context}")]
    UnhandledExpressionKind {
        kind: &'static str,
        context: &'static str,
    },

    /// `-`, `*` or `/` with a string operand.
    #[error("invalid operation: `{op}` cannot be applied to {left} and {right}")]
    InvalidOperation {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// Call-site arguments do not fit the component's parameters.
    #[error("cannot bind arguments of component `{component}`: {reason}")]
    ParameterBindingError { component: String, reason: String },

    #[error("unknown component `{0}`")]
    UnknownComponent(String),

    /// Component instantiation nested deeper than the supported limit.
    #[error("component `{component}` nested deeper than {limit} levels")]
    RecursionLimit { component: String, limit: usize },
}

/// A malformed base stylesheet.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("stylesheet parse error at {line}:{col}: {message}")]
pub struct CssParseError {
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
    /// 1-based source column number where the error occurred.
    pub col: usize,
}

impl CssParseError {
    pub(crate) fn new(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self { message: msg.into(), line, col }
    }
}

/// A non-fatal finding collected while generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A symbol with no binding in the current argument frame. It rendered
    /// as an empty string.
    UnresolvedSymbol { symbol: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnresolvedSymbol { symbol } => {
                write!(f, "unresolved symbol `{symbol}` rendered as an empty string")
            }
        }
    }
}
