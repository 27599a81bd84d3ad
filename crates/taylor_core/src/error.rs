use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which of the three anchor-point scalars an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Order {
    #[serde(rename = "f")]
    Value,
    #[serde(rename = "f'")]
    First,
    #[serde(rename = "f''")]
    Second,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Order::Value => "f",
            Order::First => "f'",
            Order::Second => "f''",
        };
        f.write_str(label)
    }
}

/// Every failure the engine can report. Domain problems inside a sample
/// range are not errors; they become NaN gaps in the series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("{at}({x0}) is not a finite number")]
    NonFiniteResult { at: Order, x0: f64 },

    #[error("Anchor point x0 must be finite (got {x0})")]
    InvalidAnchor { x0: f64 },

    #[error("Invalid settings: {reason}")]
    InvalidSettings { reason: String },

    #[error("{at}(x) is too large to evaluate ({size} nodes, limit {limit})")]
    TooComplex { at: Order, size: usize, limit: usize },
}

impl EngineError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        EngineError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Source offset for syntax errors, `None` for every other kind.
    pub fn position(&self) -> Option<usize> {
        match self {
            EngineError::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_message_names_the_derivative() {
        let err = EngineError::NonFiniteResult {
            at: Order::Second,
            x0: 0.5,
        };
        assert_eq!(err.to_string(), "f''(0.5) is not a finite number");
    }

    #[test]
    fn position_is_only_reported_for_syntax_errors() {
        assert_eq!(EngineError::syntax(3, "unexpected token").position(), Some(3));
        let unknown = EngineError::UnknownFunction {
            name: "foo".to_string(),
        };
        assert_eq!(unknown.position(), None);
    }
}
