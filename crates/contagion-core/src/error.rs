//! Error types for contagion simulations

use std::path::PathBuf;

use thiserror::Error;

use crate::NodeId;

/// Core contagion errors
///
/// Every variant is terminal for the current invocation except
/// [`ContagionError::UnknownNode`], which engines report and skip.
#[derive(Error, Debug)]
pub enum ContagionError {
    // Graph loading errors
    #[error("Graph file not found: {}", .0.display())]
    GraphNotFound(PathBuf),

    #[error("Malformed graph: {0}")]
    MalformedGraph(String),

    // Parameter errors
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{0} is required for {1} simulation")]
    MissingRequiredParameter(&'static str, &'static str),

    // Node errors
    #[error("Node {0} does not exist in the graph")]
    UnknownNode(NodeId),

    // Presentation errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContagionError {
    /// Shorthand for an [`ContagionError::InvalidParameter`]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ContagionError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for contagion operations
pub type ContagionResult<T> = Result<T, ContagionError>;

/// Checks that `value` is a probability in [0, 1]
pub fn ensure_unit_interval(name: &'static str, value: f64) -> ContagionResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ContagionError::invalid(
            name,
            format!("must be between 0 and 1, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_interval_bounds() {
        assert_eq!(ensure_unit_interval("threshold", 0.0).unwrap(), 0.0);
        assert_eq!(ensure_unit_interval("threshold", 1.0).unwrap(), 1.0);
        assert!(ensure_unit_interval("threshold", -0.01).is_err());
        assert!(ensure_unit_interval("threshold", 1.5).is_err());
        assert!(ensure_unit_interval("threshold", f64::NAN).is_err());
    }

    #[test]
    fn test_messages() {
        let err = ContagionError::MissingRequiredParameter("threshold", "cascade");
        assert_eq!(err.to_string(), "threshold is required for cascade simulation");

        let err = ContagionError::UnknownNode(NodeId::from("9"));
        assert_eq!(err.to_string(), "Node 9 does not exist in the graph");
    }
}
