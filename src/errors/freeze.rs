// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for graph transformations.
//!
//! Every variant is fatal for the call that produced it: extraction and
//! conversion either return a complete graph or one of these errors, never a
//! partially rewritten graph.

use thiserror::Error;

use crate::errors::GraphValidationError;

/// Failure reported by a [`Session`](crate::traits::Session) while fetching values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The session has no value for the requested tensor.
    #[error("Tensor '{0}' is not available in the session")]
    UnknownTensor(String),

    /// Backend-specific failure (transport, runtime, ...).
    #[error("Session backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum FreezeError {
    /// A requested target or referenced node does not exist.
    #[error("{0} is not in graph")]
    NodeNotFound(String),

    /// The input graph failed structural validation.
    #[error("Invalid graph: {}", join_errors(.0))]
    InvalidGraph(Vec<GraphValidationError>),

    /// A node lacks an attribute the rewrite needs, or it has the wrong tag.
    #[error("Node '{node}' is missing the '{attr}' attribute")]
    MissingAttribute { node: String, attr: String },

    /// A node lacks an input the rewrite needs.
    #[error("Node '{node}' has no input at position {index}")]
    MissingInput { node: String, index: usize },

    /// A resource read whose pass-through chain does not end at a VarHandleOp.
    #[error(
        "Cannot find the variable that is an input to '{consumer}' \
         (chain ends at '{terminal}')"
    )]
    UnresolvedResourceVariable { consumer: String, terminal: String },

    /// The variables behind one resource consumer disagree on eligibility.
    #[error(
        "Found DT_RESOURCE node whose ancestor variables are both blacklisted AND whitelisted \
         for freezing. Originating descendant node: {}. Ancestor variables: [{}]",
        .consumer,
        .variables.join(", ")
    )]
    MixedEligibility {
        consumer: String,
        variables: Vec<String>,
    },

    /// A resource gather with a non-zero `batch_dims`.
    #[error("batch_dims != 0 is not supported (node '{node}', batch_dims={batch_dims})")]
    UnsupportedBatchDims { node: String, batch_dims: i64 },

    /// The session answered with a different number of values than requested.
    #[error("Session returned {returned} values for {requested} requested tensors")]
    FetchCountMismatch { requested: usize, returned: usize },

    #[error("Failed to fetch variable values: {0}")]
    Session(#[from] SessionError),
}

/// Result type alias for graph transformations.
pub type FreezeResult<T> = Result<T, FreezeError>;

fn join_errors(errors: &[GraphValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_not_found_message() {
        let err = FreezeError::NodeNotFound("out".to_string());
        assert_eq!(err.to_string(), "out is not in graph");
    }

    #[test]
    fn test_mixed_eligibility_lists_variables() {
        let err = FreezeError::MixedEligibility {
            consumer: "read".to_string(),
            variables: vec!["v1".to_string(), "v2".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Originating descendant node: read"));
        assert!(msg.contains("[v1, v2]"));
    }

    #[test]
    fn test_session_error_converts() {
        let err: FreezeError = SessionError::UnknownTensor("w:0".to_string()).into();
        assert!(matches!(err, FreezeError::Session(_)));
        assert!(err.to_string().contains("w:0"));
    }
}
