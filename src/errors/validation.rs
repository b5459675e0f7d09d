// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during graph structure validation
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValidationError {
    /// Two or more nodes share a name
    DuplicateNodeName {
        /// The duplicated node name
        name: String,
        /// List positions of every node carrying the name
        positions: Vec<usize>,
    },
    /// A node has an empty name and can never be referenced
    EmptyNodeName {
        /// List position of the unnamed node
        position: usize,
        /// Operator type of the unnamed node
        op: String,
    },
}

impl fmt::Display for GraphValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphValidationError::DuplicateNodeName { name, positions } => {
                let positions: Vec<String> = positions.iter().map(|p| p.to_string()).collect();
                write!(
                    f,
                    "Duplicate node name '{}' at positions [{}]",
                    name,
                    positions.join(", ")
                )
            }
            GraphValidationError::EmptyNodeName { position, op } => {
                write!(f, "Node at position {} ({}) has an empty name", position, op)
            }
        }
    }
}

impl std::error::Error for GraphValidationError {}
