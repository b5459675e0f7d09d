// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph validation and subgraph extraction.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Subgraph extraction finished.
///
/// # Log Level
/// `debug!` - Routine step of every conversion
///
/// # Example
/// ```
/// use graph_freeze::observability::messages::extract::SubgraphExtracted;
///
/// let msg = SubgraphExtracted { kept: 12, total: 40 };
/// assert_eq!(msg.to_string(), "Extracted subgraph: kept 12 of 40 nodes");
/// ```
pub struct SubgraphExtracted {
    pub kept: usize,
    pub total: usize,
}

impl Display for SubgraphExtracted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Extracted subgraph: kept {} of {} nodes", self.kept, self.total)
    }
}

impl StructuredLog for SubgraphExtracted {
    fn log(&self) {
        tracing::debug!(kept = self.kept, total = self.total, "{}", self);
    }
}

/// An input reference names a node the graph does not contain.
///
/// # Log Level
/// `debug!` - The reference is ignored
pub struct DanglingInputSkipped<'a> {
    pub node: &'a str,
    pub input: &'a str,
}

impl Display for DanglingInputSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' references '{}' which is not in the graph; skipping",
            self.node, self.input
        )
    }
}

impl StructuredLog for DanglingInputSkipped<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, input = self.input, "{}", self);
    }
}

/// Input graph failed structural validation.
///
/// # Log Level
/// `error!` - The transformation is aborted
pub struct GraphRejected {
    pub node_count: usize,
    pub error_count: usize,
}

impl Display for GraphRejected {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph with {} nodes rejected: {} validation errors",
            self.node_count, self.error_count
        )
    }
}

impl StructuredLog for GraphRejected {
    fn log(&self) {
        tracing::error!(
            node_count = self.node_count,
            error_count = self.error_count,
            "{}", self
        );
    }
}
