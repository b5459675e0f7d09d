// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for training-node pruning.

use crate::observability::messages::{PhaseSpan, StructuredLog};
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Pruning started.
///
/// # Log Level
/// `debug!` - Routine step
///
/// # Example
/// ```
/// use graph_freeze::observability::messages::prune::PruneStarted;
///
/// let msg = PruneStarted { node_count: 8, protected_count: 1 };
/// assert_eq!(msg.to_string(), "Pruning training nodes from 8 nodes (1 protected)");
/// ```
pub struct PruneStarted {
    pub node_count: usize,
    pub protected_count: usize,
}

impl Display for PruneStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pruning training nodes from {} nodes ({} protected)",
            self.node_count, self.protected_count
        )
    }
}

impl StructuredLog for PruneStarted {
    fn log(&self) {
        tracing::debug!(
            node_count = self.node_count,
            protected_count = self.protected_count,
            "{}", self
        );
    }
}

impl PhaseSpan for PruneStarted {
    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "prune",
            span_name = name,
            node_count = self.node_count,
            protected_count = self.protected_count,
        )
    }
}

/// Pruning finished.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use graph_freeze::observability::messages::prune::TrainingNodesPruned;
///
/// let msg = TrainingNodesPruned { removed: 2, spliced: 3, remaining: 10 };
/// assert_eq!(
///     msg.to_string(),
///     "Pruned training nodes: removed 2, spliced 3, 10 nodes remain"
/// );
/// ```
pub struct TrainingNodesPruned {
    pub removed: usize,
    pub spliced: usize,
    pub remaining: usize,
}

impl Display for TrainingNodesPruned {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pruned training nodes: removed {}, spliced {}, {} nodes remain",
            self.removed, self.spliced, self.remaining
        )
    }
}

impl StructuredLog for TrainingNodesPruned {
    fn log(&self) {
        tracing::info!(
            removed = self.removed,
            spliced = self.spliced,
            remaining = self.remaining,
            "{}", self
        );
    }
}

/// A splice chain looped back on itself and was cut.
///
/// # Log Level
/// `warn!` - Malformed identity cycle, references left pointing at the cut
pub struct SpliceCycleDetected<'a> {
    pub node: &'a str,
}

impl Display for SpliceCycleDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Identity splice chain through '{}' forms a cycle", self.node)
    }
}

impl StructuredLog for SpliceCycleDetected<'_> {
    fn log(&self) {
        tracing::warn!(node = self.node, "{}", self);
    }
}
