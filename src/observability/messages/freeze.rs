// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for variable resolution and constant substitution.
//!
//! This module contains message types for logging events related to:
//! * Fetching variable values through the session
//! * Rewriting variables into constants
//! * Retyping resource pass-through nodes

use crate::graph::DataType;
use crate::observability::messages::{PhaseSpan, StructuredLog};
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Conversion started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConversionStarted<'a> {
    pub node_count: usize,
    pub output_nodes: &'a [String],
}

impl Display for ConversionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Freezing graph of {} nodes for outputs [{}]",
            self.node_count,
            self.output_nodes.join(", ")
        )
    }
}

impl StructuredLog for ConversionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            output_count = self.output_nodes.len(),
            "{}", self
        );
    }
}

impl PhaseSpan for ConversionStarted<'_> {
    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "freeze",
            span_name = name,
            node_count = self.node_count,
            output_count = self.output_nodes.len(),
        )
    }
}

/// Variable values were fetched from the session.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use graph_freeze::observability::messages::freeze::VariablesFrozen;
///
/// let msg = VariablesFrozen { count: 2 };
/// assert_eq!(msg.to_string(), "Froze 2 variables.");
/// ```
pub struct VariablesFrozen {
    pub count: usize,
}

impl Display for VariablesFrozen {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Froze {} variables.", self.count)
    }
}

impl StructuredLog for VariablesFrozen {
    fn log(&self) {
        tracing::info!(count = self.count, "{}", self);
    }
}

/// Variables were rewritten into `Const` nodes.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use graph_freeze::observability::messages::freeze::VariablesConverted;
///
/// let msg = VariablesConverted { count: 2 };
/// assert_eq!(msg.to_string(), "Converted 2 variables to const ops.");
/// ```
pub struct VariablesConverted {
    pub count: usize,
}

impl Display for VariablesConverted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Converted {} variables to const ops.", self.count)
    }
}

impl StructuredLog for VariablesConverted {
    fn log(&self) {
        tracing::info!(count = self.count, "{}", self);
    }
}

/// Pass-through nodes between a resource read and its variable were queued
/// for retyping.
///
/// # Log Level
/// `debug!` - Detail of the resolution pass
pub struct ResourceChainResolved<'a> {
    pub consumer: &'a str,
    pub variables: &'a [String],
    pub pass_through_count: usize,
    pub eligible: bool,
}

impl Display for ResourceChainResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resource consumer '{}' resolves to [{}] through {} pass-through nodes (eligible={})",
            self.consumer,
            self.variables.join(", "),
            self.pass_through_count,
            self.eligible
        )
    }
}

impl StructuredLog for ResourceChainResolved<'_> {
    fn log(&self) {
        tracing::debug!(
            consumer = self.consumer,
            variable_count = self.variables.len(),
            pass_through_count = self.pass_through_count,
            eligible = self.eligible,
            "{}", self
        );
    }
}

/// A dangling DT_RESOURCE identity was given a concrete element type.
///
/// # Log Level
/// `debug!` - Detail of the corrective pass
pub struct ResourceIdentityRetyped<'a> {
    pub node: &'a str,
    pub source: &'a str,
    pub dtype: DataType,
}

impl Display for ResourceIdentityRetyped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Retyped dangling resource identity '{}' to {:?} from '{}'",
            self.node, self.dtype, self.source
        )
    }
}

impl StructuredLog for ResourceIdentityRetyped<'_> {
    fn log(&self) {
        tracing::debug!(
            node = self.node,
            source = self.source,
            dtype = ?self.dtype,
            "{}", self
        );
    }
}

/// Conversion aborted.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ConversionFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for ConversionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Variable conversion failed: {}", self.error)
    }
}

impl StructuredLog for ConversionFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }
}
