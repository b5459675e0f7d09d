// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for command-line runs: loading inputs and writing results.

use crate::observability::messages::{PhaseSpan, StructuredLog};
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// A run started from a config file.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use graph_freeze::observability::messages::run::RunStarted;
/// use std::path::Path;
///
/// let msg = RunStarted { mode: "freeze", config: Path::new("freeze.yaml") };
/// assert_eq!(msg.to_string(), "Starting freeze run from freeze.yaml");
/// ```
pub struct RunStarted<'a> {
    pub mode: &'a str,
    pub config: &'a Path,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Starting {} run from {}", self.mode, self.config.display())
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            mode = self.mode,
            config = %self.config.display(),
            "{}", self
        );
    }
}

impl PhaseSpan for RunStarted<'_> {
    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            mode = self.mode,
            config = %self.config.display(),
        )
    }
}

/// A graph file was read.
///
/// # Log Level
/// `debug!` - Input detail
pub struct GraphLoaded<'a> {
    pub path: &'a Path,
    pub node_count: usize,
}

impl Display for GraphLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loaded {} nodes from {}", self.node_count, self.path.display())
    }
}

impl StructuredLog for GraphLoaded<'_> {
    fn log(&self) {
        tracing::debug!(
            path = %self.path.display(),
            node_count = self.node_count,
            "{}", self
        );
    }
}

/// The transformed graph was written.
///
/// # Log Level
/// `info!` - Important operational event
pub struct GraphWritten<'a> {
    pub path: &'a Path,
    pub node_count: usize,
}

impl Display for GraphWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Wrote {} nodes to {}", self.node_count, self.path.display())
    }
}

impl StructuredLog for GraphWritten<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            node_count = self.node_count,
            "{}", self
        );
    }
}
