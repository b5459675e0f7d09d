// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] to emit the same event with its fields attached.
//!
//! # Organization
//!
//! * `extract` - Graph validation and subgraph extraction
//! * `freeze` - Variable resolution and constant substitution
//! * `prune` - Training-node removal and identity splicing
//! * `run` - Command-line runs: inputs read and results written
//!
//! # Usage Pattern
//!
//! ```rust
//! use graph_freeze::observability::messages::freeze::VariablesFrozen;
//! use graph_freeze::observability::messages::StructuredLog;
//!
//! let msg = VariablesFrozen { count: 3 };
//!
//! tracing::info!("{}", msg);
//! msg.log();
//! ```

use tracing::Span;

pub mod extract;
pub mod freeze;
pub mod prune;
pub mod run;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the event at the message's level.
    fn log(&self);
}

/// A message that opens a phase of work. The span carries the message's
/// fields so every event logged inside the phase is attributed to it.
pub trait PhaseSpan: StructuredLog {
    fn span(&self, name: &str) -> Span;
}
