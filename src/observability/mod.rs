// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic the library emits goes through a message type in
//! [`messages`]. Each type implements `Display` for the human-readable line
//! and [`StructuredLog`](messages::StructuredLog) to emit the event with its
//! fields attached, so call sites never hold format strings.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::extract` - Graph validation and subgraph extraction
//! * `messages::freeze` - Variable resolution and constant substitution
//! * `messages::prune` - Training-node removal
//! * `messages::run` - Command-line runs
//!
//! The library only emits `tracing` events. Installing a subscriber is left to
//! the binary.
//!
//! # Usage
//!
//! ```rust
//! use graph_freeze::errors::FreezeError;
//! use graph_freeze::observability::messages::freeze::ConversionFailed;
//! use graph_freeze::observability::messages::StructuredLog;
//!
//! let error = FreezeError::NodeNotFound("logits".to_string());
//! let msg = ConversionFailed { error: &error };
//!
//! tracing::error!("{}", msg);
//! msg.log();
//! ```

pub mod messages;
