// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Session backends that supply variable values during conversion.
//!
//! # Available Backends
//!
//! ## In-Memory Backend
//! Values held in a name-keyed map, typically loaded from a JSON or YAML
//! values file written by whatever trained the model:
//! - **Lookup**: exact tensor name, with `name` also matching `name:0`
//! - **Use Case**: the CLI, offline freezing, tests
//!
//! ## Stub Backend (Test-Only)
//! Sessions that misbehave on purpose:
//! - **FailingSession**: every fetch fails
//! - **TruncatingSession**: returns fewer values than requested
//! - **Note**: NOT available in production builds
//!
//! # Examples
//!
//! ```rust
//! use graph_freeze::backends::InMemorySession;
//! use graph_freeze::graph::TensorValue;
//!
//! let session = InMemorySession::new()
//!     .with_value("weights:0", TensorValue::scalar_f32(0.5));
//! assert_eq!(session.len(), 1);
//! ```

pub mod in_memory;
#[cfg(test)]
pub mod stub;

pub use in_memory::InMemorySession;
