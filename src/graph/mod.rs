// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph data model and the read-only analyses built on it.

pub mod naming;
pub mod reachability;
pub mod subgraph;
pub mod summary;
mod types;
mod validation;

pub use subgraph::extract_sub_graph;
pub use summary::{GraphSummary, NodeIndex};
pub use types::{
    AttrValue, DataType, FunctionDef, FunctionLibrary, Graph, Node, TensorContent, TensorValue,
    VersionDef,
};
pub use validation::validate_graph;

use crate::config::consts::{PASS_THROUGH_OPS, VARIABLE_RELATED_OPS};

/// True for identity and the control-flow routing primitives.
pub fn is_pass_through_op(op: &str) -> bool {
    PASS_THROUGH_OPS.contains(&op)
}

/// True for ops that create, assign, or initialize variables.
pub fn is_variable_op(op: &str) -> bool {
    VARIABLE_RELATED_OPS.contains(&op)
}
