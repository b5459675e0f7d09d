// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural validation of input graphs.
//!
//! Transformations index nodes by name, so a graph with duplicate or empty
//! names cannot be analyzed meaningfully. [`validate_graph`] runs every check
//! and accumulates all problems found, so a caller sees the full list at once
//! rather than fixing them one by one.

use std::collections::HashMap;

use crate::errors::GraphValidationError;
use crate::graph::Graph;
use crate::observability::messages::extract::GraphRejected;
use crate::observability::messages::StructuredLog;

/// Validates that every node has a non-empty name and that names are unique.
///
/// # Returns
///
/// * `Ok(())` - The graph can be indexed by node name
/// * `Err(Vec<GraphValidationError>)` - Every problem found, in list order
pub fn validate_graph(graph: &Graph) -> Result<(), Vec<GraphValidationError>> {
    let mut errors = Vec::new();

    if let Err(empty_errors) = validate_non_empty_names(graph) {
        errors.extend(empty_errors);
    }

    if let Err(duplicate_errors) = validate_unique_names(graph) {
        errors.extend(duplicate_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        GraphRejected {
            node_count: graph.nodes.len(),
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

fn validate_non_empty_names(graph: &Graph) -> Result<(), Vec<GraphValidationError>> {
    let errors: Vec<GraphValidationError> = graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.name.is_empty())
        .map(|(position, node)| GraphValidationError::EmptyNodeName {
            position,
            op: node.op.clone(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_names(graph: &Graph) -> Result<(), Vec<GraphValidationError>> {
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut first_seen = Vec::new();

    for (position, node) in graph.nodes.iter().enumerate() {
        if node.name.is_empty() {
            continue;
        }
        let seen = positions.entry(node.name.as_str()).or_default();
        if seen.is_empty() {
            first_seen.push(node.name.as_str());
        }
        seen.push(position);
    }

    // Report in first-occurrence order so the output is deterministic.
    let errors: Vec<GraphValidationError> = first_seen
        .into_iter()
        .filter_map(|name| {
            let seen = &positions[name];
            (seen.len() > 1).then(|| GraphValidationError::DuplicateNodeName {
                name: name.to_string(),
                positions: seen.clone(),
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
