// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Training-node pruning.
//!
//! Some nodes only matter while training. [`remove_training_nodes`] drops the
//! numeric-validation ops (`CheckNumerics`) and splices out identities that
//! are not tied into control dependencies, connecting their inputs straight
//! to their consumers.
//!
//! # Phases
//!
//! 1. **Removal**: every unprotected training-only node is deleted. A data
//!    reference to a removed node is redirected to the removed node's own
//!    first data input (following chains of removed nodes). References with
//!    nothing upstream, and control references, are dropped.
//! 2. **Splicing**: an unprotected identity is spliced out unless it has a
//!    control input or is the target of one. Data references to it are
//!    rewritten to its data input, following chains of spliced identities.
//!    Since control targets are never spliced, no control reference points at
//!    a spliced identity. An identity left with no data input by phase 1 is
//!    deleted along with the references to it.
//!
//! Pruning never fails.

use std::collections::{HashMap, HashSet};

use crate::config::consts::{SPLICEABLE_OPS, TRAINING_ONLY_OPS};
use crate::graph::naming::{is_control_input, node_name};
use crate::graph::{Graph, Node};
use crate::observability::messages::prune::{
    PruneStarted, SpliceCycleDetected, TrainingNodesPruned,
};
use crate::observability::messages::{PhaseSpan, StructuredLog};

/// Where references to a deleted node should point instead.
#[derive(Debug, Clone)]
enum Replacement {
    /// Rewire to this input reference.
    Input(String),
    /// Drop the reference.
    Drop,
}

/// Prune nodes that are only needed for training.
///
/// `protected_nodes` are never removed or spliced, whatever their op; pass
/// the graph outputs here to keep output identities.
///
/// # Example
/// ```
/// use graph_freeze::graph::{Graph, Node};
/// use graph_freeze::prune::remove_training_nodes;
///
/// let graph = Graph::from_nodes(vec![
///     Node::new("x", "Placeholder"),
///     Node::new("check", "CheckNumerics").with_input("x"),
///     Node::new("id", "Identity").with_input("check"),
///     Node::new("out", "Relu").with_input("id"),
/// ]);
///
/// let pruned = remove_training_nodes(&graph, None::<&[&str]>);
/// let names: Vec<&str> = pruned.node_names().collect();
/// assert_eq!(names, vec!["x", "out"]);
/// assert_eq!(pruned.node("out").unwrap().inputs, vec!["x"]);
/// ```
pub fn remove_training_nodes<S: AsRef<str>>(
    graph: &Graph,
    protected_nodes: Option<&[S]>,
) -> Graph {
    let protected: HashSet<&str> = protected_nodes
        .unwrap_or(&[])
        .iter()
        .map(|s| s.as_ref())
        .collect();

    let start_msg = PruneStarted {
        node_count: graph.nodes.len(),
        protected_count: protected.len(),
    };
    let span = start_msg.span("remove_training_nodes");
    let _guard = span.enter();
    start_msg.log();

    let (after_removal, removed) = remove_training_only(&graph.nodes, &protected);
    let (after_splicing, spliced) = splice_identities(after_removal, &protected);

    TrainingNodesPruned {
        removed,
        spliced,
        remaining: after_splicing.len(),
    }
    .log();

    Graph {
        nodes: after_splicing,
        library: graph.library.clone(),
        versions: graph.versions.clone(),
    }
}

/// Phase 1. Returns the surviving nodes and how many were removed.
fn remove_training_only(nodes: &[Node], protected: &HashSet<&str>) -> (Vec<Node>, usize) {
    let replacements: HashMap<&str, Replacement> = nodes
        .iter()
        .filter(|n| {
            TRAINING_ONLY_OPS.contains(&n.op.as_str()) && !protected.contains(n.name.as_str())
        })
        .map(|n| {
            let upstream = n
                .inputs
                .iter()
                .find(|input| !is_control_input(input))
                .map_or(Replacement::Drop, |input| Replacement::Input(input.clone()));
            (n.name.as_str(), upstream)
        })
        .collect();

    let survivors = nodes
        .iter()
        .filter(|n| !replacements.contains_key(n.name.as_str()))
        .map(|n| rewire(n, &replacements))
        .collect();

    (survivors, replacements.len())
}

/// Phase 2. Returns the surviving nodes and how many identities were spliced.
fn splice_identities(nodes: Vec<Node>, protected: &HashSet<&str>) -> (Vec<Node>, usize) {
    let mut control_targets: HashSet<String> = HashSet::new();
    let mut has_control_input: HashSet<&str> = HashSet::new();
    for node in &nodes {
        for input in node.inputs.iter().filter(|i| is_control_input(i)) {
            control_targets.insert(node_name(input).to_string());
            has_control_input.insert(node.name.as_str());
        }
    }

    // Nodes with control inputs or used as control inputs are kept; removing
    // them could break ordering the graph relies on.
    let splices: HashMap<&str, Replacement> = nodes
        .iter()
        .filter(|n| {
            SPLICEABLE_OPS.contains(&n.op.as_str())
                && !protected.contains(n.name.as_str())
                && !has_control_input.contains(n.name.as_str())
                && !control_targets.contains(&n.name)
        })
        .map(|n| {
            let upstream = n
                .input(0)
                .map_or(Replacement::Drop, |input| Replacement::Input(input.to_string()));
            (n.name.as_str(), upstream)
        })
        .collect();

    let survivors: Vec<Node> = nodes
        .iter()
        .filter(|n| !splices.contains_key(n.name.as_str()))
        .map(|n| rewire(n, &splices))
        .collect();

    let spliced = splices.len();
    (survivors, spliced)
}

/// Copy `node` with every data reference to a replaced node resolved through
/// `replacements`. Control references to replaced nodes are dropped. Splicing
/// never replaces a control target, so outside phase 1 every control
/// reference is kept.
fn rewire(node: &Node, replacements: &HashMap<&str, Replacement>) -> Node {
    let mut out = node.clone();
    out.inputs = node
        .inputs
        .iter()
        .filter_map(|input| {
            if is_control_input(input) {
                return (!replacements.contains_key(node_name(input))).then(|| input.clone());
            }
            resolve(input, replacements)
        })
        .collect();
    out
}

/// Follow `input` through the replacement chain. `None` means drop it.
fn resolve(input: &str, replacements: &HashMap<&str, Replacement>) -> Option<String> {
    let mut current = input.to_string();
    let mut seen: HashSet<String> = HashSet::new();
    while let Some(replacement) = replacements.get(node_name(&current)) {
        if !seen.insert(node_name(&current).to_string()) {
            SpliceCycleDetected {
                node: node_name(&current),
            }
            .log();
            return None;
        }
        match replacement {
            Replacement::Input(next) => current = next.clone(),
            Replacement::Drop => return None,
        }
    }
    Some(current)
}
