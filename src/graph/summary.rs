// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Name-indexed view of a graph.
//!
//! [`GraphSummary`] is built once per transformation call. Nodes are addressed
//! by their position in `Graph::nodes` (the arena index), which is also their
//! sequence number, so no node is ever referenced through a live pointer and
//! cyclic graphs need no special ownership handling.
//!
//! # Edges
//!
//! The input edges of a node are:
//! - its data inputs (`name[:port]`)
//! - its control inputs (`^name`)
//! - every `loc:@name` entry of its `_class` attribute, so colocated nodes are
//!   kept together with the nodes that reference them.

use std::collections::HashMap;

use crate::config::consts::COLOCATION_ATTR;
use crate::graph::naming::{colocated_node_name, node_name};
use crate::graph::{AttrValue, Graph, Node};

/// Arena index of a node inside `Graph::nodes`.
pub type NodeIndex = usize;

#[derive(Debug)]
pub struct GraphSummary<'g> {
    graph: &'g Graph,
    index_by_name: HashMap<String, NodeIndex>,
    input_names: Vec<Vec<String>>,
}

impl<'g> GraphSummary<'g> {
    /// Build the name index and canonical input lists for `graph`.
    ///
    /// When two nodes share a name the later one wins; callers that need the
    /// uniqueness invariant run [`validate_graph`](crate::graph::validate_graph)
    /// first.
    pub fn extract(graph: &'g Graph) -> Self {
        let mut index_by_name = HashMap::with_capacity(graph.nodes.len());
        let mut input_names = Vec::with_capacity(graph.nodes.len());

        for (seq, node) in graph.nodes.iter().enumerate() {
            index_by_name.insert(node_name(&node.name).to_string(), seq);
            input_names.push(canonical_inputs(node));
        }

        Self {
            graph,
            index_by_name,
            input_names,
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_by_name.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.index_by_name.get(name).copied()
    }

    /// Node by canonical name.
    pub fn node(&self, name: &str) -> Option<&'g Node> {
        self.index_of(name).map(|idx| &self.graph.nodes[idx])
    }

    pub fn node_at(&self, index: NodeIndex) -> &'g Node {
        &self.graph.nodes[index]
    }

    /// Original list position of the named node.
    pub fn seq_num(&self, name: &str) -> Option<usize> {
        self.index_of(name)
    }

    /// Canonical input names of the named node (data, control, colocation).
    pub fn input_names(&self, name: &str) -> Option<&[String]> {
        self.index_of(name).map(|idx| self.input_names[idx].as_slice())
    }

    /// Reverse adjacency by arena index.
    pub fn inputs_at(&self, index: NodeIndex) -> &[String] {
        &self.input_names[index]
    }

    /// Forward adjacency: for every node, the names of the nodes that list it
    /// as an input of any kind. Built on demand since most callers only walk
    /// edges backwards.
    pub fn consumers(&self) -> HashMap<&str, Vec<&'g str>> {
        let mut consumers: HashMap<&str, Vec<&'g str>> = HashMap::new();
        for (idx, inputs) in self.input_names.iter().enumerate() {
            let consumer = self.graph.nodes[idx].name.as_str();
            for input in inputs {
                consumers.entry(input.as_str()).or_default().push(consumer);
            }
        }
        consumers
    }
}

fn canonical_inputs(node: &Node) -> Vec<String> {
    let mut inputs: Vec<String> = node
        .inputs
        .iter()
        .map(|input| node_name(input).to_string())
        .collect();

    // Colocation targets count as inputs so they are never dropped.
    if let Some(AttrValue::List(entries)) = node.attr(COLOCATION_ATTR) {
        inputs.extend(
            entries
                .iter()
                .map(|entry| colocated_node_name(entry).to_string()),
        );
    }

    inputs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> Graph {
        Graph::from_nodes(vec![
            Node::new("a", "Placeholder"),
            Node::new("b", "VariableV2"),
            Node::new("c", "Add")
                .with_input("a:0")
                .with_input("b")
                .with_input("^init"),
            Node::new("init", "NoOp"),
            Node::new("d", "Identity")
                .with_input("c")
                .with_attr(COLOCATION_ATTR, AttrValue::List(vec!["loc:@b".to_string()])),
        ])
    }

    #[test]
    fn test_inputs_are_canonicalized() {
        let graph = sample_graph();
        let summary = GraphSummary::extract(&graph);

        assert_eq!(
            summary.input_names("c").unwrap(),
            &["a".to_string(), "b".to_string(), "init".to_string()]
        );
    }

    #[test]
    fn test_colocation_entries_become_inputs() {
        let graph = sample_graph();
        let summary = GraphSummary::extract(&graph);

        assert_eq!(
            summary.input_names("d").unwrap(),
            &["c".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_sequence_numbers_follow_list_order() {
        let graph = sample_graph();
        let summary = GraphSummary::extract(&graph);

        assert_eq!(summary.seq_num("a"), Some(0));
        assert_eq!(summary.seq_num("init"), Some(3));
        assert_eq!(summary.node("d").map(|n| n.op.as_str()), Some("Identity"));
        assert!(summary.node("missing").is_none());
    }

    #[test]
    fn test_node_without_inputs_has_empty_list() {
        let graph = sample_graph();
        let summary = GraphSummary::extract(&graph);
        assert!(summary.input_names("a").unwrap().is_empty());
    }

    #[test]
    fn test_consumers_is_forward_adjacency() {
        let graph = sample_graph();
        let summary = GraphSummary::extract(&graph);
        let consumers = summary.consumers();

        assert_eq!(consumers.get("c"), Some(&vec!["d"]));
        let mut of_b = consumers.get("b").cloned().unwrap();
        of_b.sort();
        assert_eq!(of_b, vec!["c", "d"]);
        assert!(consumers.get("d").is_none());
    }
}
