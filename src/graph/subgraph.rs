// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{FreezeError, FreezeResult};
use crate::graph::reachability::reachable_nodes;
use crate::graph::summary::{GraphSummary, NodeIndex};
use crate::graph::{validate_graph, Graph};
use crate::observability::messages::extract::SubgraphExtracted;
use crate::observability::messages::StructuredLog;

/// Extract the subgraph that can reach any of the nodes in `dest_nodes`.
///
/// Kept nodes are emitted in their original order and deep-copied; library and
/// version metadata are copied verbatim.
///
/// # Errors
///
/// * [`FreezeError::InvalidGraph`] if node names are empty or not unique
/// * [`FreezeError::NodeNotFound`] if a destination node is absent
///
/// # Example
/// ```
/// use graph_freeze::graph::{extract_sub_graph, Graph, Node};
///
/// let graph = Graph::from_nodes(vec![
///     Node::new("a", "Placeholder"),
///     Node::new("unused", "Const"),
///     Node::new("b", "Neg").with_input("a"),
/// ]);
///
/// let sub = extract_sub_graph(&graph, &["b"]).unwrap();
/// let names: Vec<&str> = sub.node_names().collect();
/// assert_eq!(names, vec!["a", "b"]);
/// ```
pub fn extract_sub_graph<S: AsRef<str>>(graph: &Graph, dest_nodes: &[S]) -> FreezeResult<Graph> {
    validate_graph(graph).map_err(FreezeError::InvalidGraph)?;

    let summary = GraphSummary::extract(graph);
    let reachable = reachable_nodes(&summary, dest_nodes)?;

    let out = materialize(&summary, reachable);

    SubgraphExtracted {
        kept: out.nodes.len(),
        total: graph.nodes.len(),
    }
    .log();

    Ok(out)
}

/// Copy the `keep` nodes out of the summarized graph in sequence order.
fn materialize(summary: &GraphSummary<'_>, keep: impl IntoIterator<Item = NodeIndex>) -> Graph {
    let mut ordered: Vec<NodeIndex> = keep.into_iter().collect();
    // Arena index is the sequence number.
    ordered.sort_unstable();

    let source = summary.graph();
    Graph {
        nodes: ordered.into_iter().map(|i| summary.node_at(i).clone()).collect(),
        library: source.library.clone(),
        versions: source.versions.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::consts::COLOCATION_ATTR;
    use crate::graph::{AttrValue, FunctionDef, Node, VersionDef};

    fn layered_graph() -> Graph {
        let mut graph = Graph::from_nodes(vec![
            Node::new("c", "Const"),
            Node::new("save/restore", "RestoreV2"),
            Node::new("w", "VariableV2"),
            Node::new("w/Assign", "Assign").with_input("w").with_input("save/restore"),
            Node::new("w/read", "Identity").with_input("w"),
            Node::new("x", "Placeholder"),
            Node::new("mul", "MatMul").with_input("x").with_input("w/read"),
            Node::new("bias", "Const")
                .with_attr(COLOCATION_ATTR, AttrValue::List(vec!["loc:@c".to_string()])),
            Node::new("out", "Add").with_input("mul").with_input("bias"),
        ]);
        graph.library.functions.push(FunctionDef {
            name: "f".to_string(),
            nodes: vec![],
        });
        graph.versions = VersionDef {
            producer: 12,
            min_consumer: 1,
            bad_consumers: vec![3],
        };
        graph
    }

    #[test]
    fn test_keeps_exactly_the_reachable_set_in_order() {
        let graph = layered_graph();
        let sub = extract_sub_graph(&graph, &["out"]).unwrap();

        let names: Vec<&str> = sub.node_names().collect();
        assert_eq!(names, vec!["c", "w", "w/read", "x", "mul", "bias", "out"]);
    }

    #[test]
    fn test_metadata_is_copied() {
        let graph = layered_graph();
        let sub = extract_sub_graph(&graph, &["out"]).unwrap();

        assert_eq!(sub.library, graph.library);
        assert_eq!(sub.versions, graph.versions);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let graph = layered_graph();
        let once = extract_sub_graph(&graph, &["out"]).unwrap();
        let twice = extract_sub_graph(&once, &["out"]).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_multiple_targets_union() {
        let graph = layered_graph();
        let sub = extract_sub_graph(&graph, &["w/Assign", "x"]).unwrap();

        let names: Vec<&str> = sub.node_names().collect();
        assert_eq!(names, vec!["save/restore", "w", "w/Assign", "x"]);
    }

    #[test]
    fn test_absent_target_fails_without_result() {
        let graph = layered_graph();
        let err = extract_sub_graph(&graph, &["missing"]).unwrap_err();
        assert_eq!(err.to_string(), "missing is not in graph");
    }

    #[test]
    fn test_duplicate_names_are_rejected_at_entry() {
        let graph = Graph::from_nodes(vec![Node::new("a", "Const"), Node::new("a", "Const")]);
        let err = extract_sub_graph(&graph, &["a"]).unwrap_err();
        assert!(matches!(err, FreezeError::InvalidGraph(_)));
    }
}
