// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Breadth-first reachability over input edges.
//!
//! Starting from the requested targets, the search follows data, control and
//! colocation edges backwards and collects every node that contributes to the
//! targets. Graphs with loops contain back-edges (`NextIteration` feeding a
//! `Merge`), so every node is visited at most once through an explicit
//! visited set.
//!
//! **Time Complexity**: O(V + E)
//! **Space Complexity**: O(V)

use std::collections::{HashSet, VecDeque};

use crate::errors::{FreezeError, FreezeResult};
use crate::graph::summary::{GraphSummary, NodeIndex};
use crate::observability::messages::extract::DanglingInputSkipped;
use crate::observability::messages::StructuredLog;

/// Fails with [`FreezeError::NodeNotFound`] on the first target that is not in
/// the graph.
pub fn assert_nodes_are_present<S: AsRef<str>>(
    summary: &GraphSummary<'_>,
    targets: &[S],
) -> FreezeResult<()> {
    for target in targets {
        let target = target.as_ref();
        if !summary.contains(target) {
            return Err(FreezeError::NodeNotFound(target.to_string()));
        }
    }
    Ok(())
}

/// Arena indices of every node reachable from `targets`, targets included.
///
/// Inputs naming nodes that do not exist are skipped with a debug log; they
/// cannot be kept because there is nothing to copy.
pub fn reachable_nodes<S: AsRef<str>>(
    summary: &GraphSummary<'_>,
    targets: &[S],
) -> FreezeResult<HashSet<NodeIndex>> {
    assert_nodes_are_present(summary, targets)?;

    let mut visited: HashSet<NodeIndex> = HashSet::with_capacity(summary.len());
    let mut queue: VecDeque<NodeIndex> = targets
        .iter()
        .filter_map(|t| summary.index_of(t.as_ref()))
        .collect();

    while let Some(index) = queue.pop_front() {
        if !visited.insert(index) {
            continue;
        }
        for input in summary.inputs_at(index) {
            match summary.index_of(input) {
                Some(next) if !visited.contains(&next) => queue.push_back(next),
                Some(_) => {}
                None => DanglingInputSkipped {
                    node: &summary.node_at(index).name,
                    input,
                }
                .log(),
            }
        }
    }

    Ok(visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, Node};

    fn names(summary: &GraphSummary<'_>, set: &HashSet<NodeIndex>) -> Vec<String> {
        let mut out: Vec<String> = set.iter().map(|&i| summary.node_at(i).name.clone()).collect();
        out.sort();
        out
    }

    #[test]
    fn test_reaches_through_data_and_control_edges() {
        let graph = Graph::from_nodes(vec![
            Node::new("a", "Placeholder"),
            Node::new("init", "NoOp"),
            Node::new("b", "Neg").with_input("a").with_input("^init"),
            Node::new("unused", "Const"),
            Node::new("c", "Identity").with_input("b:0"),
        ]);
        let summary = GraphSummary::extract(&graph);

        let reachable = reachable_nodes(&summary, &["c"]).unwrap();
        assert_eq!(names(&summary, &reachable), vec!["a", "b", "c", "init"]);
    }

    #[test]
    fn test_cycle_is_visited_once() {
        let graph = Graph::from_nodes(vec![
            Node::new("enter", "Enter").with_input("x"),
            Node::new("x", "Placeholder"),
            Node::new("merge", "Merge").with_input("enter").with_input("next"),
            Node::new("body", "Add").with_input("merge"),
            Node::new("next", "NextIteration").with_input("body"),
            Node::new("exit", "Exit").with_input("merge"),
        ]);
        let summary = GraphSummary::extract(&graph);

        let reachable = reachable_nodes(&summary, &["exit"]).unwrap();
        assert_eq!(reachable.len(), 6);
    }

    #[test]
    fn test_missing_target_is_rejected() {
        let graph = Graph::from_nodes(vec![Node::new("a", "Placeholder")]);
        let summary = GraphSummary::extract(&graph);

        let err = reachable_nodes(&summary, &["a", "nope"]).unwrap_err();
        assert!(matches!(err, FreezeError::NodeNotFound(ref n) if n == "nope"));
    }

    #[test]
    fn test_dangling_input_is_skipped() {
        let graph = Graph::from_nodes(vec![Node::new("a", "Identity").with_input("ghost")]);
        let summary = GraphSummary::extract(&graph);

        let reachable = reachable_nodes(&summary, &["a"]).unwrap();
        assert_eq!(names(&summary, &reachable), vec!["a"]);
    }
}
