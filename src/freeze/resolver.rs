// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Variable resolution.
//!
//! Finds the variables to freeze and works out how resource handles flow from
//! their `VarHandleOp` to the ops that read them.
//!
//! # Resource chains
//!
//! A resource read (`ReadVariableOp`, `ResourceGather`, `ResourceGatherNd`)
//! often sees its handle through identities and control-flow routing ops
//! (`Switch`, `Enter`, `Exit`, `Merge`, `NextIteration`). Once the variable
//! becomes a constant, those pass-through nodes carry values instead of
//! handles, so their `T` attribute has to change from `DT_RESOURCE` to the
//! element type of the read.
//!
//! For each reader the chain is walked backwards from its first input while
//! the current node is a pass-through typed `DT_RESOURCE`. A `Merge` also
//! contributes its second input as an alternate branch. Every branch must end
//! at a `VarHandleOp`, and all the variables reached from one reader must
//! agree on whether they are converted.

use std::collections::{HashMap, HashSet};

use crate::config::consts::{
    DTYPE_ATTR, ELEMENT_TYPE_ATTR, FREEZABLE_VARIABLE_OPS, MERGE_OP, RESOURCE_READ_OPS,
    RESOURCE_READ_SUFFIX, VAR_HANDLE_OP,
};
use crate::errors::{FreezeError, FreezeResult};
use crate::freeze::VariableFilter;
use crate::graph::naming::{node_name, tensor_name};
use crate::graph::{is_pass_through_op, DataType, GraphSummary, Node};
use crate::observability::messages::freeze::ResourceChainResolved;
use crate::observability::messages::StructuredLog;

/// A variable selected for freezing and the tensor its value is read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariable {
    pub node_name: String,
    pub tensor_name: String,
}

#[derive(Debug, Default)]
pub struct VariableResolution {
    /// Eligible variables in graph order.
    pub variables: Vec<ResolvedVariable>,
    /// Pass-through nodes whose `T` becomes the given concrete type.
    pub pending_retype: HashMap<String, DataType>,
}

impl VariableResolution {
    pub fn fetch_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.tensor_name.clone()).collect()
    }
}

/// True when `node` is a pass-through op currently forwarding a resource handle.
pub fn is_resource_pass_through(node: &Node) -> bool {
    is_pass_through_op(&node.op) && node.attr_type(ELEMENT_TYPE_ATTR) == Some(DataType::Resource)
}

/// Follow first inputs from `start` through resource-typed pass-through nodes
/// and return the first node that is not one.
///
/// Returns `None` when the chain breaks (missing input or node) or loops.
pub fn resource_source<'g, F>(start: &Node, lookup: F) -> Option<&'g Node>
where
    F: Fn(&str) -> Option<&'g Node>,
{
    let mut current = lookup(node_name(start.input(0)?))?;
    let mut seen = HashSet::new();
    while is_resource_pass_through(current) {
        if !seen.insert(current.name.as_str()) {
            return None;
        }
        current = lookup(node_name(current.input(0)?))?;
    }
    Some(current)
}

/// Classify variables and trace every resource read in `summary`.
pub fn resolve_variables(
    summary: &GraphSummary<'_>,
    filter: &VariableFilter,
) -> FreezeResult<VariableResolution> {
    let mut resolver = Resolver {
        summary,
        filter,
        resolution: VariableResolution::default(),
        decisions: HashMap::new(),
    };

    for node in &summary.graph().nodes {
        if FREEZABLE_VARIABLE_OPS.contains(&node.op.as_str()) {
            resolver.add_variable(node);
        } else if RESOURCE_READ_OPS.contains(&node.op.as_str()) {
            resolver.trace_consumer(node)?;
        }
    }

    Ok(resolver.resolution)
}

struct Resolver<'s, 'g> {
    summary: &'s GraphSummary<'g>,
    filter: &'s VariableFilter,
    resolution: VariableResolution,
    /// Eligibility each pass-through node was first resolved with.
    decisions: HashMap<String, bool>,
}

/// What one consumer's chains reached.
struct Trace<'g> {
    pass_through: Vec<&'g Node>,
    terminals: Vec<&'g Node>,
}

impl<'s, 'g> Resolver<'s, 'g> {
    fn add_variable(&mut self, node: &Node) {
        if !self.filter.should_convert(&node.name) {
            return;
        }
        let tensor = if node.op == VAR_HANDLE_OP {
            format!("{}{}", node.name, RESOURCE_READ_SUFFIX)
        } else {
            tensor_name(&node.name)
        };
        self.resolution.variables.push(ResolvedVariable {
            node_name: node.name.clone(),
            tensor_name: tensor,
        });
    }

    fn trace_consumer(&mut self, consumer: &Node) -> FreezeResult<()> {
        let dtype = consumer
            .attr_type(DTYPE_ATTR)
            .ok_or_else(|| FreezeError::MissingAttribute {
                node: consumer.name.clone(),
                attr: DTYPE_ATTR.to_string(),
            })?;
        let handle = consumer.input(0).ok_or_else(|| FreezeError::MissingInput {
            node: consumer.name.clone(),
            index: 0,
        })?;

        let trace = self.walk(node_name(handle))?;

        let mut eligible: Option<bool> = None;
        for terminal in &trace.terminals {
            if terminal.op != VAR_HANDLE_OP {
                return Err(FreezeError::UnresolvedResourceVariable {
                    consumer: consumer.name.clone(),
                    terminal: terminal.name.clone(),
                });
            }
            let convert = self.filter.should_convert(&terminal.name);
            match eligible {
                None => eligible = Some(convert),
                Some(previous) if previous != convert => {
                    return Err(self.mixed(consumer, &trace));
                }
                Some(_) => {}
            }
        }
        let eligible = eligible.unwrap_or(true);

        // The same pass-through node reached from another consumer must have
        // been resolved the same way.
        for node in &trace.pass_through {
            match self.decisions.get(node.name.as_str()) {
                Some(&previous) if previous != eligible => {
                    return Err(self.mixed(consumer, &trace));
                }
                Some(_) => {}
                None => {
                    self.decisions.insert(node.name.clone(), eligible);
                }
            }
        }

        let variables: Vec<String> = trace.terminals.iter().map(|t| t.name.clone()).collect();
        ResourceChainResolved {
            consumer: &consumer.name,
            variables: &variables,
            pass_through_count: trace.pass_through.len(),
            eligible,
        }
        .log();

        if eligible {
            for node in trace.pass_through {
                self.resolution.pending_retype.insert(node.name.clone(), dtype);
            }
        }
        Ok(())
    }

    /// Collect the pass-through nodes and chain ends reachable from `start`.
    fn walk(&self, start: &str) -> FreezeResult<Trace<'g>> {
        let mut trace = Trace {
            pass_through: Vec::new(),
            terminals: Vec::new(),
        };
        let mut stack = vec![start.to_string()];
        let mut visited: HashSet<String> = HashSet::new();

        while let Some(name) = stack.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            let node = self
                .summary
                .node(&name)
                .ok_or_else(|| FreezeError::NodeNotFound(name.clone()))?;

            if !is_resource_pass_through(node) {
                trace.terminals.push(node);
                continue;
            }

            let Some(source) = node.input(0) else {
                // A pass-through with nothing feeding it ends the chain unresolved.
                trace.terminals.push(node);
                continue;
            };
            trace.pass_through.push(node);

            if node.op == MERGE_OP {
                if let Some(alternate) = node.input(1) {
                    stack.push(node_name(alternate).to_string());
                }
            }
            stack.push(node_name(source).to_string());
        }

        Ok(trace)
    }

    fn mixed(&self, consumer: &Node, trace: &Trace<'_>) -> FreezeError {
        FreezeError::MixedEligibility {
            consumer: consumer.name.clone(),
            variables: trace.terminals.iter().map(|t| t.name.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AttrValue, Graph};

    fn resource(name: &str, op: &str) -> Node {
        Node::new(name, op).with_attr(ELEMENT_TYPE_ATTR, AttrValue::Type(DataType::Resource))
    }

    fn handle(name: &str) -> Node {
        Node::new(name, VAR_HANDLE_OP).with_attr(DTYPE_ATTR, AttrValue::Type(DataType::Float))
    }

    fn read(name: &str, input: &str) -> Node {
        Node::new(name, "ReadVariableOp")
            .with_input(input)
            .with_attr(DTYPE_ATTR, AttrValue::Type(DataType::Float))
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_variables_get_fetch_names_by_kind() {
        let graph = Graph::from_nodes(vec![
            Node::new("legacy", "VariableV2"),
            Node::new("old", "Variable"),
            handle("res"),
        ]);
        let summary = GraphSummary::extract(&graph);

        let resolution = resolve_variables(&summary, &VariableFilter::all()).unwrap();

        assert_eq!(
            resolution.fetch_names(),
            vec!["legacy:0", "old:0", "res/Read/ReadVariableOp:0"]
        );
    }

    #[test]
    fn test_filter_excludes_variables() {
        let graph =
            Graph::from_nodes(vec![Node::new("a", "VariableV2"), Node::new("b", "VariableV2")]);
        let summary = GraphSummary::extract(&graph);
        let filter = VariableFilter::new(None::<Vec<String>>, Some(names(&["a"])));

        let resolution = resolve_variables(&summary, &filter).unwrap();

        assert_eq!(resolution.fetch_names(), vec!["b:0"]);
    }

    #[test]
    fn test_identity_chain_is_queued_for_retype() {
        let graph = Graph::from_nodes(vec![
            handle("v"),
            resource("id1", "Identity").with_input("v"),
            resource("id2", "Identity").with_input("id1"),
            read("r", "id2"),
        ]);
        let summary = GraphSummary::extract(&graph);

        let resolution = resolve_variables(&summary, &VariableFilter::all()).unwrap();

        assert_eq!(resolution.pending_retype.len(), 2);
        assert_eq!(resolution.pending_retype.get("id1"), Some(&DataType::Float));
        assert_eq!(resolution.pending_retype.get("id2"), Some(&DataType::Float));
    }

    #[test]
    fn test_merge_follows_both_branches() {
        let graph = Graph::from_nodes(vec![
            handle("v"),
            resource("sw", "Switch").with_input("v").with_input("pred"),
            Node::new("pred", "Placeholder"),
            resource("left", "Identity").with_input("sw:0"),
            resource("right", "Identity").with_input("sw:1"),
            resource("m", "Merge").with_input("left").with_input("right"),
            read("r", "m"),
        ]);
        let summary = GraphSummary::extract(&graph);

        let resolution = resolve_variables(&summary, &VariableFilter::all()).unwrap();

        let mut retyped: Vec<&String> = resolution.pending_retype.keys().collect();
        retyped.sort();
        assert_eq!(retyped, vec!["left", "m", "right", "sw"]);
    }

    #[test]
    fn test_chain_must_end_at_var_handle() {
        let graph = Graph::from_nodes(vec![
            Node::new("p", "Placeholder"),
            resource("id", "Identity").with_input("p"),
            read("r", "id"),
        ]);
        let summary = GraphSummary::extract(&graph);

        let err = resolve_variables(&summary, &VariableFilter::all()).unwrap_err();
        assert!(matches!(
            err,
            FreezeError::UnresolvedResourceVariable { ref consumer, ref terminal }
                if consumer == "r" && terminal == "p"
        ));
    }

    #[test]
    fn test_mixed_eligibility_through_merge_is_fatal() {
        let graph = Graph::from_nodes(vec![
            handle("keep"),
            handle("skip"),
            resource("m", "Merge").with_input("keep").with_input("skip"),
            read("r", "m"),
        ]);
        let summary = GraphSummary::extract(&graph);
        let filter = VariableFilter::new(None::<Vec<String>>, Some(names(&["skip"])));

        let err = resolve_variables(&summary, &filter).unwrap_err();
        match err {
            FreezeError::MixedEligibility { consumer, mut variables } => {
                variables.sort();
                assert_eq!(consumer, "r");
                assert_eq!(variables, vec!["keep", "skip"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ineligible_chain_is_not_retyped() {
        let graph = Graph::from_nodes(vec![
            handle("v"),
            resource("id", "Identity").with_input("v"),
            read("r", "id"),
        ]);
        let summary = GraphSummary::extract(&graph);
        let filter = VariableFilter::new(Some(Vec::<String>::new()), None::<Vec<String>>);

        let resolution = resolve_variables(&summary, &filter).unwrap();

        assert!(resolution.pending_retype.is_empty());
        assert!(resolution.variables.is_empty());
    }

    #[test]
    fn test_resource_source_stops_at_first_concrete_node() {
        let graph = Graph::from_nodes(vec![
            handle("v"),
            resource("id1", "Identity").with_input("v"),
            resource("id2", "Identity").with_input("id1"),
            Node::new("tail", "Identity").with_input("id2"),
        ]);
        let summary = GraphSummary::extract(&graph);
        let tail = summary.node("tail").unwrap();

        let source = resource_source(tail, |n| summary.node(n)).unwrap();
        assert_eq!(source.name, "v");
    }

    #[test]
    fn test_resource_source_gives_up_on_loops() {
        let graph = Graph::from_nodes(vec![
            resource("a", "Identity").with_input("b"),
            resource("b", "Identity").with_input("a"),
            Node::new("tail", "Identity").with_input("a"),
        ]);
        let summary = GraphSummary::extract(&graph);
        let tail = summary.node("tail").unwrap();

        assert!(resource_source(tail, |n| summary.node(n)).is_none());
    }
}
