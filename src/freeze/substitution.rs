// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Constant substitution.
//!
//! Rebuilds the node list of an inference graph with resolved variables
//! replaced by `Const` nodes. Each node is handled by the first rule that
//! matches:
//!
//! 1. a fetched variable becomes a `Const` holding the fetched value
//! 2. a queued pass-through node keeps its op and gets a concrete `T`
//! 3. a `ReadVariableOp` of a converted variable becomes an `Identity`
//! 4. a `ResourceGather` of a converted variable becomes a `GatherV2` with a
//!    synthesized zero axis constant
//! 5. a `ResourceGatherNd` of a converted variable becomes a `GatherNd`
//! 6. anything else is copied unchanged
//!
//! A corrective pass then retypes identities that still forward a bare
//! resource handle to nobody.

use std::collections::{HashMap, HashSet};

use crate::config::consts::{
    BATCH_DIMS_ATTR, COLOCATION_ATTR, CONST_OP, DEBUGGING_ATTR, DTYPE_ATTR, ELEMENT_TYPE_ATTR,
    GATHER_AXIS_SUFFIX, GATHER_ND_OP, GATHER_V2_OP, IDENTITY_OP, OUTPUT_SHAPES_ATTR,
    READ_VARIABLE_OP, RESOURCE_GATHER_ND_OP, RESOURCE_GATHER_OP, RETYPED_DEBUG_MESSAGE,
    TAXIS_ATTR, TINDICES_ATTR, TPARAMS_ATTR, VALUE_ATTR, VAR_HANDLE_OP,
};
use crate::errors::{FreezeError, FreezeResult};
use crate::freeze::resolver::resource_source;
use crate::freeze::VariableFilter;
use crate::graph::naming::{is_control_input, node_name};
use crate::graph::{is_pass_through_op, AttrValue, DataType, GraphSummary, Node, TensorValue};
use crate::observability::messages::freeze::ResourceIdentityRetyped;
use crate::observability::messages::StructuredLog;

/// Build a `Const` node named `name` holding `value`.
pub fn create_const_node(name: &str, dtype: DataType, value: TensorValue) -> Node {
    Node::new(name, CONST_OP)
        .with_attr(DTYPE_ATTR, AttrValue::Type(dtype))
        .with_attr(VALUE_ATTR, AttrValue::Tensor(value))
}

pub struct Substitution<'s, 'g> {
    pub summary: &'s GraphSummary<'g>,
    pub values: &'s HashMap<String, TensorValue>,
    pub pending_retype: &'s HashMap<String, DataType>,
    pub filter: &'s VariableFilter,
}

impl Substitution<'_, '_> {
    /// Rewrite every node of the summarized graph. Returns the new node list
    /// and the number of variables turned into constants.
    pub fn apply(&self) -> FreezeResult<(Vec<Node>, usize)> {
        let mut output = Vec::with_capacity(self.summary.len());
        let mut converted = 0;

        for node in &self.summary.graph().nodes {
            if let Some(value) = self.values.get(&node.name) {
                let dtype = node.attr_type(DTYPE_ATTR).unwrap_or(value.dtype);
                output.push(create_const_node(&node.name, dtype, value.clone()));
                converted += 1;
            } else if let Some(&dtype) = self.pending_retype.get(&node.name) {
                output.push(retype_pass_through(node, dtype));
            } else if node.op == READ_VARIABLE_OP && self.should_convert_ancestor(node) {
                output.push(read_to_identity(node)?);
            } else if node.op == RESOURCE_GATHER_OP && self.should_convert_ancestor(node) {
                let (axis, gather) = resource_gather_to_gather(node)?;
                output.push(axis);
                output.push(gather);
            } else if node.op == RESOURCE_GATHER_ND_OP && self.should_convert_ancestor(node) {
                output.push(resource_gather_nd_to_gather_nd(node)?);
            } else {
                output.push(node.clone());
            }
        }

        Ok((output, converted))
    }

    fn should_convert_ancestor(&self, node: &Node) -> bool {
        resource_source(node, |name| self.summary.node(name))
            .map_or(false, |source| self.filter.should_convert(&source.name))
    }
}

fn required_type(node: &Node, attr: &str) -> FreezeResult<DataType> {
    node.attr_type(attr).ok_or_else(|| FreezeError::MissingAttribute {
        node: node.name.clone(),
        attr: attr.to_string(),
    })
}

fn required_input(node: &Node, index: usize) -> FreezeResult<String> {
    node.input(index)
        .map(str::to_string)
        .ok_or_else(|| FreezeError::MissingInput {
            node: node.name.clone(),
            index,
        })
}

fn copy_colocation(from: &Node, to: &mut Node) {
    if let Some(class) = from.attr(COLOCATION_ATTR) {
        to.attrs.insert(COLOCATION_ATTR.to_string(), class.clone());
    }
}

/// Same op and inputs, `T` forced to `dtype`, inferred shapes dropped.
fn retype_pass_through(node: &Node, dtype: DataType) -> Node {
    let mut out = Node {
        name: node.name.clone(),
        op: node.op.clone(),
        inputs: node.inputs.clone(),
        device: node.device.clone(),
        attrs: node
            .attrs
            .iter()
            .filter(|(key, _)| key.as_str() != OUTPUT_SHAPES_ATTR)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    };
    out.attrs.insert(ELEMENT_TYPE_ATTR.to_string(), AttrValue::Type(dtype));
    out.attrs.insert(
        DEBUGGING_ATTR.to_string(),
        AttrValue::S(RETYPED_DEBUG_MESSAGE.to_string()),
    );
    out
}

fn read_to_identity(node: &Node) -> FreezeResult<Node> {
    let mut out = Node::new(&node.name, IDENTITY_OP)
        .with_input(required_input(node, 0)?)
        .with_attr(ELEMENT_TYPE_ATTR, AttrValue::Type(required_type(node, DTYPE_ATTR)?));
    copy_colocation(node, &mut out);
    Ok(out)
}

/// Returns the synthesized axis constant and the rewritten gather, in that order.
fn resource_gather_to_gather(node: &Node) -> FreezeResult<(Node, Node)> {
    let batch_dims = node
        .attr(BATCH_DIMS_ATTR)
        .and_then(AttrValue::as_int)
        .unwrap_or(0);
    if batch_dims != 0 {
        return Err(FreezeError::UnsupportedBatchDims {
            node: node.name.clone(),
            batch_dims,
        });
    }

    let indices_type = required_type(node, TINDICES_ATTR)?;
    let axis_name = format!("{}{}", node.name, GATHER_AXIS_SUFFIX);
    let axis = create_const_node(
        &axis_name,
        indices_type,
        TensorValue::scalar_index(indices_type, batch_dims),
    );

    let mut gather = Node::new(&node.name, GATHER_V2_OP)
        .with_input(required_input(node, 0)?)
        .with_input(required_input(node, 1)?)
        .with_input(axis_name)
        .with_attr(TPARAMS_ATTR, AttrValue::Type(required_type(node, DTYPE_ATTR)?))
        .with_attr(TINDICES_ATTR, AttrValue::Type(indices_type))
        .with_attr(TAXIS_ATTR, AttrValue::Type(indices_type));
    copy_colocation(node, &mut gather);

    Ok((axis, gather))
}

fn resource_gather_nd_to_gather_nd(node: &Node) -> FreezeResult<Node> {
    let mut gather = Node::new(&node.name, GATHER_ND_OP)
        .with_input(required_input(node, 0)?)
        .with_input(required_input(node, 1)?)
        .with_attr(TPARAMS_ATTR, AttrValue::Type(required_type(node, DTYPE_ATTR)?))
        .with_attr(TINDICES_ATTR, AttrValue::Type(required_type(node, TINDICES_ATTR)?));
    copy_colocation(node, &mut gather);
    Ok(gather)
}

/// Give a concrete `T` to identities that still forward a resource handle and
/// that no other node reads through a data edge.
///
/// `nodes` is the rewritten node list. Chains are traced through `source`, the
/// graph as it was before substitution, since converted variables are `Const`
/// nodes by now and no longer look like variables.
pub fn retype_dangling_resource_identities(
    nodes: &mut [Node],
    source: &GraphSummary<'_>,
    filter: &VariableFilter,
) {
    let updates = {
        let consumed: HashSet<&str> = nodes
            .iter()
            .flat_map(|n| n.inputs.iter())
            .filter(|input| !is_control_input(input))
            .map(|input| node_name(input))
            .collect();

        let mut updates: Vec<(usize, DataType)> = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            if node.op != IDENTITY_OP
                || node.attr_type(ELEMENT_TYPE_ATTR) != Some(DataType::Resource)
                || consumed.contains(node.name.as_str())
            {
                continue;
            }
            let Some(origin) = resource_source(node, |name| source.node(name)) else {
                continue;
            };
            if let Some(dtype) = concrete_type_of_source(origin, filter) {
                ResourceIdentityRetyped {
                    node: &node.name,
                    source: &origin.name,
                    dtype,
                }
                .log();
                updates.push((index, dtype));
            }
        }
        updates
    };

    for (index, dtype) in updates {
        let node = &mut nodes[index];
        node.attrs
            .insert(ELEMENT_TYPE_ATTR.to_string(), AttrValue::Type(dtype));
        node.attrs.insert(
            DEBUGGING_ATTR.to_string(),
            AttrValue::S(RETYPED_DEBUG_MESSAGE.to_string()),
        );
    }
}

/// The type a dangling identity should take from the end of its chain, if the
/// chain ends somewhere concrete and eligible.
fn concrete_type_of_source(source: &Node, filter: &VariableFilter) -> Option<DataType> {
    let source_type = source.attr_type(ELEMENT_TYPE_ATTR);
    if source_type == Some(DataType::Resource) {
        return None;
    }

    if is_pass_through_op(&source.op) {
        let feeder = node_name(source.input(0)?);
        if filter.should_convert(feeder) {
            return source_type;
        }
    } else if source.op == VAR_HANDLE_OP && filter.should_convert(&source.name) {
        return source.attr_type(DTYPE_ATTR);
    }
    None
}
