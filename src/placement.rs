// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Device placement heuristics.

use crate::config::consts::{
    CAST_OP, CAST_SOURCE_TYPE_ATTR, CONST_OP, DTYPE_ATTR, ELEMENT_TYPE_ATTR, STITCH_OPS,
};
use crate::graph::{is_variable_op, DataType, Node};

/// True when `node` has to be placed on the host CPU.
///
/// Variable-related ops are pinned only when `pin_variables_on_cpu` is set.
/// String and int32 constants, int32 stitches, and casts from int32 are
/// always pinned since their consumers expect host memory.
///
/// # Example
/// ```
/// use graph_freeze::graph::{AttrValue, DataType, Node};
/// use graph_freeze::placement::must_run_on_cpu;
///
/// let shape = Node::new("shape", "Const").with_attr("dtype", AttrValue::Type(DataType::Int32));
/// assert!(must_run_on_cpu(&shape, false));
///
/// let var = Node::new("w", "VariableV2");
/// assert!(!must_run_on_cpu(&var, false));
/// assert!(must_run_on_cpu(&var, true));
/// ```
pub fn must_run_on_cpu(node: &Node, pin_variables_on_cpu: bool) -> bool {
    if pin_variables_on_cpu && is_variable_op(&node.op) {
        return true;
    }

    let op = node.op.as_str();
    if op == CONST_OP {
        return matches!(
            node.attr_type(DTYPE_ATTR),
            Some(DataType::String) | Some(DataType::Int32)
        );
    }
    if STITCH_OPS.contains(&op) {
        return node.attr_type(ELEMENT_TYPE_ATTR) == Some(DataType::Int32);
    }
    if op == CAST_OP {
        return node.attr_type(CAST_SOURCE_TYPE_ATTR) == Some(DataType::Int32);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AttrValue;

    fn typed(op: &str, attr: &str, dtype: DataType) -> Node {
        Node::new("n", op).with_attr(attr, AttrValue::Type(dtype))
    }

    #[test]
    fn test_constants_by_type() {
        assert!(must_run_on_cpu(&typed("Const", "dtype", DataType::String), false));
        assert!(must_run_on_cpu(&typed("Const", "dtype", DataType::Int32), false));
        assert!(!must_run_on_cpu(&typed("Const", "dtype", DataType::Float), false));
        assert!(!must_run_on_cpu(&Node::new("n", "Const"), false));
    }

    #[test]
    fn test_stitch_and_cast() {
        assert!(must_run_on_cpu(&typed("DynamicStitch", "T", DataType::Int32), false));
        assert!(must_run_on_cpu(&typed("ParallelDynamicStitch", "T", DataType::Int32), false));
        assert!(!must_run_on_cpu(&typed("DynamicStitch", "T", DataType::Float), false));
        assert!(must_run_on_cpu(&typed("Cast", "SrcT", DataType::Int32), false));
        assert!(!must_run_on_cpu(&typed("Cast", "SrcT", DataType::Int64), false));
    }

    #[test]
    fn test_variable_ops_follow_the_pin_flag() {
        for op in ["Assign", "ScatterUpdate", "Variable", "VariableV2"] {
            let node = Node::new("v", op);
            assert!(must_run_on_cpu(&node, true), "{} should be pinned", op);
            assert!(!must_run_on_cpu(&node, false), "{} should not be pinned", op);
        }
        assert!(!must_run_on_cpu(&Node::new("m", "MatMul"), true));
    }
}
