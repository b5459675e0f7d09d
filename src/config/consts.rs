// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Operator and attribute names the graph transformations key on.

/// Ops that forward their input unchanged or route it through control flow.
pub const PASS_THROUGH_OPS: &[&str] = &[
    "Switch",
    "Enter",
    "Exit",
    "Identity",
    "Merge",
    "NextIteration",
];

pub const IDENTITY_OP: &str = "Identity";
pub const MERGE_OP: &str = "Merge";
pub const CONST_OP: &str = "Const";

/// Legacy reference variables, fetched through `<name>:0`.
pub const VARIABLE_OP: &str = "Variable";
pub const VARIABLE_V2_OP: &str = "VariableV2";
/// Resource-handle variables, fetched through [`RESOURCE_READ_SUFFIX`].
pub const VAR_HANDLE_OP: &str = "VarHandleOp";

/// Every op that can hold freezable state.
pub const FREEZABLE_VARIABLE_OPS: &[&str] = &[VARIABLE_OP, VARIABLE_V2_OP, VAR_HANDLE_OP];

/// Tensor suffix under which a resource variable's current value is read.
pub const RESOURCE_READ_SUFFIX: &str = "/Read/ReadVariableOp:0";

pub const READ_VARIABLE_OP: &str = "ReadVariableOp";
pub const RESOURCE_GATHER_OP: &str = "ResourceGather";
pub const RESOURCE_GATHER_ND_OP: &str = "ResourceGatherNd";

/// Ops that consume a resource handle and produce its value.
pub const RESOURCE_READ_OPS: &[&str] =
    &[READ_VARIABLE_OP, RESOURCE_GATHER_OP, RESOURCE_GATHER_ND_OP];

pub const GATHER_V2_OP: &str = "GatherV2";
pub const GATHER_ND_OP: &str = "GatherNd";

/// Ops that touch variables in any way; used for CPU pinning.
pub const VARIABLE_RELATED_OPS: &[&str] = &[
    "Assign",
    "AssignAdd",
    "AssignSub",
    "Queue",
    "ScatterAdd",
    "ScatterSub",
    "ScatterUpdate",
    "TruncatedNormal",
    "Variable",
    "VariableV2",
];

/// Numeric-validation ops that only matter while training.
pub const TRAINING_ONLY_OPS: &[&str] = &["CheckNumerics"];

/// Ops spliced out of inference graphs when nothing pins them in place.
pub const SPLICEABLE_OPS: &[&str] = &[IDENTITY_OP];

pub const COLOCATION_ATTR: &str = "_class";
pub const OUTPUT_SHAPES_ATTR: &str = "_output_shapes";
pub const DEBUGGING_ATTR: &str = "_debugging";
pub const ELEMENT_TYPE_ATTR: &str = "T";
pub const DTYPE_ATTR: &str = "dtype";
pub const VALUE_ATTR: &str = "value";
pub const TPARAMS_ATTR: &str = "Tparams";
pub const TINDICES_ATTR: &str = "Tindices";
pub const TAXIS_ATTR: &str = "Taxis";
pub const BATCH_DIMS_ATTR: &str = "batch_dims";

/// Annotation left on nodes whose element type was rewritten from DT_RESOURCE.
pub const RETYPED_DEBUG_MESSAGE: &str =
    "This Identity's type was changed from DT_RESOURCE during graph freezing.";

/// Suffix of the axis constant synthesized for a rewritten resource gather.
pub const GATHER_AXIS_SUFFIX: &str = "/axis";

pub const CAST_OP: &str = "Cast";
pub const CAST_SOURCE_TYPE_ATTR: &str = "SrcT";

/// Index-merging ops that only have int32 kernels on the host.
pub const STITCH_OPS: &[&str] = &["DynamicStitch", "ParallelDynamicStitch"];
