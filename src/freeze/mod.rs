// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Variable-to-constant conversion ("freezing").
//!
//! Freezing turns a trained graph into a self-contained inference graph:
//! every variable the outputs depend on is replaced by a `Const` holding its
//! current value, and the ops that read variables through resource handles
//! are rewritten to read the constants instead.
//!
//! # Pipeline
//!
//! ```text
//! extract_sub_graph → resolve_variables → Session::fetch_values
//!     → Substitution::apply → retype_dangling_resource_identities
//! ```
//!
//! The conversion is all-or-nothing: any failure aborts the call and no
//! partially rewritten graph is returned.

mod filter;
pub mod resolver;
pub mod substitution;


pub use filter::VariableFilter;
pub use resolver::{resolve_variables, ResolvedVariable, VariableResolution};
pub use substitution::create_const_node;

use std::collections::HashMap;

use crate::errors::{FreezeError, FreezeResult};
use crate::graph::{extract_sub_graph, Graph, GraphSummary, TensorValue};
use crate::observability::messages::freeze::{
    ConversionFailed, ConversionStarted, VariablesConverted, VariablesFrozen,
};
use crate::observability::messages::{PhaseSpan, StructuredLog};
use crate::traits::Session;
use substitution::{retype_dangling_resource_identities, Substitution};
use tracing::Instrument;

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenGraph {
    pub graph: Graph,
    /// Number of variable nodes replaced by constants.
    pub converted: usize,
}

/// Replace every variable the outputs depend on with a constant of its
/// current value.
///
/// Only the part of `graph` that can reach `output_node_names` is kept. The
/// values of all eligible variables are fetched from `session` in a single
/// call.
///
/// # Errors
///
/// * [`FreezeError::NodeNotFound`] - an output name is not in the graph
/// * [`FreezeError::InvalidGraph`] - duplicate or empty node names
/// * [`FreezeError::UnresolvedResourceVariable`] - a resource read does not
///   trace back to a `VarHandleOp`
/// * [`FreezeError::MixedEligibility`] - the variables behind a resource read
///   disagree on the whitelist/blacklist decision
/// * [`FreezeError::UnsupportedBatchDims`] - a resource gather uses
///   `batch_dims != 0`
/// * [`FreezeError::Session`] / [`FreezeError::FetchCountMismatch`] - the
///   session could not supply the values
pub async fn convert_variables_to_constants<S: AsRef<str>>(
    session: &dyn Session,
    graph: &Graph,
    output_node_names: &[S],
    filter: &VariableFilter,
) -> FreezeResult<FrozenGraph> {
    let outputs: Vec<String> = output_node_names
        .iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    let start_msg = ConversionStarted {
        node_count: graph.nodes.len(),
        output_nodes: &outputs,
    };
    let span = start_msg.span("convert_variables_to_constants");
    start_msg.log();

    let result = convert(session, graph, &outputs, filter)
        .instrument(span.clone())
        .await;
    let _guard = span.enter();
    if let Err(error) = &result {
        ConversionFailed { error }.log();
    }
    result
}

async fn convert(
    session: &dyn Session,
    graph: &Graph,
    outputs: &[String],
    filter: &VariableFilter,
) -> FreezeResult<FrozenGraph> {
    // Only what the outputs need; drops saving and assignment ops.
    let inference_graph = extract_sub_graph(graph, outputs)?;
    let summary = GraphSummary::extract(&inference_graph);

    let resolution = resolve_variables(&summary, filter)?;
    let values = fetch_variable_values(session, &resolution).await?;
    VariablesFrozen {
        count: values.len(),
    }
    .log();

    let (mut nodes, converted) = Substitution {
        summary: &summary,
        values: &values,
        pending_retype: &resolution.pending_retype,
        filter,
    }
    .apply()?;
    retype_dangling_resource_identities(&mut nodes, &summary, filter);

    VariablesConverted { count: converted }.log();

    Ok(FrozenGraph {
        graph: Graph {
            nodes,
            library: inference_graph.library.clone(),
            versions: inference_graph.versions.clone(),
        },
        converted,
    })
}

/// Fetch every resolved variable in one session call, keyed by node name.
pub async fn fetch_variable_values(
    session: &dyn Session,
    resolution: &VariableResolution,
) -> FreezeResult<HashMap<String, TensorValue>> {
    if resolution.variables.is_empty() {
        return Ok(HashMap::new());
    }

    let names = resolution.fetch_names();
    let values = session.fetch_values(&names).await?;
    if values.len() != names.len() {
        return Err(FreezeError::FetchCountMismatch {
            requested: names.len(),
            returned: values.len(),
        });
    }

    Ok(resolution
        .variables
        .iter()
        .map(|v| v.node_name.clone())
        .zip(values)
        .collect())
}
