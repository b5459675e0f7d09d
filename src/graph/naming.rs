// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Input-reference naming rules.
//!
//! An input reference is either a data input `name[:port]` or a control input
//! `^name`. Graph analysis always works on canonical node names, with both the
//! control prefix and the port stripped.

/// Marks an ordering-only (control) input.
pub const CONTROL_PREFIX: char = '^';

/// Marks a colocation entry inside a `_class` attribute.
pub const COLOCATION_PREFIX: &str = "loc:@";

/// Canonical node name of an input reference.
///
/// ```
/// use graph_freeze::graph::naming::node_name;
///
/// assert_eq!(node_name("^init"), "init");
/// assert_eq!(node_name("split:1"), "split");
/// assert_eq!(node_name("plain"), "plain");
/// ```
pub fn node_name(input: &str) -> &str {
    let stripped = input.strip_prefix(CONTROL_PREFIX).unwrap_or(input);
    match stripped.split_once(':') {
        Some((name, _port)) => name,
        None => stripped,
    }
}

pub fn is_control_input(input: &str) -> bool {
    input.starts_with(CONTROL_PREFIX)
}

/// Fully qualified tensor name, defaulting to output port 0.
///
/// ```
/// use graph_freeze::graph::naming::tensor_name;
///
/// assert_eq!(tensor_name("Mul"), "Mul:0");
/// assert_eq!(tensor_name("split:2"), "split:2");
/// ```
pub fn tensor_name(input: &str) -> String {
    if input.contains(':') {
        input.to_string()
    } else {
        format!("{}:0", input)
    }
}

/// Node name referenced by a colocation entry, without its `loc:@` marker.
pub fn colocated_node_name(entry: &str) -> &str {
    entry.strip_prefix(COLOCATION_PREFIX).unwrap_or(entry)
}
