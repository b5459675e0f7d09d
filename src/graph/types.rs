// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Core graph value types.
//!
//! A [`Graph`] is an ordered list of [`Node`]s plus the function library and
//! version stamp that travel with it. Nodes reference each other by name only,
//! so a graph owns no internal pointers and can be cloned, serialized, and
//! rebuilt freely.
//!
//! # Example
//! ```
//! use graph_freeze::graph::{AttrValue, DataType, Graph, Node};
//!
//! let graph = Graph::from_nodes(vec![
//!     Node::new("x", "Placeholder").with_attr("dtype", AttrValue::Type(DataType::Float)),
//!     Node::new("y", "Identity")
//!         .with_input("x")
//!         .with_attr("T", AttrValue::Type(DataType::Float)),
//! ]);
//!
//! assert_eq!(graph.nodes.len(), 2);
//! assert_eq!(graph.node("y").and_then(|n| n.attr_type("T")), Some(DataType::Float));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Element type tag carried by `T`, `dtype`, `Tindices` and similar attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DataType {
    #[default]
    #[serde(rename = "DT_INVALID")]
    Invalid,
    #[serde(rename = "DT_FLOAT")]
    Float,
    #[serde(rename = "DT_DOUBLE")]
    Double,
    #[serde(rename = "DT_HALF")]
    Half,
    #[serde(rename = "DT_INT8")]
    Int8,
    #[serde(rename = "DT_INT16")]
    Int16,
    #[serde(rename = "DT_INT32")]
    Int32,
    #[serde(rename = "DT_INT64")]
    Int64,
    #[serde(rename = "DT_UINT8")]
    Uint8,
    #[serde(rename = "DT_BOOL")]
    Bool,
    #[serde(rename = "DT_STRING")]
    String,
    #[serde(rename = "DT_RESOURCE")]
    Resource,
    #[serde(rename = "DT_VARIANT")]
    Variant,
}

impl DataType {
    pub fn is_resource(self) -> bool {
        self == DataType::Resource
    }
}

/// Flat payload of a tensor, one vector per storage class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorContent {
    Float(Vec<f32>),
    Double(Vec<f64>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl TensorContent {
    pub fn len(&self) -> usize {
        match self {
            TensorContent::Float(v) => v.len(),
            TensorContent::Double(v) => v.len(),
            TensorContent::Int32(v) => v.len(),
            TensorContent::Int64(v) => v.len(),
            TensorContent::Bool(v) => v.len(),
            TensorContent::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A concrete tensor value: the payload of a `Const` node and what a
/// [`Session`](crate::traits::Session) hands back for a fetched tensor name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorValue {
    pub dtype: DataType,
    #[serde(default)]
    pub shape: Vec<i64>,
    pub content: TensorContent,
}

impl TensorValue {
    pub fn new(dtype: DataType, shape: Vec<i64>, content: TensorContent) -> Self {
        Self {
            dtype,
            shape,
            content,
        }
    }

    /// Rank-0 float tensor.
    pub fn scalar_f32(value: f32) -> Self {
        Self::new(DataType::Float, vec![], TensorContent::Float(vec![value]))
    }

    /// Rank-0 integer tensor stored with the width `dtype` asks for.
    ///
    /// Anything other than `Int64` is stored as `Int32`, which is what index
    /// attributes (`Tindices`, `Taxis`) default to.
    pub fn scalar_index(dtype: DataType, value: i64) -> Self {
        match dtype {
            DataType::Int64 => {
                Self::new(DataType::Int64, vec![], TensorContent::Int64(vec![value]))
            }
            _ => Self::new(
                DataType::Int32,
                vec![],
                TensorContent::Int32(vec![value as i32]),
            ),
        }
    }

    /// Number of elements implied by the shape (1 for scalars).
    pub fn num_elements(&self) -> i64 {
        self.shape.iter().product()
    }
}

/// Typed attribute value. Exactly one variant is present; read it through the
/// `as_*` accessors, which return `None` on a tag mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    S(String),
    I(i64),
    B(bool),
    Type(DataType),
    Tensor(TensorValue),
    List(Vec<String>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::I(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::B(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<DataType> {
        match self {
            AttrValue::Type(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&TensorValue> {
        match self {
            AttrValue::Tensor(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(l) => Some(l),
            _ => None,
        }
    }
}

/// A named operation instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Node {
    pub name: String,
    pub op: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttrValue>,
}

impl Node {
    pub fn new(name: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            op: op.into(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push(input.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.attrs.insert(key.into(), value);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// The `DataType` stored under `key`, if the attribute exists and is a type.
    pub fn attr_type(&self, key: &str) -> Option<DataType> {
        self.attrs.get(key).and_then(AttrValue::as_type)
    }

    pub fn input(&self, index: usize) -> Option<&str> {
        self.inputs.get(index).map(String::as_str)
    }
}

/// A reusable function body carried alongside the main graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FunctionDef {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FunctionLibrary {
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
}

/// Producer/consumer version stamp of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VersionDef {
    #[serde(default)]
    pub producer: i32,
    #[serde(default)]
    pub min_consumer: i32,
    #[serde(default)]
    pub bad_consumers: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub library: FunctionLibrary,
    #[serde(default)]
    pub versions: VersionDef,
}

impl Graph {
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    /// Linear lookup by exact node name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }
}
