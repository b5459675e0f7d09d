// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use crate::freeze::VariableFilter;
use crate::graph::{Graph, TensorValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for one freezing run.
///
/// # Fields
/// * `graph` - Input graph file
/// * `output` - Where the transformed graph is written
/// * `output_nodes` - Names of the nodes the result must keep computing
/// * `values` - Variable values file, keyed by tensor name (required for `freeze`)
/// * `variable_names_whitelist` - Only these variables are frozen (optional)
/// * `variable_names_blacklist` - These variables are never frozen (optional)
/// * `prune` - Training-node pruning after the main step (optional)
/// * `mode` - What to run (defaults to `freeze`)
///
/// # Example
/// ```yaml
/// graph: model/graph.yaml
/// output: model/frozen.yaml
/// values: model/values.yaml
/// output_nodes: [softmax]
/// variable_names_blacklist: [global_step]
/// prune:
///   enabled: true
///   protected_nodes: [input]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreezeConfig {
    pub graph: PathBuf,
    pub output: PathBuf,
    pub output_nodes: Vec<String>,
    #[serde(default)]
    pub values: Option<PathBuf>,
    #[serde(default)]
    pub variable_names_whitelist: Option<Vec<String>>,
    #[serde(default)]
    pub variable_names_blacklist: Option<Vec<String>>,
    #[serde(default)]
    pub prune: PruneConfig,
    #[serde(default)]
    pub mode: Mode,
}

impl FreezeConfig {
    pub fn variable_filter(&self) -> VariableFilter {
        VariableFilter::new(
            self.variable_names_whitelist.clone(),
            self.variable_names_blacklist.clone(),
        )
    }

    /// Nodes pruning must keep: the configured ones plus every output.
    pub fn protected_nodes(&self) -> Vec<String> {
        let mut protected = self.prune.protected_nodes.clone();
        for output in &self.output_nodes {
            if !protected.contains(output) {
                protected.push(output.clone());
            }
        }
        protected
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PruneConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub protected_nodes: Vec<String>,
}

/// Which transformation a run performs.
///
/// * `Extract` - Keep only what the outputs depend on
/// * `Freeze` - Extract, then replace variables with constants
/// * `PruneOnly` - Remove training nodes from the whole graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Extract,
    #[default]
    Freeze,
    PruneOnly,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Extract => "extract",
            Mode::Freeze => "freeze",
            Mode::PruneOnly => "prune_only",
        }
    }
}

/// Serialization format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = FileFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = match format {
        FileFormat::Yaml => serde_yaml::from_str(&content)?,
        FileFormat::Json => serde_json::from_str(&content)?,
        FileFormat::Toml => toml::from_str(&content)?,
    };
    Ok(parsed)
}

fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let content = match FileFormat::from_path(path)? {
        FileFormat::Yaml => serde_yaml::to_string(value)?,
        FileFormat::Json => serde_json::to_string_pretty(value)?,
        FileFormat::Toml => toml::to_string(value)?,
    };
    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a config from a YAML, JSON or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FreezeConfig, ConfigError> {
    read_file(path.as_ref())
}

/// Load a config and check that it describes a runnable job.
///
/// Rejects an empty `output_nodes` list and a `freeze` run without a
/// `values` file.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<FreezeConfig, ConfigError> {
    let cfg = load_config(path)?;

    if cfg.output_nodes.is_empty() {
        return Err(ConfigError::Invalid(
            "output_nodes must name at least one node".to_string(),
        ));
    }
    if cfg.mode == Mode::Freeze && cfg.values.is_none() {
        return Err(ConfigError::Invalid(
            "mode 'freeze' requires a values file".to_string(),
        ));
    }

    Ok(cfg)
}

pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Graph, ConfigError> {
    read_file(path.as_ref())
}

pub fn save_graph<P: AsRef<Path>>(path: P, graph: &Graph) -> Result<(), ConfigError> {
    write_file(path.as_ref(), graph)
}

/// Load variable values keyed by tensor name.
pub fn load_values<P: AsRef<Path>>(path: P) -> Result<HashMap<String, TensorValue>, ConfigError> {
    read_file(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AttrValue, DataType, Node};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
graph: in.yaml
output: out.yaml
values: values.json
output_nodes: [softmax]
variable_names_blacklist: [global_step]
"#;

        let cfg: FreezeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.mode, Mode::Freeze);
        assert_eq!(cfg.output_nodes, vec!["softmax"]);
        assert!(!cfg.prune.enabled);
        assert!(cfg.variable_names_whitelist.is_none());
        assert!(!cfg.variable_filter().should_convert("global_step"));
        assert!(cfg.variable_filter().should_convert("weights"));
    }

    #[test]
    fn test_protected_nodes_include_outputs() {
        let yaml = r#"
graph: in.yaml
output: out.yaml
mode: prune_only
output_nodes: [logits, input]
prune:
  enabled: true
  protected_nodes: [input]
"#;

        let cfg: FreezeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.mode, Mode::PruneOnly);
        assert_eq!(cfg.protected_nodes(), vec!["input", "logits"]);
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "freeze.yaml",
            "graph: g.yaml\noutput: o.yaml\nvalues: v.yaml\noutput_nodes: [out]\n",
        );

        let result = load_and_validate_config(&path);
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_toml_and_json_configs() {
        let dir = TempDir::new().unwrap();
        let toml_path = write(
            &dir,
            "freeze.toml",
            "graph = \"g.json\"\noutput = \"o.json\"\n\
             mode = \"extract\"\noutput_nodes = [\"out\"]\n",
        );
        let json_path = write(
            &dir,
            "freeze.json",
            r#"{"graph": "g.json", "output": "o.json",
                "mode": "extract", "output_nodes": ["out"]}"#,
        );

        let from_toml = load_and_validate_config(&toml_path).unwrap();
        let from_json = load_and_validate_config(&json_path).unwrap();
        assert_eq!(from_toml, from_json);
        assert_eq!(from_toml.mode, Mode::Extract);
    }

    #[test]
    fn test_load_and_validate_empty_outputs() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "freeze.yaml",
            "graph: g.yaml\noutput: o.yaml\nmode: extract\noutput_nodes: []\n",
        );

        let result = load_and_validate_config(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.contains("output_nodes"));
    }

    #[test]
    fn test_load_and_validate_freeze_without_values() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "freeze.yml",
            "graph: g.yaml\noutput: o.yaml\noutput_nodes: [out]\n",
        );

        let result = load_and_validate_config(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "freeze.ini", "graph = g\n");

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yaml");

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Io { path: ref p, .. }) if p == &path));
    }

    #[test]
    fn test_graph_survives_save_and_load() {
        let dir = TempDir::new().unwrap();
        let graph = Graph::from_nodes(vec![
            Node::new("x", "Placeholder").with_attr("dtype", AttrValue::Type(DataType::Float)),
            Node::new("c", "Const")
                .with_attr("dtype", AttrValue::Type(DataType::Float))
                .with_attr("value", AttrValue::Tensor(TensorValue::scalar_f32(1.5))),
            Node::new("out", "AddV2").with_input("x").with_input("c"),
        ]);

        for name in ["graph.json", "graph.yaml"] {
            let path = dir.path().join(name);
            save_graph(&path, &graph).unwrap();
            assert_eq!(load_graph(&path).unwrap(), graph);
        }
    }

    #[test]
    fn test_load_values() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "values.json",
            r#"{"w:0": {"dtype": "DT_FLOAT", "shape": [2], "content": {"float": [1.0, 2.0]}}}"#,
        );

        let values = load_values(&path).unwrap();
        let w = &values["w:0"];
        assert_eq!(w.dtype, DataType::Float);
        assert_eq!(w.num_elements(), 2);
    }
}
