//! Group table: which schema files to compile, and where the headers go.
//!
//! The built-in [`CompilerConfig::default`] covers the `api` and `inc` header
//! sets; a YAML file with the same shape replaces it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

/// One group of schema files sharing a source directory and guard prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupConfig {
    pub id: String,
    /// Directory holding `<schema>.<ext>`; relative paths resolve against the project root.
    pub source_dir: PathBuf,
    pub macro_prefix: String,
    /// Subdirectory of the output root receiving the headers.
    pub dest_subdir: PathBuf,
    pub schemas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub schema_ext: String,
    /// Output root; relative paths resolve against the project root.
    pub output_dir: PathBuf,
    /// Republish each generated header next to its schema.
    pub copy_back: bool,
    pub groups: Vec<GroupConfig>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            schema_ext: "yaml".to_string(),
            output_dir: PathBuf::from("out/opDefs"),
            copy_back: true,
            groups: vec![
                group(
                    "api",
                    "api/framework/graph/op",
                    "inc_api_graph_op_",
                    "graph/op",
                    &[
                        "array_defs",
                        "const_defs",
                        "control_flow_defs",
                        "detection_defs",
                        "image_defs",
                        "math_defs",
                        "nn_defs",
                        "random_defs",
                    ],
                ),
                group(
                    "inc",
                    "inc/framework/graph/op",
                    "inc_framework_graph_op_",
                    "framework/graph/op",
                    &["data_flow_defs", "internal_defs", "internal_nn_defs"],
                ),
            ],
        }
    }
}

fn group(id: &str, source_dir: &str, prefix: &str, dest: &str, schemas: &[&str]) -> GroupConfig {
    GroupConfig {
        id: id.to_string(),
        source_dir: PathBuf::from(source_dir),
        macro_prefix: prefix.to_string(),
        dest_subdir: PathBuf::from(dest),
        schemas: schemas.iter().map(|s| s.to_string()).collect(),
    }
}

impl CompilerConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yml::from_str(text).context("invalid compiler config")
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn group(&self, id: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// The named group, or every group in table order when `component` is `None`.
    pub fn select(&self, component: Option<&str>) -> Result<Vec<&GroupConfig>> {
        match component {
            None => Ok(self.groups.iter().collect()),
            Some(id) => self.group(id).map(|g| vec![g]).ok_or_else(|| {
                let known: Vec<_> = self.groups.iter().map(|g| g.id.as_str()).collect();
                anyhow!("unknown component `{id}` (known: {})", known.join(", "))
            }),
        }
    }
}
