//! Compiler driver: runs the per-file generator over configured groups.
//!
//! Every schema file is its own unit of work. A failure is logged with the
//! base name, recorded in the report, and the next file is attempted.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{CompilerConfig, GroupConfig};
use crate::generator::{GeneratedHeader, HeaderJob, generate_header};
use crate::utils::SummaryRow;

#[derive(Debug)]
pub struct FileOutcome {
    pub group: String,
    pub base_name: String,
    pub result: Result<GeneratedHeader>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct CompileReport {
    pub outcomes: Vec<FileOutcome>,
}

impl CompileReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// `group/base` names of failed files, in processing order.
    pub fn failed_names(&self) -> Vec<String> {
        self.failed()
            .map(|o| format!("{}/{}", o.group, o.base_name))
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.outcomes
            .iter()
            .map(|o| SummaryRow {
                group: o.group.clone(),
                schema: o.base_name.clone(),
                operators: o.result.as_ref().ok().map(|h| h.operators),
                status: match &o.result {
                    Ok(_) => "ok".to_string(),
                    Err(e) => format!("failed: {}", e.root_cause()),
                },
            })
            .collect()
    }
}

/// Compiles schema groups under one project root.
#[derive(Debug, Clone)]
pub struct Compiler {
    root: PathBuf,
    config: CompilerConfig,
    dry_run: bool,
}

impl Compiler {
    pub fn new(root: impl Into<PathBuf>, config: CompilerConfig) -> Self {
        Self {
            root: root.into(),
            config,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile one group (`Some(id)`) or every configured group (`None`).
    ///
    /// Fails only for an unknown group id; per-file failures land in the report.
    pub fn compile(&self, component: Option<&str>) -> Result<CompileReport> {
        let mut report = CompileReport::default();
        for group in self.config.select(component)? {
            report.outcomes.extend(self.compile_group(group));
        }
        info!(
            files = report.outcomes.len(),
            failed = report.failed().count(),
            "compilation finished"
        );
        Ok(report)
    }

    pub fn compile_group(&self, group: &GroupConfig) -> Vec<FileOutcome> {
        let source_dir = self.root.join(&group.source_dir);
        let out_dir = self.root.join(&self.config.output_dir).join(&group.dest_subdir);
        info!(
            group = %group.id,
            source = %source_dir.display(),
            out = %out_dir.display(),
            schemas = group.schemas.len(),
            "compiling group"
        );

        group
            .schemas
            .iter()
            .map(|base| {
                let result = self.compile_file(group, base, &source_dir, &out_dir);
                if let Err(e) = &result {
                    let chain = format!("{e:#}");
                    warn!(group = %group.id, base = %base, err = %chain, "schema failed");
                }
                FileOutcome {
                    group: group.id.clone(),
                    base_name: base.clone(),
                    result,
                }
            })
            .collect()
    }

    fn compile_file(
        &self,
        group: &GroupConfig,
        base: &str,
        source_dir: &Path,
        out_dir: &Path,
    ) -> Result<GeneratedHeader> {
        let schema_path = source_dir.join(format!("{base}.{}", self.config.schema_ext));
        generate_header(&HeaderJob {
            schema_path: &schema_path,
            base_name: base,
            macro_prefix: &group.macro_prefix,
            out_dir,
            copy_back_dir: self.config.copy_back.then_some(source_dir),
            dry_run: self.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::error::SchemaError;

    fn synthetic_config(schemas: &[&str]) -> CompilerConfig {
        CompilerConfig {
            schema_ext: "yaml".to_string(),
            output_dir: PathBuf::from("out"),
            copy_back: false,
            groups: vec![GroupConfig {
                id: "demo".to_string(),
                source_dir: PathBuf::from("schemas"),
                macro_prefix: "demo_".to_string(),
                dest_subdir: PathBuf::from("demo"),
                schemas: schemas.iter().map(|s| s.to_string()).collect(),
            }],
        }
    }

    fn op_schema(op: &str) -> String {
        format!("nn:\n  {op}:\n    comment: {op} op\n")
    }

    #[test]
    fn test_compile_isolates_failing_file() {
        let tmp = tempdir().expect("tempdir");
        let schemas = tmp.path().join("schemas");
        fs::create_dir_all(&schemas).unwrap();
        fs::write(schemas.join("a_defs.yaml"), op_schema("A")).unwrap();
        fs::write(schemas.join("b_defs.yaml"), "nn:\n  B:\n    attrs:\n      x: {comment: no type}\n").unwrap();
        fs::write(schemas.join("c_defs.yaml"), op_schema("C")).unwrap();

        let compiler = Compiler::new(tmp.path(), synthetic_config(&["a_defs", "b_defs", "c_defs"]));
        let report = compiler.compile(Some("demo")).expect("compile");

        assert!(!report.is_success());
        assert_eq!(report.failed_names(), ["demo/b_defs"]);
        assert_eq!(report.succeeded().count(), 2);
        assert!(tmp.path().join("out/demo/a_defs.h").exists());
        assert!(!tmp.path().join("out/demo/b_defs.h").exists());
        assert!(tmp.path().join("out/demo/c_defs.h").exists());

        let failed = report.failed().next().unwrap();
        let err = failed.result.as_ref().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SchemaError>(),
            Some(SchemaError::Format { .. })
        ));
    }

    #[test]
    fn test_compile_missing_schema_reported_not_fatal() {
        let tmp = tempdir().expect("tempdir");
        let schemas = tmp.path().join("schemas");
        fs::create_dir_all(&schemas).unwrap();
        fs::write(schemas.join("a_defs.yaml"), op_schema("A")).unwrap();

        let compiler = Compiler::new(tmp.path(), synthetic_config(&["missing_defs", "a_defs"]));
        let report = compiler.compile(None).expect("compile");
        assert_eq!(report.failed_names(), ["demo/missing_defs"]);
        assert!(tmp.path().join("out/demo/a_defs.h").exists());

        let rows = report.summary_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].status.starts_with("failed"));
        assert_eq!(rows[1].operators, Some(1));
    }

    #[test]
    fn test_compile_copy_back_and_dry_run() {
        let tmp = tempdir().expect("tempdir");
        let schemas = tmp.path().join("schemas");
        fs::create_dir_all(&schemas).unwrap();
        fs::write(schemas.join("a_defs.yaml"), op_schema("A")).unwrap();

        let mut cfg = synthetic_config(&["a_defs"]);
        cfg.copy_back = true;

        let dry = Compiler::new(tmp.path(), cfg.clone()).dry_run(true);
        assert!(dry.compile(None).expect("compile").is_success());
        assert!(!schemas.join("a_defs.h").exists());

        let report = Compiler::new(tmp.path(), cfg).compile(None).expect("compile");
        assert!(report.is_success());
        let out = fs::read_to_string(tmp.path().join("out/demo/a_defs.h")).unwrap();
        let copied = fs::read_to_string(schemas.join("a_defs.h")).unwrap();
        assert_eq!(out, copied);
        assert!(out.contains("#ifndef DEMO_A_DEFS_H"));
    }

    #[test]
    fn test_compile_unknown_component_is_error() {
        let tmp = tempdir().expect("tempdir");
        let compiler = Compiler::new(tmp.path(), synthetic_config(&[]));
        assert!(compiler.compile(Some("api")).is_err());
    }
}
