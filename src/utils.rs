use std::fs;
use std::io::Write;
use std::path::Path;

use tabled::{builder::Builder, settings::Style};

use crate::config::GroupConfig;
use crate::error::SchemaError;

/// Write `contents` to `path` through a temp file in the same directory and
/// an atomic rename. Creates the parent directory when missing.
///
/// On failure the existing file at `path`, if any, is left untouched.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), SchemaError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| SchemaError::output(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| SchemaError::output(path, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| SchemaError::output(path, e))?;
    tmp.persist(path)
        .map_err(|e| SchemaError::output(path, e.error))?;
    Ok(())
}

/// One row of the end-of-run summary table.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub group: String,
    pub schema: String,
    pub operators: Option<usize>,
    pub status: String,
}

/// Render the summary table as text.
pub fn format_summary(rows: &[SummaryRow]) -> String {
    let mut table = Builder::default();
    table.push_record(["Group", "Schema", "Ops", "Status"]);
    for row in rows {
        table.push_record([
            row.group.clone(),
            row.schema.clone(),
            row.operators
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
            row.status.clone(),
        ]);
    }
    table.build().with(Style::markdown()).to_string()
}

pub fn print_summary(rows: &[SummaryRow]) {
    println!("\n{}", format_summary(rows));
}

/// Render the configured group table as text.
pub fn format_groups(groups: &[GroupConfig]) -> String {
    let mut table = Builder::default();
    table.push_record(["Component", "Source", "Macro prefix", "Destination", "Schemas"]);
    for group in groups {
        table.push_record([
            group.id.clone(),
            group.source_dir.display().to_string(),
            group.macro_prefix.clone(),
            group.dest_subdir.display().to_string(),
            group.schemas.len().to_string(),
        ]);
    }
    table.build().with(Style::markdown()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_dirs_and_replaces() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("a/b/out.h");
        write_atomic(&path, "first").expect("write");
        write_atomic(&path, "second").expect("rewrite");
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "out.h")
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind");
    }

    #[test]
    fn test_write_atomic_uncreatable_dir_is_output_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = write_atomic(&blocker.join("sub/out.h"), "x").unwrap_err();
        assert!(matches!(err, SchemaError::Output { .. }));
    }

    #[test]
    fn test_format_summary_aligns_columns() {
        let rows = vec![
            SummaryRow {
                group: "api".to_string(),
                schema: "array_defs".to_string(),
                operators: Some(12),
                status: "ok".to_string(),
            },
            SummaryRow {
                group: "api".to_string(),
                schema: "nn_defs".to_string(),
                operators: None,
                status: "failed".to_string(),
            },
        ];
        let table = format_summary(&rows);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4, "got:\n{table}");
        assert!(lines[0].starts_with("| Group"), "got:\n{table}");
        assert!(lines.iter().all(|l| l.len() == lines[0].len()), "ragged table:\n{table}");
        assert!(lines[2].contains("| array_defs |") && lines[2].contains("| 12 "));
        assert!(lines[3].contains("nn_defs") && lines[3].contains("| -  ") && lines[3].contains("failed"));
    }

    #[test]
    fn test_format_groups_lists_every_group() {
        let cfg = crate::config::CompilerConfig::default();
        let table = format_groups(&cfg.groups);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2 + cfg.groups.len(), "got:\n{table}");
        assert!(lines[2].contains("| api ") && lines[2].contains("inc_api_graph_op_"));
        assert!(lines[2].contains("| 8 "));
        assert!(lines[3].contains("inc/framework/graph/op") && lines[3].contains("| 3 "));
    }
}
