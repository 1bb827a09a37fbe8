//! Generator module — turns one schema file into one registration header.
//!
//! # Submodules
//! - [`comment`] — description unquoting, line splitting and aligned annotations (pure)
//! - [`render`]  — full header text for an [`OperatorRepository`](crate::model::OperatorRepository) (pure)
//!
//! # Entry point
//! - [`generate_header`] — load → render → atomic write → optional copy-back

pub mod comment;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::loader::load_schema_file;
use crate::utils::write_atomic;

/// One schema file to compile.
#[derive(Debug, Clone)]
pub struct HeaderJob<'a> {
    pub schema_path: &'a Path,
    pub base_name: &'a str,
    pub macro_prefix: &'a str,
    /// Directory receiving `<base_name>.h`.
    pub out_dir: &'a Path,
    /// When set, the generated header is also republished here.
    pub copy_back_dir: Option<&'a Path>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratedHeader {
    pub header_path: PathBuf,
    pub copied_to: Option<PathBuf>,
    pub category: String,
    pub operators: usize,
    pub bytes: usize,
}

/// Compile one schema file into its header.
///
/// Nothing is written when loading fails, and every write goes through a
/// temp file + rename so a previous header is never left half-overwritten.
pub fn generate_header(job: &HeaderJob<'_>) -> Result<GeneratedHeader> {
    let repo = load_schema_file(job.schema_path)
        .with_context(|| format!("failed to load schema {}", job.schema_path.display()))?;
    let header = render::render_header(&repo, job.macro_prefix, job.base_name);
    debug!(
        base = job.base_name,
        category = %repo.category,
        operators = repo.operators.len(),
        bytes = header.len(),
        "rendered header"
    );

    let file_name = format!("{}.h", job.base_name);
    let header_path = job.out_dir.join(&file_name);
    let copied_to = job.copy_back_dir.map(|dir| dir.join(&file_name));

    if job.dry_run {
        info!(path = %header_path.display(), "dry-run: header rendered, not written");
    } else {
        write_atomic(&header_path, &header)
            .with_context(|| format!("failed to write header for {}", job.base_name))?;
        info!(path = %header_path.display(), operators = repo.operators.len(), "wrote header");

        if let Some(dest) = &copied_to {
            write_atomic(dest, &header)
                .with_context(|| format!("failed to copy header back to {}", dest.display()))?;
            info!(path = %dest.display(), "copied header back into source tree");
        }
    }

    Ok(GeneratedHeader {
        header_path,
        copied_to,
        category: repo.category,
        operators: repo.operators.len(),
        bytes: header.len(),
    })
}
