use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort compilation of a single schema file.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Document is not a schema: no category mapping, bad slot shape, missing `type`, ...
    #[error("malformed schema {context}: {message}")]
    Format { context: String, message: String },

    #[error("schema file not found: {}", path.display())]
    Reference { path: PathBuf },

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    pub fn format(context: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::Format {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchemaError::Output {
            path: path.into(),
            source,
        }
    }
}
