//! Error types for the shell core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

/// Everything a single input line can fail with.
///
/// None of these end the session; they are rendered with
/// [`crate::color::error_text`] and the loop moves on.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid alias file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("usage: color text <r> <g> <b> <text...>")]
    ColorArgs,

    #[error("invalid color component '{0}' (expected 0-255)")]
    ColorComponent(String),

    #[error("invalid alias syntax '{0}' (expected name=expansion)")]
    AliasSyntax(String),

    #[error("alias '{0}' expands to nothing")]
    EmptyAlias(String),

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    pub fn path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }
}
