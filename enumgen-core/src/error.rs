//! Typed error handling for enumgen.
//!
//! Every error is fatal for the run. Rejected constant specs during
//! extraction are filtering, not errors, and never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for enumgen operations.
#[derive(Error, Debug)]
pub enum EnumgenError {
    /// Source could not be discovered, parsed or type-checked
    #[error("{path}{}: {message}", position(.line, .column))]
    Load {
        path: PathBuf,
        message: String,
        /// 1-based
        line: Option<usize>,
        column: Option<usize>,
    },

    /// A generated file could not be rendered
    #[error("cannot render {target}: {message}")]
    Render { target: String, message: String },

    /// Temporary file creation or rename failed
    #[error("cannot write {path}: {message}")]
    Write {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Reading a source, config or directory failed
    #[error("cannot read {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// enumgen.toml could not be parsed
    #[error("{path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Rejected option value
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl EnumgenError {
    /// Create a load error without location.
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a load error with line/column info.
    pub fn load_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a render error for a target (enum or package name).
    pub fn render(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a write error with path context.
    pub fn write(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Load { path, .. } => Some(path),
            Self::Write { path, .. } => Some(path),
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Source location as `(line, column)` for load errors that carry one.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::Load {
                line: Some(line),
                column: Some(column),
                ..
            } => Some((*line, *column)),
            _ => None,
        }
    }
}

/// `:line:column` suffix for load errors, empty without a location.
fn position(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(line), Some(column)) => format!(":{}:{}", line, column),
        (Some(line), None) => format!(":{}", line),
        _ => String::new(),
    }
}

pub type EnumgenResult<T> = Result<T, EnumgenError>;

/// Attaches a path to `std::io` failures.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> EnumgenResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> EnumgenResult<T> {
        self.map_err(|e| EnumgenError::io(path, e))
    }
}
