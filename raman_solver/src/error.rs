use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RamanError {
    #[error("while accessing '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid run configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("mode table, line {line}: {message}")]
    ModeTable { line: usize, message: String },
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("{what}: {declared} declared but {found} found")]
    CountMismatch {
        what: &'static str,
        declared: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, RamanError>;
