use std::path::PathBuf;
use thiserror::Error;

/// Failure to read or parse a trace file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse event records from {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("event {name:?} has an unrepresentable {field} timestamp: {value}")]
    Timestamp {
        name: String,
        field: &'static str,
        value: f64,
    },
}

/// Everything the background reload task can fail with.
#[derive(Debug, Clone, Error)]
pub enum ReloadError {
    #[error("{0}")]
    Failed(String),
    #[error("{} contains no events", .0.display())]
    Empty(PathBuf),
}

impl ReloadError {
    /// Flattens the error and its causes into one line for the status bar.
    pub fn from_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ReloadError::Failed(format!("{:#}", anyhow::Error::new(err)))
    }
}
