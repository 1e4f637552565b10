//! Reading raw event records from a trace file.

use crate::error::LoadError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_NAME: &str = "loadTimings.json";

/// One entry of the input array, before any derived fields are added.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EventRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Context")]
    pub context: String,
    /// Epoch seconds.
    #[serde(rename = "Start")]
    pub start: f64,
    /// Epoch seconds.
    #[serde(rename = "End")]
    pub end: f64,
    /// Any other fields, in the order they appear in the input.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `<system temp dir>/loadTimings.json`, where the instrumented game writes its trace.
pub fn default_input_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_FILE_NAME)
}

pub fn load_records(path: &Path) -> Result<Vec<EventRecord>, LoadError> {
    let started = std::time::Instant::now();
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_records(&contents).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        records = records.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "loaded event records"
    );
    Ok(records)
}

pub fn parse_records(contents: &str) -> Result<Vec<EventRecord>, serde_json::Error> {
    serde_json::from_str(contents)
}
