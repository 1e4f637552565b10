//! Row-oriented view of the transformed events, one display string per cell.

use crate::transform::TimedEvent;
use chrono::{DateTime, Local};
use serde_json::Value;

pub const BASE_COLUMNS: [&str; 6] = ["Name", "Context", "Start", "End", "Diff", "Color"];

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_events(events: &[TimedEvent]) -> Self {
        let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        for event in events {
            for key in event.extra.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = events
            .iter()
            .map(|event| {
                let mut row = vec![
                    event.name.clone(),
                    event.context.clone(),
                    format_datetime(&event.start),
                    format_datetime(&event.end),
                    format_diff(event.diff),
                    event.color.to_string(),
                ];
                for column in &columns[BASE_COLUMNS.len()..] {
                    row.push(event.extra.get(column).map(format_value).unwrap_or_default());
                }
                row
            })
            .collect();

        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, index: usize, column: &str) -> Option<&str> {
        let column = self.columns.iter().position(|c| c == column)?;
        self.rows.get(index).map(|row| row[column].as_str())
    }

    /// `(column, value)` pairs of one row, in column order.
    pub fn fields(&self, index: usize) -> impl Iterator<Item = (&str, &str)> {
        let row = self.row(index).unwrap_or_default();
        self.columns
            .iter()
            .map(String::as_str)
            .zip(row.iter().map(String::as_str))
    }
}

pub fn format_datetime(datetime: &DateTime<Local>) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

pub fn format_diff(diff: f64) -> String {
    format!("{}", diff)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
