use crate::error::TransformError;
use crate::record::EventRecord;
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Decimal places kept for `Diff`.
pub const DIFF_PRECISION: usize = 6;

/// The category an event is colored by.
///
/// Numbered events alternate between two categories by parity; named
/// events are colored by their name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ColorKey {
    Parity(u8),
    Label(String),
}

impl ColorKey {
    /// Only ASCII numerals count as numbered events.
    pub fn from_name(name: &str) -> Self {
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            // The parity of a decimal numeral is the parity of its last digit.
            let last = name.as_bytes()[name.len() - 1] - b'0';
            ColorKey::Parity(last % 2)
        } else {
            ColorKey::Label(name.to_string())
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorKey::Parity(parity) => write!(f, "{}", parity),
            ColorKey::Label(label) => f.write_str(label),
        }
    }
}

/// An event record with its derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct TimedEvent {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Context")]
    pub context: String,
    #[serde(rename = "Start")]
    pub start: DateTime<Local>,
    #[serde(rename = "End")]
    pub end: DateTime<Local>,
    #[serde(rename = "Diff")]
    pub diff: f64,
    #[serde(rename = "Color")]
    pub color: ColorKey,
    #[serde(skip)]
    pub start_secs: f64,
    #[serde(skip)]
    pub end_secs: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TimedEvent {
    /// Time covered by the bar, ordered even when the trace recorded `End < Start`.
    pub fn span_secs(&self) -> (f64, f64) {
        if self.end_secs < self.start_secs {
            (self.end_secs, self.start_secs)
        } else {
            (self.start_secs, self.end_secs)
        }
    }
}

/// Round to `places` decimals using the exact binary value, ties to even.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Interpret `secs` as seconds since the Unix epoch, in the local time zone.
///
/// Sub-second precision is kept to the microsecond.
pub fn local_datetime(secs: f64) -> Option<DateTime<Local>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return None;
    }
    let mut whole = whole as i64;
    let mut micros = ((secs - secs.floor()) * 1_000_000.0).round() as u32;
    if micros >= 1_000_000 {
        whole = whole.checked_add(1)?;
        micros -= 1_000_000;
    }
    DateTime::from_timestamp(whole, micros * 1_000).map(|utc| utc.with_timezone(&Local))
}

pub fn transform(record: EventRecord) -> Result<TimedEvent, TransformError> {
    let diff = round_to(record.end - record.start, DIFF_PRECISION);
    if diff < 0.0 {
        tracing::warn!(
            name = %record.name,
            context = %record.context,
            diff,
            "event ends before it starts"
        );
    }

    let timestamp = |field: &'static str, value: f64| {
        local_datetime(value).ok_or_else(|| TransformError::Timestamp {
            name: record.name.clone(),
            field,
            value,
        })
    };
    let start = timestamp("Start", record.start)?;
    let end = timestamp("End", record.end)?;
    let color = ColorKey::from_name(&record.name);

    Ok(TimedEvent {
        name: record.name,
        context: record.context,
        start,
        end,
        diff,
        color,
        start_secs: record.start,
        end_secs: record.end,
        extra: record.extra,
    })
}

pub fn transform_all(records: Vec<EventRecord>) -> Result<Vec<TimedEvent>, TransformError> {
    records.into_iter().map(transform).collect()
}
