use crate::palette::Palette;
use crate::table::Table;
use crate::transform::{ColorKey, TimedEvent};
use iced::Color;
use intervaltree::{Element, IntervalTree};
use std::fmt;

/// Color keys whose bars are drawn without an in-bar label.
pub const HIDDEN_LABEL_KEYS: [&str; 4] = ["1", "2", "3", "LoadScene"];

pub const HOVER_FIELDS: [&str; 6] = ["Start", "End", "Context", "Name", "Diff", "Color"];

/// Interval tree resolution: one microsecond.
const TICKS_PER_SECOND: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub row: usize,
    pub start: f64,
    pub end: f64,
    pub depth: u32,
    pub key: ColorKey,
    pub color: Color,
    pub label: Option<String>,
}

pub struct Lane {
    pub context: String,
    /// Sorted by start time.
    pub bars: Vec<Bar>,
    pub max_depth: u32,
    index: IntervalTree<i64, usize>,
    origin: f64,
}

impl fmt::Debug for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lane")
            .field("context", &self.context)
            .field("bars", &self.bars.len())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl Lane {
    fn new(context: String, mut bars: Vec<Bar>, origin: f64) -> Self {
        bars.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.row.cmp(&b.row)));

        let mut stack: Vec<f64> = Vec::new();
        for bar in bars.iter_mut() {
            while let Some(&last_end) = stack.last() {
                if last_end <= bar.start {
                    stack.pop();
                } else {
                    break;
                }
            }
            bar.depth = stack.len() as u32;
            stack.push(bar.end);
        }
        let max_depth = bars.iter().map(|b| b.depth).max().unwrap_or(0);

        let index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let (start, end) = tick_range(bar.start, bar.end, origin);
                Element {
                    range: start..end,
                    value: i,
                }
            })
            .collect();

        Lane {
            context,
            bars,
            max_depth,
            index,
            origin,
        }
    }

    /// Indices of bars overlapping `[start, end]` seconds, in drawing order.
    pub fn bars_in(&self, start: f64, end: f64) -> Vec<usize> {
        let (start, end) = tick_range(start, end, self.origin);
        let mut hits: Vec<usize> = self.index.query(start..end).map(|e| e.value).collect();
        hits.sort_unstable();
        hits
    }

    pub fn rows(&self) -> u32 {
        self.max_depth + 1
    }
}

fn tick_range(start: f64, end: f64, origin: f64) -> (i64, i64) {
    let start = ((start - origin) * TICKS_PER_SECOND).floor() as i64;
    let end = ((end - origin) * TICKS_PER_SECOND).ceil() as i64;
    (start, end.max(start + 1))
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub key: ColorKey,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarRef {
    pub lane: usize,
    pub bar: usize,
}

#[derive(Debug)]
pub struct Chart {
    /// In order of first appearance; the first lane is drawn at the top.
    pub lanes: Vec<Lane>,
    pub table: Table,
    pub legend: Vec<LegendEntry>,
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Chart {
    pub fn build(events: &[TimedEvent]) -> Chart {
        let table = Table::from_events(events);
        let mut palette = Palette::new();
        let mut legend: Vec<LegendEntry> = Vec::new();

        let mut min_secs = f64::INFINITY;
        let mut max_secs = f64::NEG_INFINITY;
        for event in events {
            let (start, end) = event.span_secs();
            min_secs = min_secs.min(start);
            max_secs = max_secs.max(end);
        }
        if min_secs > max_secs {
            min_secs = 0.0;
            max_secs = 0.0;
        }

        let mut grouped: Vec<(String, Vec<Bar>)> = Vec::new();
        for (row, event) in events.iter().enumerate() {
            let color = palette.color_for(&event.color);
            if !legend.iter().any(|entry| entry.key == event.color) {
                legend.push(LegendEntry {
                    key: event.color.clone(),
                    color,
                });
            }

            let (start, end) = event.span_secs();
            let bar = Bar {
                row,
                start,
                end,
                depth: 0,
                key: event.color.clone(),
                color,
                label: default_label(event),
            };

            match grouped.iter_mut().find(|(context, _)| *context == event.context) {
                Some((_, bars)) => bars.push(bar),
                None => grouped.push((event.context.clone(), vec![bar])),
            }
        }

        let lanes: Vec<Lane> = grouped
            .into_iter()
            .map(|(context, bars)| Lane::new(context, bars, min_secs))
            .collect();

        tracing::debug!(
            lanes = lanes.len(),
            bars = table.len(),
            color_keys = legend.len(),
            "built chart"
        );

        Chart {
            lanes,
            table,
            legend,
            min_secs,
            max_secs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn bar(&self, bar_ref: BarRef) -> Option<&Bar> {
        self.lanes.get(bar_ref.lane)?.bars.get(bar_ref.bar)
    }

    pub fn bar_count(&self) -> usize {
        self.lanes.iter().map(|lane| lane.bars.len()).sum()
    }

    pub fn hover_fields(&self, bar_ref: BarRef) -> Vec<(&'static str, &str)> {
        let Some(bar) = self.bar(bar_ref) else {
            return Vec::new();
        };
        HOVER_FIELDS
            .iter()
            .filter_map(|&field| Some((field, self.table.cell(bar.row, field)?)))
            .collect()
    }
}

fn default_label(event: &TimedEvent) -> Option<String> {
    let key = event.color.to_string();
    if HIDDEN_LABEL_KEYS.contains(&key.as_str()) {
        None
    } else {
        Some(event.name.clone())
    }
}
