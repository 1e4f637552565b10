use crate::transform::local_datetime;

pub const TICK_SPACING_PX: f64 = 100.0;

/// Smallest 1-2-5 multiple of a power of ten that is at least `interval`.
pub fn nice_interval(interval: f64) -> f64 {
    if !interval.is_finite() || interval <= 0.0 {
        return 0.0;
    }
    let base = 10f64.powf(interval.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|step| step * base)
        .find(|&nice| nice >= interval * (1.0 - 1e-9))
        .unwrap_or(base * 10.0)
}

/// Tick positions (epoch seconds) covering `[start, end]` for a `width` pixel axis.
pub fn ticks(start: f64, end: f64, width: f32) -> Vec<f64> {
    let span = end - start;
    if span <= 0.0 || width <= 0.0 {
        return Vec::new();
    }
    let step = nice_interval(TICK_SPACING_PX * span / width as f64);
    if step <= 0.0 {
        return Vec::new();
    }

    let first = (start / step - 1e-9).ceil() as i64;
    let last = (end / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// `SS.mmm` of the local time at `secs`.
pub fn format_tick(secs: f64) -> String {
    local_datetime(secs)
        .map(|datetime| datetime.format("%S%.3f").to_string())
        .unwrap_or_default()
}
