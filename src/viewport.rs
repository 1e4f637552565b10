pub const MIN_SPAN_SECS: f64 = 0.001;

const PADDING_FRACTION: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub start: f64,
    pub end: f64,
    pub offset_y: f32,
    limit_start: f64,
    limit_end: f64,
}

impl Viewport {
    pub fn fit(min: f64, max: f64) -> Self {
        let span = max - min;
        let (start, end) = if span > 0.0 {
            let pad = span * PADDING_FRACTION;
            (min - pad, max + pad)
        } else {
            (min - 0.5, max + 0.5)
        };
        Viewport {
            start,
            end,
            offset_y: 0.0,
            limit_start: start,
            limit_end: end,
        }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn x_of(&self, secs: f64, width: f32) -> f32 {
        ((secs - self.start) / self.span() * width as f64) as f32
    }

    pub fn secs_at(&self, x: f32, width: f32) -> f64 {
        if width <= 0.0 {
            return self.start;
        }
        self.start + x as f64 / width as f64 * self.span()
    }

    /// Move the view by a drag of `delta_x` pixels, keeping it inside the data range.
    pub fn pan_x(&mut self, delta_x: f32, width: f32) {
        if width <= 0.0 {
            return;
        }
        let span = self.span();
        let shift = delta_x as f64 / width as f64 * span;
        self.place(self.start - shift, span);
    }

    pub fn pan_y(&mut self, delta_y: f32, content_height: f32, view_height: f32) {
        let max_offset = (content_height - view_height).max(0.0);
        self.offset_y = (self.offset_y - delta_y).clamp(0.0, max_offset);
    }

    /// Zoom around the time under pixel `x`; positive `delta` zooms in.
    pub fn zoom_at(&mut self, delta: f32, x: f32, width: f32) {
        if width <= 0.0 || delta == 0.0 {
            return;
        }
        let old_span = self.span();
        let factor = if delta > 0.0 { 0.9 } else { 1.1 };
        let full = self.limit_end - self.limit_start;
        let new_span = (old_span * factor).clamp(MIN_SPAN_SECS.min(full), full);

        let fraction = (x as f64 / width as f64).clamp(0.0, 1.0);
        let anchor = self.start + fraction * old_span;
        self.place(anchor - fraction * new_span, new_span);
    }

    pub fn reset(&mut self) {
        self.start = self.limit_start;
        self.end = self.limit_end;
        self.offset_y = 0.0;
    }

    fn place(&mut self, start: f64, span: f64) {
        let max_start = (self.limit_end - span).max(self.limit_start);
        self.start = start.clamp(self.limit_start, max_start);
        self.end = self.start + span;
    }
}
