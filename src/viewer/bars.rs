use crate::chart::{Bar, BarRef, Chart, Lane};
use crate::palette::{prefers_dark_text, shade};
use crate::viewer::{Hover, Message, ticks};
use crate::viewport::Viewport;
use iced::mouse;
use iced::widget::canvas::{self, Geometry, Program};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme, Vector, keyboard};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

pub const LANE_HEIGHT: f32 = 20.0;
pub const LANE_SPACING: f32 = 6.0;
const DRAG_THRESHOLD: f32 = 3.0;
const DOUBLE_CLICK: Duration = Duration::from_millis(400);
const MIN_HIT_WIDTH: f32 = 5.0;
const WHEEL_LINE_PX: f32 = 30.0;

const TOOLTIP_FONT: f32 = 12.0;
const TOOLTIP_LINE: f32 = 16.0;
const TOOLTIP_PADDING: f32 = 6.0;
const TOOLTIP_OFFSET: Vector = Vector::new(12.0, 12.0);
/// Rough advance of one terminal-width column at `TOOLTIP_FONT`.
const CHAR_WIDTH: f32 = 7.0;

pub fn lane_height(lane: &Lane) -> f32 {
    lane.rows() as f32 * LANE_HEIGHT
}

pub fn content_height(chart: &Chart) -> f32 {
    chart
        .lanes
        .iter()
        .map(|lane| lane_height(lane) + LANE_SPACING)
        .sum()
}

pub struct BarsProgram<'a> {
    pub chart: &'a Chart,
    pub viewport: Viewport,
    pub hovered: Option<Hover>,
    pub selected: Option<BarRef>,
}

#[derive(Default)]
pub struct BarsState {
    modifiers: keyboard::Modifiers,
    press_position: Option<Point>,
    last_drag_position: Option<Point>,
    pressed_bar: Option<BarRef>,
    dragging: bool,
    last_click: Option<Instant>,
}

impl BarsProgram<'_> {
    fn bar_rect(&self, bar: &Bar, lane_top: f32, width: f32) -> Rectangle {
        let x = self.viewport.x_of(bar.start, width);
        let end = self.viewport.x_of(bar.end, width);
        Rectangle {
            x,
            y: lane_top + bar.depth as f32 * LANE_HEIGHT + 1.0,
            width: (end - x).max(1.0),
            height: LANE_HEIGHT - 2.0,
        }
    }

    fn lane_tops(&self) -> impl Iterator<Item = (usize, &Lane, f32)> {
        let mut y = -self.viewport.offset_y;
        self.chart.lanes.iter().enumerate().map(move |(index, lane)| {
            let top = y;
            y += lane_height(lane) + LANE_SPACING;
            (index, lane, top)
        })
    }

    fn bar_at(&self, position: Point, bounds: Rectangle) -> Option<BarRef> {
        let tolerance = MIN_HIT_WIDTH as f64 / bounds.width.max(1.0) as f64 * self.viewport.span();
        let time = self.viewport.secs_at(position.x, bounds.width);

        for (lane_index, lane, top) in self.lane_tops() {
            if position.y < top || position.y >= top + lane_height(lane) {
                continue;
            }
            let depth = ((position.y - top) / LANE_HEIGHT) as u32;
            return lane
                .bars_in(time - tolerance, time + tolerance)
                .into_iter()
                .rev()
                .find(|&index| {
                    let bar = &lane.bars[index];
                    if bar.depth != depth {
                        return false;
                    }
                    let mut rect = self.bar_rect(bar, top, bounds.width);
                    if rect.width < MIN_HIT_WIDTH {
                        rect.x -= (MIN_HIT_WIDTH - rect.width) / 2.0;
                        rect.width = MIN_HIT_WIDTH;
                    }
                    rect.contains(position)
                })
                .map(|bar| BarRef {
                    lane: lane_index,
                    bar,
                });
        }
        None
    }

    fn draw_grid(&self, frame: &mut canvas::Frame, bounds: Rectangle) {
        for tick in ticks::ticks(self.viewport.start, self.viewport.end, bounds.width) {
            let x = self.viewport.x_of(tick, bounds.width);
            frame.stroke(
                &canvas::Path::line(Point::new(x, 0.0), Point::new(x, bounds.height)),
                canvas::Stroke::default()
                    .with_color(Color::from_rgba(0.5, 0.5, 0.5, 0.25))
                    .with_width(1.0),
            );
        }
    }

    fn draw_tooltip(&self, frame: &mut canvas::Frame, hover: &Hover, bounds: Rectangle) {
        let lines: Vec<String> = self
            .chart
            .hover_fields(hover.bar)
            .into_iter()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        if lines.is_empty() {
            return;
        }

        let columns = lines.iter().map(|line| line.width()).max().unwrap_or(0);
        let size = Size::new(
            columns as f32 * CHAR_WIDTH + TOOLTIP_PADDING * 2.0,
            lines.len() as f32 * TOOLTIP_LINE + TOOLTIP_PADDING * 2.0,
        );

        let mut position = hover.position + TOOLTIP_OFFSET;
        if position.x + size.width > bounds.width {
            position.x = (hover.position.x - size.width - TOOLTIP_OFFSET.x).max(0.0);
        }
        if position.y + size.height > bounds.height {
            position.y = (hover.position.y - size.height - TOOLTIP_OFFSET.y).max(0.0);
        }

        frame.fill_rectangle(
            position + Vector::new(2.0, 2.0),
            size,
            Color::from_rgba(0.0, 0.0, 0.0, 0.15),
        );
        frame.fill_rectangle(position, size, Color::WHITE);
        frame.stroke(
            &canvas::Path::rectangle(position, size),
            canvas::Stroke::default()
                .with_color(Color::from_rgba(0.0, 0.0, 0.0, 0.35))
                .with_width(1.0),
        );

        for (i, line) in lines.into_iter().enumerate() {
            frame.fill_text(canvas::Text {
                content: line,
                position: Point::new(
                    position.x + TOOLTIP_PADDING,
                    position.y + TOOLTIP_PADDING + i as f32 * TOOLTIP_LINE,
                ),
                color: Color::from_rgb(0.15, 0.15, 0.15),
                size: TOOLTIP_FONT.into(),
                ..Default::default()
            });
        }
    }
}

fn draw_bar(frame: &mut canvas::Frame, rect: Rectangle, color: Color, label: Option<&str>) {
    frame.fill_rectangle(rect.position(), rect.size(), color);
    frame.stroke(
        &canvas::Path::rectangle(rect.position(), rect.size()),
        canvas::Stroke::default()
            .with_color(shade(color, 0.7))
            .with_width(1.0),
    );

    let Some(label) = label else {
        return;
    };
    if rect.width <= 20.0 {
        return;
    }
    let text_color = if prefers_dark_text(color) {
        Color::from_rgb(0.15, 0.15, 0.15)
    } else {
        Color::WHITE
    };
    frame.with_clip(
        Rectangle {
            x: rect.x + 1.0,
            y: rect.y + 1.0,
            width: rect.width - 2.0,
            height: rect.height - 2.0,
        },
        |frame| {
            frame.fill_text(canvas::Text {
                content: label.to_string(),
                position: Point::new(rect.x + 3.0, rect.y + 1.0),
                color: text_color,
                size: 12.0.into(),
                ..Default::default()
            });
        },
    );
}

impl Program<Message> for BarsProgram<'_> {
    type State = BarsState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::WHITE);

        if self.chart.is_empty() {
            return vec![frame.into_geometry()];
        }

        self.draw_grid(&mut frame, bounds);

        for (lane_index, lane, top) in self.lane_tops() {
            let height = lane_height(lane);
            if top + height < 0.0 || top > bounds.height {
                continue;
            }

            frame.stroke(
                &canvas::Path::line(
                    Point::new(0.0, top + height + LANE_SPACING / 2.0),
                    Point::new(bounds.width, top + height + LANE_SPACING / 2.0),
                ),
                canvas::Stroke::default()
                    .with_color(Color::from_rgb(0.9, 0.9, 0.9))
                    .with_width(1.0),
            );

            for index in lane.bars_in(self.viewport.start, self.viewport.end) {
                let bar = &lane.bars[index];
                let rect = self.bar_rect(bar, top, bounds.width);
                draw_bar(&mut frame, rect, bar.color, bar.label.as_deref());
            }

            let outline = |bar_ref: Option<BarRef>| {
                bar_ref
                    .filter(|r| r.lane == lane_index)
                    .and_then(|r| lane.bars.get(r.bar))
                    .map(|bar| self.bar_rect(bar, top, bounds.width))
            };
            if let Some(rect) = outline(self.hovered.map(|h| h.bar)) {
                frame.stroke(
                    &canvas::Path::rectangle(rect.position(), rect.size()),
                    canvas::Stroke::default()
                        .with_color(Color::from_rgba(0.0, 0.0, 0.0, 0.5))
                        .with_width(1.0),
                );
            }
            if let Some(rect) = outline(self.selected) {
                frame.stroke(
                    &canvas::Path::rectangle(rect.position(), rect.size()),
                    canvas::Stroke::default()
                        .with_color(Color::from_rgb(0.0, 0.4, 0.8))
                        .with_width(2.0),
                );
            }
        }

        if let Some(hover) = &self.hovered {
            self.draw_tooltip(&mut frame, hover, bounds);
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            iced::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = *modifiers;
            }
            iced::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if let (Some(press), Some(last)) = (state.press_position, state.last_drag_position)
                {
                    let moved = *position - press;
                    if !state.dragging && moved.x.hypot(moved.y) > DRAG_THRESHOLD {
                        state.dragging = true;
                    }
                    if state.dragging {
                        state.last_drag_position = Some(*position);
                        let delta = *position - last;
                        let message = Message::Panned {
                            delta,
                            size: bounds.size(),
                        };
                        return Some(canvas::Action::publish(message).and_capture());
                    }
                }

                let hovered = cursor.position_in(bounds).and_then(|position| {
                    self.bar_at(position, bounds)
                        .map(|bar| Hover { bar, position })
                });
                if hovered != self.hovered {
                    return Some(canvas::Action::publish(Message::Hovered(hovered)));
                }
            }
            iced::Event::Mouse(mouse::Event::CursorLeft) => {
                if self.hovered.is_some() {
                    return Some(canvas::Action::publish(Message::Hovered(None)));
                }
            }
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.press_position = cursor.position();
                    state.last_drag_position = cursor.position();
                    state.pressed_bar = self.bar_at(position, bounds);
                    state.dragging = false;
                }
            }
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let was_click = state.press_position.is_some() && !state.dragging;
                let pressed_bar = state.pressed_bar.take();
                state.press_position = None;
                state.last_drag_position = None;
                state.dragging = false;

                if !was_click {
                    return None;
                }
                let position = cursor.position_in(bounds)?;

                let now = Instant::now();
                let is_double = state
                    .last_click
                    .is_some_and(|previous| now.duration_since(previous) <= DOUBLE_CLICK);
                if is_double {
                    state.last_click = None;
                    return Some(canvas::Action::publish(Message::ResetView));
                }
                state.last_click = Some(now);

                let released_bar = self.bar_at(position, bounds);
                let selected = if released_bar == pressed_bar {
                    released_bar
                } else {
                    None
                };
                return Some(canvas::Action::publish(Message::Selected(selected)));
            }
            iced::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let position = cursor.position_in(bounds)?;
                let (x, y) = match delta {
                    mouse::ScrollDelta::Lines { x, y } => (x * WHEEL_LINE_PX, y * WHEEL_LINE_PX),
                    mouse::ScrollDelta::Pixels { x, y } => (*x, *y),
                };

                if state.modifiers.shift() || x.abs() > y.abs() {
                    let amount = if x.abs() > y.abs() { x } else { y };
                    let message = Message::Panned {
                        delta: Vector::new(amount, 0.0),
                        size: bounds.size(),
                    };
                    return Some(canvas::Action::publish(message).and_capture());
                }
                if y != 0.0 {
                    let message = Message::Zoomed {
                        delta: y,
                        x: position.x,
                        width: bounds.width,
                    };
                    return Some(canvas::Action::publish(message).and_capture());
                }
            }
            _ => {}
        }
        None
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.dragging {
            mouse::Interaction::Grabbing
        } else if self.hovered.is_some() {
            mouse::Interaction::Pointer
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}
