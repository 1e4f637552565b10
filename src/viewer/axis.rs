use crate::viewer::{Message, ticks};
use crate::viewport::Viewport;
use iced::mouse;
use iced::widget::canvas::{self, Geometry, Program};
use iced::{Color, Point, Rectangle, Renderer, Theme};
use unicode_width::UnicodeWidthStr;

pub const AXIS_HEIGHT: f32 = 44.0;
pub const AXIS_TITLE: &str = "Timestamp";

/// Approximate glyph advance used to center labels on their anchor.
const LABEL_CHAR_WIDTH: f32 = 6.0;

fn centered(text: &str, x: f32, char_width: f32) -> f32 {
    x - text.width() as f32 * char_width / 2.0
}

pub struct AxisProgram {
    pub viewport: Viewport,
}

impl Program<Message> for AxisProgram {
    type State = ();

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

        frame.stroke(
            &canvas::Path::line(Point::ORIGIN, Point::new(bounds.width, 0.0)),
            canvas::Stroke::default()
                .with_color(Color::from_rgb(0.55, 0.55, 0.55))
                .with_width(1.0),
        );

        for tick in ticks::ticks(self.viewport.start, self.viewport.end, bounds.width) {
            let x = self.viewport.x_of(tick, bounds.width);
            frame.stroke(
                &canvas::Path::line(Point::new(x, 0.0), Point::new(x, 5.0)),
                canvas::Stroke::default()
                    .with_color(Color::from_rgb(0.36, 0.36, 0.36))
                    .with_width(1.0),
            );
            let label = ticks::format_tick(tick);
            frame.fill_text(canvas::Text {
                position: Point::new(centered(&label, x, LABEL_CHAR_WIDTH), 7.0),
                content: label,
                color: Color::from_rgb(0.3, 0.3, 0.3),
                size: 11.0.into(),
                ..Default::default()
            });
        }

        frame.fill_text(canvas::Text {
            content: AXIS_TITLE.to_string(),
            position: Point::new(
                centered(AXIS_TITLE, bounds.width / 2.0, LABEL_CHAR_WIDTH + 1.0),
                24.0,
            ),
            color: Color::from_rgb(0.2, 0.2, 0.2),
            size: 13.0.into(),
            ..Default::default()
        });

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_centered_on_their_anchor() {
        assert_eq!(centered("07.250", 100.0, 6.0), 82.0);
        assert_eq!(centered("", 100.0, 6.0), 100.0);
    }
}
