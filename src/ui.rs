use iced::widget::{button, container};
use iced::{Border, Color, Theme};

/// Flat toolbar button that only shows a background while hovered or pressed.
pub fn toolbar_button(theme: &Theme, status: button::Status) -> button::Style {
    let palette = theme.extended_palette();
    let base = button::Style {
        text_color: palette.background.base.text,
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 3.0.into(),
        },
        ..Default::default()
    };
    match status {
        button::Status::Hovered => button::Style {
            background: Some(palette.background.weak.color.into()),
            ..base
        },
        button::Status::Pressed => button::Style {
            background: Some(palette.background.strong.color.into()),
            ..base
        },
        button::Status::Disabled => button::Style {
            text_color: palette.background.strong.color,
            ..base
        },
        _ => base,
    }
}

/// Legend color sample.
pub fn swatch(_theme: &Theme, color: Color) -> container::Style {
    container::Style::default()
        .background(color)
        .border(Border {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
            width: 1.0,
            radius: 2.0.into(),
        })
}

pub fn panel(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style::default()
        .background(palette.background.base.color)
        .border(Border {
            color: palette.background.strong.color,
            width: 1.0,
            ..Default::default()
        })
}
