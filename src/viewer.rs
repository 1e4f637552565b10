//! Interactive timeline window.

mod axis;
mod bars;
pub mod ticks;

use crate::chart::{BarRef, Chart};
use crate::error::ReloadError;
use crate::record;
use crate::table::Table;
use crate::transform;
use crate::ui;
use crate::viewport::Viewport;
use axis::{AXIS_HEIGHT, AxisProgram};
use bars::BarsProgram;
use iced::widget::{Canvas, Space, button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Length, Point, Size, Task, Vector};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

const DETAILS_HEIGHT: f32 = 140.0;
const DETAILS_FONT: f32 = 12.0;
const DETAILS_CHAR_WIDTH: f32 = 7.0;
const DETAILS_MIN_LABEL_WIDTH: f32 = 80.0;

/// A bar under the cursor, with the cursor position inside the chart area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hover {
    pub bar: BarRef,
    pub position: Point,
}

#[derive(Debug, Clone)]
pub enum Message {
    Hovered(Option<Hover>),
    Selected(Option<BarRef>),
    Panned { delta: Vector, size: Size },
    Zoomed { delta: f32, x: f32, width: f32 },
    ResetView,
    Reload,
    OpenFile,
    FileSelected(PathBuf),
    Loaded(PathBuf, Result<Arc<Chart>, ReloadError>),
    None,
}

/// Open the viewer window for an already loaded chart. Blocks until it is closed.
pub fn run(path: PathBuf, chart: Chart) -> iced::Result {
    let chart = Arc::new(chart);
    iced::application(
        move || Viewer::new(path.clone(), chart.clone()),
        Viewer::update,
        Viewer::view,
    )
    .title(Viewer::title)
    .run()
}

struct Viewer {
    path: PathBuf,
    chart: Arc<Chart>,
    viewport: Viewport,
    hovered: Option<Hover>,
    selected: Option<BarRef>,
    status: Option<String>,
}

impl Viewer {
    fn new(path: PathBuf, chart: Arc<Chart>) -> (Self, Task<Message>) {
        let viewport = Viewport::fit(chart.min_secs, chart.max_secs);
        (
            Viewer {
                path,
                chart,
                viewport,
                hovered: None,
                selected: None,
                status: None,
            },
            Task::none(),
        )
    }

    fn title(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| record::DEFAULT_FILE_NAME.to_string());
        format!("{} - loadline", name)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Hovered(hovered) => {
                self.hovered = hovered;
            }
            Message::Selected(selected) => {
                self.selected = selected;
            }
            Message::Panned { delta, size } => {
                self.hovered = None;
                self.viewport.pan_x(delta.x, size.width);
                self.viewport
                    .pan_y(delta.y, bars::content_height(&self.chart), size.height);
            }
            Message::Zoomed { delta, x, width } => {
                self.hovered = None;
                self.viewport.zoom_at(delta, x, width);
            }
            Message::ResetView => {
                self.viewport.reset();
            }
            Message::Reload => {
                return load(self.path.clone());
            }
            Message::OpenFile => {
                let directory = self
                    .path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(std::env::temp_dir);
                return Task::perform(
                    async move {
                        rfd::AsyncFileDialog::new()
                            .add_filter("JSON event log", &["json"])
                            .set_directory(directory)
                            .pick_file()
                            .await
                    },
                    |file_handle| match file_handle {
                        Some(handle) => Message::FileSelected(handle.path().to_path_buf()),
                        None => Message::None,
                    },
                );
            }
            Message::FileSelected(path) => {
                return load(path);
            }
            Message::Loaded(path, Ok(chart)) => {
                tracing::info!(path = %path.display(), bars = chart.bar_count(), "reloaded chart");
                self.viewport = Viewport::fit(chart.min_secs, chart.max_secs);
                self.chart = chart;
                self.path = path;
                self.hovered = None;
                self.selected = None;
                self.status = None;
            }
            Message::Loaded(path, Err(err)) => {
                tracing::error!(path = %path.display(), error = %err, "failed to load events");
                self.status = Some(err.to_string());
            }
            Message::None => {}
        }
        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let toolbar = row![
            text(self.path.display().to_string()).size(13),
            Space::new().width(Length::Fill),
            button(text("Reset axes").size(12))
                .style(ui::toolbar_button)
                .on_press(Message::ResetView),
            button(text("Reload").size(12))
                .style(ui::toolbar_button)
                .on_press(Message::Reload),
            button(text("Open").size(12))
                .style(ui::toolbar_button)
                .on_press(Message::OpenFile),
        ]
        .spacing(8)
        .padding(6)
        .align_y(Alignment::Center);

        let chart = Canvas::new(BarsProgram {
            chart: &self.chart,
            viewport: self.viewport,
            hovered: self.hovered,
            selected: self.selected,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let axis = Canvas::new(AxisProgram {
            viewport: self.viewport,
        })
        .width(Length::Fill)
        .height(Length::Fixed(AXIS_HEIGHT));

        let mut content = column![toolbar, chart, axis, self.legend_view()];
        if let Some(status) = &self.status {
            content = content.push(container(text(status.as_str()).size(12)).padding(6));
        }
        content.push(self.details_view()).into()
    }

    fn legend_view(&self) -> Element<'_, Message> {
        let mut legend = row![text("Color").size(12)]
            .spacing(10)
            .padding(6)
            .align_y(Alignment::Center);

        for entry in &self.chart.legend {
            let color = entry.color;
            let swatch = container(
                Space::new()
                    .width(Length::Fixed(12.0))
                    .height(Length::Fixed(12.0)),
            )
            .style(move |theme: &iced::Theme| ui::swatch(theme, color));
            legend = legend.push(
                row![swatch, text(entry.key.to_string()).size(12)]
                    .spacing(4)
                    .align_y(Alignment::Center),
            );
        }

        scrollable(legend)
            .direction(scrollable::Direction::Horizontal(
                scrollable::Scrollbar::default(),
            ))
            .width(Length::Fill)
            .into()
    }

    fn details_view(&self) -> Element<'_, Message> {
        let Some(bar) = self.selected.and_then(|r| self.chart.bar(r)) else {
            return container(text("Select a bar to see details").size(12))
                .width(Length::Fill)
                .height(Length::Fixed(DETAILS_HEIGHT))
                .center_x(Length::Fill)
                .center_y(Length::Fixed(DETAILS_HEIGHT))
                .style(ui::panel)
                .into();
        };

        let label_width = details_label_width(&self.chart.table);
        let mut fields = column![].spacing(2).padding(8);
        for (column, value) in self.chart.table.fields(bar.row) {
            fields = fields.push(row![
                text(column.to_string())
                    .width(Length::Fixed(label_width))
                    .size(DETAILS_FONT),
                text(value.to_string()).size(DETAILS_FONT),
            ]);
        }

        container(scrollable(fields).width(Length::Fill))
            .width(Length::Fill)
            .height(Length::Fixed(DETAILS_HEIGHT))
            .style(ui::panel)
            .into()
    }
}

fn details_label_width(table: &Table) -> f32 {
    let widest = table
        .columns()
        .iter()
        .map(|column| column.width())
        .max()
        .unwrap_or(0);
    (widest as f32 * DETAILS_CHAR_WIDTH + DETAILS_FONT).max(DETAILS_MIN_LABEL_WIDTH)
}

fn load(path: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            let result = load_chart(&path);
            Message::Loaded(path, result)
        },
        |message| message,
    )
}

/// Run the whole load pipeline for a reload, reporting failures instead of exiting.
pub fn load_chart(path: &Path) -> Result<Arc<Chart>, ReloadError> {
    let records = record::load_records(path).map_err(ReloadError::from_error)?;
    if records.is_empty() {
        return Err(ReloadError::Empty(path.to_path_buf()));
    }
    let events = transform::transform_all(records).map_err(ReloadError::from_error)?;
    Ok(Arc::new(Chart::build(&events)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_trace(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn viewer() -> Viewer {
        let file = write_trace(
            r#"[{"Name":"LoadScene","Context":"main","Start":100.0,"End":100.25},
                {"Name":"7","Context":"worker","Start":100.1,"End":100.2}]"#,
        );
        let chart = load_chart(file.path()).unwrap();
        Viewer::new(file.path().to_path_buf(), chart).0
    }

    #[test]
    fn reload_pipeline_builds_a_chart() {
        let viewer = viewer();
        assert_eq!(viewer.chart.bar_count(), 2);
        assert_eq!(viewer.chart.lanes.len(), 2);
    }

    #[test]
    fn reload_of_an_empty_file_is_reported() {
        let file = write_trace("[]");
        let err = load_chart(file.path()).unwrap_err();
        assert!(matches!(err, ReloadError::Empty(_)));
    }

    #[test]
    fn reload_errors_include_the_cause() {
        let file = write_trace("[{");
        let ReloadError::Failed(message) = load_chart(file.path()).unwrap_err() else {
            panic!("expected a parse failure");
        };
        assert!(message.contains("failed to parse"));
        assert!(message.contains("EOF"), "{}", message);
    }

    #[test]
    fn failed_reload_keeps_the_current_chart() {
        let mut viewer = viewer();
        let _ = viewer.update(Message::Loaded(
            PathBuf::from("missing.json"),
            Err(ReloadError::Failed("boom".into())),
        ));
        assert_eq!(viewer.chart.bar_count(), 2);
        assert_eq!(viewer.status.as_deref(), Some("boom"));
    }

    #[test]
    fn successful_reload_replaces_chart_and_clears_selection() {
        let mut viewer = viewer();
        let _ = viewer.update(Message::Selected(Some(BarRef { lane: 0, bar: 0 })));
        let file = write_trace(r#"[{"Name":"LoadMods","Context":"mods","Start":5.0,"End":6.0}]"#);
        let chart = load_chart(file.path()).unwrap();
        let _ = viewer.update(Message::Loaded(file.path().to_path_buf(), Ok(chart)));
        assert_eq!(viewer.chart.bar_count(), 1);
        assert_eq!(viewer.selected, None);
        assert_eq!(viewer.viewport, Viewport::fit(5.0, 6.0));
    }

    #[test]
    fn zoom_and_reset() {
        let mut viewer = viewer();
        let fitted = viewer.viewport;
        let _ = viewer.update(Message::Zoomed {
            delta: 1.0,
            x: 100.0,
            width: 800.0,
        });
        assert!(viewer.viewport.span() < fitted.span());
        let _ = viewer.update(Message::ResetView);
        assert_eq!(viewer.viewport, fitted);
    }

    #[test]
    fn details_labels_fit_the_widest_column() {
        let viewer = viewer();
        assert_eq!(
            details_label_width(&viewer.chart.table),
            DETAILS_MIN_LABEL_WIDTH
        );

        let file = write_trace(
            r#"[{"Name":"LoadAsset","Context":"a","Start":1,"End":2,"AssetBundleDependencyCount":3}]"#,
        );
        let chart = load_chart(file.path()).unwrap();
        let width = details_label_width(&chart.table);
        assert_eq!(width, 26.0 * DETAILS_CHAR_WIDTH + DETAILS_FONT);
    }

    #[test]
    fn title_uses_the_file_name() {
        let viewer = viewer();
        assert!(viewer.title().ends_with(" - loadline"));
    }
}
