// SPDX-License-Identifier: GPL-3.0-only

//! Terminal view
//!
//! The list view is always underneath; the scan view and the confirmation
//! dialog are drawn over it as modals. The bottom line is the status bar.

use crate::app::camera_preview::FrameWidget;
use crate::app::state::{AppModel, ScannerState, ScannerStatus};
use crate::fl;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Clear, List, ListItem, ListState, Paragraph, Widget, Wrap},
};

/// Draw the whole application into `frame`
pub fn render(app: &AppModel, frame: &mut Frame) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    render_list(app, frame, main_area);

    if let Some(scanner) = &app.scanner {
        render_scanner(scanner, frame, main_area);
    }

    if let Some(code) = app.confirmation.pending() {
        render_confirmation(code, app.confirmation.is_duplicate(app.store.get()), frame, main_area);
    }

    frame.render_widget(StatusBar::new(app), status_area);
}

fn render_list(app: &AppModel, frame: &mut Frame, area: Rect) {
    let list = app.store.get();
    let block = Block::bordered().title(Line::from(fl!("app-title")).bold());

    if list.is_empty() {
        let text = Text::from(vec![
            Line::from(fl!("list-empty-title")).bold(),
            Line::default(),
            Line::from(fl!("list-empty-hint")),
        ]);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let [centered] = Layout::vertical([Constraint::Length(text.height() as u16)])
            .flex(Flex::Center)
            .areas(inner);
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            centered,
        );
        return;
    }

    let items: Vec<ListItem> = list
        .iter()
        .enumerate()
        .map(|(index, code)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>4}  ", index + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(code.to_string()),
            ]))
        })
        .collect();

    let widget = List::new(items)
        .block(block.title(Line::from(fl!("list-title", count = list.len())).right_aligned()))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected.min(list.len() - 1)));
    frame.render_stateful_widget(widget, area, &mut state);
}

fn render_scanner(scanner: &ScannerState, frame: &mut Frame, area: Rect) {
    let area = modal_area(area, 90, 90);
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(Line::from(fl!("scan-title")).bold())
        .title_bottom(Line::from(fl!("scan-hint")).centered());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &scanner.status {
        ScannerStatus::Failed(error) => {
            let text = Text::from(vec![
                Line::from(fl!("scan-error-title")).bold(),
                Line::from(fl!("scan-error-permissions")),
                Line::from(error.to_string()),
            ]);
            let [centered] = Layout::vertical([Constraint::Length(text.height() as u16)])
                .flex(Flex::Center)
                .areas(inner);
            frame.render_widget(
                Paragraph::new(text)
                    .style(Style::default().fg(Color::Red))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                centered,
            );
        }
        ScannerStatus::Starting => {
            let placeholder = fl!("scan-starting");
            frame.render_widget(FrameWidget::new(None, &placeholder), inner);
        }
        ScannerStatus::Streaming(device) => {
            let placeholder = fl!("scan-waiting-frame", device = device.name.clone());
            frame.render_widget(
                FrameWidget::new(scanner.preview.as_deref(), &placeholder),
                inner,
            );
        }
    }
}

fn render_confirmation(code: &str, duplicate: bool, frame: &mut Frame, area: Rect) {
    let area = modal_area(area, 60, 50);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(fl!("confirm-scanned")),
        Line::default(),
        Line::from(code.to_string()).bold(),
        Line::default(),
    ];
    if duplicate {
        lines.push(Line::from(fl!("confirm-duplicate")).style(Style::default().fg(Color::Yellow)));
        lines.push(Line::default());
        lines.push(Line::from(fl!("confirm-keys-duplicate")));
    } else {
        lines.push(Line::from(fl!("confirm-keys")));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::bordered().title(Line::from(fl!("confirm-title")).bold()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Centered rect covering the given percentages of `area`
fn modal_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Status bar widget
struct StatusBar {
    message: String,
    is_error: bool,
}

impl StatusBar {
    fn new(app: &AppModel) -> Self {
        if let Some(status) = &app.status {
            return Self {
                message: status.text().to_string(),
                is_error: status.is_error(),
            };
        }

        let message = if app.show_help {
            fl!("help")
        } else if app.confirmation.is_pending() {
            fl!("keys-confirm")
        } else if app.is_scanning() {
            fl!("keys-scan")
        } else if app.store.get().is_empty() {
            fl!("keys-list-empty")
        } else {
            fl!("keys-list")
        };

        Self {
            message,
            is_error: false,
        }
    }
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = if self.is_error { Color::Red } else { Color::DarkGray };
        let style = Style::default().fg(Color::White).bg(bg);

        // Fill background
        buf.set_style(area, style);
        buf.set_stringn(area.x, area.y, &self.message, area.width as usize, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::frame_processor::DecodeOutcome;
    use crate::app::state::{AppServices, Message};
    use crate::backends::camera::{
        BackendResult, CameraBackend, CameraDevice, CameraFrame, CameraRequest, CameraStream,
    };
    use crate::config::Config;
    use crate::constants::storage::LIST_KEY;
    use crate::export::DirectorySaver;
    use crate::storage::MemoryStore;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;

    struct NoCamera;

    impl CameraBackend for NoCamera {
        fn enumerate_cameras(&self) -> BackendResult<Vec<CameraDevice>> {
            Ok(Vec::new())
        }

        fn open(&self, _request: &CameraRequest) -> BackendResult<Box<dyn CameraStream>> {
            Err(crate::errors::CameraError::NoCameraFound)
        }

        fn name(&self) -> &'static str {
            "none"
        }
    }

    fn app(codes: &str) -> AppModel {
        AppModel::new(
            Config::default(),
            AppServices {
                store: Box::new(MemoryStore::new().with_entry(LIST_KEY, codes)),
                camera_backend: Arc::new(NoCamera),
                decoder: Arc::new(|_: &CameraFrame| DecodeOutcome::NotFound),
                saver: Box::new(DirectorySaver::new(std::env::temp_dir())),
            },
        )
    }

    fn draw(app: &AppModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| render(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_list_shows_codes() {
        let screen = draw(&app(r#"["9780306406157","9780140449136"]"#));
        assert!(screen.contains("9780306406157"));
        assert!(screen.contains("9780140449136"));
    }

    #[test]
    fn test_empty_list_shows_empty_state() {
        let screen = draw(&app("[]"));
        let title = fl!("list-empty-title");
        assert!(screen.contains(&title));
    }

    #[test]
    fn test_confirmation_dialog_shows_code() {
        let mut app = app(r#"["A"]"#);
        app.update(Message::OpenScanner);
        app.update(Message::CodeDecoded("9780306406157".into()));

        let screen = draw(&app);
        assert!(screen.contains("9780306406157"));
        assert!(screen.contains(&fl!("confirm-title")));
    }
}
