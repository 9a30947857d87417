// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview widget implementation
//!
//! Each terminal cell shows two vertical pixels: the upper half block (▀) is
//! colored with the foreground, the lower half with the background.

use crate::backends::camera::types::CameraFrame;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Share of the preview width/height covered by the aiming guide
const GUIDE_WIDTH_RATIO: f64 = 0.7;
const GUIDE_HEIGHT_RATIO: f64 = 0.4;

/// Widget that renders a camera frame using half-block characters
pub struct FrameWidget<'a> {
    frame: Option<&'a CameraFrame>,
    placeholder: &'a str,
    show_guide: bool,
}

impl<'a> FrameWidget<'a> {
    /// `placeholder` is shown centered while there is no frame
    pub fn new(frame: Option<&'a CameraFrame>, placeholder: &'a str) -> Self {
        Self {
            frame,
            placeholder,
            show_guide: true,
        }
    }

    pub fn show_guide(mut self, show: bool) -> Self {
        self.show_guide = show;
        self
    }
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let Some(frame) = self.frame.filter(|f| f.width > 0 && f.height > 0) else {
            render_centered(self.placeholder, area, buf);
            return;
        };

        let display = fit_frame(frame.width, frame.height, area);
        if display.width == 0 || display.height == 0 {
            return;
        }

        let x_scale = frame.width as f64 / display.width as f64;
        let y_scale = frame.height as f64 / (display.height as f64 * 2.0);

        for ty in 0..display.height {
            for tx in 0..display.width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let (r, g, b) = frame.rgb_at(src_x, src_y_top);
                let top = Color::Rgb(r, g, b);
                let (r, g, b) = frame.rgb_at(src_x, src_y_bottom);
                let bottom = Color::Rgb(r, g, b);

                if let Some(cell) = buf.cell_mut((display.x + tx, display.y + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(top);
                    cell.set_bg(bottom);
                }
            }
        }

        if self.show_guide {
            render_guide(display, buf);
        }
    }
}

/// Largest rect inside `area` with the frame's aspect ratio, centered
fn fit_frame(width: u32, height: u32, area: Rect) -> Rect {
    let frame_aspect = width as f64 / height as f64;
    let term_width = area.width as f64;
    let term_height = area.height as f64 * 2.0;

    let (display_width, display_height) = if term_width / term_height > frame_aspect {
        // Terminal is wider - fit to height
        let h = term_height;
        ((h * frame_aspect) as u16, (h / 2.0) as u16)
    } else {
        // Terminal is taller - fit to width
        let w = term_width;
        (w as u16, (w / frame_aspect / 2.0) as u16)
    };

    let display_width = display_width.min(area.width);
    let display_height = display_height.min(area.height);

    Rect {
        x: area.x + (area.width - display_width) / 2,
        y: area.y + (area.height - display_height) / 2,
        width: display_width,
        height: display_height,
    }
}

/// Dashed aiming rectangle in the middle of the preview
fn render_guide(display: Rect, buf: &mut Buffer) {
    let width = (display.width as f64 * GUIDE_WIDTH_RATIO) as u16;
    let height = (display.height as f64 * GUIDE_HEIGHT_RATIO) as u16;
    if width < 3 || height < 2 {
        return;
    }

    let left = display.x + (display.width - width) / 2;
    let top = display.y + (display.height - height) / 2;
    let right = left + width - 1;
    let bottom = top + height - 1;
    let style = Style::default().fg(Color::White);

    for x in (left..=right).step_by(2) {
        for y in [top, bottom] {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char('╌');
                cell.set_style(style);
            }
        }
    }
    for y in (top..=bottom).step_by(2) {
        for x in [left, right] {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char('╎');
                cell.set_style(style);
            }
        }
    }
}

fn render_centered(text: &str, area: Rect, buf: &mut Buffer) {
    let len = text.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(len) / 2;
    let y = area.y + area.height / 2;
    let width = area.width.saturating_sub(x - area.x);
    buf.set_stringn(x, y, text, width as usize, Style::default());
}
