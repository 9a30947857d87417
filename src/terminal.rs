// SPDX-License-Identifier: GPL-3.0-only

//! Terminal user interface
//!
//! Runs the application model in the terminal: polls the scan session,
//! redraws, and maps key presses to messages.

use crate::app::{AppModel, Message, view};
use crate::constants::timing;
use crate::export::ExportFormat;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};
use tracing::info;

/// Run the terminal UI until the user quits
pub fn run(mut app: AppModel) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app);

    // Release the camera before giving the terminal back
    if app.is_scanning() {
        app.update(Message::Quit);
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppModel,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(codes = app.store.get().len(), "Terminal UI started");

    loop {
        // Session events first, so a decode closes the scan view before drawing
        for message in app.poll_scanner() {
            app.update(message);
        }

        terminal.draw(|f| view::render(app, f))?;

        // Handle input with timeout for frame updates
        if event::poll(timing::UI_POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(message) = message_for_key(app, key)
        {
            app.status = None;
            app.update(message);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Key bindings, depending on which view has focus
fn message_for_key(app: &AppModel, key: KeyEvent) -> Option<Message> {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Char('q') => return Some(Message::Quit),
        KeyCode::Char('h') | KeyCode::Char('?') => return Some(Message::ToggleHelp),
        _ => {}
    }

    if app.confirmation.is_pending() {
        return match key.code {
            KeyCode::Enter | KeyCode::Char('y') => Some(Message::AcceptPending),
            KeyCode::Esc | KeyCode::Char('n') => Some(Message::CancelPending),
            _ => None,
        };
    }

    if app.is_scanning() {
        return match key.code {
            KeyCode::Esc => Some(Message::CloseScanner),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('s') | KeyCode::Char(' ') => Some(Message::OpenScanner),
        KeyCode::Down | KeyCode::Char('j') => Some(Message::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(Message::SelectPrevious),
        KeyCode::Char('d') | KeyCode::Delete => Some(Message::DeleteSelected),
        KeyCode::Char('t') => Some(Message::Export(ExportFormat::Text)),
        KeyCode::Char('c') => Some(Message::Export(ExportFormat::Csv)),
        _ => None,
    }
}
