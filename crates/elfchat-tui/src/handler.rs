use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, FocusPane, Screen};
use crate::tui::AppEvent;
use crate::ui;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Surface(event) => app.apply_surface_event(event),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work on every screen
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Landing => handle_landing(app, key),
        Screen::Chat => handle_chat(app, key),
    }
}

fn handle_landing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.begin_chat(),
        KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_chat(app: &mut App, key: KeyEvent) {
    // Alt+1..4 picks a suggestion from anywhere
    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c @ '1'..='9') = key.code {
            let index = c as usize - '1' as usize;
            app.send_suggestion(index);
            return;
        }
    }

    match key.code {
        KeyCode::Esc => {
            if app.focus == FocusPane::Suggestions {
                app.focus = FocusPane::Input;
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::PageUp => app.scroll_up(app.chat_height / 2),
        KeyCode::PageDown => {
            let total = ui::chat_line_count(app);
            app.scroll_down(app.chat_height / 2, total);
        }
        // Ctrl+S is the send button
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => app.send_input(),
        _ => match app.focus {
            FocusPane::Input => handle_input(app, key),
            FocusPane::Suggestions => handle_suggestions(app, key),
        },
    }
}

fn handle_suggestions(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => app.suggestion_prev(),
        KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => app.suggestion_next(),
        KeyCode::Enter | KeyCode::Char(' ') => app.send_suggestion(app.selected_suggestion),
        _ => {}
    }
}

fn handle_input(app: &mut App, key: KeyEvent) {
    // The input line is disabled while a turn runs
    if !app.accepts_input() {
        return;
    }

    match key.code {
        KeyCode::Enter => app.send_input(),
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != Screen::Chat {
        return;
    }
    let x = mouse.column;
    let y = mouse.row;

    let in_chat = app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown if in_chat => {
            let total = ui::chat_line_count(app);
            app.scroll_down(3, total);
        }
        MouseEventKind::ScrollUp if in_chat => app.scroll_up(3),
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = app.suggestion_areas.iter().position(|r| point_in_rect(x, y, *r)) {
                app.send_suggestion(index);
            } else if app.send_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false) {
                app.send_input();
            }
        }
        _ => {}
    }
}
