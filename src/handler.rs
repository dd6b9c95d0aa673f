use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_key_input {
        handle_key_input_popup(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_chat_editing(app, key),
    }
}

fn handle_key_input_popup(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.show_key_input = false;
            app.key_input.clear();
            app.key_cursor = 0;
        }
        KeyCode::Enter => {
            // Takes effect immediately; held in memory only, never saved.
            app.assistant.set_api_key(&app.key_input);
            app.show_key_input = false;
            app.key_input.clear();
            app.key_cursor = 0;
        }
        KeyCode::Backspace => {
            if app.key_cursor > 0 {
                app.key_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.key_input, app.key_cursor);
                app.key_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.key_cursor = app.key_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.key_input.chars().count();
            app.key_cursor = (app.key_cursor + 1).min(char_count);
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.key_input, app.key_cursor);
            app.key_input.insert(byte_pos, c);
            app.key_cursor += 1;
        }
        _ => {}
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,

        // Chat widget toggle
        KeyCode::Char('a') => app.toggle_chat(),

        // API key popup
        KeyCode::Char('K') => {
            app.show_key_input = true;
            app.key_input.clear();
            app.key_cursor = 0;
        }

        // Tab cycles focus
        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusPane::Navigation => FocusPane::Content,
                FocusPane::Content => {
                    if app.chat_open {
                        FocusPane::ChatInput
                    } else {
                        FocusPane::Navigation
                    }
                }
                FocusPane::ChatInput => FocusPane::Navigation,
            };
            // Auto-enter editing mode when focusing the chat input
            if app.focus == FocusPane::ChatInput {
                app.input_mode = InputMode::Editing;
                app.chat_cursor = app.chat_input.chars().count();
            }
        }

        // Navigation / scrolling
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Navigation => app.nav_down(),
            FocusPane::Content => app.scroll_down(),
            FocusPane::ChatInput => {}
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Navigation => app.nav_up(),
            FocusPane::Content => app.scroll_up(),
            FocusPane::ChatInput => {}
        },
        KeyCode::Char('g') => match app.focus {
            FocusPane::Navigation => app.nav_first(),
            FocusPane::Content => app.content_scroll = 0,
            FocusPane::ChatInput => {}
        },
        KeyCode::Char('G') => match app.focus {
            FocusPane::Navigation => app.nav_last(),
            FocusPane::Content => {
                app.content_scroll = app
                    .total_content_lines
                    .saturating_sub(app.content_height);
            }
            FocusPane::ChatInput => {}
        },

        // Half-page scroll for the detail pane
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if app.focus == FocusPane::Content {
                app.scroll_half_page_down();
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if app.focus == FocusPane::Content {
                app.scroll_half_page_up();
            }
        }

        // Enter/Select
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if app.focus == FocusPane::Navigation {
                app.nav_enter();
            }
        }

        // Back
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
            if app.focus == FocusPane::Content {
                app.focus = FocusPane::Navigation;
            } else if app.focus == FocusPane::Navigation {
                app.nav_back();
            }
        }

        KeyCode::Esc => {
            if app.chat_open {
                app.close_chat();
            }
        }

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.submit_message();
        }
        KeyCode::Backspace => {
            if app.chat_cursor > 0 {
                app.chat_cursor -= 1;
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.chat_input.chars().count();
            if app.chat_cursor < char_count {
                let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
                app.chat_input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.chat_cursor = app.chat_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat_input.chars().count();
            app.chat_cursor = (app.chat_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.chat_cursor = 0;
        }
        KeyCode::End => {
            app.chat_cursor = app.chat_input.chars().count();
        }
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.focus = FocusPane::Navigation;
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.chat_input, app.chat_cursor);
            app.chat_input.insert(byte_pos, c);
            app.chat_cursor += 1;
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_nav = app.nav_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_content = app
        .content_area
        .map(|r| point_in_rect(x, y, r))
        .unwrap_or(false);
    let in_chat = app
        .chat_pane_area
        .map(|r| point_in_rect(x, y, r))
        .unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_chat {
                app.chat_scroll = app.chat_scroll.saturating_add(3);
            } else if in_content {
                app.scroll_down();
                app.scroll_down();
                app.scroll_down();
            } else if in_nav {
                app.nav_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if in_chat {
                app.chat_scroll = app.chat_scroll.saturating_sub(3);
            } else if in_content {
                app.scroll_up();
                app.scroll_up();
                app.scroll_up();
            } else if in_nav {
                app.nav_up();
            }
        }
        _ => {}
    }
}
