use crate::app::state::{App, Screen};
use crate::form::Field;
use crate::log_key_event;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    log_key_event!(
        app.log_config,
        "Key pressed: {:?} on {:?}",
        key.code,
        app.current_screen
    );

    // Priority 1: Picture picker modal (highest priority)
    if app.picker.open {
        return handle_picker_keys(app, key);
    }

    match app.current_screen {
        Screen::Auth => handle_auth_keys(app, key),
        Screen::Home => handle_home_keys(app, key),
    }
}

fn handle_picker_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.close_picture_picker(),
        KeyCode::Up => app.picker.select_prev(),
        KeyCode::Down => app.picker.select_next(),
        KeyCode::Enter => app.confirm_picker_selection(),
        KeyCode::Backspace | KeyCode::Left => app.picker_ascend(),
        _ => {}
    }
    Ok(())
}

fn handle_auth_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    // One submission at a time; only quitting works while a request is in
    // flight.
    if app.form.submitting {
        if key.code == KeyCode::Esc {
            app.running = false;
        }
        return Ok(());
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('t') | KeyCode::Char('T') = key.code {
            app.toggle_form_mode();
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Esc => app.running = false,
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(),
        KeyCode::Enter => {
            // The picture field opens the file picker; everything else
            // submits the form.
            if app.form.focused_field() == Field::Picture {
                app.open_picture_picker();
            } else {
                app.request_submit();
            }
        }
        KeyCode::Backspace => app.form.delete_char(),
        KeyCode::Char(c) => app.form.insert_char(c),
        _ => {}
    }
    Ok(())
}

fn handle_home_keys(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.running = false,
        // Shift+L to log out
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
    Ok(())
}
