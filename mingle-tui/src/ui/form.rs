use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::form::{Field, FormMode};

const LOGO_LINES: [&str; 6] = [
    " __  __ _             _      ",
    "|  \\/  (_)_ __   __ _| | ___ ",
    "| |\\/| | | '_ \\ / _` | |/ _ \\",
    "| |  | | | | | | (_| | |  __/",
    "|_|  |_|_|_| |_|\\__, |_|\\___|",
    "                |___/        ",
];

// Fixed-width rows keep the centered form visually aligned
const VALUE_WIDTH: usize = 30;
const ROW_WIDTH: usize = VALUE_WIDTH + 14;

pub fn render_auth_screen(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new("Mingle - Terminal Social Platform")
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let mut content_lines = vec![Line::from("")];

    for logo_line in LOGO_LINES {
        content_lines.push(Line::from(Span::styled(
            logo_line,
            Style::default().fg(Color::Cyan),
        )));
    }
    content_lines.push(Line::from(""));

    let heading = match app.form.mode {
        FormMode::Login => "Sign in to your account",
        FormMode::Register => "Create your account",
    };
    content_lines.push(Line::from(Span::styled(
        heading,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));
    content_lines.push(Line::from(""));

    let focused = app.form.focused_field();

    for &field in app.form.fields() {
        let is_focused = field == focused && !app.form.submitting;
        let prefix = if is_focused { "▶ " } else { "  " };
        let label = format!("{:<12}", format!("{}:", field.label()));

        let mut shown = match field {
            Field::Picture => match &app.form.values.picture {
                Some(path) => path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
                None => String::from("(Enter to browse)"),
            },
            _ => {
                let text = app.form.values.text(field);
                if field.is_secret() {
                    "•".repeat(text.chars().count())
                } else {
                    text.to_string()
                }
            }
        };
        if is_focused && field != Field::Picture {
            shown.push('█');
        }
        let value = format!("{:<width$}", shown, width = VALUE_WIDTH);

        let label_style = if is_focused {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value_style = if field == Field::Picture && app.form.values.picture.is_none() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        content_lines.push(Line::from(vec![
            Span::styled(prefix, Style::default().fg(Color::Cyan)),
            Span::styled(label, label_style),
            Span::styled(value, value_style),
        ]));

        if let Some(message) = app.form.visible_error(field) {
            content_lines.push(Line::from(Span::styled(
                format!("{:<width$}", format!("  {}", message), width = ROW_WIDTH),
                Style::default().fg(Color::Red),
            )));
        }
    }

    content_lines.push(Line::from(""));

    if app.form.submitting {
        let waiting = match app.form.mode {
            FormMode::Login => "Signing in...",
            FormMode::Register => "Creating account...",
        };
        content_lines.push(Line::from(Span::styled(
            waiting,
            Style::default().fg(Color::Yellow),
        )));
    } else {
        content_lines.push(Line::from(Span::styled(
            format!("Press Enter to {}", app.form.mode.submit_label()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(error) = &app.form.error {
        content_lines.push(Line::from(""));
        content_lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    if let Some((notice, _)) = &app.notice {
        content_lines.push(Line::from(""));
        content_lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    content_lines.push(Line::from(""));
    content_lines.push(Line::from(Span::styled(
        format!("{} (Ctrl+T)", app.form.mode.toggle_hint()),
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::UNDERLINED),
    )));

    let content = Paragraph::new(content_lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Authentication"),
        );
    frame.render_widget(content, chunks[1]);

    let footer_text = if app.form.submitting {
        "Esc: Quit"
    } else if focused == Field::Picture {
        "Enter: Browse | Tab/↓: Next | Shift+Tab/↑: Previous | Ctrl+T: Switch mode | Esc: Quit"
    } else {
        "Enter: Submit | Tab/↓: Next | Shift+Tab/↑: Previous | Ctrl+T: Switch mode | Esc: Quit"
    };

    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}
