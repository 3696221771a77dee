use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render_picker_modal(frame: &mut Frame, app: &mut App, area: Rect) {
    let modal_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, modal_area);

    // Rows available for entries once borders and chrome lines are accounted for
    let inner_height = modal_area.height.saturating_sub(2) as usize;
    let list_rows = inner_height.saturating_sub(4).max(1);

    let picker = &app.picker;

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Directory: {}", picker.dir.display()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    if picker.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (no folders or images here)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        let start = if picker.selected + 1 > list_rows {
            picker.selected + 1 - list_rows
        } else {
            0
        };
        for (index, entry) in picker
            .entries
            .iter()
            .enumerate()
            .skip(start)
            .take(list_rows)
        {
            let is_selected = index == picker.selected;
            let prefix = if is_selected { "▶ " } else { "  " };
            let name = if entry.is_dir {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            let mut style = if entry.is_dir {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            if is_selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            lines.push(Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Cyan)),
                Span::styled(name, style),
            ]));
        }
    }

    if let Some(error) = &picker.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑/↓: Move | Enter: Open/Select | Backspace: Up | Esc: Cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Select a picture ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(modal, modal_area);
}

/// Helper function to create a centered rect using up certain percentage of the available rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
