use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render_home_screen(frame: &mut Frame, app: &mut App) {
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

    match &app.session {
        Some(session) => {
            let user = &session.user;

            content_lines.push(Line::from(Span::styled(
                format!("Welcome back, {}!", user.display_name()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            content_lines.push(Line::from(""));
            content_lines.push(Line::from(Span::styled(
                format!("Email:      {}", user.email),
                Style::default().fg(Color::White),
            )));
            if !user.location.is_empty() {
                content_lines.push(Line::from(Span::styled(
                    format!("Location:   {}", user.location),
                    Style::default().fg(Color::White),
                )));
            }
            if !user.occupation.is_empty() {
                content_lines.push(Line::from(Span::styled(
                    format!("Occupation: {}", user.occupation),
                    Style::default().fg(Color::White),
                )));
            }
            if !user.picture_path.is_empty() {
                content_lines.push(Line::from(Span::styled(
                    format!("Picture:    {}", user.picture_path),
                    Style::default().fg(Color::Gray),
                )));
            }
            content_lines.push(Line::from(""));
            content_lines.push(Line::from(Span::styled(
                format!("Friends: {}", user.friends.len()),
                Style::default().fg(Color::Gray),
            )));
            if let (Some(viewed), Some(impressions)) = (user.viewed_profile, user.impressions) {
                content_lines.push(Line::from(Span::styled(
                    format!("Profile views: {} | Impressions: {}", viewed, impressions),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        None => {
            content_lines.push(Line::from(Span::styled(
                "No active session",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if let Some((notice, _)) = &app.notice {
        content_lines.push(Line::from(""));
        content_lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    let content = Paragraph::new(content_lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Home"));
    frame.render_widget(content, chunks[1]);

    let footer = Paragraph::new("L: Log out | q/Esc: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}
