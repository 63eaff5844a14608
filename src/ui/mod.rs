// UI module for rendering the TUI.
// Header, event list with detail pane, and a status bar.

pub mod list;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    list::render_events_list(frame, app, body[0]);
    list::render_event_details(frame, app, body[1]);

    draw_status_bar(frame, app, chunks[2]);
}

/// Convention name, dates, and where the events came from.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let con = &app.convention;
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", con.name),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} to {}", con.start_date, con.end_date),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!("★ {}", app.likes.len()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("  ({})", app.source),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

/// Draw the status bar with keybinding hints.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" ↑↓ "),
        Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
        Span::raw("  Home/End "),
        Span::styled("Jump", Style::default().fg(Color::DarkGray)),
        Span::raw("  Space/↵ "),
        Span::styled("Like", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    if app.likes_changed {
        hints.push(Span::styled(
            "  likes saved on quit",
            Style::default().fg(Color::Yellow),
        ));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}
