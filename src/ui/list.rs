// Event list and detail rendering.
// Shared by the TUI and the plain-text `--print` output.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::tte::ConventionEvent;

/// Public site prefix for view URIs.
pub const SITE_URL: &str = "https://tabletop.events";

/// Public link for a view URI.
pub fn event_url(view_uri: &str) -> String {
    format!("{SITE_URL}{view_uri}")
}

/// Format minutes like `2h30m`.
pub fn format_duration(minutes: u64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h{m}m"),
    }
}

/// Labelled fields describing one event, in display order.
pub fn event_details(event: &ConventionEvent, type_name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", event.name.clone()),
        ("number", event.event_number.to_string()),
        ("type", type_name.to_string()),
        ("start", event.startdaypart_name.to_string()),
        ("duration", format_duration(event.duration)),
        ("description", event.description.replace('\n', " ")),
        ("publisher", event.custom_fields.publisher.clone()),
        ("host group", event.custom_fields.hosting_group.clone()),
        ("game master", event.custom_fields.game_master.clone()),
        ("url", event_url(&event.view_uri)),
    ]
}

/// Plain-text block for one event, wrapping long values at `width`.
pub fn format_event_block(event: &ConventionEvent, type_name: &str, liked: bool, width: usize) -> String {
    let mut out = String::new();
    for (key, value) in event_details(event, type_name) {
        let value = if key == "name" && liked {
            format!("(*){value}")
        } else {
            value
        };
        let chunks = wrap(&value, width);
        for (i, chunk) in chunks.iter().enumerate() {
            let label = if i == 0 { format!("{key}:") } else { String::new() };
            out.push_str(&format!("{label:>13} {chunk}\n"));
        }
    }
    out
}

fn wrap(value: &str, width: usize) -> Vec<String> {
    if width == 0 || value.chars().count() <= width {
        return vec![value.to_string()];
    }
    value
        .chars()
        .collect::<Vec<_>>()
        .chunks(width)
        .map(|c| c.iter().collect())
        .collect()
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(" Events "));
    frame.render_widget(text, area);
}

/// Render the filtered events list.
pub fn render_events_list(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.events.is_empty() {
        render_empty(frame, area, "No events match the filters");
        return;
    }

    let items: Vec<ListItem> = app
        .events
        .iter()
        .map(|event| {
            let marker = if app.is_liked(event) {
                Span::styled("★ ", Style::default().fg(Color::Yellow))
            } else {
                Span::raw("  ")
            };
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(
                    format!("{:>5} ", event.event_number),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(&event.name, Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("  {}", event.startdaypart_name),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let title = format!(" Events ({}/{}) ", app.events.len(), app.total_events);
    let list_widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut app.list_state);
}

/// Render the detail pane for the selected event.
pub fn render_event_details(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");
    let Some(event) = app.selected_event() else {
        frame.render_widget(block, area);
        return;
    };

    let mut lines: Vec<Line> = event_details(event, app.type_name(event))
        .into_iter()
        .map(|(key, value)| {
            Line::from(vec![
                Span::styled(format!("{key:>12}: "), Style::default().fg(Color::DarkGray)),
                Span::raw(value),
            ])
        })
        .collect();

    if app.is_liked(event) {
        lines.insert(
            0,
            Line::from(Span::styled(
                "★ liked",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        );
    }
    if !event.long_description.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::raw(event.long_description.clone()));
    }

    let text = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}
