// App state and main event loop.
// Browses a filtered event list and toggles liked markers.

use std::collections::HashMap;
use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::ListState;

use crate::cache::LikedEvents;
use crate::tte::{Convention, ConventionEvent};
use crate::ui;

/// Main application state.
pub struct App {
    pub convention: Convention,
    /// Filtered and sorted events on display.
    pub events: Vec<ConventionEvent>,
    /// Total events before filtering.
    pub total_events: usize,
    /// Type display names keyed by relationship URI.
    pub type_names: HashMap<String, String>,
    pub likes: LikedEvents,
    /// Where the events came from ("live", "cached 5m0s ago").
    pub source: String,
    pub list_state: ListState,
    /// Whether likes changed since launch.
    pub likes_changed: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        convention: Convention,
        events: Vec<ConventionEvent>,
        total_events: usize,
        type_names: HashMap<String, String>,
        likes: LikedEvents,
        source: String,
    ) -> Self {
        let mut list_state = ListState::default();
        if !events.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            convention,
            events,
            total_events,
            type_names,
            likes,
            source,
            list_state,
            likes_changed: false,
            should_quit: false,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.select_last(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_like(),
            _ => {}
        }
    }

    /// Get the selected event.
    pub fn selected_event(&self) -> Option<&ConventionEvent> {
        self.events.get(self.list_state.selected()?)
    }

    pub fn is_liked(&self, event: &ConventionEvent) -> bool {
        self.likes.contains(&event.view_uri)
    }

    pub fn type_name(&self, event: &ConventionEvent) -> &str {
        self.type_names
            .get(&event.relationships.kind)
            .map(String::as_str)
            .unwrap_or("")
    }

    fn toggle_selected_like(&mut self) {
        let Some(uri) = self.selected_event().map(|e| e.view_uri.clone()) else {
            return;
        };
        let liked = self.likes.toggle(&uri);
        tracing::debug!(uri = %uri, liked, "toggled like");
        self.likes_changed = true;
    }

    fn select_next(&mut self) {
        if self.events.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.events.len() => i + 1,
            Some(i) => i, // Stay at end
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        if self.events.is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    fn select_first(&mut self) {
        if !self.events.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.events.is_empty() {
            self.list_state.select(Some(self.events.len() - 1));
        }
    }
}
