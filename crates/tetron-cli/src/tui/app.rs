use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

/// A screen driven by [`Tui::run`](super::Tui::run).
pub trait App {
    fn should_exit(&self) -> bool;

    /// Reacts to key input, resize and other terminal events.
    fn handle_event(&mut self, event: Event);

    /// Advances time-driven state by `elapsed` since the previous update.
    fn update(&mut self, elapsed: Duration);

    fn draw(&self, frame: &mut Frame);
}
