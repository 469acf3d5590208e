use std::{io, time::Duration};

use anyhow::Context as _;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// Runs an [`App`] on the alternate screen at fixed update and frame rates.
#[derive(Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    /// Both rates are in Hz.
    pub fn new(update_rate: f64, frame_rate: f64) -> Self {
        Self {
            events: EventLoop::new(
                Duration::from_secs_f64(update_rate.recip()),
                Duration::from_secs_f64(frame_rate.recip()),
            ),
        }
    }

    /// Draws a first frame, then dispatches events until `app.should_exit()`.
    ///
    /// The terminal is restored on return, including on I/O errors.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| -> io::Result<()> {
            terminal.draw(|frame| app.draw(frame))?;
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Update(elapsed) => app.update(elapsed),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(event),
                }
            }
            Ok(())
        })
        .context("terminal I/O failed")
    }
}
