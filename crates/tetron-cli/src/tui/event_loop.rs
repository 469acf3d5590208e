use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Fixed-rate clock for game updates and frames, interleaved with terminal input.
///
/// Updates take priority over frames so that gravity keeps pace when drawing
/// falls behind.
#[derive(Debug)]
pub(super) struct EventLoop {
    update_interval: Duration,
    frame_interval: Duration,
    last_update: Instant,
    last_frame: Instant,
}

impl EventLoop {
    pub(super) fn new(update_interval: Duration, frame_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            update_interval,
            frame_interval,
            last_update: now,
            last_frame: now,
        }
    }

    /// Blocks until an update or frame is due, or a terminal event arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            let since_update = now.duration_since(self.last_update);
            if since_update >= self.update_interval {
                self.last_update = now;
                return Ok(TuiEvent::Update(since_update));
            }
            if now.duration_since(self.last_frame) >= self.frame_interval {
                self.last_frame = now;
                return Ok(TuiEvent::Render);
            }
            if event::poll(self.timeout(now))? {
                return Ok(event::read()?.into());
            }
        }
    }

    fn timeout(&self, now: Instant) -> Duration {
        let next_update = self.last_update + self.update_interval;
        let next_frame = self.last_frame + self.frame_interval;
        next_update.min(next_frame).saturating_duration_since(now)
    }
}
