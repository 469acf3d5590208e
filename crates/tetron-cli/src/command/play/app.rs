use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use tetron_engine::{GravityTimer, LockReport, Phase, PieceSpawner, Session, TickOutcome};

use crate::{
    high_score::HighScoreStore,
    tui::App,
    ui::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

/// Help entries for `phase`, with the moves it rejects disabled.
fn key_bindings(phase: Phase) -> [KeyBinding<'static>; 7] {
    let playing = phase.is_falling();
    let pause = if phase.is_paused() { "Resume" } else { "Pause" };
    [
        KeyBinding::new(&["←", "→"], "Move").enabled(playing),
        KeyBinding::new(&["↓"], "Soft Drop").enabled(playing),
        KeyBinding::new(&["↑", "X"], "Rotate").enabled(playing),
        KeyBinding::new(&["Space"], "Hard Drop").enabled(playing),
        KeyBinding::new(&["P"], pause).enabled(!phase.is_game_over()),
        KeyBinding::new(&["N"], "New Game"),
        KeyBinding::new(&["Q"], "Quit"),
    ]
}

/// Terminal front-end for one [`Session`], driven by a [`GravityTimer`].
#[derive(Debug)]
pub struct PlayApp {
    session: Session,
    timer: GravityTimer,
    store: HighScoreStore,
    /// Best score known, including the running game.
    high_score: usize,
    /// Stored best when the current game started.
    high_score_at_start: usize,
    unsaved_high_score: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(spawner: PieceSpawner, store: HighScoreStore, high_score: usize) -> Self {
        let session = Session::with_spawner(spawner);
        let mut timer = GravityTimer::new();
        timer.follow(&session);
        Self {
            session,
            timer,
            store,
            high_score,
            high_score_at_start: high_score,
            unsaved_high_score: false,
            is_exiting: false,
        }
    }

    pub fn score(&self) -> usize {
        self.session.score()
    }

    /// Persists a pending high score.
    pub fn finish(&mut self) -> anyhow::Result<()> {
        self.track_high_score();
        if self.unsaved_high_score {
            self.store.save(self.high_score)?;
            self.unsaved_high_score = false;
        }
        Ok(())
    }

    fn is_new_high_score(&self) -> bool {
        self.session.score() > self.high_score_at_start
    }

    fn track_high_score(&mut self) {
        if self.session.score() > self.high_score {
            self.high_score = self.session.score();
            self.unsaved_high_score = true;
        }
    }

    /// Saves a pending high score; failures are logged, not fatal, mid-game.
    fn persist_high_score(&mut self) {
        if let Err(err) = self.finish() {
            log::warn!("failed to save high score: {err:#}");
        }
    }

    fn on_lock(&mut self, report: &LockReport) {
        if report.cleared_lines() > 0 {
            log::debug!("cleared rows {:?}", report.cleared_rows);
        }
        self.persist_high_score();
    }

    fn new_game(&mut self) {
        self.persist_high_score();
        self.high_score_at_start = self.high_score;
        self.session.new_game();
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => _ = self.session.move_left(),
            KeyCode::Right => _ = self.session.move_right(),
            KeyCode::Down => _ = self.session.soft_drop_step(),
            KeyCode::Up | KeyCode::Char('x') => _ = self.session.rotate(),
            KeyCode::Char(' ') => {
                if let Ok(report) = self.session.hard_drop() {
                    self.on_lock(&report);
                }
            }
            KeyCode::Char('p') => _ = self.session.toggle_pause(),
            KeyCode::Char('n') => self.new_game(),
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            _ => {}
        }
    }
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(key) = event.as_key_event()
            && key.kind != KeyEventKind::Release
        {
            self.handle_key(key.code);
            self.track_high_score();
            self.timer.follow(&self.session);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let display = SessionDisplay::new(&self.session, self.high_score)
            .new_high_score(self.is_new_high_score());
        let bindings = key_bindings(self.session.phase());

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(23), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(display, main_area);
        frame.render_widget(KeyBindingDisplay::new(&bindings), help_area);
    }

    fn update(&mut self, elapsed: Duration) {
        if !self.timer.advance(elapsed) {
            return;
        }
        match self.session.tick() {
            Ok(TickOutcome::Locked(report)) => self.on_lock(&report),
            Ok(TickOutcome::ToppedOut) => self.persist_high_score(),
            Ok(TickOutcome::Spawned(_) | TickOutcome::Fell) | Err(_) => {}
        }
        self.track_high_score();
        self.timer.follow(&self.session);
    }
}
