use std::time::Duration;

use crate::{Phase, Session};

/// Countdown that tells a driver when to call [`Session::tick`].
///
/// The timer holds no clock of its own: the driver reports elapsed time through
/// [`advance`](Self::advance) and re-synchronizes with [`follow`](Self::follow)
/// after every command. At most one tick is due per `advance` call, so a stalled
/// driver never replays a burst of missed ticks.
///
/// | session phase | timer                                                        |
/// |---------------|--------------------------------------------------------------|
/// | `Spawning`    | due immediately                                              |
/// | `Falling`     | armed; restarts at the full interval for each new piece and  |
/// |               | whenever the interval changes                                |
/// | `Paused`      | disarmed                                                     |
/// | `GameOver`    | disarmed                                                     |
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tetron_engine::{GravityTimer, Session};
///
/// let mut session = Session::new();
/// let mut timer = GravityTimer::new();
///
/// timer.follow(&session);
/// assert!(timer.advance(Duration::ZERO)); // first piece is due right away
/// session.tick().unwrap();
/// timer.follow(&session);
///
/// assert!(!timer.advance(Duration::from_millis(999)));
/// assert!(timer.advance(Duration::from_millis(1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GravityTimer {
    state: TimerState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TimerState {
    #[default]
    Disarmed,
    Armed {
        remaining: Duration,
        period: Duration,
        /// Locked piece count when armed; a change means a new active piece.
        pieces: usize,
    },
}

impl GravityTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TimerState::Disarmed,
        }
    }

    /// Re-synchronizes the timer with the session's phase, active piece and level.
    pub fn follow(&mut self, session: &Session) {
        let period = session.fall_interval();
        let pieces = session.stats().completed_pieces();
        let armed = |remaining| TimerState::Armed {
            remaining,
            period,
            pieces,
        };
        self.state = match (session.phase(), self.state) {
            (Phase::Paused | Phase::GameOver, _) => TimerState::Disarmed,
            (Phase::Spawning, _) => armed(Duration::ZERO),
            (Phase::Falling, state @ TimerState::Armed { remaining, .. })
                if state == armed(remaining) =>
            {
                state
            }
            (Phase::Falling, _) => armed(period),
        };
    }

    /// Consumes `elapsed` and returns whether a tick is due.
    ///
    /// When the countdown expires it restarts from the current period.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let TimerState::Armed {
            remaining, period, ..
        } = &mut self.state
        else {
            return false;
        };
        *remaining = remaining.saturating_sub(elapsed);
        if !remaining.is_zero() {
            return false;
        }
        *remaining = *period;
        true
    }

    /// Time left until the next tick, or `None` while disarmed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        match self.state {
            TimerState::Disarmed => None,
            TimerState::Armed { remaining, .. } => Some(remaining),
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }
}
