/// Animation clock shared by the demo simulators.
///
/// The clock does not read time itself: callers pass `now` on every call, so
/// the same state machine runs under a frame loop, a tokio interval, or a test.
use std::time::Instant;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockState {
    Idle,
    Running,
    Completed,
}

impl ClockState {
    pub fn as_str(self) -> &'static str {
        match self {
            ClockState::Idle => "idle",
            ClockState::Running => "running",
            ClockState::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationClock {
    state: ClockState,
    started_at: Option<Instant>,
    elapsed_ms: f64,
    max_duration_ms: f64,
    speed: f64,
}

impl SimulationClock {
    /// `speed` scales wall time into simulated time; non-positive values fall back to 1.
    pub fn new(max_duration_ms: f64, speed: f64) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 { speed } else { 1.0 };
        Self {
            state: ClockState::Idle,
            started_at: None,
            elapsed_ms: 0.0,
            max_duration_ms: max_duration_ms.max(0.0),
            speed,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn max_duration_ms(&self) -> f64 {
        self.max_duration_ms
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Idle or completed -> running from zero. No effect while already running.
    pub fn start(&mut self, now: Instant) {
        if self.state == ClockState::Running {
            return;
        }
        self.state = ClockState::Running;
        self.started_at = Some(now);
        self.elapsed_ms = 0.0;
        if self.max_duration_ms == 0.0 {
            self.state = ClockState::Completed;
        }
    }

    /// Advance a running clock to `now`, completing it once the maximum is reached.
    pub fn tick(&mut self, now: Instant) -> ClockState {
        let (ClockState::Running, Some(started_at)) = (self.state, self.started_at) else {
            return self.state;
        };

        let wall_ms = now.saturating_duration_since(started_at).as_nanos() as f64 / 1_000_000.0;
        let scaled = (wall_ms * self.speed).max(self.elapsed_ms);

        if scaled >= self.max_duration_ms {
            self.elapsed_ms = self.max_duration_ms;
            self.state = ClockState::Completed;
        } else {
            self.elapsed_ms = scaled;
        }
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ClockState::Idle;
        self.started_at = None;
        self.elapsed_ms = 0.0;
    }

    /// New settings produce a new maximum. A completed clock is reset so the
    /// old final frame is never shown against the new timeline.
    pub fn set_max_duration(&mut self, max_duration_ms: f64) {
        self.max_duration_ms = max_duration_ms.max(0.0);
        if self.state == ClockState::Completed {
            self.reset();
        }
    }
}
