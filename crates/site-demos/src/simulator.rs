use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::clock::{ClockState, SimulationClock};
use crate::error::SimError;
use crate::scenario::{PhaseKind, ScenarioModel, Timeline};

/// What one scenario shows at a given point of the animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSnapshot {
    pub id: String,
    pub label: String,
    pub active_phase: Option<PhaseKind>,
    pub progress: f64,
    pub finished: bool,
    pub first_paint_ms: Option<f64>,
    pub interactive_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub state: ClockState,
    pub elapsed_ms: f64,
    pub max_duration_ms: f64,
    pub scenarios: Vec<ScenarioSnapshot>,
}

/// A scenario table animated by one clock.
pub struct Simulator<M: ScenarioModel> {
    model: M,
    settings: M::Settings,
    timeline: Timeline,
    clock: SimulationClock,
}

impl<M: ScenarioModel> Simulator<M> {
    pub fn new(model: M, settings: M::Settings, speed: f64) -> Result<Self, SimError> {
        let timeline = Timeline::new(model.scenarios(&settings)?);
        let clock = SimulationClock::new(timeline.max_duration_ms, speed);
        Ok(Self {
            model,
            settings,
            timeline,
            clock,
        })
    }

    pub fn settings(&self) -> &M::Settings {
        &self.settings
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }

    pub fn start(&mut self, now: Instant) {
        self.clock.start(now);
        debug!(max_ms = self.timeline.max_duration_ms, "simulation started");
    }

    pub fn tick(&mut self, now: Instant) -> ClockState {
        let before = self.clock.state();
        let after = self.clock.tick(now);
        if before != after {
            debug!(elapsed_ms = self.clock.elapsed_ms(), "simulation completed");
        }
        after
    }

    pub fn reset(&mut self) {
        self.clock.reset();
        debug!("simulation reset");
    }

    /// Swap settings and rebuild the timeline. A completed run drops back to idle.
    pub fn update_settings(&mut self, settings: M::Settings) -> Result<(), SimError> {
        if settings == self.settings {
            return Ok(());
        }
        let timeline = Timeline::new(self.model.scenarios(&settings)?);
        self.clock.set_max_duration(timeline.max_duration_ms);
        self.timeline = timeline;
        self.settings = settings;
        debug!(
            settings = ?self.settings,
            state = self.clock.state().as_str(),
            "simulation settings changed"
        );
        Ok(())
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        self.evaluate(self.clock.state(), self.clock.elapsed_ms())
    }

    /// Evaluate the timeline at an arbitrary point without touching the clock.
    pub fn snapshot_at(&self, elapsed_ms: f64) -> SimulationSnapshot {
        let max = self.timeline.max_duration_ms;
        let elapsed_ms = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, max)
        } else {
            max
        };
        let state = if elapsed_ms >= max {
            ClockState::Completed
        } else if elapsed_ms > 0.0 {
            ClockState::Running
        } else {
            ClockState::Idle
        };
        self.evaluate(state, elapsed_ms)
    }

    fn evaluate(&self, state: ClockState, elapsed_ms: f64) -> SimulationSnapshot {
        let scenarios = self
            .timeline
            .scenarios
            .iter()
            .map(|s| {
                let duration = s.duration_ms();
                let idle = state == ClockState::Idle;
                let finished = !idle && elapsed_ms >= duration;
                let progress = if finished || duration == 0.0 {
                    if idle { 0.0 } else { 1.0 }
                } else {
                    elapsed_ms / duration
                };
                ScenarioSnapshot {
                    id: s.id.clone(),
                    label: s.label.clone(),
                    active_phase: if idle {
                        None
                    } else {
                        s.phase_at(elapsed_ms).map(|p| p.kind)
                    },
                    progress,
                    finished,
                    first_paint_ms: s.first_paint_ms(),
                    interactive_ms: duration,
                }
            })
            .collect();

        SimulationSnapshot {
            state,
            elapsed_ms,
            max_duration_ms: self.timeline.max_duration_ms,
            scenarios,
        }
    }
}
