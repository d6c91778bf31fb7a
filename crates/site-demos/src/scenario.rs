use serde::Serialize;

use crate::error::SimError;

/// One illustrative stage on a scenario timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseKind {
    Request,
    Server,
    Html,
    Script,
    Fetch,
    Render,
    Hydrate,
    Mount,
    Update,
}

impl PhaseKind {
    /// Network-bound phases are stretched by the network multiplier.
    pub fn is_network(self) -> bool {
        matches!(
            self,
            PhaseKind::Request | PhaseKind::Html | PhaseKind::Script | PhaseKind::Fetch
        )
    }

    /// Phases after which the visitor sees content.
    pub fn paints(self) -> bool {
        matches!(self, PhaseKind::Render | PhaseKind::Mount)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Request => "request",
            PhaseKind::Server => "server",
            PhaseKind::Html => "html",
            PhaseKind::Script => "script",
            PhaseKind::Fetch => "fetch",
            PhaseKind::Render => "render",
            PhaseKind::Hydrate => "hydrate",
            PhaseKind::Mount => "mount",
            PhaseKind::Update => "update",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl Phase {
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub id: String,
    pub label: String,
    pub phases: Vec<Phase>,
    pub network_multiplier: f64,
}

impl Scenario {
    /// Lay `steps` out back to back, scaling network phases by `network_multiplier`.
    pub fn from_steps(
        id: impl Into<String>,
        label: impl Into<String>,
        steps: &[(PhaseKind, f64)],
        network_multiplier: f64,
    ) -> Result<Self, SimError> {
        if !network_multiplier.is_finite() || network_multiplier <= 0.0 {
            return Err(SimError::InvalidMultiplier(network_multiplier));
        }

        let mut cursor = 0.0;
        let phases = steps
            .iter()
            .map(|&(kind, base_ms)| {
                let duration_ms = if kind.is_network() {
                    base_ms * network_multiplier
                } else {
                    base_ms
                };
                let phase = Phase {
                    kind,
                    start_ms: cursor,
                    duration_ms,
                };
                cursor += duration_ms;
                phase
            })
            .collect();

        Ok(Self {
            id: id.into(),
            label: label.into(),
            phases,
            network_multiplier,
        })
    }

    pub fn duration_ms(&self) -> f64 {
        self.phases.last().map(Phase::end_ms).unwrap_or(0.0)
    }

    /// Phase covering `elapsed_ms`; phases are half-open `[start, end)`.
    pub fn phase_at(&self, elapsed_ms: f64) -> Option<&Phase> {
        self.phases
            .iter()
            .find(|p| elapsed_ms >= p.start_ms && elapsed_ms < p.end_ms())
    }

    pub fn first_paint_ms(&self) -> Option<f64> {
        self.phases
            .iter()
            .find(|p| p.kind.paints())
            .map(Phase::end_ms)
    }

    pub fn is_contiguous(&self) -> bool {
        self.phases
            .windows(2)
            .all(|w| w[0].end_ms() == w[1].start_ms)
            && self.phases.first().map_or(true, |p| p.start_ms == 0.0)
    }
}

/// The set of scenarios animated together by one simulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub scenarios: Vec<Scenario>,
    pub max_duration_ms: f64,
}

impl Timeline {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        let max_duration_ms = scenarios
            .iter()
            .map(Scenario::duration_ms)
            .fold(0.0, f64::max);
        Self {
            scenarios,
            max_duration_ms,
        }
    }
}

/// Static scenario tables parameterized by user-facing settings.
pub trait ScenarioModel {
    type Settings: Clone + PartialEq + std::fmt::Debug;

    fn scenarios(&self, settings: &Self::Settings) -> Result<Vec<Scenario>, SimError>;
}
