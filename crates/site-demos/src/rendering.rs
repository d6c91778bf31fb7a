/// Rendering-mode simulator tables: how a page reaches the screen under
/// client-side rendering, server-side rendering, static generation and
/// incremental regeneration.
use std::str::FromStr;

use crate::error::SimError;
use crate::scenario::{PhaseKind, Scenario, ScenarioModel};

use PhaseKind::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkPreset {
    Fibre,
    FourG,
    ThreeG,
    SlowThreeG,
}

impl NetworkPreset {
    pub const ALL: [NetworkPreset; 4] = [
        NetworkPreset::Fibre,
        NetworkPreset::FourG,
        NetworkPreset::ThreeG,
        NetworkPreset::SlowThreeG,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            NetworkPreset::Fibre => 0.5,
            NetworkPreset::FourG => 1.0,
            NetworkPreset::ThreeG => 2.5,
            NetworkPreset::SlowThreeG => 5.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NetworkPreset::Fibre => "fibre",
            NetworkPreset::FourG => "4g",
            NetworkPreset::ThreeG => "3g",
            NetworkPreset::SlowThreeG => "slow-3g",
        }
    }
}

impl FromStr for NetworkPreset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SimError::UnknownPreset(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderingSettings {
    pub network: NetworkPreset,
    pub cache_hit: bool,
}

impl Default for RenderingSettings {
    fn default() -> Self {
        Self {
            network: NetworkPreset::FourG,
            cache_hit: true,
        }
    }
}

const CSR_STEPS: &[(PhaseKind, f64)] = &[
    (Request, 50.0),
    (Html, 30.0),
    (Script, 400.0),
    (Fetch, 300.0),
    (Render, 120.0),
];

const SSR_STEPS: &[(PhaseKind, f64)] = &[
    (Request, 50.0),
    (Server, 250.0),
    (Html, 80.0),
    (Render, 60.0),
    (Script, 400.0),
    (Hydrate, 150.0),
];

const SSG_STEPS: &[(PhaseKind, f64)] = &[
    (Request, 50.0),
    (Html, 80.0),
    (Render, 60.0),
    (Script, 400.0),
    (Hydrate, 150.0),
];

const ISR_MISS_STEPS: &[(PhaseKind, f64)] = &[
    (Request, 50.0),
    (Server, 300.0),
    (Html, 80.0),
    (Render, 60.0),
    (Script, 400.0),
    (Hydrate, 150.0),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderingModel;

impl ScenarioModel for RenderingModel {
    type Settings = RenderingSettings;

    fn scenarios(&self, settings: &RenderingSettings) -> Result<Vec<Scenario>, SimError> {
        let m = settings.network.multiplier();
        let isr_steps = if settings.cache_hit {
            SSG_STEPS
        } else {
            ISR_MISS_STEPS
        };

        Ok(vec![
            Scenario::from_steps("csr", "Client-Side Rendering", CSR_STEPS, m)?,
            Scenario::from_steps("ssr", "Server-Side Rendering", SSR_STEPS, m)?,
            Scenario::from_steps("ssg", "Static Site Generation", SSG_STEPS, m)?,
            Scenario::from_steps("isr", "Incremental Static Regeneration", isr_steps, m)?,
        ])
    }
}
