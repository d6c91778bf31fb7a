/// Heavy-list comparator: the same 1000-row list rendered with different
/// optimisation strategies.
///
/// Timings are illustrative constants keyed on the scenario's display name,
/// not measurements taken at runtime.
use site_common::text::normalize;

use crate::error::SimError;
use crate::scenario::{PhaseKind, Scenario, ScenarioModel};

pub const DEFAULT_ITEM_COUNT: u32 = 1000;
pub const MAX_ITEM_COUNT: u32 = 100_000;

/// Display names shown by the comparator, in presentation order.
pub const SCENARIO_NAMES: &[(&str, &str)] = &[
    ("naive", "Rendu naïf"),
    ("react-memo", "Avec React.memo"),
    ("use-memo", "useMemo + useCallback"),
    ("virtualized", "Virtualisation (react-window)"),
];

/// (needle, mount ms, update ms) per 1000 rows; first match wins.
const MEASURED_TIMINGS: &[(&str, f64, f64)] = &[
    ("virtual", 8.0, 2.0),
    ("usememo", 95.0, 20.0),
    ("memo", 140.0, 35.0),
];

const BASELINE_TIMING: (f64, f64) = (420.0, 380.0);

/// Mount and update cost for 1000 rows, looked up from the display name.
pub fn measured_timing(display_name: &str) -> (f64, f64) {
    let name = normalize(display_name);
    MEASURED_TIMINGS
        .iter()
        .find(|(needle, _, _)| name.contains(needle))
        .map(|&(_, mount, update)| (mount, update))
        .unwrap_or(BASELINE_TIMING)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSettings {
    pub item_count: u32,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            item_count: DEFAULT_ITEM_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceModel;

impl ScenarioModel for PerformanceModel {
    type Settings = PerformanceSettings;

    fn scenarios(&self, settings: &PerformanceSettings) -> Result<Vec<Scenario>, SimError> {
        let scale = f64::from(settings.item_count.min(MAX_ITEM_COUNT)) / 1000.0;

        SCENARIO_NAMES
            .iter()
            .map(|&(id, label)| {
                let (mount, update) = measured_timing(label);
                Scenario::from_steps(
                    id,
                    label,
                    &[
                        (PhaseKind::Mount, mount * scale),
                        (PhaseKind::Update, update * scale),
                    ],
                    1.0,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timings_follow_display_name() {
        assert_eq!(measured_timing("Virtualisation (react-window)"), (8.0, 2.0));
        assert_eq!(measured_timing("useMemo + useCallback"), (95.0, 20.0));
        assert_eq!(measured_timing("Avec React.memo"), (140.0, 35.0));
        assert_eq!(measured_timing("Rendu naïf"), (420.0, 380.0));
    }

    #[test]
    fn optimisations_rank_as_displayed() {
        let scenarios = PerformanceModel
            .scenarios(&PerformanceSettings::default())
            .unwrap();
        let durations: Vec<f64> = scenarios.iter().map(Scenario::duration_ms).collect();
        assert_eq!(durations, vec![800.0, 175.0, 115.0, 10.0]);
    }

    #[test]
    fn item_count_scales_linearly() {
        let small = PerformanceModel
            .scenarios(&PerformanceSettings { item_count: 500 })
            .unwrap();
        let large = PerformanceModel
            .scenarios(&PerformanceSettings { item_count: 10_000 })
            .unwrap();
        assert_eq!(small[0].duration_ms(), 400.0);
        assert_eq!(large[0].duration_ms(), 8000.0);
    }

    #[test]
    fn item_count_is_capped() {
        let capped = PerformanceModel
            .scenarios(&PerformanceSettings {
                item_count: u32::MAX,
            })
            .unwrap();
        assert_eq!(capped[3].duration_ms(), 1000.0);
    }
}
