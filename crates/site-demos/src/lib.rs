pub mod clock;
pub mod error;
pub mod performance;
pub mod rendering;
pub mod runner;
pub mod scenario;
pub mod simulator;

pub use clock::{ClockState, SimulationClock};
pub use error::SimError;
pub use performance::{PerformanceModel, PerformanceSettings};
pub use rendering::{NetworkPreset, RenderingModel, RenderingSettings};
pub use scenario::{Phase, PhaseKind, Scenario, ScenarioModel, Timeline};
pub use simulator::{ScenarioSnapshot, SimulationSnapshot, Simulator};
