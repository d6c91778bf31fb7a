/// Async driver for a `Simulator`.
///
/// The spawned task is the only owner of the simulator. Commands arrive over
/// an mpsc channel and every state change is published on a watch channel.
/// Frame ticks are only polled while the clock is running, so a reset can
/// never be followed by a stale tick. Dropping the handle aborts the task.
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::clock::ClockState;
use crate::error::SimError;
use crate::scenario::ScenarioModel;
use crate::simulator::{SimulationSnapshot, Simulator};

/// Roughly one animation frame.
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

const COMMAND_BUFFER: usize = 32;

#[derive(Debug)]
pub enum SimulationCommand<S> {
    Start,
    Reset,
    UpdateSettings(S),
}

pub struct SimulationHandle<S> {
    commands: mpsc::Sender<SimulationCommand<S>>,
    snapshots: watch::Receiver<SimulationSnapshot>,
    task: JoinHandle<()>,
}

pub fn spawn<M>(simulator: Simulator<M>, frame: Duration) -> SimulationHandle<M::Settings>
where
    M: ScenarioModel + Send + 'static,
    M::Settings: Send + 'static,
{
    let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
    let (tx, snapshots) = watch::channel(simulator.snapshot());
    let task = tokio::spawn(run(simulator, frame, rx, tx));

    SimulationHandle {
        commands,
        snapshots,
        task,
    }
}

async fn run<M: ScenarioModel>(
    mut simulator: Simulator<M>,
    frame: Duration,
    mut commands: mpsc::Receiver<SimulationCommand<M::Settings>>,
    snapshots: watch::Sender<SimulationSnapshot>,
) {
    let mut frames = tokio::time::interval(frame);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let running = simulator.state() == ClockState::Running;

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("simulation handle dropped, stopping runner");
                    break;
                };
                match command {
                    SimulationCommand::Start => {
                        simulator.start(Instant::now().into_std());
                        frames.reset();
                    }
                    SimulationCommand::Reset => simulator.reset(),
                    SimulationCommand::UpdateSettings(settings) => {
                        if let Err(e) = simulator.update_settings(settings) {
                            debug!(error = %e, "settings rejected");
                        }
                    }
                }
            }
            _ = frames.tick(), if running => {
                simulator.tick(Instant::now().into_std());
            }
        }

        snapshots.send_replace(simulator.snapshot());
    }
}

impl<S> SimulationHandle<S> {
    pub async fn start(&self) -> Result<(), SimError> {
        self.send(SimulationCommand::Start).await
    }

    pub async fn reset(&self) -> Result<(), SimError> {
        self.send(SimulationCommand::Reset).await
    }

    pub async fn update_settings(&self, settings: S) -> Result<(), SimError> {
        self.send(SimulationCommand::UpdateSettings(settings)).await
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until the runner publishes a snapshot in `state`.
    pub async fn wait_for(&mut self, state: ClockState) -> Result<SimulationSnapshot, SimError> {
        let snapshot = self
            .snapshots
            .wait_for(|s| s.state == state)
            .await
            .map_err(|_| SimError::Stopped)?;
        Ok((*snapshot).clone())
    }

    async fn send(&self, command: SimulationCommand<S>) -> Result<(), SimError> {
        self.commands.send(command).await.map_err(|_| SimError::Stopped)
    }
}

impl<S> Drop for SimulationHandle<S> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
