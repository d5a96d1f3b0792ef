//! Status events emitted by a [`ShaderProgram`](crate::ShaderProgram) when an
//! operation succeeds.

use crate::program::ProgramId;
use crate::stage::StageKind;

/// Something a shader program completed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramEvent {
    StageCompiled { kind: StageKind },
    Linked { program: ProgramId },
    AttributeBound { name: String, location: i32 },
    UniformBound { name: String, location: i32 },
    CleanedUp { program: ProgramId },
}

/// Receives [`ProgramEvent`]s.
///
/// Any `Fn(&ProgramEvent)` closure is an observer.
pub trait ProgramObserver {
    fn on_event(&self, event: &ProgramEvent);
}

impl<F: Fn(&ProgramEvent)> ProgramObserver for F {
    fn on_event(&self, event: &ProgramEvent) {
        self(event)
    }
}

/// Default observer: forwards every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgramObserver for TracingObserver {
    fn on_event(&self, event: &ProgramEvent) {
        match event {
            ProgramEvent::StageCompiled { kind } => {
                tracing::info!(%kind, "shader compilation successful")
            }
            ProgramEvent::Linked { program } => {
                tracing::info!(%program, "shader program link successful")
            }
            ProgramEvent::AttributeBound { name, location } => {
                tracing::debug!(name = %name, location = *location, "attribute bound")
            }
            ProgramEvent::UniformBound { name, location } => {
                tracing::debug!(name = %name, location = *location, "uniform bound")
            }
            ProgramEvent::CleanedUp { program } => {
                tracing::debug!(%program, "shader program deleted")
            }
        }
    }
}
