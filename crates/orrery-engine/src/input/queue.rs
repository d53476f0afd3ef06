use crate::api::types::VisualToggle;
use crate::assets::dataset::Dataset;

/// Mutations the UI can request.
/// Queued between ticks and applied together at the start of the next one,
/// so a tick never observes a half-applied change.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Realism weight in [0, 1]; clamped on apply.
    SetRealism(f64),
    /// Simulated seconds per real second.
    SetTimeScale(f64),
    SetPaused(bool),
    /// Jump to a simulated time (seconds since the epoch).
    SetElapsed(f64),
    SetToggle(VisualToggle, bool),
    /// Swap in a new dataset.
    Reload(Dataset),
}

/// A queue of pending commands.
/// The host pushes commands at any time; the engine drains them each tick.
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Drain all pending commands in push order.
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Iterate over pending commands without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
