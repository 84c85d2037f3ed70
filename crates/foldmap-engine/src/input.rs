//! Maps discrete input signals to engine operations.
//!
//! The dispatcher does not inspect UI internals: the host passes a
//! `should_handle` gate alongside each signal, false whenever a free-text
//! entry control elsewhere in the application owns input focus. Each
//! accepted signal forwards synchronously to exactly one engine
//! operation; serializing structural mutations is the engine's job.

use tracing::trace;

use crate::engine::{Direction, Engine, EngineError, Op};
use crate::renderer::Renderer;

/// Discrete signal from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    Up,
    Down,
    Left,
    Right,
    /// Toggle the focused node's fold state.
    Activate,
}

impl InputSignal {
    fn into_op(self) -> Op {
        match self {
            Self::Up => Op::Navigate(Direction::Up),
            Self::Down => Op::Navigate(Direction::Down),
            Self::Left => Op::Navigate(Direction::Left),
            Self::Right => Op::Navigate(Direction::Right),
            Self::Activate => Op::ToggleFocused,
        }
    }
}

/// Forwards input signals to the engine, with suppression counters for
/// diagnostics.
#[derive(Debug, Default)]
pub struct InputDispatcher {
    dispatched: u64,
    suppressed: u64,
}

impl InputDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one signal. Returns `false` when the gate suppressed it.
    pub fn dispatch<R: Renderer>(
        &mut self,
        engine: &mut Engine<R>,
        signal: InputSignal,
        should_handle: bool,
    ) -> Result<bool, EngineError> {
        if !should_handle {
            self.suppressed += 1;
            trace!(?signal, "input suppressed, text entry active");
            return Ok(false);
        }
        self.dispatched += 1;
        engine.apply(signal.into_op())?;
        Ok(true)
    }

    /// Signals forwarded to the engine so far.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Signals dropped by the gate so far.
    #[must_use]
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }
}
