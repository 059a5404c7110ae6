//! Activation engine for pouf.
//!
//! Turns classified key signals into rephrase pipelines. The engine only
//! talks to the outside world through the clipboard, input and gateway
//! traits, so it runs unchanged against the in-memory fakes its tests use.

mod activity;
mod buffer;
mod engine;
mod gate;
mod pipeline;
mod timings;

#[cfg(test)]
mod fakes;

pub use activity::KeyActivity;
pub use buffer::{BUFFER_CAPACITY, RollingBuffer, TRIGGER_MARKER, Trigger};
pub use engine::Engine;
pub use gate::ActivationGate;
pub use pipeline::{Activation, Io, Outcome, PipelineError, run_pipeline};
pub use timings::Timings;
