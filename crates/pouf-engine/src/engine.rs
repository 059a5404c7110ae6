//! The activation state machine.
//!
//! The engine is the single owner of the rolling buffer and the activation
//! gate. It consumes [`KeySignal`]s from the capture layer and runs at most
//! one pipeline at a time alongside them, so typing keeps flowing into the
//! buffer while a pipeline waits on its settle delays or the network.

use std::rc::Rc;

use futures_util::FutureExt;
use pouf_core::{EngineState, KeySignal};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::activity::KeyActivity;
use crate::buffer::RollingBuffer;
use crate::gate::ActivationGate;
use crate::pipeline::{Activation, Io, run_pipeline};
use crate::timings::Timings;

type StateListener = Box<dyn FnMut(EngineState)>;

pub struct Engine {
    buffer: RollingBuffer,
    gate: ActivationGate<Io>,
    activity: Rc<KeyActivity>,
    timings: Timings,
    on_state_change: Option<StateListener>,
}

impl Engine {
    pub fn new(io: Io, timings: Timings) -> Self {
        Self {
            buffer: RollingBuffer::new(),
            gate: ActivationGate::new(io),
            activity: Rc::new(KeyActivity::new()),
            timings,
            on_state_change: None,
        }
    }

    /// Called with `Busy` when a pipeline starts and `Idle` when it ends.
    pub fn on_state_change(mut self, listener: impl FnMut(EngineState) + 'static) -> Self {
        self.on_state_change = Some(Box::new(listener));
        self
    }

    pub fn state(&self) -> EngineState {
        if self.gate.is_busy() {
            EngineState::Busy
        } else {
            EngineState::Idle
        }
    }

    pub fn buffer(&self) -> &RollingBuffer {
        &self.buffer
    }

    /// Process signals until the sender side is dropped, then let any
    /// running pipeline finish.
    pub async fn run(&mut self, mut signals: UnboundedReceiver<KeySignal>) {
        info!("Engine started");
        loop {
            tokio::select! {
                signal = signals.recv() => match signal {
                    Some(signal) => self.handle(signal),
                    None => break,
                },
                _ = self.gate.finished() => self.finish(),
            }
        }

        if self.gate.is_busy() {
            debug!("Waiting for the running pipeline before stopping");
            self.gate.finished().await;
            self.finish();
        }
        info!("Engine stopped");
    }

    /// Apply one signal. Activations while a pipeline runs are dropped; the
    /// buffer keeps tracking typing either way.
    pub fn handle(&mut self, signal: KeySignal) {
        match signal {
            KeySignal::Hotkey => self.activate(Activation::Hotkey),
            KeySignal::Backspace => {
                if self.activity.take_echo() {
                    return;
                }
                self.activity.record_typing(1);
                self.buffer.pop();
            }
            KeySignal::Append(text) => {
                self.activity.record_typing(text.chars().count());
                if let Some(trigger) = self.buffer.append(&text) {
                    self.activate(Activation::Typed(trigger));
                    // Left over after the marker, so typed after the line.
                    self.activity.record_typing(self.buffer.len());
                }
            }
        }
    }

    fn activate(&mut self, activation: Activation) {
        let timings = self.timings;
        let activity = self.activity.clone();
        let kind = match activation {
            Activation::Hotkey => "hotkey",
            Activation::Typed(_) => "trigger",
        };
        let started = self.gate.try_start(move |mut io| {
            activity.reset();
            async move {
                run_pipeline(&mut io, activation, &timings, &activity).await;
                io
            }
            .boxed_local()
        });

        if started {
            debug!(activation = kind, "Pipeline started");
            self.notify(EngineState::Busy);
        } else {
            debug!(activation = kind, "Pipeline busy, ignoring activation");
        }
    }

    /// A pipeline ended. Echoes it announced but never produced must not
    /// swallow the user's next backspaces.
    fn finish(&mut self) {
        self.activity.reset();
        self.notify(EngineState::Idle);
    }

    fn notify(&mut self, state: EngineState) {
        if let Some(listener) = self.on_state_change.as_mut() {
            listener(state);
        }
    }
}
