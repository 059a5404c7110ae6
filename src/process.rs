use std::sync::Arc;
use std::sync::mpsc::sync_channel;
use std::thread::JoinHandle;

use anyhow::{Context, anyhow};
use parking_lot::RwLock;
use pouf_engine::Io;
use pouf_input::{EnigoEmitter, SystemClipboard};
use pouf_rephrase::ConfiguredGateway;
use tao::event_loop::EventLoopProxy;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::event::PoufEvent;
use crate::{Config, Engine, KeySignal, Timings};

/// Start the engine on its own thread. The clipboard and input handles are
/// created on that thread and never leave it, and the engine runs on a
/// single-threaded runtime there, so none of them need to be Send.
///
/// Returns once the handles are open, or with the error that prevented it.
pub fn spawn_engine(
    config: Arc<RwLock<Config>>,
    signals: UnboundedReceiver<KeySignal>,
    event_sender: EventLoopProxy<PoufEvent>,
) -> anyhow::Result<JoinHandle<()>> {
    let (ready_tx, ready_rx) = sync_channel(1);
    let timings = Timings::default().with_request_timeout(config.read().request_timeout());

    let handle = std::thread::Builder::new()
        .name("pouf-engine".to_string())
        .spawn(move || {
            let setup = open_io(config);
            let (runtime, io) = match setup {
                Ok(parts) => {
                    ready_tx.send(Ok(())).ok();
                    parts
                }
                Err(e) => {
                    ready_tx.send(Err(e)).ok();
                    return;
                }
            };

            let mut engine = Engine::new(io, timings).on_state_change(move |state| {
                event_sender
                    .send_event(PoufEvent::StateChanged(state))
                    .ok();
            });
            runtime.block_on(engine.run(signals));
            info!("Engine thread exiting");
        })
        .context("Failed to start engine thread")?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(e)) => Err(e.context("Failed to set up engine")),
        Err(_) => Err(anyhow!("Engine thread exited during setup")),
    }
}

fn open_io(config: Arc<RwLock<Config>>) -> anyhow::Result<(Runtime, Io)> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build engine runtime")?;
    let io = Io {
        clipboard: Box::new(SystemClipboard::new()?),
        emitter: Box::new(EnigoEmitter::new()?),
        gateway: Arc::new(ConfiguredGateway::new(config)),
    };
    Ok((runtime, io))
}
