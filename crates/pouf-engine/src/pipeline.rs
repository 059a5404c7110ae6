//! Acquire text, rephrase it, put the result back.
//!
//! Both activation paths end in the same place: the improved text is pasted
//! through the clipboard and the clipboard is then put back the way it was.
//! The clipboard is only touched inside a [`ClipboardTransaction`], so every
//! exit path restores it.

use std::sync::Arc;
use std::time::Duration;

use pouf_core::input::Keystroke;
use pouf_core::{ClipboardError, ClipboardTransaction, ClipboardTransactor, InputEmitter};
use pouf_rephrase::{RephraseError, RephraseGateway};
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info};

use crate::activity::KeyActivity;
use crate::buffer::Trigger;
use crate::timings::Timings;

/// The handles a pipeline drives.
pub struct Io {
    pub clipboard: Box<dyn ClipboardTransactor>,
    pub emitter: Box<dyn InputEmitter>,
    pub gateway: Arc<dyn RephraseGateway>,
}

/// What started a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The shortcut was pressed; the text is the current selection
    Hotkey,
    /// A line was typed ending in the trigger marker
    Typed(Trigger),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("clipboard: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("rephrase failed: {0}")]
    Gateway(#[from] RephraseError),

    #[error("rephrase returned no text")]
    EmptyReply,

    #[error("{keys} keys were typed while rephrasing, leaving the text as it is")]
    TypedOver { keys: usize },
}

/// How a pipeline ended.
#[derive(Debug)]
pub enum Outcome {
    /// The improved text was pasted
    Replaced { chars: usize },
    /// The hotkey was pressed without a selection
    NothingSelected,
    Failed(PipelineError),
}

impl Outcome {
    fn log(&self, activation: &Activation, backend: &str) {
        let path = match activation {
            Activation::Hotkey => "hotkey",
            Activation::Typed(_) => "trigger",
        };
        match self {
            Outcome::Replaced { chars } => info!(path, chars, "Replaced text"),
            Outcome::NothingSelected => info!("Nothing selected"),
            Outcome::Failed(e) => error!(path, backend, "Rephrase aborted: {}", e),
        }
    }
}

/// Run one pipeline to its end. Never fails: errors are logged and
/// reported in the outcome after the clipboard has been put back.
///
/// `activity` is fed by the engine while the pipeline runs.
pub async fn run_pipeline(
    io: &mut Io,
    activation: Activation,
    timings: &Timings,
    activity: &KeyActivity,
) -> Outcome {
    let result = match &activation {
        Activation::Hotkey => replace_selection(io, timings).await,
        Activation::Typed(trigger) => {
            replace_typed(io, trigger, timings, activity).await.map(Some)
        }
    };
    let outcome = match result {
        Ok(Some(chars)) => Outcome::Replaced { chars },
        Ok(None) => Outcome::NothingSelected,
        Err(e) => Outcome::Failed(e),
    };
    outcome.log(&activation, io.gateway.name());
    outcome
}

/// Copy the selection, rephrase it and paste over it. `None` when nothing
/// was selected.
async fn replace_selection(io: &mut Io, timings: &Timings) -> Result<Option<usize>, PipelineError> {
    let Io {
        clipboard,
        emitter,
        gateway,
    } = io;

    let mut tx = ClipboardTransaction::begin(&mut **clipboard)?;
    emitter.press(Keystroke::copy());
    sleep(timings.copy_settle).await;

    let selection = tx.clipboard().read_text()?;
    if selection.is_empty() || tx.snapshot().text() == Some(selection.as_str()) {
        tx.restore()?;
        return Ok(None);
    }
    debug!(text = %selection, "Copied selection");

    // An error from here on drops the transaction, which restores.
    let improved = rephrase(&**gateway, &selection, timings.request_timeout).await?;

    tx.clipboard().write_text(&improved)?;
    emitter.press(Keystroke::paste());
    sleep(timings.paste_settle).await;
    tx.restore()?;

    Ok(Some(improved.chars().count()))
}

/// Rephrase a typed line, erase it together with the marker and paste the
/// result in its place. Nothing is erased unless the rephrase succeeded and
/// nothing was typed after the marker in the meantime.
async fn replace_typed(
    io: &mut Io,
    trigger: &Trigger,
    timings: &Timings,
    activity: &KeyActivity,
) -> Result<usize, PipelineError> {
    let Io {
        clipboard,
        emitter,
        gateway,
    } = io;

    let improved = rephrase(&**gateway, trigger.source_text(), timings.request_timeout).await?;

    // The cursor is no longer at the end of the line.
    let keys = activity.typed();
    if keys > 0 {
        return Err(PipelineError::TypedOver { keys });
    }

    let mut tx = ClipboardTransaction::begin(&mut **clipboard)?;
    let count = trigger.chars_to_delete();
    debug!(count, "Erasing typed line");
    activity.expect_echoes(count);
    for _ in 0..count {
        emitter.press(Keystroke::backspace());
        sleep(timings.backspace_interval).await;
    }
    sleep(timings.pre_paste).await;

    tx.clipboard().write_text(&improved)?;
    emitter.press(Keystroke::paste());
    sleep(timings.paste_settle).await;
    tx.restore()?;

    Ok(improved.chars().count())
}

async fn rephrase(
    gateway: &dyn RephraseGateway,
    text: &str,
    deadline: Duration,
) -> Result<String, PipelineError> {
    debug!(backend = gateway.name(), chars = text.chars().count(), "Rephrasing");
    let reply = match timeout(deadline, gateway.rephrase(text)).await {
        Ok(reply) => reply?,
        Err(_) => return Err(RephraseError::Timeout(deadline).into()),
    };
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(PipelineError::EmptyReply);
    }
    debug!(text = %reply, "Rephrased");
    Ok(reply.to_string())
}
