//! In-memory stand-ins for the clipboard, the focused application and the
//! rephrase backend.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pouf_core::input::Keystroke;
use pouf_core::{
    ClipboardError, ClipboardRepresentation, ClipboardSnapshot, ClipboardTransactor, Code,
    InputEmitter, KeySignal, Modifiers,
};
use pouf_rephrase::{RephraseError, RephraseGateway};
use tokio::sync::mpsc::UnboundedSender;

use crate::pipeline::Io;

#[derive(Default)]
struct State {
    clipboard: Vec<ClipboardRepresentation>,
    field: String,
    selection: Option<(usize, usize)>,
    pastes: Vec<String>,
    backspaces: usize,
    restores: usize,
    echo: Option<UnboundedSender<KeySignal>>,
}

impl State {
    fn clipboard_text(&self) -> Option<String> {
        ClipboardSnapshot::new(self.clipboard.clone())
            .text()
            .map(str::to_string)
    }
}

/// A clipboard plus one text field with the cursor at its end, shared by
/// the fake clipboard and the fake emitter the way the real ones share the
/// desktop.
#[derive(Clone, Default)]
pub struct Desktop {
    state: Rc<RefCell<State>>,
}

impl Desktop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clipboard(self, contents: Vec<ClipboardRepresentation>) -> Self {
        self.state.borrow_mut().clipboard = contents;
        self
    }

    pub fn with_clipboard_text(self, text: &str) -> Self {
        self.with_clipboard(vec![ClipboardRepresentation::Text(text.to_string())])
    }

    pub fn with_field(self, text: &str) -> Self {
        self.state.borrow_mut().field = text.to_string();
        self
    }

    pub fn select_all(self) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.selection = Some((0, state.field.len()));
        }
        self
    }

    /// Report every synthetic backspace to `sender`, as the OS hook does.
    pub fn echo_backspaces(&self, sender: UnboundedSender<KeySignal>) {
        self.state.borrow_mut().echo = Some(sender);
    }

    pub fn stop_echo(&self) {
        self.state.borrow_mut().echo = None;
    }

    /// The user typing at the cursor.
    pub fn type_text(&self, text: &str) {
        self.state.borrow_mut().field.push_str(text);
    }

    pub fn io(&self, replies: Vec<Reply>) -> (Io, Arc<ScriptedGateway>) {
        let gateway = Arc::new(ScriptedGateway::new(replies));
        let io = Io {
            clipboard: Box::new(FakeClipboard(self.clone())),
            emitter: Box::new(FakeEmitter(self.clone())),
            gateway: gateway.clone(),
        };
        (io, gateway)
    }

    pub fn field(&self) -> String {
        self.state.borrow().field.clone()
    }

    pub fn clipboard(&self) -> Vec<ClipboardRepresentation> {
        self.state.borrow().clipboard.clone()
    }

    pub fn clipboard_text(&self) -> Option<String> {
        self.state.borrow().clipboard_text()
    }

    pub fn pastes(&self) -> Vec<String> {
        self.state.borrow().pastes.clone()
    }

    pub fn backspaces(&self) -> usize {
        self.state.borrow().backspaces
    }

    pub fn restores(&self) -> usize {
        self.state.borrow().restores
    }
}

struct FakeClipboard(Desktop);

impl ClipboardTransactor for FakeClipboard {
    fn snapshot(&mut self) -> Result<ClipboardSnapshot, ClipboardError> {
        Ok(ClipboardSnapshot::new(self.0.clipboard()))
    }

    fn restore(&mut self, snapshot: ClipboardSnapshot) -> Result<(), ClipboardError> {
        let mut state = self.0.state.borrow_mut();
        state.restores += 1;
        state.clipboard = snapshot.representations().to_vec();
        Ok(())
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Ok(self.0.clipboard_text().unwrap_or_default())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.state.borrow_mut().clipboard = vec![ClipboardRepresentation::Text(text.to_string())];
        Ok(())
    }
}

/// Applies copy, paste and backspace to the text field like a text editor.
struct FakeEmitter(Desktop);

impl InputEmitter for FakeEmitter {
    fn press_key(&mut self, key: Code, modifiers: Modifiers) {
        let keystroke = Keystroke::new(key, modifiers);
        let mut state = self.0.state.borrow_mut();

        if keystroke == Keystroke::copy() {
            if let Some((start, end)) = state.selection {
                let selected = state.field[start..end].to_string();
                state.clipboard = vec![ClipboardRepresentation::Text(selected)];
            }
        } else if keystroke == Keystroke::paste() {
            let Some(text) = state.clipboard_text() else {
                return;
            };
            match state.selection.take() {
                Some((start, end)) => state.field.replace_range(start..end, &text),
                None => state.field.push_str(&text),
            }
            state.pastes.push(text);
        } else if keystroke == Keystroke::backspace() {
            state.backspaces += 1;
            if let Some(echo) = &state.echo {
                echo.send(KeySignal::Backspace).ok();
            }
            match state.selection.take() {
                Some((start, end)) => state.field.replace_range(start..end, ""),
                None => {
                    state.field.pop();
                }
            }
        }
    }
}

/// One scripted gateway response.
pub enum Reply {
    Text(String),
    Fail,
    /// Never answers
    Hang,
}

/// Answers from a script and records what it was asked.
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RephraseGateway for ScriptedGateway {
    async fn rephrase(&self, text: &str) -> pouf_rephrase::Result<String> {
        self.requests.lock().unwrap().push(text.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => {
                // Leave room for other tasks to run while "in flight".
                tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                Ok(text)
            }
            Some(Reply::Fail) | None => Err(RephraseError::Server("scripted failure".into())),
            Some(Reply::Hang) => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
