//! Clipboard snapshot types and the scoped save/restore transaction.
//!
//! The system clipboard is a single resource shared with every other
//! process. Anything this tool puts on it must be temporary: whatever the
//! clipboard held before a pipeline started is put back on every exit path.
//! [`ClipboardTransaction`] ties that restore to scope so an early return or
//! an error can't skip it.

use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read clipboard: {0}")]
    Read(String),

    #[error("failed to write clipboard: {0}")]
    Write(String),
}

/// One representation of the clipboard payload. A single copy usually
/// puts several on the clipboard at once, e.g. a spreadsheet cell as text,
/// HTML and an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardRepresentation {
    /// Plain UTF-8 text
    Text(String),
    Rtf(String),
    Html(String),
    /// File paths or URIs
    Files(Vec<String>),
    /// PNG-encoded image
    Image(Vec<u8>),
}

/// Everything the clipboard held at a point in time. An empty snapshot means
/// the clipboard was empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    representations: Vec<ClipboardRepresentation>,
}

impl ClipboardSnapshot {
    pub fn new(representations: Vec<ClipboardRepresentation>) -> Self {
        Self { representations }
    }

    pub fn is_empty(&self) -> bool {
        self.representations.is_empty()
    }

    pub fn representations(&self) -> &[ClipboardRepresentation] {
        &self.representations
    }

    /// The plain text representation, if there is one.
    pub fn text(&self) -> Option<&str> {
        self.representations.iter().find_map(|r| match r {
            ClipboardRepresentation::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Save/swap/restore operations on the system clipboard.
pub trait ClipboardTransactor {
    /// Capture every representation currently on the clipboard.
    fn snapshot(&mut self) -> Result<ClipboardSnapshot, ClipboardError>;

    /// Clear the clipboard and write back exactly what `snapshot` captured.
    fn restore(&mut self, snapshot: ClipboardSnapshot) -> Result<(), ClipboardError>;

    /// Read the clipboard as plain text. No text reads as an empty string.
    fn read_text(&mut self) -> Result<String, ClipboardError>;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

impl<T: ClipboardTransactor + ?Sized> ClipboardTransactor for Box<T> {
    fn snapshot(&mut self) -> Result<ClipboardSnapshot, ClipboardError> {
        (**self).snapshot()
    }

    fn restore(&mut self, snapshot: ClipboardSnapshot) -> Result<(), ClipboardError> {
        (**self).restore(snapshot)
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        (**self).read_text()
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// A snapshot that is restored when the transaction ends, either explicitly
/// through [`ClipboardTransaction::restore`] or when it is dropped.
pub struct ClipboardTransaction<'a, C: ClipboardTransactor + ?Sized> {
    clipboard: &'a mut C,
    snapshot: ClipboardSnapshot,
    restored: bool,
}

impl<'a, C: ClipboardTransactor + ?Sized> ClipboardTransaction<'a, C> {
    /// Snapshot the clipboard. Nothing has been changed if this fails.
    pub fn begin(clipboard: &'a mut C) -> Result<Self, ClipboardError> {
        let snapshot = clipboard.snapshot()?;
        debug!(
            representations = snapshot.representations().len(),
            "Clipboard snapshot taken"
        );
        Ok(Self {
            clipboard,
            snapshot,
            restored: false,
        })
    }

    /// The clipboard contents as they were when the transaction began.
    pub fn snapshot(&self) -> &ClipboardSnapshot {
        &self.snapshot
    }

    /// Access to the clipboard while the transaction is open.
    pub fn clipboard(&mut self) -> &mut C {
        &mut *self.clipboard
    }

    /// Put the snapshot back now and report whether that worked.
    pub fn restore(mut self) -> Result<(), ClipboardError> {
        self.restored = true;
        let snapshot = std::mem::take(&mut self.snapshot);
        self.clipboard.restore(snapshot)
    }
}

impl<C: ClipboardTransactor + ?Sized> Drop for ClipboardTransaction<'_, C> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        let snapshot = std::mem::take(&mut self.snapshot);
        if let Err(e) = self.clipboard.restore(snapshot) {
            error!("Failed to restore clipboard: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clipboard that keeps its payload in memory and counts restores.
    #[derive(Default)]
    struct MemoryClipboard {
        contents: Vec<ClipboardRepresentation>,
        restores: usize,
    }

    impl ClipboardTransactor for MemoryClipboard {
        fn snapshot(&mut self) -> Result<ClipboardSnapshot, ClipboardError> {
            Ok(ClipboardSnapshot::new(self.contents.clone()))
        }

        fn restore(&mut self, snapshot: ClipboardSnapshot) -> Result<(), ClipboardError> {
            self.restores += 1;
            self.contents = snapshot.representations().to_vec();
            Ok(())
        }

        fn read_text(&mut self) -> Result<String, ClipboardError> {
            Ok(ClipboardSnapshot::new(self.contents.clone())
                .text()
                .unwrap_or_default()
                .to_string())
        }

        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.contents = vec![ClipboardRepresentation::Text(text.to_string())];
            Ok(())
        }
    }

    fn image() -> ClipboardRepresentation {
        ClipboardRepresentation::Image(vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_restore_without_writes_is_noop() {
        let mut clipboard = MemoryClipboard {
            contents: vec![ClipboardRepresentation::Text("draft".into()), image()],
            ..Default::default()
        };
        let before = clipboard.snapshot().unwrap();

        let snapshot = clipboard.snapshot().unwrap();
        clipboard.restore(snapshot).unwrap();

        assert_eq!(clipboard.snapshot().unwrap(), before);
        assert_eq!(clipboard.read_text().unwrap(), "draft");
    }

    #[test]
    fn test_transaction_restores_on_drop() {
        let mut clipboard = MemoryClipboard {
            contents: vec![ClipboardRepresentation::Text("draft".into())],
            ..Default::default()
        };

        {
            let mut tx = ClipboardTransaction::begin(&mut clipboard).unwrap();
            tx.clipboard().write_text("scratch").unwrap();
            assert_eq!(tx.clipboard().read_text().unwrap(), "scratch");
        }

        assert_eq!(clipboard.read_text().unwrap(), "draft");
        assert_eq!(clipboard.restores, 1);
    }

    #[test]
    fn test_explicit_restore_happens_once() {
        let mut clipboard = MemoryClipboard {
            contents: vec![image()],
            ..Default::default()
        };

        let mut tx = ClipboardTransaction::begin(&mut clipboard).unwrap();
        assert!(tx.snapshot().text().is_none());
        tx.clipboard().write_text("scratch").unwrap();
        tx.restore().unwrap();

        assert_eq!(clipboard.restores, 1);
        assert_eq!(clipboard.contents, vec![image()]);
    }

    #[test]
    fn test_empty_snapshot_restores_empty() {
        let mut clipboard = MemoryClipboard::default();
        {
            let mut tx = ClipboardTransaction::begin(&mut clipboard).unwrap();
            assert!(tx.snapshot().is_empty());
            tx.clipboard().write_text("scratch").unwrap();
        }
        assert!(clipboard.contents.is_empty());
        assert_eq!(clipboard.read_text().unwrap(), "");
    }
}
