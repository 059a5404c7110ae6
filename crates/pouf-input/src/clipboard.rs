//! The system clipboard through clipboard-rs.

use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContent, ClipboardContext, ContentFormat, RustImageData};
use pouf_core::{ClipboardError, ClipboardRepresentation, ClipboardSnapshot, ClipboardTransactor};
use tracing::debug;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn read_err(e: BoxError) -> ClipboardError {
    ClipboardError::Read(e.to_string())
}

fn write_err(e: BoxError) -> ClipboardError {
    ClipboardError::Write(e.to_string())
}

/// The process-wide clipboard.
///
/// Snapshots capture text, RTF, HTML, file lists and images. A restore
/// writes all of them back in a single clipboard write, so applications see
/// the same payload they would have before.
pub struct SystemClipboard {
    ctx: ClipboardContext,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let ctx = ClipboardContext::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { ctx })
    }

    /// Everything on the clipboard in the formats a snapshot keeps.
    fn contents(&self) -> Result<Vec<ClipboardContent>, ClipboardError> {
        let mut contents = Vec::new();
        if self.ctx.has(ContentFormat::Text) {
            contents.push(ClipboardContent::Text(self.ctx.get_text().map_err(read_err)?));
        }
        if self.ctx.has(ContentFormat::Rtf) {
            contents.push(ClipboardContent::Rtf(
                self.ctx.get_rich_text().map_err(read_err)?,
            ));
        }
        if self.ctx.has(ContentFormat::Html) {
            contents.push(ClipboardContent::Html(self.ctx.get_html().map_err(read_err)?));
        }
        if self.ctx.has(ContentFormat::Files) {
            contents.push(ClipboardContent::Files(self.ctx.get_files().map_err(read_err)?));
        }
        if self.ctx.has(ContentFormat::Image) {
            contents.push(ClipboardContent::Image(self.ctx.get_image().map_err(read_err)?));
        }
        Ok(contents)
    }
}

/// Convert what was read off the clipboard into snapshot form. Formats
/// without a representation are left out.
fn representations_from(
    contents: Vec<ClipboardContent>,
) -> Result<Vec<ClipboardRepresentation>, ClipboardError> {
    let mut representations = Vec::with_capacity(contents.len());
    for content in contents {
        let representation = match content {
            ClipboardContent::Text(text) => ClipboardRepresentation::Text(text),
            ClipboardContent::Rtf(rtf) => ClipboardRepresentation::Rtf(rtf),
            ClipboardContent::Html(html) => ClipboardRepresentation::Html(html),
            ClipboardContent::Files(files) => ClipboardRepresentation::Files(files),
            ClipboardContent::Image(image) => {
                let png = image.to_png().map_err(read_err)?;
                ClipboardRepresentation::Image(png.get_bytes().to_vec())
            }
            ClipboardContent::Other(format, _) => {
                debug!(format = %format, "Skipping unsupported clipboard format");
                continue;
            }
        };
        representations.push(representation);
    }
    Ok(representations)
}

/// The clipboard write that puts `snapshot` back, one entry per
/// representation.
fn contents_for(snapshot: &ClipboardSnapshot) -> Result<Vec<ClipboardContent>, ClipboardError> {
    snapshot
        .representations()
        .iter()
        .map(|representation| {
            Ok(match representation {
                ClipboardRepresentation::Text(text) => ClipboardContent::Text(text.clone()),
                ClipboardRepresentation::Rtf(rtf) => ClipboardContent::Rtf(rtf.clone()),
                ClipboardRepresentation::Html(html) => ClipboardContent::Html(html.clone()),
                ClipboardRepresentation::Files(files) => ClipboardContent::Files(files.clone()),
                ClipboardRepresentation::Image(png) => {
                    ClipboardContent::Image(RustImageData::from_bytes(png).map_err(write_err)?)
                }
            })
        })
        .collect()
}

impl ClipboardTransactor for SystemClipboard {
    fn snapshot(&mut self) -> Result<ClipboardSnapshot, ClipboardError> {
        let representations = representations_from(self.contents()?)?;
        Ok(ClipboardSnapshot::new(representations))
    }

    fn restore(&mut self, snapshot: ClipboardSnapshot) -> Result<(), ClipboardError> {
        // Decode before clearing so a bad image can't leave the clipboard empty.
        let contents = contents_for(&snapshot)?;
        self.ctx.clear().map_err(write_err)?;
        if contents.is_empty() {
            debug!("Restored empty clipboard");
            return Ok(());
        }
        self.ctx.set(contents).map_err(write_err)
    }

    fn read_text(&mut self) -> Result<String, ClipboardError> {
        if !self.ctx.has(ContentFormat::Text) {
            return Ok(String::new());
        }
        self.ctx.get_text().map_err(read_err)
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.ctx.set_text(text.to_string()).map_err(write_err)
    }
}
