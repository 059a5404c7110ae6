//! Tray icons, drawn at startup.

use tray_icon::{BadIcon, Icon};

use crate::EngineState;

const SIZE: u32 = 32;
const COLOR_IDLE: (u8, u8, u8) = (235, 235, 235);
const COLOR_BUSY: (u8, u8, u8) = (255, 180, 0);

/// The tray icon for an engine state.
pub fn icon(state: EngineState) -> Result<Icon, BadIcon> {
    let color = match state {
        EngineState::Idle => COLOR_IDLE,
        EngineState::Busy => COLOR_BUSY,
    };
    Icon::from_rgba(disc(color), SIZE, SIZE)
}

/// A filled disc with a soft edge.
fn disc((r, g, b): (u8, u8, u8)) -> Vec<u8> {
    let center = (SIZE as f32 - 1.0) / 2.0;
    let radius = SIZE as f32 / 2.0 - 2.0;
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let distance = ((x as f32 - center).powi(2) + (y as f32 - center).powi(2)).sqrt();
            let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
            rgba.extend_from_slice(&[r, g, b, (coverage * 255.0) as u8]);
        }
    }
    rgba
}
