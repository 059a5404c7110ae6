//! Input monitoring permission.

/// Whether the OS will deliver key events to this process.
///
/// macOS has no direct query for input monitoring, but creating a passive
/// event tap fails without it and doesn't cache the answer.
#[cfg(target_os = "macos")]
pub fn input_monitoring_granted() -> bool {
    use core_graphics::event::{
        CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement, CGEventType,
    };

    CGEventTap::new(
        CGEventTapLocation::Session,
        CGEventTapPlacement::HeadInsertEventTap,
        CGEventTapOptions::ListenOnly,
        vec![CGEventType::KeyDown],
        |_, _, _| None,
    )
    .is_ok()
}

/// Other platforms don't gate global key hooks.
#[cfg(not(target_os = "macos"))]
pub fn input_monitoring_granted() -> bool {
    true
}
