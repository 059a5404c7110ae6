use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use arboard::Clipboard;
use parking_lot::RwLock;
use pouf::event::PoufEvent;
use pouf::notify::NotificationLayer;
use pouf::process::spawn_engine;
use pouf::{
    APP_NAME_PRETTY, CaptureError, ConfigManager, DEFAULT_LOG_LEVEL, EngineState,
    KeyboardMonitor, LOG_ENV, SharedShortcut, VERSION, icon,
};
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tray_icon::menu::{AboutMetadataBuilder, Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::TrayIconBuilder;

fn main() -> Result<()> {
    // Initialize the logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .finish()
        .with(NotificationLayer::new())
        .init();

    // Load config
    let config_manager = ConfigManager::new()?;
    let config = Arc::new(RwLock::new(config_manager.load()?));
    // save back the config to create the file if it doesn't exist
    config_manager.save(&config.read())?;

    let shortcut = SharedShortcut::new(config.read().hotkey());
    let typed_trigger = Arc::new(AtomicBool::new(config.read().typed_trigger));
    info!(
        hotkey = %shortcut.get().label(),
        typed_trigger = config.read().typed_trigger,
        backend = config.read().backend.display_name(),
        "Configuration loaded"
    );

    let event_loop: EventLoop<PoufEvent> = EventLoopBuilder::with_user_event().build();
    let event_sender = event_loop.create_proxy();

    // The engine owns all activation state; the listener only feeds it.
    let (signal_sender, signal_receiver) = tokio::sync::mpsc::unbounded_channel();
    let _engine = spawn_engine(config.clone(), signal_receiver, event_sender)?;

    match KeyboardMonitor::new(shortcut.clone(), typed_trigger.clone()).spawn(signal_sender) {
        Ok(_) => {}
        Err(CaptureError::PermissionDenied) => warn!(
            "Input monitoring permission not granted, so {} can't see the hotkey or typing. \
             Grant access in System Settings > Privacy & Security > Input Monitoring and restart.",
            APP_NAME_PRETTY
        ),
        Err(e) => error!("Failed to start keyboard listener: {}", e),
    }

    // Used only for the "Copy config path" menu item
    let mut clipboard = Clipboard::new()?;

    // Create the tray menu
    let tray_menu = Menu::new();
    let icon_quit = MenuItem::new("Quit", true, None);
    let icon_copy_config = MenuItem::new("Copy config path", true, None);
    let icon_reload_config = MenuItem::new("Reload config", true, None);
    tray_menu.append_items(&[
        // the name of the app
        &MenuItem::new(APP_NAME_PRETTY, false, None),
        &PredefinedMenuItem::separator(),
        &PredefinedMenuItem::about(
            None,
            Some(
                AboutMetadataBuilder::new()
                    .version(Some(VERSION.to_owned()))
                    .build(),
            ),
        ),
        &icon_copy_config,
        &icon_reload_config,
        &PredefinedMenuItem::separator(),
        &icon_quit,
    ])?;

    // Set up the event loop
    let mut icon_tray = None;
    let menu_channel = MenuEvent::receiver();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        if let Event::NewEvents(StartCause::Init) = event {
            // We create the icon once the event loop is actually running
            // to prevent issues like https://github.com/tauri-apps/tray-icon/issues/90
            let tray = icon::icon(EngineState::Idle)
                .map_err(anyhow::Error::from)
                .and_then(|tray_icon| {
                    TrayIconBuilder::new()
                        .with_menu(Box::new(tray_menu.clone()))
                        .with_tooltip(format!("{} - rephrase anywhere", APP_NAME_PRETTY))
                        .with_icon(tray_icon)
                        .build()
                        .map_err(anyhow::Error::from)
                });
            match tray {
                Ok(tray) => {
                    icon_tray.replace(tray);
                }
                Err(e) => error!("Failed to create tray icon: {}", e),
            }

            // We have to request a redraw here to have the icon actually show up.
            // Tao only exposes a redraw method on the Window so we use core-foundation directly.
            #[cfg(target_os = "macos")]
            unsafe {
                use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};

                let rl = CFRunLoopGetMain();
                CFRunLoopWakeUp(rl);
            }

            info!(hotkey = %shortcut.get().label(), "{} ready", APP_NAME_PRETTY);
        }

        if let Ok(event) = menu_channel.try_recv() {
            if event.id == icon_quit.id() {
                icon_tray.take();
                *control_flow = ControlFlow::Exit;
            } else if event.id == icon_copy_config.id() {
                if let Err(e) =
                    clipboard.set_text(config_manager.config_path().to_string_lossy().into_owned())
                {
                    error!("Failed to copy config path to clipboard: {}", e);
                }
            } else if event.id == icon_reload_config.id() {
                let mut config = config.write();
                match config_manager.reload(&mut config) {
                    Ok(true) => {
                        let previous = shortcut.replace(config.hotkey());
                        typed_trigger.store(config.typed_trigger, Ordering::Relaxed);
                        info!(
                            previous = %previous.label(),
                            hotkey = %shortcut.get().label(),
                            typed_trigger = config.typed_trigger,
                            backend = config.backend.display_name(),
                            "Config reloaded"
                        );
                    }
                    Ok(false) => info!("Config unchanged"),
                    Err(e) => error!("Failed to reload config: {:#}", e),
                }
            }
        }

        // Handle user provided events
        if let Event::UserEvent(PoufEvent::StateChanged(state)) = event {
            info!(state = ?state, "State changed");
            if let Some(tray) = icon_tray.as_ref() {
                match icon::icon(state) {
                    Ok(tray_icon) => {
                        if let Err(e) = tray.set_icon(Some(tray_icon)) {
                            warn!("Failed to update tray icon: {}", e);
                        }
                    }
                    Err(e) => warn!("Failed to draw tray icon: {}", e),
                }
            }
        }
    });
}
