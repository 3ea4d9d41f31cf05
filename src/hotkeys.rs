use anyhow::{Context, Result};
use evdev::{Device, EventSummary, InputEvent};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, error, info, warn};

use crate::constants::{input, paths, permissions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyCommand {
    /// Show or hide the overlay and the settings panel together
    ToggleVisibility,
}

/// Find all keyboard devices that have the toggle key
fn find_all_keyboard_devices() -> Result<Vec<Device>> {
    info!(path = %paths::DEV_INPUT, "Scanning for keyboard devices...");

    let mut devices = Vec::new();

    for entry in std::fs::read_dir(paths::DEV_INPUT)
        .context(format!("Failed to read {} - are you in the '{}' group?", paths::DEV_INPUT, permissions::INPUT_GROUP))?
    {
        let path = entry?.path();

        // Devices we cannot open are skipped
        if let Ok(device) = Device::open(&path)
            && let Some(keys) = device.supported_keys()
            && keys.contains(input::TOGGLE_KEY)
        {
            info!(device_path = %path.display(), name = ?device.name(), "Found keyboard device");
            devices.push(device);
        }
    }

    if devices.is_empty() {
        anyhow::bail!(
            "No keyboard device found. Ensure you're in '{}' group:\n\
             {}\n\
             Then log out and back in.",
            permissions::INPUT_GROUP,
            permissions::ADD_TO_INPUT_GROUP
        )
    }

    info!(count = devices.len(), "Listening on keyboard device(s)");

    Ok(devices)
}

/// Spawn one background thread per keyboard device
///
/// Every toggle press is sent over `sender`, then `wake` is called so the UI
/// thread picks the command up even while its window is hidden.
pub fn spawn_listener<W>(sender: Sender<HotkeyCommand>, wake: W) -> Result<Vec<thread::JoinHandle<()>>>
where
    W: Fn() + Send + Clone + 'static,
{
    let devices = find_all_keyboard_devices()?;
    let mut handles = Vec::new();

    for device in devices {
        let sender = sender.clone();
        let wake = wake.clone();
        let handle = thread::Builder::new()
            .name("hotkey-listener".to_string())
            .spawn(move || {
                info!(device = ?device.name(), "Hotkey listener started");
                if let Err(e) = listen_for_hotkeys(device, sender, wake) {
                    error!(error = %e, "Hotkey listener error");
                }
            })
            .context("Failed to spawn hotkey listener thread")?;
        handles.push(handle);
    }

    Ok(handles)
}

/// Listen for toggle key presses on a single device
fn listen_for_hotkeys<W: Fn()>(mut device: Device, sender: Sender<HotkeyCommand>, wake: W) -> Result<()> {
    loop {
        // Blocks until events are available
        let events = device.fetch_events()
            .context("Failed to fetch events")?;

        let commands: Vec<HotkeyCommand> = events.filter_map(|event| command_for(&event)).collect();

        for command in commands {
            info!(command = ?command, "Hotkey pressed, sending command");
            sender.send(command)
                .context("Failed to send hotkey command, UI has shut down")?;
            wake();
        }
    }
}

/// Map a raw input event to a command; key repeats and releases are ignored
fn command_for(event: &InputEvent) -> Option<HotkeyCommand> {
    match event.destructure() {
        EventSummary::Key(_, key, value) => {
            debug!(key = ?key, value, "Key event");
            (key == input::TOGGLE_KEY && value == input::KEY_PRESS)
                .then_some(HotkeyCommand::ToggleVisibility)
        }
        _ => None,
    }
}

/// Check if hotkeys are available (user has input group permissions)
pub fn check_permissions() -> bool {
    std::fs::read_dir(paths::DEV_INPUT).is_ok()
}

/// Print helpful error message if permissions missing
pub fn print_permission_error() {
    error!(path = %paths::DEV_INPUT, "Cannot access input devices");
    error!(group = %permissions::INPUT_GROUP, "Global hotkey requires group membership");
    error!(command = %permissions::ADD_TO_INPUT_GROUP, "Add user to input group");
    error!("  Then log out and back in");
    warn!(key = ?input::TOGGLE_KEY, "Continuing with the hotkey limited to the settings window...");
}
