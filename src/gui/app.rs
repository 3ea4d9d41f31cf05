use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{anyhow, Result};
use eframe::{egui, CreationContext, NativeOptions};
use tracing::{error, info};

use super::components::crosshair_settings;
use super::components::import_export::{self, ImportExportAction, ImportExportState};
use super::constants::*;
use crate::controller::{SettingsController, StatusKind};
use crate::hotkeys::{self, HotkeyCommand};
use crate::renderer::OverlaySurface;

struct SettingsApp<S: OverlaySurface> {
    controller: SettingsController<S>,
    import_export: ImportExportState,
    hotkey_rx: Receiver<HotkeyCommand>,
    /// False when /dev/input is unavailable and the key is read from egui instead
    global_hotkey: bool,
    _hotkey_handles: Vec<JoinHandle<()>>,
}

impl<S: OverlaySurface> SettingsApp<S> {
    fn new(cc: &CreationContext<'_>, controller: SettingsController<S>) -> Self {
        info!("Initializing settings panel");

        let (hotkey_tx, hotkey_rx) = mpsc::channel();
        let repaint_ctx = cc.egui_ctx.clone();

        // Spawn hotkey listener (optional - skip if permissions denied)
        let hotkey_handles = if hotkeys::check_permissions() {
            match hotkeys::spawn_listener(hotkey_tx, move || repaint_ctx.request_repaint()) {
                Ok(handles) => {
                    info!("Global hotkey enabled ({:?})", crate::constants::input::TOGGLE_KEY);
                    handles
                }
                Err(e) => {
                    error!("Failed to start hotkey listener: {}", e);
                    hotkeys::print_permission_error();
                    Vec::new()
                }
            }
        } else {
            hotkeys::print_permission_error();
            Vec::new()
        };

        Self {
            controller,
            import_export: ImportExportState::default(),
            hotkey_rx,
            global_hotkey: !hotkey_handles.is_empty(),
            _hotkey_handles: hotkey_handles,
        }
    }

    fn process_hotkeys(&mut self, ctx: &egui::Context) {
        while let Ok(command) = self.hotkey_rx.try_recv() {
            info!("Received hotkey command: {:?}", command);
            match command {
                HotkeyCommand::ToggleVisibility => self.toggle_visibility(ctx),
            }
        }

        // Without evdev access the key only works while this window has focus
        if !self.global_hotkey
            && !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::H))
        {
            self.toggle_visibility(ctx);
        }
    }

    fn toggle_visibility(&mut self, ctx: &egui::Context) {
        let visible = self.controller.toggle_visibility();
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(visible));
    }

    fn handle_action(&mut self, action: ImportExportAction) {
        match action {
            ImportExportAction::ApplyCode(code) => {
                self.controller.apply_code(&code);
            }
            ImportExportAction::LoadImage(path) => {
                self.controller.load_image(&path);
            }
            ImportExportAction::ClearImage => {
                self.controller.clear_image();
            }
            ImportExportAction::Save => {
                self.controller.save();
            }
            ImportExportAction::Load => {
                self.controller.load();
            }
        }
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        if let Some(message) = self.controller.status() {
            let color = match message.kind {
                StatusKind::Success => STATUS_SUCCESS,
                StatusKind::Info => STATUS_INFO,
                StatusKind::Error => STATUS_ERROR,
            };
            ui.colored_label(color, &message.text);
        }
    }
}

impl<S: OverlaySurface> eframe::App for SettingsApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_hotkeys(ctx);
        self.controller.tick();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(PADDING);
                ui.heading("Crosshair Overlay");
                ui.add_space(SECTION_SPACING);

                if crosshair_settings::ui(ui, self.controller.config_mut()) {
                    self.controller.rerender();
                }

                ui.add_space(SECTION_SPACING);

                let has_image = self.controller.config().custom_image.is_some();
                let action = import_export::ui(
                    ui,
                    &mut self.import_export,
                    has_image,
                    self.controller.settings_path(),
                );
                if let Some(action) = action {
                    self.handle_action(action);
                }

                ui.add_space(SECTION_SPACING);
                self.status_ui(ui);

                ui.add_space(SECTION_SPACING);
                ui.separator();
                ui.add_space(SECTION_SPACING);

                ui.group(|ui| {
                    ui.label(egui::RichText::new("Tips").strong());
                    ui.label("• H: Show/hide overlay and settings");
                    ui.label("• The overlay ignores mouse clicks");
                    ui.label("• Custom images are resized to 64x64");
                });
            });
        });

        // Keeps the re-centering tick running while idle and while hidden
        ctx.request_repaint_after(Duration::from_millis(TICK_INTERVAL_MS));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Settings panel exiting");
    }
}

pub fn run_gui<S: OverlaySurface + 'static>(controller: SettingsController<S>) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(SettingsApp::new(cc, controller)))),
    )
    .map_err(|err| anyhow!("Failed to launch settings panel: {err}"))
}
