//! Crosshair code import, custom image picker and settings file buttons

use std::path::{Path, PathBuf};

use eframe::egui;
use tracing::debug;

use crate::gui::constants::*;

/// Text typed into the crosshair code field
#[derive(Debug, Default)]
pub struct ImportExportState {
    pub code_input: String,
}

/// What the user asked for this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportExportAction {
    ApplyCode(String),
    LoadImage(PathBuf),
    ClearImage,
    Save,
    Load,
}

pub fn ui(
    ui: &mut egui::Ui,
    state: &mut ImportExportState,
    has_image: bool,
    settings_path: &Path,
) -> Option<ImportExportAction> {
    let mut action = None;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Crosshair Code").strong());
        ui.add_space(ITEM_SPACING);

        let response = ui.add(
            egui::TextEdit::singleline(&mut state.code_input)
                .hint_text("Paste Valorant crosshair code here")
                .desired_width(f32::INFINITY),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("Apply Code").clicked() || submitted {
            action = Some(ImportExportAction::ApplyCode(state.code_input.clone()));
        }
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Custom Image").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            if ui.button("Load Image...").clicked() {
                match rfd::FileDialog::new()
                    .add_filter(IMAGE_FILTER_NAME, IMAGE_EXTENSIONS)
                    .pick_file()
                {
                    Some(path) => action = Some(ImportExportAction::LoadImage(path)),
                    None => debug!("Image selection cancelled"),
                }
            }

            if has_image && ui.button("Remove Image").clicked() {
                action = Some(ImportExportAction::ClearImage);
            }
        });
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Settings File").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            if ui.button("\u{1F4BE} Save Settings").clicked() {
                action = Some(ImportExportAction::Save);
            }
            if ui.button("\u{1F4C2} Load Settings").clicked() {
                action = Some(ImportExportAction::Load);
            }
        });
        ui.label(egui::RichText::new(settings_path.display().to_string()).weak().small());
    });

    action
}
