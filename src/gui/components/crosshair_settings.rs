use eframe::egui;

use crate::config::{CrosshairConfig, Rgb};
use crate::constants::validation::*;
use crate::gui::constants::*;

/// Renders the crosshair controls and returns true if any value changed
pub fn ui(ui: &mut egui::Ui, config: &mut CrosshairConfig) -> bool {
    let mut changed = false;

    ui.group(|ui| {
        ui.label(egui::RichText::new("Crosshair").strong());
        ui.add_space(ITEM_SPACING);

        ui.horizontal(|ui| {
            row_label(ui, "Size:");
            if ui.add(egui::Slider::new(&mut config.size, MIN_SIZE..=MAX_SIZE)
                .suffix(" px")).changed() {
                changed = true;
            }
        });

        ui.horizontal(|ui| {
            row_label(ui, "Thickness:");
            if ui.add(egui::Slider::new(&mut config.thickness, MIN_THICKNESS..=MAX_THICKNESS)
                .suffix(" px")).changed() {
                changed = true;
            }
        });

        changed |= color_row(ui, "Color:", &mut config.color);

        if ui.checkbox(&mut config.draw_procedural, "Draw lines when no image is loaded")
            .on_hover_text("A loaded crosshair image always takes precedence")
            .changed() {
            changed = true;
        }
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Outline").strong());
        ui.add_space(ITEM_SPACING);

        if ui.checkbox(&mut config.show_outline, "Enabled").changed() {
            changed = true;
        }

        if config.show_outline {
            ui.indent("outline_settings", |ui| {
                ui.horizontal(|ui| {
                    row_label(ui, "Thickness:");
                    if ui.add(egui::DragValue::new(&mut config.outline_thickness)
                        .range(MIN_THICKNESS..=MAX_OUTLINE_THICKNESS)).changed() {
                        changed = true;
                    }
                });
                changed |= color_row(ui, "Color:", &mut config.outline_color);
            });
        }
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Inner Lines").strong());
        ui.add_space(ITEM_SPACING);

        if ui.checkbox(&mut config.show_inner, "Show").changed() {
            changed = true;
        }
        changed |= length_row(ui, &mut config.inner_length);
        changed |= opacity_row(ui, &mut config.inner_opacity);
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Outer Lines").strong());
        ui.add_space(ITEM_SPACING);

        if ui.checkbox(&mut config.show_outer, "Show").changed() {
            changed = true;
        }
        changed |= length_row(ui, &mut config.outer_length);
        changed |= opacity_row(ui, &mut config.outer_opacity);

        // Imported codes can push this past 100%; keep it until the slider moves
        if config.outer_opacity > 1.0 {
            ui.label(egui::RichText::new(format!(
                "Imported opacity: {:.0}% (drawn at 100%)",
                config.outer_opacity * 100.0
            )).weak());
        }
    });

    ui.add_space(SECTION_SPACING);

    ui.group(|ui| {
        ui.label(egui::RichText::new("Center Dot").strong());
        ui.add_space(ITEM_SPACING);

        if ui.checkbox(&mut config.show_dot, "Show").changed() {
            changed = true;
        }

        ui.horizontal(|ui| {
            row_label(ui, "Size:");
            if ui.add(egui::DragValue::new(&mut config.dot_size)
                .range(MIN_DOT_SIZE..=MAX_DOT_SIZE)
                .suffix(" px")).changed() {
                changed = true;
            }
        });
        changed |= opacity_row(ui, &mut config.dot_opacity);
    });

    changed
}

fn row_label(ui: &mut egui::Ui, text: &str) {
    let height = ui.spacing().interact_size.y;
    ui.add_sized([LABEL_WIDTH, height], egui::Label::new(text));
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Rgb) -> bool {
    ui.horizontal(|ui| {
        row_label(ui, label);
        ui.color_edit_button_srgb(&mut color.0).changed()
    })
    .inner
}

fn length_row(ui: &mut egui::Ui, length: &mut u32) -> bool {
    ui.horizontal(|ui| {
        row_label(ui, "Length:");
        ui.add(egui::DragValue::new(length)
            .range(0..=MAX_LINE_LENGTH)
            .suffix(" px"))
            .changed()
    })
    .inner
}

/// Percent slider over a 0..=1 opacity
///
/// Binds to a local percentage so values above 1.0 are not clamped just by
/// being displayed.
fn opacity_row(ui: &mut egui::Ui, opacity: &mut f32) -> bool {
    let mut percent = (opacity.clamp(0.0, 1.0) * 100.0).round() as u32;
    let changed = ui.horizontal(|ui| {
        row_label(ui, "Opacity:");
        ui.add(egui::Slider::new(&mut percent, 0..=100).suffix("%")).changed()
    })
    .inner;

    if changed {
        *opacity = percent as f32 / 100.0;
    }
    changed
}
