use crate::gui::MetadataEditorApp;
use eframe::egui;
use egui_phosphor::regular as icons;
use std::path::PathBuf;

impl MetadataEditorApp {
    pub fn render_home(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            crate::theme::top_bar_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(
                        egui::RichText::new(format!("{} {}", icons::FILE_TEXT, crate::gui::APP_NAME))
                            .size(22.0)
                            .strong(),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button(format!("{} Open Parquet...", icons::FOLDER_OPEN))
                            .clicked()
                        {
                            self.pick_and_open();
                        }
                    });
                });
            });

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(crate::theme::SPACING_LARGE);
                ui.columns(2, |columns| {
                    if let [left, right] = columns {
                        left.vertical(|ui| {
                            self.render_recent_files(ui);
                        });
                        right.vertical(|ui| {
                            self.render_settings(ui);
                        });
                    }
                });
            });
        });
    }

    fn render_recent_files(&mut self, ui: &mut egui::Ui) {
        let mut to_open: Option<PathBuf> = None;

        crate::theme::card_frame(ui).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.heading(format!("{} Recent files", icons::CLOCK_COUNTER_CLOCKWISE));
            ui.add_space(crate::theme::SPACING_SMALL);

            if self.settings.recent_files.is_empty() {
                ui.label(egui::RichText::new("No files opened yet.").weak());
                return;
            }

            for path in &self.settings.recent_files {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let response = ui
                    .link(format!("{} {name}", icons::FILE))
                    .on_hover_text(path.display().to_string());
                if response.clicked() {
                    to_open = Some(path.clone());
                }
            }

            ui.add_space(crate::theme::SPACING_SMALL);
            if ui.small_button("Clear list").clicked() {
                self.settings.recent_files.clear();
            }
        });

        if let Some(path) = to_open {
            self.request_open(path);
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        crate::theme::card_frame(ui).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.heading(format!("{} Settings", icons::GEAR));
            ui.add_space(crate::theme::SPACING_SMALL);

            ui.checkbox(&mut self.settings.atomic_save, "Safe save (temp file, then rename)")
                .on_hover_text(
                    "When off, the file is overwritten in place. A failed write can then leave it damaged.",
                );
            ui.checkbox(
                &mut self.settings.confirm_discard,
                "Ask before discarding unsaved edits",
            );

            ui.add_space(crate::theme::SPACING_TINY);
            let mut size = self.settings.editor_font_size;
            if ui
                .add(
                    egui::Slider::new(
                        &mut size,
                        crate::config::MIN_FONT_SIZE..=crate::config::MAX_FONT_SIZE,
                    )
                    .text("Editor font size"),
                )
                .changed()
            {
                self.settings.set_font_size(size);
            }
        });
    }
}
