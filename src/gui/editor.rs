//! Editor screen: one tab per metadata key, a "+" tab to add keys, and a
//! multiline editor for the selected value.

use crate::editor::EditingSession;
use crate::gui::MetadataEditorApp;
use eframe::egui;
use egui_phosphor::regular as icons;

enum EditorAction {
    Open,
    Save,
    SaveAs,
    Remove(String),
    Select(String),
    ShowAddKey,
}

impl MetadataEditorApp {
    pub fn render_editor(&mut self, ctx: &egui::Context) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let mut actions = Vec::new();
        let font_size = self.settings.editor_font_size;

        egui::TopBottomPanel::top("editor_top").show(ctx, |ui| {
            render_toolbar(ui, session, &mut actions);
            ui.separator();
            render_tab_bar(ui, session, &mut actions);
            ui.add_space(crate::theme::SPACING_TINY);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            render_value_editor(ui, session, font_size);
        });

        self.render_add_key_dialog(ctx);

        for action in actions {
            self.apply_editor_action(action);
        }
    }

    fn apply_editor_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::Open => self.pick_and_open(),
            EditorAction::Save => self.save_current(),
            EditorAction::SaveAs => self.save_as(),
            EditorAction::ShowAddKey => self.new_key_input = Some(String::new()),
            EditorAction::Select(key) => {
                if let Some(session) = self.session.as_mut() {
                    session.select_tab(&key);
                }
            }
            EditorAction::Remove(key) => {
                let removed = self
                    .session
                    .as_mut()
                    .and_then(|session| session.remove_key(&key));
                if removed.is_some() {
                    self.status = format!("{} Removed key '{key}' (not saved yet)", icons::TRASH);
                    self.toasts.info(format!("Removed '{key}'"));
                }
            }
        }
    }

    fn render_add_key_dialog(&mut self, ctx: &egui::Context) {
        let Some(input) = self.new_key_input.as_mut() else {
            return;
        };

        let mut submit = false;
        let mut cancel = false;

        egui::Window::new(format!("{} New Metadata Key", icons::PLUS))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Enter metadata key:");
                let response = ui.text_edit_singleline(input);
                if !response.has_focus() && !response.lost_focus() {
                    response.request_focus();
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.add_space(crate::theme::SPACING_SMALL);
                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                        cancel = true;
                    }
                });
            });

        if cancel {
            self.new_key_input = None;
            return;
        }
        if !submit {
            return;
        }

        let key = self.new_key_input.take().unwrap_or_default();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.add_key(&key) {
            Ok(key) => {
                self.status = format!("{} Added key '{key}' (not saved yet)", icons::PLUS_CIRCLE);
            }
            Err(err) => {
                // Keep the dialog open so the user can fix the key.
                self.new_key_input = Some(key);
                self.report_error(&err);
            }
        }
    }
}

fn render_toolbar(ui: &mut egui::Ui, session: &EditingSession, actions: &mut Vec<EditorAction>) {
    ui.horizontal(|ui| {
        let mut title = egui::RichText::new(format!("{} {}", icons::FILE_TEXT, session.file_name()))
            .strong();
        if session.is_dirty() {
            title = title.color(crate::theme::DIRTY_COLOR);
        }
        ui.label(title).on_hover_text(session.path().display().to_string());

        let table = session.table();
        ui.label(
            egui::RichText::new(format!(
                "{} rows • {} columns • {}",
                table.num_rows(),
                table.num_columns(),
                table.compression()
            ))
            .weak(),
        )
        .on_hover_text(table.column_names().join(", "));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(format!("{} Save As...", icons::FLOPPY_DISK_BACK)).clicked() {
                actions.push(EditorAction::SaveAs);
            }
            if ui.button(format!("{} Save", icons::FLOPPY_DISK)).clicked() {
                actions.push(EditorAction::Save);
            }
            if ui.button(format!("{} Open...", icons::FOLDER_OPEN)).clicked() {
                actions.push(EditorAction::Open);
            }
            if let Some(key) = session.current_tab()
                && ui
                    .button(format!("{} Remove key", icons::TRASH))
                    .on_hover_text(format!("Remove '{key}' from the metadata"))
                    .clicked()
            {
                actions.push(EditorAction::Remove(key.to_owned()));
            }
        });
    });
}

fn render_tab_bar(ui: &mut egui::Ui, session: &EditingSession, actions: &mut Vec<EditorAction>) {
    egui::ScrollArea::horizontal()
        .id_salt("metadata_tab_bar")
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.set_min_height(crate::theme::TAB_HEIGHT);
                let current = session.current_tab();
                for key in session.keys() {
                    let selected = current == Some(key);
                    if ui
                        .selectable_label(selected, crate::theme::tab_text(key, selected))
                        .clicked()
                    {
                        actions.push(EditorAction::Select(key.to_owned()));
                    }
                }
                if ui
                    .button(icons::PLUS)
                    .on_hover_text("Add a metadata key")
                    .clicked()
                {
                    actions.push(EditorAction::ShowAddKey);
                }
            });
        });
}

fn render_value_editor(ui: &mut egui::Ui, session: &mut EditingSession, font_size: f32) {
    if session.current_tab().is_none() {
        ui.vertical_centered(|ui| {
            ui.add_space(crate::theme::SPACING_LARGE);
            ui.label(
                egui::RichText::new("This file has no metadata yet. Use + to add a key.").weak(),
            );
        });
        return;
    }

    crate::theme::value_editor_frame(ui).show(ui, |ui| {
        egui::ScrollArea::vertical()
            .id_salt("metadata_value")
            .show(ui, |ui| {
                ui.add_sized(
                    ui.available_size(),
                    egui::TextEdit::multiline(session.buffer_mut())
                        .font(egui::FontId::monospace(font_size))
                        .frame(false)
                        .desired_width(f32::INFINITY),
                );
            });
    });
}
