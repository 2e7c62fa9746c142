use crate::config::EditorSettings;
use crate::editor::EditingSession;
use crate::error::EditorError;
use eframe::egui;
use egui_phosphor::regular as icons;
use std::path::PathBuf;

pub mod editor;
pub mod help;
pub mod home;

pub const APP_NAME: &str = "Parquet Metadata Editor";

#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AppState {
    #[default]
    Home,
    Editor,
    Help,
}

/// Action waiting for the user to confirm discarding unsaved edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDiscard {
    Open(PathBuf),
    Close,
}

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct MetadataEditorApp {
    pub settings: EditorSettings,

    #[serde(skip)]
    pub state: AppState,
    #[serde(skip)]
    pub status: String,

    /// Dropped and replaced whenever another file is opened.
    #[serde(skip)]
    pub session: Option<EditingSession>,

    /// Text of the "new key" dialog while it is open.
    #[serde(skip)]
    pub new_key_input: Option<String>,
    #[serde(skip)]
    pub pending_discard: Option<PendingDiscard>,
    /// Set once the user agreed to close despite unsaved edits.
    #[serde(skip)]
    close_confirmed: bool,

    #[serde(skip)]
    window_title: String,
    #[serde(skip)]
    pub toasts: egui_notify::Toasts,
}

impl Default for MetadataEditorApp {
    fn default() -> Self {
        Self {
            settings: EditorSettings::default(),
            state: AppState::Home,
            status: String::new(),
            session: None,
            new_key_input: None,
            pending_discard: None,
            close_confirmed: false,
            window_title: String::new(),
            toasts: egui_notify::Toasts::default(),
        }
    }
}

/// Opens the main window and blocks until it is closed.
///
/// # Errors
///
/// Returns an error if the native window or graphics context cannot be created.
pub fn run(initial_file: Option<PathBuf>) -> eframe::Result {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title(APP_NAME),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(MetadataEditorApp::new(cc, initial_file)))),
    )
}

impl MetadataEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_file: Option<PathBuf>) -> Self {
        crate::theme::apply_editor_theme(&cc.egui_ctx);

        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.settings.sanitize();

        if let Some(path) = initial_file {
            app.open_path(path);
        }
        app
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.session.as_ref().is_some_and(EditingSession::is_dirty)
    }

    pub fn pick_and_open(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Parquet Files", &["parquet"]);
        if let Some(dir) = self
            .settings
            .recent_files
            .first()
            .and_then(|p| p.parent())
        {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.pick_file() {
            self.request_open(path);
        }
    }

    /// Opens `path`, asking first if the current session has unsaved edits.
    pub fn request_open(&mut self, path: PathBuf) {
        if self.settings.confirm_discard && self.has_unsaved_changes() {
            self.pending_discard = Some(PendingDiscard::Open(path));
        } else {
            self.open_path(path);
        }
    }

    pub fn open_path(&mut self, path: PathBuf) {
        match EditingSession::open(&path) {
            Ok(session) => {
                let keys = session.metadata().len();
                self.session = Some(session);
                self.new_key_input = None;
                self.settings.push_recent(&path);
                self.state = AppState::Editor;
                self.status = format!(
                    "{} Opened {} ({keys} metadata keys)",
                    icons::CHECK_CIRCLE,
                    path.display()
                );
                self.toasts.success(format!("Opened {}", path.display()));
            }
            Err(err) => {
                if !path.exists() {
                    self.settings.forget_recent(&path);
                }
                self.report_error(&err);
            }
        }
    }

    pub fn save_current(&mut self) {
        let options = self.settings.save_options();
        let Some(session) = self.session.as_mut() else {
            self.report_error(&EditorError::NoOpenFile);
            return;
        };

        let result = session
            .save(options)
            .map(|()| session.path().display().to_string());
        match result {
            Ok(path) => {
                self.status = format!("{} Metadata saved to {path}", icons::CHECK_CIRCLE);
                self.toasts.success("Metadata saved successfully.");
            }
            Err(err) => self.report_error(&err),
        }
    }

    pub fn save_as(&mut self) {
        let options = self.settings.save_options();
        let Some(session) = self.session.as_mut() else {
            self.report_error(&EditorError::NoOpenFile);
            return;
        };

        let mut dialog = rfd::FileDialog::new()
            .add_filter("Parquet Files", &["parquet"])
            .set_file_name(session.file_name());
        if let Some(dir) = session.path().parent() {
            dialog = dialog.set_directory(dir);
        }
        let Some(target) = dialog.save_file() else {
            return;
        };

        match session.save_as(&target, options) {
            Ok(()) => {
                self.settings.push_recent(&target);
                self.status = format!(
                    "{} Metadata saved to {}",
                    icons::CHECK_CIRCLE,
                    target.display()
                );
                self.toasts
                    .success(format!("Saved as {}", target.display()));
            }
            Err(err) => self.report_error(&err),
        }
    }

    pub fn report_error(&mut self, err: &EditorError) {
        if err.is_io() {
            tracing::error!("{err}");
        } else {
            tracing::warn!("{err}");
        }
        self.status = format!("{} {err}", icons::X_CIRCLE);
        self.toasts.error(err.to_string());
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.add_space(crate::theme::SPACING_SMALL);
        ui.label(
            egui::RichText::new(format!("{} PARQUET META", icons::TABLE))
                .strong()
                .size(17.0)
                .color(crate::theme::ACCENT_COLOR),
        );
        ui.add_space(crate::theme::SPACING_LARGE);

        let has_session = self.session.is_some();
        let screens = [
            (AppState::Home, icons::HOUSE, "Home", true),
            (AppState::Editor, icons::TABS, "Editor", has_session),
            (AppState::Help, icons::QUESTION, "Help", true),
        ];

        let width = ui.available_width();
        for (state, icon, label, enabled) in screens {
            let button = egui::Button::selectable(
                self.state == state,
                egui::RichText::new(format!("{icon}  {label}")).size(14.0),
            );
            if ui
                .add_enabled(enabled, button.min_size(egui::vec2(width, 36.0)))
                .clicked()
            {
                self.state = state;
            }
        }

        if let Some(session) = &self.session {
            ui.add_space(crate::theme::SPACING_LARGE);
            ui.separator();
            ui.label(egui::RichText::new("OPEN FILE").small().weak());
            let mut name = egui::RichText::new(session.file_name()).monospace();
            if session.is_dirty() {
                name = name.color(crate::theme::DIRTY_COLOR);
            }
            ui.add(egui::Label::new(name).truncate())
                .on_hover_text(session.path().display().to_string());
            ui.label(
                egui::RichText::new(format!("{} keys", session.metadata().len()))
                    .small()
                    .weak(),
            );
        }
    }

    /// Handles a window close request. Returns `true` when the close has to be
    /// cancelled so the user can confirm dropping unsaved edits first.
    pub fn intercept_close(&mut self) -> bool {
        if self.close_confirmed || !self.settings.confirm_discard || !self.has_unsaved_changes() {
            return false;
        }
        self.pending_discard = Some(PendingDiscard::Close);
        true
    }

    /// Applies the answer to the discard prompt. Returns `true` when the
    /// window should now close.
    pub fn resolve_discard(&mut self, discard: bool) -> bool {
        let Some(pending) = self.pending_discard.take() else {
            return false;
        };
        if !discard {
            return false;
        }

        tracing::info!("Discarding unsaved edits");
        match pending {
            PendingDiscard::Open(path) => {
                self.open_path(path);
                false
            }
            PendingDiscard::Close => {
                self.close_confirmed = true;
                true
            }
        }
    }

    fn render_discard_prompt(&mut self, ctx: &egui::Context) {
        let (question, confirm) = match &self.pending_discard {
            Some(PendingDiscard::Open(path)) => (
                format!("Discard them and open {}?", path.display()),
                "Discard and open",
            ),
            Some(PendingDiscard::Close) => {
                ("Discard them and quit?".to_owned(), "Discard and quit")
            }
            None => return,
        };

        let mut decision = None;
        egui::Window::new(format!("{} Unsaved changes", icons::WARNING))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("The current file has unsaved metadata edits.");
                ui.label(question);
                ui.add_space(crate::theme::SPACING_SMALL);
                ui.horizontal(|ui| {
                    if ui.button(confirm).clicked() {
                        decision = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                });
            });

        if decision.is_some_and(|discard| self.resolve_discard(discard)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn sync_window_title(&mut self, ctx: &egui::Context) {
        let title = match &self.session {
            Some(session) if session.is_dirty() => {
                format!("{} - {APP_NAME} *", session.file_name())
            }
            Some(session) => format!("{} - {APP_NAME}", session.file_name()),
            None => APP_NAME.to_owned(),
        };
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (save, open) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::S),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::O),
            )
        });
        if save && self.session.is_some() {
            self.save_current();
        }
        if open {
            self.pick_and_open();
        }
    }

    fn render_footer(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let status = if self.status.is_empty() {
                    egui::RichText::new("Ready").weak()
                } else {
                    egui::RichText::new(&self.status)
                };
                ui.label(status.small());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .small()
                            .weak(),
                    );
                    if self.has_unsaved_changes() {
                        ui.label(
                            egui::RichText::new(format!("{} Unsaved changes", icons::PENCIL_SIMPLE))
                                .small()
                                .color(crate::theme::DIRTY_COLOR),
                        );
                    }
                });
            });
        });
    }
}

impl eframe::App for MetadataEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) && self.intercept_close() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }
        self.handle_shortcuts(ctx);
        self.toasts.show(ctx);

        egui::SidePanel::left("main_sidebar")
            .frame(crate::theme::sidebar_frame())
            .resizable(false)
            .default_width(180.0)
            .show(ctx, |ui| {
                self.render_sidebar(ui);
            });

        self.render_footer(ctx);

        if self.state == AppState::Editor && self.session.is_none() {
            self.state = AppState::Home;
        }

        match self.state {
            AppState::Home => self.render_home(ctx),
            AppState::Editor => self.render_editor(ctx),
            AppState::Help => {
                if help::render_help(ctx) {
                    self.state = AppState::Home;
                }
            }
        }

        self.render_discard_prompt(ctx);
        self.sync_window_title(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}
