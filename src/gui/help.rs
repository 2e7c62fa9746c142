use eframe::egui;
use egui_phosphor::regular as icons;

const SHORTCUTS: &[(&str, &str)] = &[
    ("Ctrl+O", "Open a Parquet file"),
    ("Ctrl+S", "Save metadata to the open file"),
    ("Enter", "Confirm the new-key dialog"),
    ("Esc", "Cancel the new-key dialog"),
];

const CLI_EXAMPLES: &[(&str, &str)] = &[
    ("show data.parquet", "List every key and value"),
    ("show data.parquet --json", "Same, as a JSON object"),
    ("get data.parquet owner", "Print one value"),
    ("set data.parquet owner=analytics", "Add or replace keys"),
    ("remove data.parquet obsolete", "Delete keys"),
    ("set data.parquet k=v -o copy.parquet", "Write the result elsewhere"),
    ("open data.parquet", "Start this window with a file loaded"),
];

const TOPICS: &[(&str, &[&str])] = &[
    (
        "What gets edited",
        &[
            "Parquet files can carry free-form key/value pairs in their footer, next to the column schema.",
            "Column data is never changed. Saving rewrites the file with the same columns and the new metadata.",
            "The ARROW:schema entry is regenerated by the writer, so it is not shown.",
        ],
    ),
    (
        "Adding and removing keys",
        &[
            "Click + at the end of the tab bar and type the key. Keys must be unique and not blank.",
            "Remove key drops the selected tab. Nothing reaches the file until you save.",
        ],
    ),
    (
        "Saving",
        &[
            "Save As writes a copy and continues editing the copy.",
            "With safe save on, the new file is written next to the target and renamed over it, so a failed write leaves the old file intact.",
            "The file name turns orange while there are unsaved edits.",
            "Opening another file or closing the window with unsaved edits asks before discarding them.",
        ],
    ),
];

/// Renders the help screen. Returns `true` when the user asks to go back.
pub fn render_help(ctx: &egui::Context) -> bool {
    let mut go_back = false;
    egui::TopBottomPanel::top("help_top").show(ctx, |ui| {
        ui.horizontal(|ui| {
            go_back = ui.button(format!("{} Back", icons::ARROW_LEFT)).clicked();
            ui.separator();
            ui.heading(format!("{} Help", icons::QUESTION));
        });
    });

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.inner_margin(crate::theme::panel_margin()))
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(crate::theme::SPACING_SMALL);

                for (title, lines) in TOPICS {
                    egui::CollapsingHeader::new(egui::RichText::new(*title).strong())
                        .default_open(true)
                        .show(ui, |ui| {
                            for line in *lines {
                                ui.label(*line);
                            }
                        });
                }

                ui.add_space(crate::theme::SPACING_MEDIUM);
                crate::theme::card_frame(ui).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.heading(format!("{} Keyboard", icons::KEYBOARD));
                    ui.add_space(crate::theme::SPACING_SMALL);
                    two_column_grid(ui, "help_shortcuts", SHORTCUTS);
                });

                ui.add_space(crate::theme::SPACING_MEDIUM);
                crate::theme::card_frame(ui).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.heading(format!("{} Command line", icons::TERMINAL_WINDOW));
                    ui.label(
                        egui::RichText::new("Each line runs as parquet-metadata-editor <command>.")
                            .weak(),
                    );
                    ui.add_space(crate::theme::SPACING_SMALL);
                    two_column_grid(ui, "help_cli", CLI_EXAMPLES);
                });

                ui.add_space(crate::theme::SPACING_MEDIUM);
                ui.horizontal_wrapped(|ui| {
                    ui.label(format!("{} See also:", icons::GLOBE));
                    ui.hyperlink_to(
                        "Parquet file format",
                        "https://parquet.apache.org/docs/file-format/",
                    );
                    ui.hyperlink_to("parquet crate", "https://docs.rs/parquet/latest/parquet/");
                });

                ui.add_space(crate::theme::SPACING_LARGE);
            });
        });

    go_back
}

fn two_column_grid(ui: &mut egui::Ui, id: &str, rows: &[(&str, &str)]) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([crate::theme::SPACING_LARGE, crate::theme::SPACING_TINY])
        .striped(true)
        .show(ui, |ui| {
            for (left, right) in rows {
                ui.monospace(*left);
                ui.label(*right);
                ui.end_row();
            }
        });
}
