//! Colours, spacing and frames for the editor window.

use eframe::egui;
use egui::{Color32, CornerRadius, FontFamily, FontId, Margin, RichText, Stroke, TextStyle};

pub const ACCENT_COLOR: Color32 = Color32::from_rgb(38, 132, 196);
pub const ACCENT_HOVER: Color32 = Color32::from_rgb(30, 105, 160);
/// File name colour while there are unsaved edits.
pub const DIRTY_COLOR: Color32 = Color32::from_rgb(230, 162, 60);

const BG_SIDEBAR: Color32 = Color32::from_rgb(24, 27, 31);
const BG_PANEL: Color32 = Color32::from_rgb(30, 33, 38);
const BG_CARD: Color32 = Color32::from_rgb(36, 40, 46);
const BG_EDITOR: Color32 = Color32::from_rgb(19, 21, 24);
const BORDER: Color32 = Color32::from_rgb(50, 55, 62);

pub const SPACING_TINY: f32 = 4.0;
pub const SPACING_SMALL: f32 = 8.0;
pub const SPACING_MEDIUM: f32 = 12.0;
pub const SPACING_LARGE: f32 = 20.0;

pub const TAB_HEIGHT: f32 = 28.0;

const ROUNDING: u8 = 6;

pub fn apply_editor_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();

    for (widget, fill) in [
        (&mut visuals.widgets.noninteractive, BG_PANEL),
        (&mut visuals.widgets.inactive, BG_CARD),
        (&mut visuals.widgets.hovered, ACCENT_HOVER),
        (&mut visuals.widgets.active, ACCENT_COLOR),
        (&mut visuals.widgets.open, BG_CARD),
    ] {
        widget.bg_fill = fill;
        widget.weak_bg_fill = fill;
        widget.corner_radius = CornerRadius::same(ROUNDING);
    }
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, BORDER);
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.selection.bg_fill = ACCENT_COLOR.linear_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT_COLOR);
    visuals.text_cursor.stroke = Stroke::new(2.0, ACCENT_COLOR);

    visuals.window_corner_radius = CornerRadius::same(10);
    visuals.window_fill = BG_PANEL;
    visuals.panel_fill = BG_PANEL;
    visuals.faint_bg_color = BG_CARD;
    visuals.extreme_bg_color = BG_EDITOR;

    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(SPACING_SMALL, 6.0);
        style.spacing.button_padding = egui::vec2(10.0, 4.0);
        style
            .text_styles
            .insert(TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace));
    });

    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}

/// Margin for full-width screen content.
pub fn panel_margin() -> Margin {
    Margin {
        left: 20,
        right: 30,
        top: 0,
        bottom: 0,
    }
}

pub fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(CornerRadius::same(10))
        .inner_margin(Margin::same(15))
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
}

pub fn sidebar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_SIDEBAR)
        .inner_margin(Margin::same(10))
}

pub fn top_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_PANEL)
        .inner_margin(Margin {
            top: 10,
            bottom: 10,
            ..panel_margin()
        })
        .stroke(Stroke::new(1.0, BORDER))
}

/// Sunken frame around the value editor.
pub fn value_editor_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.visuals().extreme_bg_color)
        .corner_radius(CornerRadius::same(ROUNDING))
        .inner_margin(Margin::same(6))
        .stroke(Stroke::new(1.0, BORDER))
}

/// Label for a metadata key tab.
pub fn tab_text(key: &str, selected: bool) -> RichText {
    let text = RichText::new(key).monospace();
    if selected {
        text.strong().color(Color32::WHITE)
    } else {
        text
    }
}
