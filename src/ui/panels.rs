use eframe::egui::{self, Color32, Frame, RichText, Ui};

use crate::data::aggregate::Summary;
use crate::data::filter::Dimension;
use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::format;
use crate::state::AppState;

const ACCENT: Color32 = Color32::from_rgb(0x00, 0x56, 0xb3);
const WARNING: Color32 = Color32::from_rgb(0xb5, 0x84, 0x00);

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.table.is_some(), egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} projects loaded, {} visible",
                table.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Title and update banner
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.heading(RichText::new("🏛 CapEx 2026 Investment Executive Dashboard").strong());
    ui.add_space(6.0);

    let today = chrono::Local::now().format("%d %B %Y").to_string().to_uppercase();
    Frame::group(ui.style())
        .fill(ui.visuals().faint_bg_color)
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new("LATEST DATA UPDATE AS OF").small().strong());
            ui.label(RichText::new(today).size(18.0).strong().color(ACCENT));
        });
    ui.add_space(10.0);
}

// ---------------------------------------------------------------------------
// Dashboard controls – one checkbox per factory / category
// ---------------------------------------------------------------------------

pub fn controls(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("⚙ Dashboard Controls").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                selection_column(&mut cols[0], state, Dimension::Factory);
                selection_column(&mut cols[1], state, Dimension::Category);
            });
        });
}

fn selection_column(ui: &mut Ui, state: &mut AppState, dim: Dimension) {
    let Some(table) = state.table.clone() else {
        return;
    };
    let all_values = dim.universe(&table);
    let n_selected = state.selection.values(dim).len();

    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("Select {}  ({n_selected}/{})", dim.label(), all_values.len()));
        if ui.small_button("All").clicked() {
            state.select_all(dim);
        }
        if ui.small_button("None").clicked() {
            state.select_none(dim);
        }
    });

    for value in all_values {
        let mut checked = state.selection.is_selected(dim, value);
        let mut text = RichText::new(value);
        if dim == Dimension::Category {
            if let Some(colors) = state.colors(dim) {
                text = text.color(colors.color_for(Some(value)));
            }
        }
        if ui.checkbox(&mut checked, text).changed() {
            state.set_selected(dim, value, checked);
        }
    }
}

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

pub fn metrics(ui: &mut Ui, summary: &Summary) {
    ui.columns(4, |cols| {
        metric_tile(&mut cols[0], "Total Investment", &format::baht(summary.total_budget));
        metric_tile(&mut cols[1], "Project Count", &summary.project_count.to_string());
        metric_tile(
            &mut cols[2],
            "Avg. IRR (%)",
            &format::percent_or_na(summary.average_return),
        );
        if let Some(top) = &summary.top_spender {
            metric_tile(&mut cols[3], "Top Spender", top);
        }
    });
}

fn metric_tile(ui: &mut Ui, label: &str, value: &str) {
    Frame::group(ui.style())
        .inner_margin(12.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(label).small());
            ui.label(RichText::new(value).size(22.0).strong());
        });
}

/// Shown instead of metrics and charts when the selection matches nothing.
pub fn empty_notice(ui: &mut Ui) {
    ui.add_space(8.0);
    ui.label(RichText::new("⚠ No data matches selected filters.").color(WARNING));
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CapEx spreadsheet")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("Excel / ODS", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered projects")
        .add_filter("CSV", &["csv"])
        .set_file_name("CapEx_filtered.csv")
        .save_file();

    if let Some(path) = file {
        match state.export_view(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
