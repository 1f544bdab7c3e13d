use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::data::filter::Dimension;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CapexDashboardApp {
    pub state: AppState,
}

impl CapexDashboardApp {
    /// Build the app and load the configured source once.
    pub fn new(config: DashboardConfig) -> Self {
        let source = config.source_path.clone();
        let mut state = AppState::new(config);
        state.load(&source);
        Self { state }
    }
}

impl eframe::App for CapexDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            let text = if state.load_failed {
                "No data available. Open a spreadsheet (File → Open…)"
            } else {
                "Open a spreadsheet to view the dashboard  (File → Open…)"
            };
            ui.heading(RichText::new(text));
        });
        return;
    }

    panels::header(ui);
    panels::controls(ui, state);
    ui.add_space(8.0);

    let Some(table) = state.table.clone() else {
        return;
    };
    let Some(view) = state.view() else {
        return;
    };
    if view.is_empty() {
        panels::empty_notice(ui);
        return;
    }

    let factories = state.colors(Dimension::Factory);
    let categories = state.colors(Dimension::Category);

    panels::metrics(ui, &view.summary());
    ui.separator();

    ui.columns(2, |cols| {
        plot::budget_by_project(&mut cols[0], &view, categories);
        plot::budget_distribution(&mut cols[1], &view, factories);
    });
    ui.add_space(8.0);
    ui.columns(2, |cols| {
        plot::budget_vs_return(&mut cols[0], &view, factories);
        plot::budget_by_category(&mut cols[1], &view, categories);
    });
    ui.add_space(8.0);

    table::inventory(ui, &view, &table.extra_columns);
}
