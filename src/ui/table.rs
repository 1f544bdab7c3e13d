use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::{Column as Field, Record};
use crate::format;

/// Text of each inventory cell for one record: every canonical field, then
/// the extra columns. The derived return value is not listed.
fn row_cells(rec: &Record) -> Vec<String> {
    let text = |v: &Option<String>| format::or_missing(v.as_deref()).to_string();
    let mut cells = vec![
        text(&rec.project),
        format::thousands(rec.budget, 2),
        text(&rec.factory),
        text(&rec.category),
        text(&rec.objective),
        text(&rec.benefits),
        text(&rec.financial_data),
    ];
    cells.extend(rec.extras.iter().map(|c| {
        if c.is_blank() {
            format::MISSING.to_string()
        } else {
            c.to_string()
        }
    }));
    cells
}

pub fn inventory(ui: &mut Ui, view: &FilteredView<'_>, extra_columns: &[String]) {
    egui::CollapsingHeader::new(RichText::new("📋 Project Inventory Table").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let headers: Vec<&str> = Field::ALL
                .iter()
                .map(|c| c.canonical_name())
                .chain(extra_columns.iter().map(String::as_str))
                .collect();

            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(80.0).clip(true), headers.len())
                .header(22.0, |mut header| {
                    for name in &headers {
                        header.col(|ui| {
                            ui.strong(*name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(20.0, view.len(), |mut row| {
                        let rec = view.rows[row.index()];
                        for cell in row_cells(rec) {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}
