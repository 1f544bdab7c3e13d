use std::collections::BTreeMap;
use std::f64::consts::TAU;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points, Polygon};

use crate::color::ColorMap;
use crate::data::filter::FilteredView;
use crate::data::model::Record;
use crate::format;

const CHART_HEIGHT: f32 = 340.0;
const PROJECT_LABEL_CHARS: usize = 15;
const DONUT_HOLE: f64 = 0.4;
const SEGMENT_ANGLE: f64 = TAU / 120.0;

fn colour(map: Option<&ColorMap>, value: Option<&str>) -> Color32 {
    map.map(|m| m.color_for(value)).unwrap_or(Color32::LIGHT_BLUE)
}

// ---------------------------------------------------------------------------
// Budget by project – vertical bars, coloured by category
// ---------------------------------------------------------------------------

pub fn budget_by_project(ui: &mut Ui, view: &FilteredView<'_>, categories: Option<&ColorMap>) {
    ui.strong("Budget by Project");

    let ranked = view.ranked_by_budget();
    let labels: Vec<String> = ranked
        .iter()
        .map(|r| {
            format::truncate_label(format::or_missing(r.project.as_deref()), PROJECT_LABEL_CHARS)
        })
        .collect();

    // One chart per category so the legend lists categories.
    let mut by_category: BTreeMap<&str, Vec<Bar>> = BTreeMap::new();
    for (pos, rec) in ranked.iter().enumerate() {
        let category = format::or_missing(rec.category.as_deref());
        let hover = format!(
            "{}\nBudget: {}\nCategory: {}\nFactory: {}\nObjective: {}\nBenefits: {}",
            format::or_missing(rec.project.as_deref()),
            format::thousands(rec.budget, 2),
            category,
            format::or_missing(rec.factory.as_deref()),
            format::or_missing(rec.objective.as_deref()),
            format::or_missing(rec.benefits.as_deref()),
        );
        by_category
            .entry(category)
            .or_default()
            .push(Bar::new(pos as f64, rec.budget).name(hover).width(0.7));
    }

    Plot::new("budget_by_project")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Project Name")
        .y_axis_label("Budget")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .y_axis_formatter(|mark, _range| format::thousands(mark.value, 0))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (category, bars) in by_category {
                let color = colour(categories, Some(category));
                let chart = BarChart::new(bars)
                    .name(category)
                    .color(color)
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| bar.name.clone()));
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Budget distribution – donut by factory
// ---------------------------------------------------------------------------

/// Ring segment from `start` to `end` (radians) between radii `inner` and
/// `outer`, split into convex quads so every piece fills correctly.
fn ring_segments(start: f64, end: f64, inner: f64, outer: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = (((end - start) / SEGMENT_ANGLE - 1e-9).ceil() as usize).max(1);
    let step = (end - start) / steps as f64;
    let point = |angle: f64, r: f64| [r * angle.cos(), r * angle.sin()];

    (0..steps)
        .map(|i| {
            // Clockwise from 12 o'clock, like a pie chart.
            let a0 = TAU / 4.0 - (start + step * i as f64);
            let a1 = TAU / 4.0 - (start + step * (i + 1) as f64);
            vec![point(a0, inner), point(a0, outer), point(a1, outer), point(a1, inner)]
        })
        .collect()
}

pub fn budget_distribution(ui: &mut Ui, view: &FilteredView<'_>, factories: Option<&ColorMap>) {
    ui.strong("Budget Distribution");

    // Negative or zero totals have no slice.
    let totals: Vec<(String, f64)> = view
        .budget_by_factory()
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .collect();
    let sum: f64 = totals.iter().map(|(_, t)| t).sum();

    Plot::new("budget_distribution")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            if sum <= 0.0 {
                return;
            }
            let mut start = 0.0;
            for (factory, total) in &totals {
                let share = total / sum;
                let end = start + share * TAU;
                let name = format!("{factory}  {:.1}%", share * 100.0);
                let color = colour(factories, Some(factory.as_str()));
                for quad in ring_segments(start, end, DONUT_HOLE, 1.0) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(quad))
                            .name(&name)
                            .fill_color(color)
                            .stroke(Stroke::new(0.5, color)),
                    );
                }
                start = end;
            }
        });
}

// ---------------------------------------------------------------------------
// Budget vs IRR – scatter coloured by factory, marker size by budget.
// Hover text is looked up by marker position.
// ---------------------------------------------------------------------------

pub fn budget_vs_return(ui: &mut Ui, view: &FilteredView<'_>, factories: Option<&ColorMap>) {
    ui.strong("Budget vs IRR Matrix");

    let rows = view.with_return();
    if rows.is_empty() {
        return;
    }
    let max_budget = rows.iter().map(|r| r.budget.abs()).fold(0.0, f64::max);
    let details: Vec<([f64; 2], String)> = rows
        .iter()
        .filter_map(|rec| {
            rec.irr_value
                .map(|irr| ([rec.budget, irr], scatter_hover(rec, irr)))
        })
        .collect();

    Plot::new("budget_vs_return")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Budget")
        .y_axis_label("IRR_Value")
        .x_axis_formatter(|mark, _range| format::thousands(mark.value, 0))
        .label_formatter(move |name, value| {
            if name.is_empty() {
                return String::new();
            }
            match hover_at(&details, [value.x, value.y]) {
                Some(text) => text.to_string(),
                None => format!(
                    "{name}\nBudget: {}\nIRR: {:.2}",
                    format::thousands(value.x, 2),
                    value.y
                ),
            }
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for rec in rows {
                let Some(irr) = rec.irr_value else {
                    continue;
                };
                let scale = if max_budget > 0.0 {
                    (rec.budget.abs() / max_budget).sqrt()
                } else {
                    0.0
                };
                let factory = format::or_missing(rec.factory.as_deref());
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[rec.budget, irr]]))
                        .name(factory)
                        .color(colour(factories, rec.factory.as_deref()))
                        .filled(true)
                        .radius(3.0 + 12.0 * scale as f32),
                );
            }
        });
}

fn scatter_hover(rec: &Record, irr: f64) -> String {
    format!(
        "{}\nBudget: {}\nIRR: {:.2}\nFactory: {}\nObjective: {}\nBenefits: {}",
        format::or_missing(rec.project.as_deref()),
        format::thousands(rec.budget, 2),
        irr,
        format::or_missing(rec.factory.as_deref()),
        format::or_missing(rec.objective.as_deref()),
        format::or_missing(rec.benefits.as_deref()),
    )
}

/// Hover text of the marker sitting at `at`, if any.
fn hover_at(details: &[([f64; 2], String)], at: [f64; 2]) -> Option<&str> {
    details
        .iter()
        .find(|(pos, _)| (pos[0] - at[0]).abs() < 1e-9 && (pos[1] - at[1]).abs() < 1e-9)
        .map(|(_, text)| text.as_str())
}

// ---------------------------------------------------------------------------
// Budget by category – horizontal bars
// ---------------------------------------------------------------------------

pub fn budget_by_category(ui: &mut Ui, view: &FilteredView<'_>, categories: Option<&ColorMap>) {
    ui.strong("Budget by Category");

    let totals = view.budget_by_category();

    Plot::new("budget_by_category")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Budget (THB)")
        .x_axis_formatter(|mark, _range| format::thousands(mark.value, 0))
        .y_axis_formatter(|_mark, _range| String::new())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (pos, (category, total)) in totals.iter().enumerate() {
                let hover = format!("{category}\nBudget: {}", format::thousands(*total, 2));
                let chart = BarChart::new(vec![Bar::new(pos as f64, *total).name(hover).width(0.7)])
                    .horizontal()
                    .name(category)
                    .color(colour(categories, Some(category.as_str())))
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| bar.name.clone()));
                plot_ui.bar_chart(chart);
            }
        });
}
