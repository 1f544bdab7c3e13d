use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::Record;

/// Headline figures for the metric tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_budget: f64,
    pub project_count: usize,
    /// `None` when no row has a return value.
    pub average_return: Option<f64>,
    /// `None` when the view is empty.
    pub top_spender: Option<String>,
}

/// Sum of budgets grouped by a label, sorted by label. Rows without a label
/// are left out.
fn budget_by<'a>(
    rows: &[&'a Record],
    key: impl Fn(&'a Record) -> Option<&'a str>,
) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for &rec in rows {
        if let Some(k) = key(rec) {
            *totals.entry(k).or_insert(0.0) += rec.budget;
        }
    }
    totals
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

impl<'a> FilteredView<'a> {
    pub fn total_budget(&self) -> f64 {
        self.rows.iter().map(|r| r.budget).sum()
    }

    pub fn project_count(&self) -> usize {
        self.rows.len()
    }

    /// Mean of the non-null return values.
    pub fn average_return(&self) -> Option<f64> {
        let (sum, n) = self
            .rows
            .iter()
            .filter_map(|r| r.irr_value)
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        (n > 0).then(|| sum / n as f64)
    }

    pub fn budget_by_factory(&self) -> Vec<(String, f64)> {
        budget_by(&self.rows, |r| r.factory.as_deref())
    }

    pub fn budget_by_category(&self) -> Vec<(String, f64)> {
        budget_by(&self.rows, |r| r.category.as_deref())
    }

    /// Factory with the largest total budget. On a tie the factory that
    /// sorts first by name wins.
    pub fn top_spender(&self) -> Option<String> {
        let mut best: Option<(String, f64)> = None;
        for (factory, total) in self.budget_by_factory() {
            if best.as_ref().map_or(true, |(_, b)| total > *b) {
                best = Some((factory, total));
            }
        }
        best.map(|(factory, _)| factory)
    }

    /// Rows that can be placed on the budget/return scatter.
    pub fn with_return(&self) -> Vec<&'a Record> {
        self.rows
            .iter()
            .copied()
            .filter(|r| r.irr_value.is_some())
            .collect()
    }

    /// Rows ordered by budget, largest first. Equal budgets keep table order.
    pub fn ranked_by_budget(&self) -> Vec<&'a Record> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.budget.total_cmp(&a.budget));
        rows
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total_budget: self.total_budget(),
            project_count: self.project_count(),
            average_return: self.average_return(),
            top_spender: self.top_spender(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, Dimension, Selection};
    use crate::data::model::CapexTable;

    fn record(
        project: &str,
        budget: f64,
        factory: &str,
        category: &str,
        irr: Option<f64>,
    ) -> Record {
        Record {
            project: Some(project.to_string()),
            budget,
            factory: Some(factory.to_string()),
            category: Some(category.to_string()),
            objective: None,
            benefits: None,
            financial_data: irr.map(|v| format!("IRR {v}%")),
            irr_value: irr,
            extras: Vec::new(),
        }
    }

    fn sample() -> CapexTable {
        CapexTable::from_records(
            vec![
                record("P1", 100.0, "Plant B", "IT", Some(10.0)),
                record("P2", 250.0, "Plant A", "IT", None),
                record("P3", 150.0, "Plant B", "Safety", Some(20.0)),
                record("P4", 400.0, "Plant C", "Energy", None),
                record("P5", 250.0, "Plant B", "Energy", Some(-3.0)),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn empty_view_is_total() {
        let table = sample();
        let view = filter(&table, &Selection::default());
        assert_eq!(
            view.summary(),
            Summary {
                total_budget: 0.0,
                project_count: 0,
                average_return: None,
                top_spender: None,
            }
        );
        assert!(view.budget_by_category().is_empty());
        assert!(view.with_return().is_empty());
    }

    #[test]
    fn full_view_aggregates() {
        let table = sample();
        let view = filter(&table, &Selection::all(&table));
        assert_eq!(view.total_budget(), 1150.0);
        assert_eq!(view.project_count(), 5);
        assert_eq!(view.average_return(), Some(9.0));
        assert_eq!(view.top_spender().as_deref(), Some("Plant B"));
        assert_eq!(
            view.budget_by_category(),
            vec![
                ("Energy".to_string(), 650.0),
                ("IT".to_string(), 350.0),
                ("Safety".to_string(), 150.0),
            ]
        );
        assert_eq!(view.with_return().len(), 3);
    }

    #[test]
    fn average_return_without_values_is_none() {
        let table = sample();
        let mut selection = Selection::all(&table);
        selection.select_none(Dimension::Factory);
        selection.set(Dimension::Factory, "Plant C", true);
        let view = filter(&table, &selection);
        assert_eq!(view.project_count(), 1);
        assert_eq!(view.average_return(), None);
    }

    #[test]
    fn single_factory_is_top_spender() {
        let table = sample();
        let mut selection = Selection::all(&table);
        selection.select_none(Dimension::Factory);
        selection.set(Dimension::Factory, "Plant A", true);
        assert_eq!(filter(&table, &selection).top_spender().as_deref(), Some("Plant A"));
    }

    #[test]
    fn top_spender_tie_goes_to_first_name() {
        let table = CapexTable::from_records(
            vec![
                record("P1", 300.0, "Zeta", "IT", None),
                record("P2", 300.0, "Alpha", "IT", None),
            ],
            Vec::new(),
        );
        let view = filter(&table, &Selection::all(&table));
        assert_eq!(view.top_spender().as_deref(), Some("Alpha"));
    }

    #[test]
    fn ranking_is_stable() {
        let table = sample();
        let view = filter(&table, &Selection::all(&table));
        let order: Vec<_> = view
            .ranked_by_budget()
            .iter()
            .filter_map(|r| r.project.as_deref())
            .collect();
        assert_eq!(order, ["P4", "P2", "P5", "P3", "P1"]);
    }

    #[test]
    fn total_budget_grows_with_selection() {
        let table = sample();
        let mut selection = Selection::all(&table);
        selection.select_none(Dimension::Factory);
        let mut last = filter(&table, &selection).total_budget();
        for factory in table.factories.iter() {
            selection.set(Dimension::Factory, factory, true);
            let total = filter(&table, &selection).total_budget();
            assert!(total >= last);
            last = total;
        }
        assert_eq!(last, 1150.0);
    }

    #[test]
    fn scenario_from_two_rows_of_one_plant() {
        use crate::data::model::{CellValue, RawTable};
        use crate::data::normalize::normalize;

        let text = |s: &str| CellValue::Text(s.to_string());
        let raw = RawTable {
            headers: ["Project", "Budget", "Factory", "Category", "Financial_Data"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: vec![
                vec![
                    text("ProjA"),
                    CellValue::Number(1_000_000.0),
                    text("Plant A "),
                    text("IT"),
                    text("IRR 15.2%"),
                ],
                vec![
                    text("ProjB"),
                    CellValue::Number(500_000.0),
                    text("Plant A"),
                    text("IT"),
                    text("-"),
                ],
            ],
        };
        let table = normalize(&raw).unwrap();
        let selection = Selection {
            factories: ["Plant A".to_string()].into(),
            categories: ["IT".to_string()].into(),
        };
        let summary = filter(&table, &selection).summary();
        assert_eq!(summary.project_count, 2);
        assert_eq!(summary.total_budget, 1_500_000.0);
        assert_eq!(summary.average_return, Some(15.2));
        assert_eq!(summary.top_spender.as_deref(), Some("Plant A"));
    }
}
