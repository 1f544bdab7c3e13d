use std::collections::BTreeSet;

use super::model::{CapexTable, Record};

// ---------------------------------------------------------------------------
// Selection: which values are ticked per dimension
// ---------------------------------------------------------------------------

/// The two grouping dimensions a viewer can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Factory,
    Category,
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Factory => "Factory",
            Dimension::Category => "Category",
        }
    }

    /// Distinct selectable values of this dimension in `table`.
    pub fn universe(self, table: &CapexTable) -> &BTreeSet<String> {
        match self {
            Dimension::Factory => &table.factories,
            Dimension::Category => &table.categories,
        }
    }

    fn value_of(self, record: &Record) -> Option<&str> {
        match self {
            Dimension::Factory => record.factory.as_deref(),
            Dimension::Category => record.category.as_deref(),
        }
    }
}

/// Selected factories and categories. An empty set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub factories: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl Selection {
    /// Everything selected, the initial state after a load.
    pub fn all(table: &CapexTable) -> Self {
        Selection {
            factories: table.factories.clone(),
            categories: table.categories.clone(),
        }
    }

    pub fn values(&self, dim: Dimension) -> &BTreeSet<String> {
        match dim {
            Dimension::Factory => &self.factories,
            Dimension::Category => &self.categories,
        }
    }

    fn values_mut(&mut self, dim: Dimension) -> &mut BTreeSet<String> {
        match dim {
            Dimension::Factory => &mut self.factories,
            Dimension::Category => &mut self.categories,
        }
    }

    pub fn is_selected(&self, dim: Dimension, value: &str) -> bool {
        self.values(dim).contains(value)
    }

    pub fn set(&mut self, dim: Dimension, value: &str, selected: bool) {
        let values = self.values_mut(dim);
        if selected {
            values.insert(value.to_string());
        } else {
            values.remove(value);
        }
    }

    pub fn select_all(&mut self, dim: Dimension, table: &CapexTable) {
        *self.values_mut(dim) = dim.universe(table).clone();
    }

    pub fn select_none(&mut self, dim: Dimension) {
        self.values_mut(dim).clear();
    }

    fn matches(&self, record: &Record) -> bool {
        let in_set = |dim: Dimension| {
            dim.value_of(record)
                .is_some_and(|v| self.values(dim).contains(v))
        };
        in_set(Dimension::Factory) && in_set(Dimension::Category)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Indices of records whose Factory AND Category are both selected.
/// Records with a missing Factory or Category never match.
pub fn filtered_indices(table: &CapexTable, selection: &Selection) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// A read-only subset of a table's records, in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub rows: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn from_indices(table: &'a CapexTable, indices: &[usize]) -> Self {
        FilteredView {
            rows: indices
                .iter()
                .filter_map(|&i| table.records.get(i))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Apply `selection` to `table`.
pub fn filter<'a>(table: &'a CapexTable, selection: &Selection) -> FilteredView<'a> {
    FilteredView::from_indices(table, &filtered_indices(table, selection))
}
