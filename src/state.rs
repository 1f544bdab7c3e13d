use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::cache::TableCache;
use crate::data::export::export_csv;
use crate::data::filter::{filtered_indices, Dimension, FilteredView, Selection};
use crate::data::model::CapexTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded tables, keyed by source identity.
    pub cache: TableCache,

    /// File the current table came from.
    pub source: Option<PathBuf>,

    /// Current table (None until a load succeeds).
    pub table: Option<Arc<CapexTable>>,

    /// Ticked factories and categories.
    pub selection: Selection,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    pub factory_colors: Option<ColorMap>,
    pub category_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the last load failed; the dashboard then shows nothing else.
    pub load_failed: bool,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: TableCache::new(),
            source: None,
            table: None,
            selection: Selection::default(),
            visible_indices: Vec::new(),
            factory_colors: None,
            category_colors: None,
            status_message: None,
            load_failed: false,
        }
    }

    /// Load `path` through the cache and make it the current table. On
    /// failure the previous table is dropped and the error becomes the
    /// status message.
    pub fn load(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
        match self.cache.get_or_load(path) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.table = None;
                self.selection = Selection::default();
                self.visible_indices.clear();
                self.factory_colors = None;
                self.category_colors = None;
                self.status_message = Some(format!("Error: {e:#}"));
                self.load_failed = true;
            }
        }
    }

    /// Drop the cached copy of the current source and read it again.
    pub fn reload(&mut self) {
        if let Some(path) = self.source.clone() {
            self.cache.invalidate(&path);
            self.load(&path);
        }
    }

    /// Ingest a newly loaded table, select everything and build colours.
    pub fn set_table(&mut self, table: Arc<CapexTable>) {
        self.selection = Selection::all(&table);
        self.factory_colors = Some(ColorMap::new(&table.factories));
        self.category_colors = Some(ColorMap::new(&table.categories));
        self.table = Some(table);
        self.status_message = None;
        self.load_failed = false;
        self.refilter();
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        self.visible_indices = match &self.table {
            Some(table) => filtered_indices(table, &self.selection),
            None => Vec::new(),
        };
    }

    /// Records passing the current selection.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.table
            .as_deref()
            .map(|t| FilteredView::from_indices(t, &self.visible_indices))
    }

    pub fn set_selected(&mut self, dim: Dimension, value: &str, selected: bool) {
        self.selection.set(dim, value, selected);
        self.refilter();
    }

    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(table) = &self.table {
            self.selection.select_all(dim, table);
            self.refilter();
        }
    }

    pub fn select_none(&mut self, dim: Dimension) {
        self.selection.select_none(dim);
        self.refilter();
    }

    pub fn colors(&self, dim: Dimension) -> Option<&ColorMap> {
        match dim {
            Dimension::Factory => self.factory_colors.as_ref(),
            Dimension::Category => self.category_colors.as_ref(),
        }
    }

    /// Write the current view to `path` as CSV.
    pub fn export_view(&self, path: &Path) -> Result<()> {
        let table = self.table.as_deref().context("No data loaded")?;
        let view = FilteredView::from_indices(table, &self.visible_indices);
        export_csv(path, &view, &table.extra_columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_source(dir: &Path) -> Result<PathBuf> {
        let path = dir.join("CapEx_2026.csv");
        fs::write(
            &path,
            "โครงการ,งบประมาณ,โรงงาน,ประเภท,%IRR/NPV/PB\n\
             P1,100,Plant A,IT,IRR 10%\n\
             P2,200,Plant B,IT,-\n\
             P3,300,Plant A,Safety,12.5\n",
        )?;
        Ok(path)
    }

    #[test]
    fn load_selects_everything() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_source(dir.path())?;
        let mut state = AppState::new(DashboardConfig::default());
        state.load(&path);

        assert!(!state.load_failed);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.view().map(|v| v.total_budget()), Some(600.0));
        Ok(())
    }

    #[test]
    fn toggles_recompute_the_view() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_source(dir.path())?;
        let mut state = AppState::new(DashboardConfig::default());
        state.load(&path);

        state.set_selected(Dimension::Category, "IT", false);
        assert_eq!(state.visible_indices, vec![2]);

        state.select_none(Dimension::Factory);
        assert!(state.view().is_some_and(|v| v.is_empty()));

        state.select_all(Dimension::Factory);
        state.select_all(Dimension::Category);
        assert_eq!(state.visible_indices.len(), 3);
        Ok(())
    }

    #[test]
    fn failed_load_clears_table() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_source(dir.path())?;
        let mut state = AppState::new(DashboardConfig::default());
        state.load(&path);
        state.load(&dir.path().join("missing.xlsx"));

        assert!(state.load_failed);
        assert!(state.table.is_none());
        assert!(state.view().is_none());
        assert!(state.status_message.as_deref().is_some_and(|m| m.starts_with("Error:")));
        Ok(())
    }

    #[test]
    fn export_writes_visible_rows() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_source(dir.path())?;
        let mut state = AppState::new(DashboardConfig::default());
        state.load(&path);
        state.set_selected(Dimension::Factory, "Plant B", false);

        let out = dir.path().join("out.csv");
        state.export_view(&out)?;
        let text = fs::read_to_string(&out)?;
        assert_eq!(text.lines().count(), 3);
        assert!(!text.contains("P2"));
        Ok(())
    }
}
