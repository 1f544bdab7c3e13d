//! CapEx investment dashboard: loads a capital-expenditure spreadsheet,
//! normalizes it, and renders filterable summaries with egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod format;
pub mod state;
pub mod ui;
