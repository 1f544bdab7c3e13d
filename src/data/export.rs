use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::filter::FilteredView;
use super::model::Column;

/// Write the inventory view as CSV: canonical headers, extra columns
/// appended, no derived return column, missing values left blank.
pub fn write_csv<W: Write>(
    view: &FilteredView<'_>,
    extra_columns: &[String],
    out: W,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let header = Column::ALL
        .iter()
        .map(|c| c.canonical_name().to_string())
        .chain(extra_columns.iter().cloned());
    writer.write_record(header).context("writing CSV header")?;

    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    for rec in &view.rows {
        let fields = [
            text(&rec.project),
            rec.budget.to_string(),
            text(&rec.factory),
            text(&rec.category),
            text(&rec.objective),
            text(&rec.benefits),
            text(&rec.financial_data),
        ]
        .into_iter()
        .chain(rec.extras.iter().map(|c| c.to_string()));
        writer.write_record(fields).context("writing CSV record")?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(())
}

pub fn export_csv(path: &Path, view: &FilteredView<'_>, extra_columns: &[String]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, extra_columns, file)?;
    log::info!("Exported {} rows to {}", view.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, Selection};
    use crate::data::loader::load_file;
    use crate::data::model::{CellValue, RawTable};
    use crate::data::normalize::normalize;

    fn table() -> crate::data::model::CapexTable {
        let text = |s: &str| CellValue::Text(s.to_string());
        normalize(&RawTable {
            headers: ["โครงการ", "งบประมาณ", "โรงงาน", "ประเภท", "%IRR/NPV/PB", "Owner"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: vec![
                vec![
                    text("ProjA"),
                    text("1000.5"),
                    text(" Plant A"),
                    text("IT"),
                    text("IRR 15.2%"),
                    text("Nok"),
                ],
                vec![
                    text("ProjB, phase 2"),
                    CellValue::Empty,
                    text("Plant B"),
                    text("IT"),
                    text("-"),
                    CellValue::Empty,
                ],
            ],
        })
        .unwrap()
    }

    #[test]
    fn writes_inventory_columns() -> Result<()> {
        let table = table();
        let view = filter(&table, &Selection::all(&table));
        let mut buf = Vec::new();
        write_csv(&view, &table.extra_columns, &mut buf)?;
        let text = String::from_utf8(buf)?;
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Project,Budget,Factory,Category,Objective,Benefits,Financial_Data,Owner")
        );
        assert_eq!(lines.next(), Some("ProjA,1000.5,Plant A,IT,,,IRR 15.2%,Nok"));
        assert_eq!(lines.next(), Some("\"ProjB, phase 2\",0,Plant B,IT,,,-,"));
        assert!(!text.contains("IRR_Value"));
        Ok(())
    }

    #[test]
    fn exported_file_loads_back() -> Result<()> {
        let table = table();
        let view = filter(&table, &Selection::all(&table));
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("export.csv");
        export_csv(&path, &view, &table.extra_columns)?;

        let reloaded = load_file(&path)?;
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.records[0].irr_value, Some(15.2));
        assert_eq!(reloaded.records[0].budget, 1000.5);
        assert_eq!(reloaded.extra_columns, table.extra_columns);
        Ok(())
    }
}
