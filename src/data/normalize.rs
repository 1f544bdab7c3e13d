use std::collections::BTreeMap;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::error::LoadError;
use super::model::{CapexTable, CellValue, Column, RawTable, Record};

/// First signed integer or decimal in a piece of text, e.g. `-3.2`, `.5`, `15`.
/// Thai digits (`๐`..`๙`) count as digits.
static RETURN_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-+]?(?:[0-9๐-๙]*\.[0-9๐-๙]+|[0-9๐-๙]+)").expect("valid regex")
});

/// Placeholder used in the source sheet for "no financial figure".
const RETURN_PLACEHOLDER: &str = "-";

static EMPTY_CELL: CellValue = CellValue::Empty;

// ---------------------------------------------------------------------------
// Header mapping
// ---------------------------------------------------------------------------

/// Map a header cell to its canonical column. Surrounding whitespace is
/// ignored; both the source-language and the canonical names are accepted.
pub fn canonical_column(header: &str) -> Option<Column> {
    let header = header.trim();
    Column::ALL
        .into_iter()
        .find(|c| c.source_name() == header || c.canonical_name() == header)
}

/// Resolved position of every canonical column plus the leftover columns.
struct ColumnLayout {
    positions: BTreeMap<Column, usize>,
    extras: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn resolve(headers: &[String]) -> Result<Self> {
        let mut positions = BTreeMap::new();
        let mut extras = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            match canonical_column(header) {
                // A second header mapping to the same column is kept as an extra.
                Some(col) if !positions.contains_key(&col) => {
                    positions.insert(col, idx);
                }
                _ => extras.push((idx, header.trim().to_string())),
            }
        }

        if let Some(missing) = Column::ALL
            .into_iter()
            .find(|c| c.is_required() && !positions.contains_key(c))
        {
            return Err(LoadError::MissingColumn {
                canonical: missing.canonical_name(),
                source_name: missing.source_name(),
            }
            .into());
        }

        Ok(ColumnLayout { positions, extras })
    }

    fn cell<'a>(&self, row: &'a [CellValue], col: Column) -> &'a CellValue {
        self.positions
            .get(&col)
            .and_then(|&idx| row.get(idx))
            .unwrap_or(&EMPTY_CELL)
    }
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Interpret a cell as a budget amount. `None` means coercion failed and the
/// caller should substitute 0.
pub fn parse_budget(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Number(v) => *v,
        CellValue::Bool(b) => f64::from(u8::from(*b)),
        CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        CellValue::Empty => return None,
    };
    value.is_finite().then_some(value)
}

/// Budget with coercion failures replaced by 0.
pub fn coerce_budget(cell: &CellValue) -> f64 {
    parse_budget(cell).unwrap_or(0.0)
}

/// Extract the first numeric token from a free-text financial summary.
///
/// Returns `None` for empty text, the `-` placeholder, text without any
/// digits, and tokens that do not fit in a finite `f64`.
pub fn extract_return(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || text == RETURN_PLACEHOLDER {
        return None;
    }
    let token = RETURN_TOKEN.find(text)?;
    ascii_digits(token.as_str())
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Rewrite Thai digits as their ASCII counterparts so `f64::from_str` accepts them.
fn ascii_digits(token: &str) -> String {
    token
        .chars()
        .map(|c| match c {
            '๐'..='๙' => char::from_digit(c as u32 - '๐' as u32, 10).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Trimmed grouping label. Missing or blank cells become `None`.
pub fn clean_label(cell: &CellValue) -> Option<String> {
    let text = cell.as_text()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Free text kept as-is; only missing or blank cells become `None`.
fn free_text(cell: &CellValue) -> Option<String> {
    if cell.is_blank() {
        None
    } else {
        cell.as_text()
    }
}

// ---------------------------------------------------------------------------
// Table normalization
// ---------------------------------------------------------------------------

/// Rename, clean and derive: turn a raw sheet into a [`CapexTable`].
///
/// Only structural problems (a missing required column) fail; bad cell
/// values are coerced. Rows where every cell is blank are skipped.
pub fn normalize(raw: &RawTable) -> Result<CapexTable> {
    let layout = ColumnLayout::resolve(&raw.headers)?;
    let mut records = Vec::with_capacity(raw.rows.len());
    let mut defaulted_budgets = 0usize;

    for row in &raw.rows {
        if row.iter().all(CellValue::is_blank) {
            continue;
        }

        let budget_cell = layout.cell(row, Column::Budget);
        let budget = match parse_budget(budget_cell) {
            Some(v) => v,
            None => {
                if !budget_cell.is_blank() {
                    defaulted_budgets += 1;
                }
                0.0
            }
        };

        let financial_data = free_text(layout.cell(row, Column::FinancialData));
        let irr_value = financial_data.as_deref().and_then(extract_return);

        records.push(Record {
            project: free_text(layout.cell(row, Column::Project)),
            budget,
            factory: clean_label(layout.cell(row, Column::Factory)),
            category: clean_label(layout.cell(row, Column::Category)),
            objective: free_text(layout.cell(row, Column::Objective)),
            benefits: free_text(layout.cell(row, Column::Benefits)),
            financial_data,
            irr_value,
            extras: layout
                .extras
                .iter()
                .map(|(idx, _)| row.get(*idx).cloned().unwrap_or(CellValue::Empty))
                .collect(),
        });
    }

    if defaulted_budgets > 0 {
        log::warn!("{defaulted_budgets} row(s) had a non-numeric budget; defaulted to 0");
    }

    let extra_columns = layout.extras.into_iter().map(|(_, name)| name).collect();
    Ok(CapexTable::from_records(records, extra_columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn source_headers() -> Vec<String> {
        [
            " โครงการ",
            "งบประมาณ ",
            "โรงงาน",
            "ประเภท",
            "วัตถุประสงค์",
            "ประโยชน์ที่ได้รับ",
            " %IRR/NPV/PB ",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn scenario() -> RawTable {
        RawTable {
            headers: source_headers(),
            rows: vec![
                vec![
                    text("ProjA"),
                    CellValue::Number(1_000_000.0),
                    text("Plant A "),
                    text("IT"),
                    text("Upgrade ERP"),
                    text("Faster close"),
                    text("IRR 15.2%"),
                ],
                vec![
                    text("ProjB"),
                    CellValue::Number(500_000.0),
                    text("Plant A"),
                    text("IT"),
                    CellValue::Empty,
                    CellValue::Empty,
                    text("-"),
                ],
            ],
        }
    }

    #[test]
    fn extract_return_examples() {
        assert_eq!(extract_return("12.5% (Test)"), Some(12.5));
        assert_eq!(extract_return("-"), None);
        assert_eq!(extract_return(""), None);
        assert_eq!(extract_return("N/A"), None);
        assert_eq!(extract_return("-3.2"), Some(-3.2));
        assert_eq!(extract_return("IRR 15.2%, NPV 3.1 MB"), Some(15.2));
        assert_eq!(extract_return("PB 4 years"), Some(4.0));
        assert_eq!(extract_return("+.5"), Some(0.5));
        assert_eq!(extract_return("IRR -5%"), Some(-5.0));
        assert_eq!(extract_return("IRR ๑๕.๒%"), Some(15.2));
        assert_eq!(extract_return("ผลตอบแทน ๘% / PB ๓ ปี"), Some(8.0));
    }

    #[test]
    fn budget_coercion() {
        assert_eq!(coerce_budget(&text("1500.50")), 1500.5);
        assert_eq!(coerce_budget(&text(" 2000 ")), 2000.0);
        assert_eq!(coerce_budget(&text("")), 0.0);
        assert_eq!(coerce_budget(&text("TBD")), 0.0);
        assert_eq!(coerce_budget(&text("1,000,000")), 0.0);
        assert_eq!(coerce_budget(&text("inf")), 0.0);
        assert_eq!(coerce_budget(&text("-5")), -5.0);
        assert_eq!(coerce_budget(&CellValue::Empty), 0.0);
        assert_eq!(coerce_budget(&CellValue::Number(f64::NAN)), 0.0);
        assert_eq!(coerce_budget(&CellValue::Bool(true)), 1.0);
    }

    #[test]
    fn labels_are_trimmed_and_blank_is_none() {
        assert_eq!(clean_label(&text("  Plant A ")), Some("Plant A".into()));
        assert_eq!(clean_label(&text("   ")), None);
        assert_eq!(clean_label(&CellValue::Empty), None);
        assert_eq!(clean_label(&CellValue::Number(3.0)), Some("3".into()));
    }

    #[test]
    fn headers_map_with_whitespace_and_canonical_names() {
        assert_eq!(canonical_column("  โรงงาน "), Some(Column::Factory));
        assert_eq!(canonical_column("Financial_Data"), Some(Column::FinancialData));
        assert_eq!(canonical_column("%IRR/NPV/PB"), Some(Column::FinancialData));
        assert_eq!(canonical_column("Remark"), None);
    }

    #[test]
    fn scenario_merges_factories() {
        let table = normalize(&scenario()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.factories.len(), 1);
        assert!(table.factories.contains("Plant A"));
        assert_eq!(table.records[0].irr_value, Some(15.2));
        assert_eq!(table.records[1].irr_value, None);
        assert_eq!(table.records[1].objective, None);
    }

    #[test]
    fn missing_required_column_fails() {
        let mut raw = scenario();
        raw.headers[2] = "Plant".into();
        let err = normalize(&raw).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LoadError>(),
            Some(&LoadError::MissingColumn {
                canonical: "Factory",
                source_name: "โรงงาน",
            })
        );
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let raw = RawTable {
            headers: vec![
                "Project".into(),
                "Budget".into(),
                "Factory".into(),
                "Category".into(),
                "Financial_Data".into(),
            ],
            rows: vec![vec![
                text("P1"),
                text("oops"),
                text("F1"),
                text("C1"),
                CellValue::Number(0.12),
            ]],
        };
        let table = normalize(&raw).unwrap();
        let rec = &table.records[0];
        assert_eq!(rec.budget, 0.0);
        assert_eq!(rec.benefits, None);
        assert_eq!(rec.irr_value, Some(0.12));
    }

    #[test]
    fn extra_columns_and_short_rows() {
        let mut raw = scenario();
        raw.headers.push(" Remark ".into());
        raw.rows[0].push(text("urgent"));
        // Row 1 stays one cell short.
        raw.rows.push(vec![CellValue::Empty; 8]);
        let table = normalize(&raw).unwrap();
        assert_eq!(table.extra_columns, vec!["Remark".to_string()]);
        assert_eq!(table.records[0].extras, vec![text("urgent")]);
        assert_eq!(table.records[1].extras, vec![CellValue::Empty]);
        // The all-blank row is dropped.
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut raw = scenario();
        raw.rows[1][1] = text("not a number");
        raw.rows[1][6] = CellValue::Number(7.25);
        let once = normalize(&raw).unwrap();
        let twice = normalize(&once.to_raw()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.records[1].budget, 0.0);
        assert_eq!(twice.records[1].irr_value, Some(7.25));
    }
}
