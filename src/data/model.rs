use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell as read from the source file
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// True for empty cells and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Textual rendering of the cell, `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            // Whole numbers print without a trailing ".0" so that numeric
            // labels (e.g. a factory code `2`) read the same as typed.
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – header row plus untyped rows
// ---------------------------------------------------------------------------

/// The untouched contents of a source sheet: header names exactly as found
/// (possibly whitespace-padded) and one `Vec<CellValue>` per data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

// ---------------------------------------------------------------------------
// Column – canonical field names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Project,
    Budget,
    Factory,
    Category,
    Objective,
    Benefits,
    FinancialData,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Project,
        Column::Budget,
        Column::Factory,
        Column::Category,
        Column::Objective,
        Column::Benefits,
        Column::FinancialData,
    ];

    pub fn canonical_name(self) -> &'static str {
        match self {
            Column::Project => "Project",
            Column::Budget => "Budget",
            Column::Factory => "Factory",
            Column::Category => "Category",
            Column::Objective => "Objective",
            Column::Benefits => "Benefits",
            Column::FinancialData => "Financial_Data",
        }
    }

    /// Header used in the source workbook.
    pub fn source_name(self) -> &'static str {
        match self {
            Column::Project => "โครงการ",
            Column::Budget => "งบประมาณ",
            Column::Factory => "โรงงาน",
            Column::Category => "ประเภท",
            Column::Objective => "วัตถุประสงค์",
            Column::Benefits => "ประโยชน์ที่ได้รับ",
            Column::FinancialData => "%IRR/NPV/PB",
        }
    }

    /// Columns that must be present for a load to succeed.
    pub fn is_required(self) -> bool {
        !matches!(self, Column::Objective | Column::Benefits)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

// ---------------------------------------------------------------------------
// Record – one normalized CapEx line item
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub project: Option<String>,
    /// Always finite; coercion failures are stored as 0.
    pub budget: f64,
    pub factory: Option<String>,
    pub category: Option<String>,
    pub objective: Option<String>,
    pub benefits: Option<String>,
    pub financial_data: Option<String>,
    /// Rate of return extracted from `financial_data`.
    pub irr_value: Option<f64>,
    /// Unmapped source columns, aligned with [`CapexTable::extra_columns`].
    pub extras: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// CapexTable – the complete normalized table
// ---------------------------------------------------------------------------

/// The normalized table with the selectable universe pre-computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapexTable {
    pub records: Vec<Record>,
    /// Names of source columns that are not part of the canonical schema.
    pub extra_columns: Vec<String>,
    /// Sorted distinct non-null factories.
    pub factories: BTreeSet<String>,
    /// Sorted distinct non-null categories.
    pub categories: BTreeSet<String>,
}

impl CapexTable {
    pub fn from_records(records: Vec<Record>, extra_columns: Vec<String>) -> Self {
        let factories = records.iter().filter_map(|r| r.factory.clone()).collect();
        let categories = records.iter().filter_map(|r| r.category.clone()).collect();
        CapexTable {
            records,
            extra_columns,
            factories,
            categories,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Convert back into a raw table with canonical headers.
    ///
    /// The derived `IRR_Value` is not emitted; it is recomputed from
    /// `Financial_Data` when the result is normalized again.
    pub fn to_raw(&self) -> RawTable {
        let headers = Column::ALL
            .iter()
            .map(|c| c.canonical_name().to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect();

        let text = |v: &Option<String>| match v {
            Some(s) => CellValue::Text(s.clone()),
            None => CellValue::Empty,
        };

        let rows = self
            .records
            .iter()
            .map(|r| {
                let mut row = vec![
                    text(&r.project),
                    CellValue::Number(r.budget),
                    text(&r.factory),
                    text(&r.category),
                    text(&r.objective),
                    text(&r.benefits),
                    text(&r.financial_data),
                ];
                row.extend(r.extras.iter().cloned());
                row
            })
            .collect();

        RawTable { headers, rows }
    }
}
