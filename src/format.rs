//! Display helpers shared by the metric tiles, charts and the inventory table.

/// Placeholder shown for missing values.
pub const MISSING: &str = "-";

/// `1234567.891` with 2 decimals → `1,234,567.89`.
pub fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Total investment tile, e.g. `฿1,500,000`.
pub fn baht(value: f64) -> String {
    format!("฿{}", thousands(value, 0))
}

/// Average return tile: `15.20%`, or `N/A` when there is nothing to average.
pub fn percent_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "N/A".to_string(),
    }
}

/// Shorten long project names for axis labels: first `max_chars` characters
/// followed by `..`.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let head: String = label.chars().take(max_chars).collect();
        format!("{head}..")
    } else {
        label.to_string()
    }
}

pub fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(1_500_000.0, 0), "1,500,000");
        assert_eq!(thousands(999.0, 0), "999");
        assert_eq!(thousands(1000.0, 0), "1,000");
        assert_eq!(thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(thousands(-1234.5, 1), "-1,234.5");
        assert_eq!(thousands(-0.001, 0), "0");
        assert_eq!(thousands(0.0, 2), "0.00");
    }

    #[test]
    fn metric_texts() {
        assert_eq!(baht(1_500_000.0), "฿1,500,000");
        assert_eq!(percent_or_na(Some(15.2)), "15.20%");
        assert_eq!(percent_or_na(None), "N/A");
    }

    #[test]
    fn truncates_by_characters() {
        assert_eq!(truncate_label("Short", 15), "Short");
        assert_eq!(truncate_label("Exactly15Chars!", 15), "Exactly15Chars!");
        assert_eq!(truncate_label("A much longer project name", 15), "A much longer p..");
        assert_eq!(truncate_label("ระบบบำบัดน้ำเสียโรงงาน", 5), "ระบบบ..");
        assert_eq!(or_missing(None), "-");
    }
}
