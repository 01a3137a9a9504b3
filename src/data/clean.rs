use super::model::{CellValue, PlayerRow};

// ---------------------------------------------------------------------------
// Sentinel – the "not recorded" marker of a metric column
// ---------------------------------------------------------------------------

/// Literal standing in for "no value" in a metric column.
///
/// Text cells match on the trimmed token. Numeric cells match when the
/// sentinel itself parses as a number equal to the cell (out-of-range
/// markers such as `-1`).
#[derive(Debug, Clone, PartialEq)]
pub struct Sentinel {
    token: String,
    numeric: Option<f64>,
}

impl Sentinel {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        let numeric = token.parse::<f64>().ok().filter(|v| v.is_finite());
        Sentinel { token, numeric }
    }

    pub fn matches(&self, cell: &CellValue) -> bool {
        match cell {
            CellValue::Text(s) => s.trim() == self.token,
            CellValue::Integer(i) => self.numeric == Some(*i as f64),
            CellValue::Float(v) => self.numeric == Some(*v),
            CellValue::Bool(_) | CellValue::Null => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Cleaning rule
// ---------------------------------------------------------------------------

/// Cleaned numeric value of one metric cell, or `None` when the row does
/// not contribute to that metric.
///
/// Applied in order: absent or null cell, sentinel match, failed or
/// non-finite coercion. All three exclude the row for this metric only.
pub fn metric_value(row: &PlayerRow, field: &str, sentinel: Option<&Sentinel>) -> Option<f64> {
    let cell = row.get(field)?;
    if cell.is_null() {
        return None;
    }
    if sentinel.is_some_and(|s| s.matches(cell)) {
        return None;
    }
    cell.as_f64()
}
