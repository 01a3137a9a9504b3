use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column names of the season file
// ---------------------------------------------------------------------------

pub const PLAYER_NAME: &str = "Player Name";
pub const ROLE: &str = "Player's Role";
pub const TOTAL_GOALS: &str = "Total Goals";
pub const DUELS_WON_PCT: &str = "Duels Won %";
pub const PASS_ACCURACY_PCT: &str = "Pass Accuracy %";
pub const DRIBBLE_SUCCESS_PCT: &str = "Successful Dribbles %";
pub const SHOT_ACCURACY_PCT: &str = "Shot Accuracy %";
pub const FOULS_COMMITTED: &str = "Fouls Committed";
pub const YELLOW_CARDS: &str = "Yellow Cards";
pub const EXPECTED_GOALS: &str = "xG (expected goals)";

/// Placeholder the season export writes for "not recorded".
pub const DASH_SENTINEL: &str = "-";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the season table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. CSV cells stay `Text` so sentinel checks can
/// compare the raw token before any numeric coercion happens.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Textual form used for grouping and role matching. `None` for nulls.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Text(s) => Some(Cow::Borrowed(s.trim())),
            CellValue::Null => None,
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// Numeric coercion. Only finite values count as numbers.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Role – the categorical position field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Attacker,
    Midfielder,
    Defender,
    Goalkeeper,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Attacker,
        Role::Midfielder,
        Role::Defender,
        Role::Goalkeeper,
    ];

    /// The outfield roles every per-position view is restricted to.
    pub const OUTFIELD: [Role; 3] = [Role::Attacker, Role::Midfielder, Role::Defender];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Attacker => "ATTACKER",
            Role::Midfielder => "MIDFIELDER",
            Role::Defender => "DEFENDER",
            Role::Goalkeeper => "GOALKEEPER",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        let raw = raw.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(raw))
    }

    /// Role names as the string set the row filter works on.
    pub fn names(roles: &[Role]) -> BTreeSet<String> {
        roles.iter().map(|r| r.as_str().to_string()).collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PlayerRow – one row of the season file
// ---------------------------------------------------------------------------

/// One player's season line.
#[derive(Debug, Clone, Default)]
pub struct PlayerRow {
    /// column_name → value. Columns absent from a short row are missing.
    pub cells: BTreeMap<String, CellValue>,
}

impl PlayerRow {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Trimmed text of a column, `None` when missing or null.
    pub fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        self.cells.get(column).and_then(CellValue::as_text)
    }

    pub fn player_name(&self) -> String {
        self.text(PLAYER_NAME)
            .map(Cow::into_owned)
            .unwrap_or_default()
    }

    pub fn role(&self) -> Option<String> {
        self.text(ROLE).map(Cow::into_owned)
    }
}

// ---------------------------------------------------------------------------
// SeasonTable – the complete loaded file
// ---------------------------------------------------------------------------

/// The loaded season, rows in file order.
#[derive(Debug, Clone, Default)]
pub struct SeasonTable {
    pub rows: Vec<PlayerRow>,
    /// Header in file order.
    pub columns: Vec<String>,
}

impl SeasonTable {
    pub fn new(columns: Vec<String>, rows: Vec<PlayerRow>) -> Self {
        SeasonTable { rows, columns }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// First required column missing from the header, if any.
    pub fn missing_column<'a>(&self, required: &[&'a str]) -> Option<&'a str> {
        required.iter().copied().find(|c| !self.has_column(c))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_cells_coerce_after_trimming() {
        assert_eq!(CellValue::Text(" 0.45 ".into()).as_f64(), Some(0.45));
        assert_eq!(CellValue::Text("-".into()).as_f64(), None);
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[test]
    fn non_finite_values_are_not_numbers() {
        assert_eq!(CellValue::Text("NaN".into()).as_f64(), None);
        assert_eq!(CellValue::Text("inf".into()).as_f64(), None);
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
    }

    #[test]
    fn role_parsing_ignores_case_and_padding() {
        assert_eq!(Role::parse(" defender"), Some(Role::Defender));
        assert_eq!(Role::parse("Goalkeeper"), Some(Role::Goalkeeper));
        assert_eq!(Role::parse("COACH"), None);
    }

    #[test]
    fn missing_column_reports_first_absent() {
        let table = SeasonTable::new(vec![PLAYER_NAME.into(), ROLE.into()], Vec::new());
        assert_eq!(table.missing_column(&[ROLE, TOTAL_GOALS, YELLOW_CARDS]), Some(TOTAL_GOALS));
        assert_eq!(table.missing_column(&[ROLE]), None);
    }
}
