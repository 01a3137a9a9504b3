use std::collections::{BTreeMap, BTreeSet};

use super::model::{PlayerRow, SeasonTable, ROLE};

// ---------------------------------------------------------------------------
// Filter predicate: which values are allowed per column
// ---------------------------------------------------------------------------

/// Per-column whitelist: maps column_name → set of allowed values.
/// An absent column or an empty set means "no constraint" for that column.
pub type FilterState = BTreeMap<String, BTreeSet<String>>;

/// A [`FilterState`] restricting only the role column.
pub fn role_filter(allowed_roles: &BTreeSet<String>) -> FilterState {
    let mut filters = FilterState::new();
    if !allowed_roles.is_empty() {
        filters.insert(ROLE.to_string(), allowed_roles.clone());
    }
    filters
}

/// Whether a row passes every active column constraint.
///
/// A row whose value for a constrained column is missing or null fails
/// that constraint.
pub fn row_passes(row: &PlayerRow, filters: &FilterState) -> bool {
    filters.iter().all(|(col, allowed)| {
        if allowed.is_empty() {
            return true;
        }
        match row.text(col) {
            Some(val) => allowed.contains(val.as_ref()),
            None => false,
        }
    })
}

/// Return indices of rows that pass all active filters, in table order.
pub fn filtered_indices(table: &SeasonTable, filters: &FilterState) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row_passes(row, filters))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table(roles: &[Option<&str>]) -> SeasonTable {
        let rows = roles
            .iter()
            .map(|role| {
                let mut row = PlayerRow::default();
                if let Some(role) = role {
                    row.cells.insert(ROLE.to_string(), CellValue::Text(role.to_string()));
                }
                row
            })
            .collect();
        SeasonTable::new(vec![ROLE.to_string()], rows)
    }

    #[test]
    fn empty_role_set_keeps_everything() {
        let t = table(&[Some("ATTACKER"), Some("GOALKEEPER"), None]);
        let filters = role_filter(&BTreeSet::new());
        assert!(filters.is_empty());
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn role_whitelist_drops_other_roles_and_missing() {
        let t = table(&[Some("ATTACKER"), Some("GOALKEEPER"), None, Some(" DEFENDER ")]);
        let allowed: BTreeSet<String> = ["ATTACKER", "DEFENDER"].map(String::from).into();
        assert_eq!(filtered_indices(&t, &role_filter(&allowed)), vec![0, 3]);
    }
}
