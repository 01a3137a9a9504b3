use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::charts::{self, ChartData, ChartId};
use crate::data::model::Role;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every change of data file, view or role filter re-runs the selected view
/// against a freshly loaded table. Frames only draw `chart`.
pub struct AppState {
    /// Season file every view is built from.
    pub data_path: Option<PathBuf>,

    /// Selected view.
    pub selected: ChartId,

    /// Role whitelist for the selected view. Empty means every role.
    pub roles: BTreeSet<String>,

    /// Roles offered in the filter panel.
    pub known_roles: BTreeSet<String>,

    /// Result of the last successful run.
    pub chart: Option<ChartData>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data_path: None,
            selected: ChartId::TopScorers,
            roles: ChartId::TopScorers.default_roles(),
            known_roles: Role::names(&Role::ALL),
            chart: None,
            status_message: None,
        }
    }
}

impl AppState {
    pub fn new(data_path: Option<PathBuf>, selected: ChartId, roles: Option<BTreeSet<String>>) -> Self {
        let mut state = Self {
            data_path,
            selected,
            roles: roles.unwrap_or_else(|| selected.default_roles()),
            ..Self::default()
        };
        state.known_roles.extend(state.roles.iter().cloned());
        state.refresh();
        state
    }

    /// Re-run the selected view. Failures keep the previous chart off screen
    /// and surface as the status message.
    pub fn refresh(&mut self) {
        let Some(path) = &self.data_path else {
            self.chart = None;
            return;
        };
        match charts::run(self.selected, path, &self.roles) {
            Ok(chart) => {
                self.known_roles.extend(chart_roles(&chart));
                self.status_message = None;
                self.chart = Some(chart);
            }
            Err(e) => {
                log::error!("Failed to build '{}': {e}", self.selected);
                self.status_message = Some(format!("Error: {e}"));
                self.chart = None;
            }
        }
    }

    /// Point every view at a new season file.
    pub fn set_data_path(&mut self, path: PathBuf) {
        log::info!("Using season file {}", path.display());
        self.data_path = Some(path);
        self.refresh();
    }

    /// Switch view; the role filter resets to the view's default.
    pub fn select_chart(&mut self, id: ChartId) {
        if self.selected == id && self.chart.is_some() {
            return;
        }
        self.selected = id;
        self.roles = id.default_roles();
        self.refresh();
    }

    /// Toggle a single role in the filter.
    ///
    /// Unchecking a role while every role is shown keeps all the others.
    /// The last checked role stays checked: an empty set would mean "all".
    pub fn toggle_role(&mut self, role: &str) {
        if self.roles.is_empty() {
            self.roles = self.known_roles.clone();
        }
        if self.roles.contains(role) {
            if self.roles.len() == 1 {
                log::debug!("Keeping '{role}', the only role left in the filter");
                return;
            }
            self.roles.remove(role);
        } else {
            self.roles.insert(role.to_string());
        }
        self.refresh();
    }

    /// Drop the role filter.
    pub fn select_all_roles(&mut self) {
        self.roles.clear();
        self.refresh();
    }
}

/// Role names appearing as categories of a role-grouped view.
fn chart_roles(chart: &ChartData) -> Vec<String> {
    match chart.chart {
        ChartId::TopScorers => chart.legend.iter().map(|l| l.label.clone()).collect(),
        _ => chart.categories.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn season_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Player Name,Player's Role,Total Goals,Duels Won %").unwrap();
        writeln!(file, "Ana,ATTACKER,5,0.4").unwrap();
        writeln!(file, "Bo,WINGBACK,2,0.6").unwrap();
        writeln!(file, "Cy,DEFENDER,1,-").unwrap();
        file
    }

    #[test]
    fn new_state_builds_initial_chart() {
        let file = season_file();
        let state = AppState::new(Some(file.path().to_path_buf()), ChartId::TopScorers, None);
        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.categories, vec!["Ana", "Bo", "Cy"]);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn selecting_a_view_resets_roles_to_its_default() {
        let file = season_file();
        let mut state = AppState::new(Some(file.path().to_path_buf()), ChartId::TopScorers, None);
        state.select_chart(ChartId::Duels);
        assert_eq!(state.roles, ChartId::Duels.default_roles());
        assert_eq!(state.chart.as_ref().unwrap().categories, vec!["ATTACKER"]);

        state.toggle_role("WINGBACK");
        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.categories, vec!["ATTACKER", "WINGBACK"]);
        assert!(state.known_roles.contains("WINGBACK"));
    }

    #[test]
    fn missing_column_surfaces_as_status() {
        let file = season_file();
        let mut state = AppState::new(Some(file.path().to_path_buf()), ChartId::TopScorers, None);
        state.select_chart(ChartId::YellowRate);
        assert!(state.chart.is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.contains("Fouls Committed"), "{msg}");
    }

    #[test]
    fn last_checked_role_cannot_be_unchecked() {
        let file = season_file();
        let mut state = AppState::new(Some(file.path().to_path_buf()), ChartId::Duels, None);
        state.toggle_role("MIDFIELDER");
        state.toggle_role("DEFENDER");
        assert_eq!(state.roles, Role::names(&[Role::Attacker]));

        state.toggle_role("ATTACKER");
        assert_eq!(state.roles, Role::names(&[Role::Attacker]));
        assert_eq!(state.chart.as_ref().unwrap().categories, vec!["ATTACKER"]);
    }

    #[test]
    fn unchecking_from_all_keeps_the_other_roles() {
        let file = season_file();
        let mut state = AppState::new(Some(file.path().to_path_buf()), ChartId::TopScorers, None);
        assert!(state.roles.is_empty());

        state.toggle_role("DEFENDER");
        assert!(!state.roles.contains("DEFENDER"));
        assert!(state.roles.contains("ATTACKER"));
        assert!(state.roles.contains("GOALKEEPER"));
        assert_eq!(state.chart.as_ref().unwrap().categories, vec!["Ana"]);
    }
}
