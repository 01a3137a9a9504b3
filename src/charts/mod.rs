//! Chart catalogue: one entry per view of the report.
//!
//! Every view is a thin adapter over the data layer:
//! ```text
//!   run(id, path, roles)
//!     → loader::load_season      (fresh read, required columns)
//!     → views::build_chart       (Aggregation / Ranking)
//!     → ChartData                (ready to draw, no further maths)
//! ```

mod views;

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::color::Rgb;
use crate::data::error::PipelineError;
use crate::data::loader;
use crate::data::model::{
    Role, DRIBBLE_SUCCESS_PCT, DUELS_WON_PCT, EXPECTED_GOALS, FOULS_COMMITTED,
    PASS_ACCURACY_PCT, PLAYER_NAME, ROLE, SHOT_ACCURACY_PCT, TOTAL_GOALS, YELLOW_CARDS,
};

pub use views::build_chart;

// ---------------------------------------------------------------------------
// ChartId – the routes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ChartId {
    TopScorers,
    Duels,
    PassAccuracy,
    DribbleSuccess,
    ShotAccuracy,
    FoulsVsYellow,
    YellowRate,
    XgVsGoals,
}

impl ChartId {
    pub const ALL: [ChartId; 8] = [
        ChartId::TopScorers,
        ChartId::Duels,
        ChartId::PassAccuracy,
        ChartId::DribbleSuccess,
        ChartId::ShotAccuracy,
        ChartId::FoulsVsYellow,
        ChartId::YellowRate,
        ChartId::XgVsGoals,
    ];

    pub fn route(self) -> &'static str {
        match self {
            ChartId::TopScorers => "top_scorers",
            ChartId::Duels => "duels",
            ChartId::PassAccuracy => "pass_accuracy",
            ChartId::DribbleSuccess => "dribble_success",
            ChartId::ShotAccuracy => "shot_accuracy",
            ChartId::FoulsVsYellow => "fouls_vs_yellow",
            ChartId::YellowRate => "yellow_rate",
            ChartId::XgVsGoals => "xg_vs_goals",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartId::TopScorers => "Top 10 Goal Scorers",
            ChartId::Duels => "Duel Win % by Field Position",
            ChartId::PassAccuracy => "Pass Accuracy % by Field Position",
            ChartId::DribbleSuccess => "Dribble Success % by Field Position",
            ChartId::ShotAccuracy => "Shot Accuracy % by Field Position",
            ChartId::FoulsVsYellow => "Fouls vs Yellow Cards by Field Position",
            ChartId::YellowRate => "Yellow Card Rate per Foul by Field Position",
            ChartId::XgVsGoals => "xG vs Actual Goals by Field Position",
        }
    }

    /// Header columns the view cannot be drawn without.
    pub fn required_columns(self) -> Vec<&'static str> {
        let metrics: &[&'static str] = match self {
            ChartId::TopScorers => &[PLAYER_NAME, TOTAL_GOALS],
            ChartId::Duels => &[DUELS_WON_PCT],
            ChartId::PassAccuracy => &[PASS_ACCURACY_PCT],
            ChartId::DribbleSuccess => &[DRIBBLE_SUCCESS_PCT],
            ChartId::ShotAccuracy => &[SHOT_ACCURACY_PCT],
            ChartId::FoulsVsYellow | ChartId::YellowRate => &[FOULS_COMMITTED, YELLOW_CARDS],
            ChartId::XgVsGoals => &[EXPECTED_GOALS, TOTAL_GOALS],
        };
        std::iter::once(ROLE).chain(metrics.iter().copied()).collect()
    }

    /// Role whitelist a view starts with. Empty means every role.
    pub fn default_roles(self) -> BTreeSet<String> {
        match self {
            ChartId::TopScorers => BTreeSet::new(),
            _ => Role::names(&Role::OUTFIELD),
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

// ---------------------------------------------------------------------------
// ChartData – what the presentation layer draws
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Categories along x, values up.
    Vertical,
    /// Categories down the y axis, first category on top.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    Percent,
    Integer,
    Decimal,
}

impl ValueFormat {
    /// Bar label text.
    pub fn render(self, value: f64) -> String {
        match self {
            ValueFormat::Percent => format!("{value:.1}%"),
            ValueFormat::Integer => format!("{value:.0}"),
            ValueFormat::Decimal => format!("{value:.1}"),
        }
    }
}

/// One bar series; `values` and `colors` run parallel to the categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    /// `None` draws no bar for that category.
    pub values: Vec<Option<f64>>,
    pub colors: Vec<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub chart: ChartId,
    pub title: String,
    pub orientation: Orientation,
    pub value_label: String,
    /// Fixed upper bound of the value axis (percentage views).
    pub value_max: Option<f64>,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub reference: Option<ReferenceLine>,
    pub format: ValueFormat,
    /// Extra legend entries not tied to a series (leaderboard roles).
    pub legend: Vec<LegendEntry>,
}

impl ChartData {
    /// Nothing to draw: no series carries a value.
    pub fn is_empty(&self) -> bool {
        self.series
            .iter()
            .all(|s| s.values.iter().all(Option::is_none))
    }
}

// ---------------------------------------------------------------------------
// Route adapter
// ---------------------------------------------------------------------------

/// Load the season file fresh and build one view.
pub fn run(id: ChartId, path: &Path, roles: &BTreeSet<String>) -> Result<ChartData, PipelineError> {
    let table = loader::load_season(path, &id.required_columns())?;
    if table.is_empty() {
        log::warn!("{} has a header but no player rows", path.display());
    }
    let chart = build_chart(id, &table, roles)?;
    log::info!(
        "Built '{}' from {} rows: {} categories",
        id,
        table.len(),
        chart.categories.len()
    );
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn routes_are_unique() {
        let routes: BTreeSet<_> = ChartId::ALL.iter().map(|c| c.route()).collect();
        assert_eq!(routes.len(), ChartId::ALL.len());
    }

    #[test]
    fn value_labels_follow_format() {
        assert_eq!(ValueFormat::Percent.render(52.345), "52.3%");
        assert_eq!(ValueFormat::Integer.render(12.0), "12");
        assert_eq!(ValueFormat::Decimal.render(3.26), "3.3");
    }

    #[test]
    fn leaderboard_starts_unfiltered() {
        assert!(ChartId::TopScorers.default_roles().is_empty());
        assert_eq!(ChartId::Duels.default_roles().len(), 3);
        assert!(!ChartId::Duels.default_roles().contains("GOALKEEPER"));
    }

    #[test]
    fn run_reports_missing_columns_as_load_errors() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Player Name,Player's Role,Total Goals").unwrap();
        writeln!(file, "Ana,ATTACKER,4").unwrap();

        let err = run(ChartId::Duels, file.path(), &BTreeSet::new()).unwrap_err();
        assert!(matches!(err, PipelineError::Load(_)));

        let chart = run(ChartId::TopScorers, file.path(), &BTreeSet::new()).unwrap();
        assert_eq!(chart.categories, vec!["Ana"]);
    }

    #[test]
    fn header_only_file_is_an_empty_chart() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Player Name,Player's Role,Duels Won %").unwrap();

        let chart = run(ChartId::Duels, file.path(), &ChartId::Duels.default_roles()).unwrap();
        assert!(chart.is_empty());
        assert_eq!(chart.reference, None);
    }
}
