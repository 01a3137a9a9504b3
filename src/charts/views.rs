use std::collections::BTreeSet;

use crate::color::{self, Rgb};
use crate::data::aggregate::{Aggregation, AggregationResult, RankedRow, Ranking, TieBreak};
use crate::data::error::ConfigError;
use crate::data::model::{
    Role, SeasonTable, DASH_SENTINEL, DRIBBLE_SUCCESS_PCT, DUELS_WON_PCT, EXPECTED_GOALS,
    FOULS_COMMITTED, PASS_ACCURACY_PCT, ROLE, SHOT_ACCURACY_PCT, TOTAL_GOALS, YELLOW_CARDS,
};

use super::{ChartData, ChartId, LegendEntry, Orientation, ReferenceLine, Series, ValueFormat};

const LEADERBOARD_SIZE: usize = 10;

/// Build one view from an already loaded table.
///
/// `roles` is the role whitelist; empty keeps every role.
pub fn build_chart(
    id: ChartId,
    table: &SeasonTable,
    roles: &BTreeSet<String>,
) -> Result<ChartData, ConfigError> {
    match id {
        ChartId::TopScorers => top_scorers(table, roles),
        ChartId::Duels => position_percent(id, table, roles, DUELS_WON_PCT, "Duel Win Percentage"),
        ChartId::PassAccuracy => {
            position_percent(id, table, roles, PASS_ACCURACY_PCT, "Pass Accuracy (%)")
        }
        ChartId::DribbleSuccess => {
            position_percent(id, table, roles, DRIBBLE_SUCCESS_PCT, "Dribble Success (%)")
        }
        ChartId::ShotAccuracy => {
            position_percent(id, table, roles, SHOT_ACCURACY_PCT, "Shot Accuracy (%)")
        }
        ChartId::FoulsVsYellow => grouped_sums(
            id,
            table,
            roles,
            [
                (FOULS_COMMITTED, "Fouls Committed", [0xd6, 0x27, 0x28]),
                (YELLOW_CARDS, "Yellow Cards", [0xff, 0xbb, 0x78]),
            ],
            "Total Count",
            ValueFormat::Integer,
        ),
        ChartId::YellowRate => card_rate(table, roles),
        ChartId::XgVsGoals => grouped_sums(
            id,
            table,
            roles,
            [
                (EXPECTED_GOALS, "xG (Expected Goals)", [0x1f, 0x77, 0xb4]),
                (TOTAL_GOALS, "Total Goals", [0x2c, 0xa0, 0x2c]),
            ],
            "Total Goals / xG",
            ValueFormat::Decimal,
        ),
    }
}

fn sum_by_role(
    table: &SeasonTable,
    roles: &BTreeSet<String>,
    field: &str,
) -> Result<AggregationResult, ConfigError> {
    Aggregation::named(field, "sum")?
        .sentinel(DASH_SENTINEL)
        .allowed_roles(roles.clone())
        .group_by(ROLE)
        .with_population()
        .run(table)
}

/// Single series of groups, one bar per group in group order.
fn single_series(name: &str, result: &AggregationResult, cycle: &[Rgb]) -> (Vec<String>, Series) {
    let categories: Vec<String> = result.groups.keys().cloned().collect();
    let series = Series {
        name: name.to_string(),
        values: result.groups.values().map(|&v| Some(v)).collect(),
        colors: color::positional(cycle, categories.len()),
    };
    (categories, series)
}

// Mean of a 0–1 fraction column per role, as a percentage, with the team
// average drawn across.
fn position_percent(
    id: ChartId,
    table: &SeasonTable,
    roles: &BTreeSet<String>,
    field: &str,
    value_label: &str,
) -> Result<ChartData, ConfigError> {
    let result = Aggregation::named(field, "mean")?
        .sentinel(DASH_SENTINEL)
        .allowed_roles(roles.clone())
        .group_by(ROLE)
        .scale(100.0)
        .with_population()
        .run(table)?;
    if result.is_empty() {
        log::debug!("'{id}': no '{field}' values left after cleaning");
    }

    let (categories, series) = single_series(field, &result, &color::POSITION_CYCLE);
    let reference = result.population.map(|avg| ReferenceLine {
        label: format!("Team Avg: {avg:.1}%"),
        value: avg,
        color: color::TEAM_AVERAGE,
    });

    Ok(ChartData {
        chart: id,
        title: id.title().to_string(),
        orientation: Orientation::Vertical,
        value_label: value_label.to_string(),
        value_max: Some(100.0),
        categories,
        series: vec![series],
        reference,
        format: ValueFormat::Percent,
        legend: Vec::new(),
    })
}

/// Two summed metrics side by side per role. A role missing from one metric
/// keeps its bar for the other.
fn grouped_sums(
    id: ChartId,
    table: &SeasonTable,
    roles: &BTreeSet<String>,
    metrics: [(&str, &str, Rgb); 2],
    value_label: &str,
    format: ValueFormat,
) -> Result<ChartData, ConfigError> {
    let results = metrics
        .iter()
        .map(|(field, _, _)| sum_by_role(table, roles, field))
        .collect::<Result<Vec<_>, _>>()?;

    let categories: Vec<String> = results
        .iter()
        .flat_map(|r| r.groups.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let series = metrics
        .iter()
        .zip(&results)
        .map(|((_, name, rgb), result)| Series {
            name: name.to_string(),
            values: categories.iter().map(|c| result.get(c)).collect(),
            colors: vec![*rgb; categories.len()],
        })
        .collect();

    Ok(ChartData {
        chart: id,
        title: id.title().to_string(),
        orientation: Orientation::Vertical,
        value_label: value_label.to_string(),
        value_max: None,
        categories,
        series,
        reference: None,
        format,
        legend: Vec::new(),
    })
}

fn card_rate(table: &SeasonTable, roles: &BTreeSet<String>) -> Result<ChartData, ConfigError> {
    let fouls = sum_by_role(table, roles, FOULS_COMMITTED)?;
    let yellows = sum_by_role(table, roles, YELLOW_CARDS)?;
    let rate = AggregationResult::ratio(&yellows, &fouls, 100.0);
    if rate.is_empty() {
        log::debug!("'{}': no role with fouls to rate", ChartId::YellowRate);
    }

    let (categories, series) = single_series("Yellow Card Rate", &rate, &color::RATE_CYCLE);

    Ok(ChartData {
        chart: ChartId::YellowRate,
        title: ChartId::YellowRate.title().to_string(),
        orientation: Orientation::Vertical,
        value_label: "Yellow Card Rate (%)".to_string(),
        value_max: Some(100.0),
        categories,
        series: vec![series],
        reference: None,
        format: ValueFormat::Percent,
        legend: Vec::new(),
    })
}

fn top_scorers(table: &SeasonTable, roles: &BTreeSet<String>) -> Result<ChartData, ConfigError> {
    let ranked = Ranking::new(TOTAL_GOALS)
        .sentinel(DASH_SENTINEL)
        .limit(LEADERBOARD_SIZE)
        .tie_break(TieBreak::RowOrder)
        .allowed_roles(roles.clone())
        .run(table)?;

    let role_of = |r: &RankedRow| r.role.clone().unwrap_or_default();
    let present: BTreeSet<String> = ranked.iter().map(role_of).collect();
    let legend = Role::ALL
        .iter()
        .filter(|r| present.contains(r.as_str()))
        .map(|r| LegendEntry {
            label: r.as_str().to_string(),
            color: color::role_color(r.as_str()),
        })
        .collect();

    let series = Series {
        name: TOTAL_GOALS.to_string(),
        values: ranked.iter().map(|r| Some(r.value)).collect(),
        colors: ranked.iter().map(|r| color::role_color(&role_of(r))).collect(),
    };

    Ok(ChartData {
        chart: ChartId::TopScorers,
        title: ChartId::TopScorers.title().to_string(),
        orientation: Orientation::Horizontal,
        value_label: TOTAL_GOALS.to_string(),
        value_max: None,
        categories: ranked.into_iter().map(|r| r.player_name).collect(),
        series: vec![series],
        reference: None,
        format: ValueFormat::Integer,
        legend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;
    use std::path::Path;

    const SEASON: &str = "\
Player Name,Player's Role,Total Goals,Duels Won %,Pass Accuracy %,Successful Dribbles %,Shot Accuracy %,Fouls Committed,Yellow Cards,xG (expected goals)
Ana Ruiz,ATTACKER,9,0.40,0.70,0.50,0.60,10,2,7.5
Ben Ortiz,ATTACKER,4,0.60,0.80,-,0.40,6,1,5.1
Cal Diaz,MIDFIELDER,4,0.50,0.90,0.30,-,12,3,2.2
Dev Shah,DEFENDER,1,0.70,0.85,-,-,0,0,0.4
Eli Ford,GOALKEEPER,0,-,0.60,-,-,1,1,0.0
Fin Vogt,DEFENDER,-,0.55,0.75,-,-,-,-,-";

    fn season() -> SeasonTable {
        read_csv(SEASON.as_bytes(), Path::new("season.csv")).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn duels_view_averages_outfield_roles_with_team_line() {
        let chart = build_chart(ChartId::Duels, &season(), &ChartId::Duels.default_roles()).unwrap();
        assert_eq!(chart.categories, vec!["ATTACKER", "DEFENDER", "MIDFIELDER"]);
        let values: Vec<f64> = chart.series[0].values.iter().map(|v| v.unwrap()).collect();
        assert!(approx(values[0], 50.0));
        assert!(approx(values[1], 62.5));
        assert!(approx(values[2], 50.0));

        // Team average over the five outfield values, goalkeeper excluded.
        let reference = chart.reference.unwrap();
        assert!(approx(reference.value, 55.0));
        assert_eq!(reference.label, "Team Avg: 55.0%");
        assert_eq!(chart.value_max, Some(100.0));
    }

    #[test]
    fn all_sentinel_role_drops_out_of_percent_view() {
        let chart = build_chart(
            ChartId::ShotAccuracy,
            &season(),
            &ChartId::ShotAccuracy.default_roles(),
        )
        .unwrap();
        // Both defenders have "-" for shot accuracy.
        assert_eq!(chart.categories, vec!["ATTACKER"]);
        assert!(approx(chart.series[0].values[0].unwrap(), 50.0));
    }

    #[test]
    fn fouls_vs_yellow_sums_both_series() {
        let chart = build_chart(
            ChartId::FoulsVsYellow,
            &season(),
            &ChartId::FoulsVsYellow.default_roles(),
        )
        .unwrap();
        assert_eq!(chart.categories, vec!["ATTACKER", "DEFENDER", "MIDFIELDER"]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].values, vec![Some(16.0), Some(0.0), Some(12.0)]);
        assert_eq!(chart.series[1].values, vec![Some(3.0), Some(0.0), Some(3.0)]);
        assert_eq!(chart.format.render(16.0), "16");
    }

    #[test]
    fn yellow_rate_omits_roles_without_fouls() {
        let chart = build_chart(
            ChartId::YellowRate,
            &season(),
            &ChartId::YellowRate.default_roles(),
        )
        .unwrap();
        // Defenders committed zero fouls in total.
        assert_eq!(chart.categories, vec!["ATTACKER", "MIDFIELDER"]);
        assert!(approx(chart.series[0].values[0].unwrap(), 18.75));
        assert!(approx(chart.series[0].values[1].unwrap(), 25.0));
    }

    #[test]
    fn top_scorers_ranks_across_all_roles() {
        let chart = build_chart(ChartId::TopScorers, &season(), &BTreeSet::new()).unwrap();
        assert_eq!(chart.orientation, Orientation::Horizontal);
        // "-" for Fin Vogt is excluded; Ben and Cal tie and keep file order.
        assert_eq!(
            chart.categories,
            vec!["Ana Ruiz", "Ben Ortiz", "Cal Diaz", "Dev Shah", "Eli Ford"]
        );
        assert_eq!(chart.series[0].colors[2], color::role_color("MIDFIELDER"));
        let legend: Vec<_> = chart.legend.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(legend, vec!["ATTACKER", "MIDFIELDER", "DEFENDER", "GOALKEEPER"]);
    }

    #[test]
    fn role_filter_narrows_every_view() {
        let roles = Role::names(&[Role::Defender]);
        let chart = build_chart(ChartId::XgVsGoals, &season(), &roles).unwrap();
        assert_eq!(chart.categories, vec!["DEFENDER"]);
        assert_eq!(chart.series[0].values, vec![Some(0.4)]);
        assert_eq!(chart.series[1].values, vec![Some(1.0)]);

        let chart = build_chart(ChartId::TopScorers, &season(), &roles).unwrap();
        assert_eq!(chart.categories, vec!["Dev Shah"]);
    }

    #[test]
    fn empty_selection_yields_empty_chart() {
        let roles: BTreeSet<String> = ["COACH".to_string()].into();
        let chart = build_chart(ChartId::PassAccuracy, &season(), &roles).unwrap();
        assert!(chart.is_empty());
        assert!(chart.categories.is_empty());
        assert_eq!(chart.reference, None);
    }
}
