//! Command-line interface argument parsing.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Parser;

use crate::charts::ChartId;

/// Season Charts - per-role charts of a squad's season statistics
///
/// Opens a viewer with one chart per view. With --print, builds a single
/// view and writes its data as JSON instead.
///
/// Examples:
///   season-charts --data "UNCC MSOC 2023.csv"
///   season-charts --chart duels --roles ATTACKER,DEFENDER
///   season-charts --chart yellow_rate --print
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Season statistics file (.csv, .json or .parquet)
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "UNCC MSOC 2023.csv",
        env = "SEASON_STATS_PATH"
    )]
    pub data: PathBuf,

    /// View to open with
    #[arg(short, long, value_enum, default_value_t = ChartId::TopScorers)]
    pub chart: ChartId,

    /// Role whitelist (comma-separated), overriding the view's default
    ///
    /// Example: --roles ATTACKER,MIDFIELDER
    #[arg(long, value_name = "ROLES", value_delimiter = ',')]
    pub roles: Option<Vec<String>>,

    /// Build the view once and print its data as JSON
    #[arg(long)]
    pub print: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The role override as the set the pipeline takes.
    pub fn role_filter(&self) -> Option<BTreeSet<String>> {
        self.roles.as_ref().map(|roles| {
            roles
                .iter()
                .map(|r| r.trim().to_ascii_uppercase())
                .filter(|r| !r.is_empty())
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_open_the_leaderboard() {
        let args = Args::try_parse_from(["season-charts"]).unwrap();
        assert_eq!(args.chart, ChartId::TopScorers);
        assert!(!args.print);
        assert!(args.role_filter().is_none());
    }

    #[test]
    fn routes_parse_as_chart_names() {
        let args = Args::try_parse_from(["season-charts", "--chart", "fouls_vs_yellow", "--print"])
            .unwrap();
        assert_eq!(args.chart, ChartId::FoulsVsYellow);
        assert!(args.print);
        assert!(Args::try_parse_from(["season-charts", "--chart", "heatmap"]).is_err());
    }

    #[test]
    fn roles_are_normalized() {
        let args = Args::try_parse_from(["season-charts", "--roles", "attacker, Defender"]).unwrap();
        let roles = args.role_filter().unwrap();
        assert_eq!(
            roles.into_iter().collect::<Vec<_>>(),
            vec!["ATTACKER".to_string(), "DEFENDER".to_string()]
        );
    }
}
