use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::clean::{metric_value, Sentinel};
use super::error::ConfigError;
use super::filter::{filtered_indices, role_filter, row_passes};
use super::model::{SeasonTable, ROLE};

// ---------------------------------------------------------------------------
// Statistic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Mean,
    Sum,
}

impl FromStr for Statistic {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Statistic::Mean),
            "sum" => Ok(Statistic::Sum),
            _ => Err(ConfigError::UnknownStatistic(s.to_string())),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Mean => f.write_str("mean"),
            Statistic::Sum => f.write_str("sum"),
        }
    }
}

/// Running mean and sum over the surviving values of one group.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    n_vals: usize,
    mean: f64,
    sum: f64,
}

impl Accumulator {
    fn add(&mut self, val: f64) {
        self.n_vals += 1;
        self.mean += (val - self.mean) / self.n_vals as f64;
        self.sum += val;
    }

    /// `None` until at least one value was added.
    fn finish(&self, statistic: Statistic) -> Option<f64> {
        if self.n_vals == 0 {
            return None;
        }
        Some(match statistic {
            Statistic::Mean => self.mean,
            Statistic::Sum => self.sum,
        })
    }
}

// ---------------------------------------------------------------------------
// AggregationResult
// ---------------------------------------------------------------------------

/// Per-group statistic for one metric.
///
/// A group is present only if at least one of its rows carried a usable
/// value. `population` is `None` when it was not requested or when nothing
/// survived cleaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub groups: BTreeMap<String, f64>,
    pub population: Option<f64>,
    /// Rows that passed the role filter and had a group value.
    pub rows_considered: usize,
    /// Numeric values that fed the population statistic, grouped or not.
    pub values_used: usize,
}

impl AggregationResult {
    /// No group survived: the "no data" outcome.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, group: &str) -> Option<f64> {
        self.groups.get(group).copied()
    }

    /// `numerator / denominator * scale` for every group present in both.
    /// Zero denominators drop the group.
    pub fn ratio(numerator: &Self, denominator: &Self, scale: f64) -> Self {
        let divide = |n: f64, d: f64| (d != 0.0).then(|| n / d * scale);
        let groups: BTreeMap<String, f64> = numerator
            .groups
            .iter()
            .filter_map(|(group, &n)| {
                let d = denominator.get(group)?;
                divide(n, d).map(|v| (group.clone(), v))
            })
            .collect();
        let population = match (numerator.population, denominator.population) {
            (Some(n), Some(d)) => divide(n, d),
            _ => None,
        };
        AggregationResult {
            groups,
            population,
            rows_considered: numerator.rows_considered.min(denominator.rows_considered),
            values_used: numerator.values_used.min(denominator.values_used),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation – the parameterized pipeline
// ---------------------------------------------------------------------------

/// Clean one metric column, keep the allowed roles, group, and reduce.
///
/// ```text
/// Aggregation::new(DUELS_WON_PCT, Statistic::Mean)
///     .sentinel("-")
///     .allowed_roles(Role::names(&Role::OUTFIELD))
///     .scale(100.0)
///     .with_population()
///     .run(&table)?
/// ```
#[derive(Debug, Clone)]
pub struct Aggregation {
    metric_field: String,
    statistic: Statistic,
    sentinel: Option<Sentinel>,
    allowed_roles: BTreeSet<String>,
    group_field: String,
    scale: f64,
    population: bool,
}

impl Aggregation {
    pub fn new(metric_field: impl Into<String>, statistic: Statistic) -> Self {
        Aggregation {
            metric_field: metric_field.into(),
            statistic,
            sentinel: None,
            allowed_roles: BTreeSet::new(),
            group_field: ROLE.to_string(),
            scale: 1.0,
            population: false,
        }
    }

    /// Same as [`Aggregation::new`] with the statistic given by name.
    pub fn named(metric_field: impl Into<String>, statistic: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(metric_field, statistic.parse()?))
    }

    pub fn sentinel(mut self, token: impl Into<String>) -> Self {
        self.sentinel = Some(Sentinel::new(token));
        self
    }

    /// Empty means every role.
    pub fn allowed_roles(mut self, roles: BTreeSet<String>) -> Self {
        self.allowed_roles = roles;
        self
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_field = field.into();
        self
    }

    pub fn scale(mut self, factor: f64) -> Self {
        self.scale = factor;
        self
    }

    pub fn with_population(mut self) -> Self {
        self.population = true;
        self
    }

    fn validate(&self, table: &SeasonTable) -> Result<(), ConfigError> {
        for field in [&self.metric_field, &self.group_field] {
            if !table.has_column(field) {
                return Err(ConfigError::UnknownField(field.clone()));
            }
        }
        if !self.allowed_roles.is_empty() && !table.has_column(ROLE) {
            return Err(ConfigError::UnknownField(ROLE.to_string()));
        }
        if !self.scale.is_finite() {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        Ok(())
    }

    pub fn run(&self, table: &SeasonTable) -> Result<AggregationResult, ConfigError> {
        self.validate(table)?;

        let filters = role_filter(&self.allowed_roles);
        let mut per_group: BTreeMap<String, Accumulator> = BTreeMap::new();
        let mut overall = Accumulator::default();
        let mut rows_considered = 0;

        for row in table.rows.iter().filter(|row| row_passes(row, &filters)) {
            let group = row.text(&self.group_field);
            if group.is_some() {
                rows_considered += 1;
            }
            let Some(value) = metric_value(row, &self.metric_field, self.sentinel.as_ref()) else {
                continue;
            };
            // The population ignores grouping: a row without a group still counts.
            overall.add(value);
            if let Some(group) = group {
                per_group.entry(group.into_owned()).or_default().add(value);
            }
        }

        let groups: BTreeMap<String, f64> = per_group
            .into_iter()
            .filter_map(|(group, acc)| {
                acc.finish(self.statistic).map(|v| (group, v * self.scale))
            })
            .collect();
        let population = if self.population {
            overall.finish(self.statistic).map(|v| v * self.scale)
        } else {
            None
        };

        log::debug!(
            "{} of '{}' by '{}': {} groups from {} rows ({} values)",
            self.statistic,
            self.metric_field,
            self.group_field,
            groups.len(),
            rows_considered,
            overall.n_vals
        );

        Ok(AggregationResult {
            groups,
            population,
            rows_considered,
            values_used: overall.n_vals,
        })
    }
}

// ---------------------------------------------------------------------------
// Ranking – leaderboard views
// ---------------------------------------------------------------------------

/// How rows with equal metric values are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// Keep input order.
    RowOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    /// Position of the row in the table.
    pub index: usize,
    pub player_name: String,
    pub role: Option<String>,
    pub value: f64,
}

/// The `n` rows with the largest values of one metric.
#[derive(Debug, Clone)]
pub struct Ranking {
    metric_field: String,
    sentinel: Option<Sentinel>,
    limit: usize,
    tie_break: TieBreak,
    allowed_roles: BTreeSet<String>,
}

impl Ranking {
    pub fn new(metric_field: impl Into<String>) -> Self {
        Ranking {
            metric_field: metric_field.into(),
            sentinel: None,
            limit: 10,
            tie_break: TieBreak::RowOrder,
            allowed_roles: BTreeSet::new(),
        }
    }

    pub fn sentinel(mut self, token: impl Into<String>) -> Self {
        self.sentinel = Some(Sentinel::new(token));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = n;
        self
    }

    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn allowed_roles(mut self, roles: BTreeSet<String>) -> Self {
        self.allowed_roles = roles;
        self
    }

    pub fn run(&self, table: &SeasonTable) -> Result<Vec<RankedRow>, ConfigError> {
        if !table.has_column(&self.metric_field) {
            return Err(ConfigError::UnknownField(self.metric_field.clone()));
        }
        if !self.allowed_roles.is_empty() && !table.has_column(ROLE) {
            return Err(ConfigError::UnknownField(ROLE.to_string()));
        }

        let filters = role_filter(&self.allowed_roles);
        let mut ranked: Vec<RankedRow> = filtered_indices(table, &filters)
            .into_iter()
            .filter_map(|index| {
                let row = &table.rows[index];
                let value = metric_value(row, &self.metric_field, self.sentinel.as_ref())?;
                Some(RankedRow {
                    index,
                    player_name: row.player_name(),
                    role: row.role(),
                    value,
                })
            })
            .collect();

        // `sort_by` is stable, so equal keys keep table order.
        match self.tie_break {
            TieBreak::RowOrder => ranked.sort_by(|a, b| b.value.total_cmp(&a.value)),
        }
        ranked.truncate(self.limit);
        Ok(ranked)
    }
}
