use eframe::egui::{Align2, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, HLine, Legend, LineStyle, Plot, PlotPoint, Text};

use super::to_color32;
use crate::charts::{ChartData, Orientation};
use crate::state::AppState;

/// Bar thickness of a single-series view; grouped views split it.
const SINGLE_WIDTH: f64 = 0.6;
const GROUPED_WIDTH: f64 = 0.35;

// ---------------------------------------------------------------------------
// Chart plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected view in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &AppState) {
    let chart = match &state.chart {
        Some(chart) => chart,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                let hint = if state.data_path.is_none() {
                    "Open a season file to view charts  (File → Open…)"
                } else {
                    "No chart to show"
                };
                ui.heading(hint);
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(chart.title.as_str());
    });

    if chart.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No rows left after cleaning and filtering.");
        });
        return;
    }

    let horizontal = chart.orientation == Orientation::Horizontal;
    let n = chart.categories.len();
    // Horizontal charts list the first category on top.
    let slot = move |i: usize| if horizontal { (n - 1 - i) as f64 } else { i as f64 };

    let categories = chart.categories.clone();
    let category_label = move |mark: GridMark| -> String {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        let idx = pos as usize;
        if idx >= categories.len() {
            return String::new();
        }
        let idx = if horizontal { categories.len() - 1 - idx } else { idx };
        categories[idx].clone()
    };

    let mut plot = Plot::new("season_chart")
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false);

    if horizontal {
        plot = plot
            .x_axis_label(chart.value_label.as_str())
            .y_axis_formatter(move |mark, _range| category_label(mark))
            .include_x(0.0);
    } else {
        plot = plot
            .y_axis_label(chart.value_label.as_str())
            .x_axis_formatter(move |mark, _range| category_label(mark))
            .include_y(0.0);
        if let Some(max) = chart.value_max {
            plot = plot.include_y(max);
        }
    }

    let n_series = chart.series.len();
    let width = if n_series > 1 { GROUPED_WIDTH } else { SINGLE_WIDTH };

    plot.show(ui, |plot_ui| {
        for (s_idx, series) in chart.series.iter().enumerate() {
            // Centre the group of bars on the category slot.
            let offset = (s_idx as f64 - (n_series as f64 - 1.0) / 2.0) * width;
            let mut bars = Vec::new();
            let mut labels = Vec::new();

            for (i, value) in series.values.iter().enumerate() {
                let Some(value) = *value else { continue };
                let pos = slot(i) + offset;
                let color = to_color32(series.colors[i]);
                bars.push(
                    Bar::new(pos, value)
                        .width(width)
                        .fill(color)
                        .name(&chart.categories[i]),
                );
                let (at, anchor) = if horizontal {
                    (PlotPoint::new(value, pos), Align2::LEFT_CENTER)
                } else {
                    (PlotPoint::new(pos, value), Align2::CENTER_BOTTOM)
                };
                labels.push(Text::new(at, RichText::new(chart.format.render(value))).anchor(anchor));
            }

            let mut bar_chart = BarChart::new(bars).width(width);
            if n_series > 1 {
                // Grouped series get a legend entry each.
                bar_chart = bar_chart
                    .name(&series.name)
                    .color(to_color32(series.colors.first().copied().unwrap_or_default()));
            }
            if horizontal {
                bar_chart = bar_chart.horizontal();
            }
            plot_ui.bar_chart(bar_chart);
            for label in labels {
                plot_ui.text(label);
            }
        }

        if let Some(reference) = &chart.reference {
            plot_ui.hline(
                HLine::new(reference.value)
                    .name(&reference.label)
                    .color(to_color32(reference.color))
                    .width(1.5)
                    .style(LineStyle::dashed_loose()),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Summary table (bottom panel)
// ---------------------------------------------------------------------------

/// Category → value per series, as drawn.
pub fn summary_table(ui: &mut Ui, chart: &ChartData) {
    if !chart.legend.is_empty() {
        ui.horizontal(|ui: &mut Ui| {
            for entry in &chart.legend {
                ui.label(RichText::new(format!("■ {}", entry.label)).color(to_color32(entry.color)));
            }
        });
    }

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0));
    for _ in &chart.series {
        table = table.column(Column::auto().at_least(100.0));
    }

    table
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(if chart.legend.is_empty() { "Role" } else { "Player" });
            });
            for series in &chart.series {
                header.col(|ui| {
                    ui.strong(series.name.as_str());
                });
            }
        })
        .body(|mut body| {
            for (i, category) in chart.categories.iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(category.as_str());
                    });
                    for series in &chart.series {
                        row.col(|ui| {
                            let text = series.values[i]
                                .map(|v| chart.format.render(v))
                                .unwrap_or_else(|| "–".to_string());
                            ui.label(text);
                        });
                    }
                });
            }
            if let Some(reference) = &chart.reference {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.strong("Team");
                    });
                    row.col(|ui| {
                        ui.strong(chart.format.render(reference.value));
                    });
                });
            }
        });
}
