use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SeasonChartsApp {
    pub state: AppState,
}

impl SeasonChartsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SeasonChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: views + role filter ----
        egui::SidePanel::left("view_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: numbers behind the chart ----
        if let Some(chart) = &self.state.chart {
            egui::TopBottomPanel::bottom("summary_panel")
                .resizable(true)
                .default_height(160.0)
                .show(ctx, |ui| {
                    plot::summary_table(ui, chart);
                });
        }

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_plot(ui, &self.state);
        });
    }
}
