use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::charts::ChartId;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – view list and role filter
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Views");
            ui.separator();

            for id in ChartId::ALL {
                let selected = state.selected == id;
                if ui
                    .selectable_label(selected, id.title())
                    .on_hover_text(format!("/{}", id.route()))
                    .clicked()
                {
                    state.select_chart(id);
                }
            }

            ui.add_space(8.0);
            ui.separator();

            // Show count of selected / total in the header
            let n_total = state.known_roles.len();
            let header_text = if state.roles.is_empty() {
                format!("Roles  (all {n_total})")
            } else {
                format!("Roles  ({}/{n_total})", state.roles.len())
            };

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("roles")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_roles();
                    }

                    // Clone so toggling can mutate state inside the loop.
                    let roles: Vec<String> = state.known_roles.iter().cloned().collect();
                    for role in roles {
                        let mut checked = state.roles.is_empty() || state.roles.contains(&role);
                        let text = RichText::new(&role).color(super::to_color32(
                            crate::color::role_color(&role),
                        ));
                        let last = state.roles.len() == 1 && checked;
                        let response = ui
                            .add_enabled(!last, egui::Checkbox::new(&mut checked, text))
                            .on_disabled_hover_text("At least one role stays selected");
                        if response.changed() {
                            state.toggle_role(&role);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.refresh();
                ui.close_menu();
            }
        });

        ui.separator();

        match &state.data_path {
            Some(path) => {
                ui.label(path.display().to_string());
            }
            None => {
                ui.label("No season file");
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open season statistics")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.set_data_path(path);
    }
}
