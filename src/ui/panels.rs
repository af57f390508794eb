use eframe::egui::{self, Color32, RichText, Ui};

use crate::coordinator::FilterState;
use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Left side panel – origin legend
// ---------------------------------------------------------------------------

/// Render the legend: one row per origin with its colour and counts.
pub fn side_panel(ui: &mut Ui, state: &DashboardState) {
    ui.heading("Origin");
    ui.separator();

    egui::Grid::new("legend")
        .num_columns(3)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            ui.strong("Selected");
            ui.strong("Total");
            ui.end_row();

            let summary = state.origin_summary();
            for (origin, color) in state.color_map.legend_entries() {
                let (total, selected) = summary
                    .iter()
                    .find(|row| row.0 == origin)
                    .map_or((0, 0), |row| (row.1, row.2));
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(color));
                    ui.label(origin);
                });
                ui.label(selected.to_string());
                ui.label(total.to_string());
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    ui.separator();

    let hover = state.hovered_name().unwrap_or("–");
    ui.label(RichText::new(format!("Hovered: {hover}")).weak());
    ui.add_space(4.0);
    ui.label(
        RichText::new("Drag on the scatterplot to brush. Click outside the brush or press Esc to clear.")
            .small()
            .weak(),
    );
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the toolbar: source file, counts, filter state and clear button.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState, now: f64) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong(&state.source);
        ui.separator();

        let selection = state.coordinator.selection();
        ui.label(format!(
            "{} cars, {} selected",
            state.dataset.len(),
            selection.len()
        ));

        ui.separator();

        let filter_state = state.coordinator.state();
        let (text, color) = match filter_state {
            FilterState::Unfiltered => ("Unfiltered", Color32::GRAY),
            FilterState::Filtered => ("Filtered", Color32::from_rgb(0x46, 0x82, 0xb4)),
        };
        ui.label(RichText::new(text).color(color));

        let clear = ui.add_enabled(
            filter_state == FilterState::Filtered,
            egui::Button::new("Clear brush"),
        );
        if clear.clicked() {
            state.coordinator.clear_brush(now);
        }
    });
}
