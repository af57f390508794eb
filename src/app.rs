use eframe::egui;
use egui_extras::{Size, StripBuilder};

use crate::state::DashboardState;
use crate::ui::{charts, panels};

/// Height of the origin bar chart inside the left column.
const BAR_CHART_HEIGHT: f32 = 140.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: DashboardState,
}

impl DashboardApp {
    pub fn new(state: DashboardState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.state.coordinator.clear_brush(now);
        }

        // ---- Top panel: source and selection summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, now);
        });

        // ---- Left side panel: legend ----
        egui::SidePanel::left("legend_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: bar chart + scatterplot | histograms ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let state = &mut self.state;
            StripBuilder::new(ui)
                .size(Size::relative(0.55))
                .size(Size::remainder())
                .horizontal(|mut strip| {
                    strip.cell(|ui| {
                        charts::bar_chart(ui, state, now, BAR_CHART_HEIGHT);
                        ui.add_space(8.0);
                        let height = ui.available_height();
                        charts::scatterplot(ui, state, now, height);
                    });
                    strip.cell(|ui| {
                        let n = state.coordinator.histograms().len().max(1);
                        let spacing = ui.spacing().item_spacing.y;
                        let height = ui.available_height() / n as f32 - spacing;
                        for index in 0..n {
                            charts::histogram(ui, state, index, now, height);
                        }
                    });
                });
        });

        // Keep frames coming until every bar has reached its target.
        if self.state.coordinator.is_animating(now) {
            ctx.request_repaint();
        }
    }
}
