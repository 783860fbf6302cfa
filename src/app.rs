use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    chart_height: f32,
}

impl DashboardApp {
    pub fn new(state: AppState, config: &DashboardConfig) -> Self {
        Self {
            state,
            chart_height: config.chart_height,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title, description, status ----
        let reload = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &self.state))
            .inner;

        // ---- Left side panel: region and year selection ----
        let changes = egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| panels::side_panel(ui, &self.state))
            .inner;

        if reload {
            self.state.reload();
        }
        for change in changes {
            self.state.apply(change);
        }

        // ---- Central panel: table above chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("No data loaded. Fix the source file and press “Reload data”.");
                });
                return;
            }
            table::wide_table(ui, &self.state.output.wide);
            ui.separator();
            plot::price_chart(ui, &self.state, self.chart_height);
        });
    }
}
