use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CovidCitiesApp {
    pub state: AppState,
}

impl CovidCitiesApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CovidCitiesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: location controls ----
        egui::SidePanel::left("location_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart + latest values ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let chart_height = ui.available_height() * 0.65;
            plot::case_rate_plot(ui, &self.state, chart_height);
            ui.separator();
            table::latest_table(ui, &self.state);
        });
    }
}
