mod app;
mod color;
mod config;
mod state;
mod ui;

use app::CovidCitiesApp;
use clap::Parser;
use covid_cities::data::artifact::SystemClock;
use eframe::egui;

use config::Config;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();
    let config = Config::parse();
    log::debug!("{config:?}");

    let state = AppState::load(&config, &SystemClock);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "COVID-19 Cases – US counties",
        options,
        Box::new(|_cc| Ok(Box::new(CovidCitiesApp::new(state)))),
    )
}
