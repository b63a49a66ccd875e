use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use covid_cities::data::chart::natural_day;

use crate::state::AppState;

/// Latest value per plotted location, highest case rate first.
pub fn latest_table(ui: &mut Ui, state: &AppState) {
    let Some(latest) = state.series.latest_date() else {
        return;
    };
    let rows = state.series.latest_snapshot();

    ui.heading(format!(
        "Data for {} ({latest})",
        natural_day(latest, state.today)
    ));

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(220.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Location");
            });
            header.col(|ui| {
                ui.strong("Cases per 100,000");
            });
            header.col(|ui| {
                ui.strong("New cases");
            });
        })
        .body(|mut body| {
            for row in rows {
                body.row(18.0, |mut tr| {
                    tr.col(|ui| {
                        let color = state.color_map.color_for(&row.label);
                        ui.label(RichText::new(&row.label).color(color));
                    });
                    tr.col(|ui| {
                        ui.label(format!("{:.2}", row.observation.case_rate));
                    });
                    tr.col(|ui| {
                        ui.label(row.observation.raw_cases.to_string());
                    });
                });
            }
        });
}
