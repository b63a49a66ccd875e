use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – location controls
// ---------------------------------------------------------------------------

/// Render the location / date controls.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Locations");
    ui.separator();

    if state.counties.is_empty() {
        ui.label("No reference data loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the closures.
    let states: Vec<String> = state.counties.states().map(str::to_string).collect();
    let counties = state.counties.counties(&state.chosen_state).to_vec();

    ui.strong("Choose a State");
    let current_state = state.chosen_state.clone();
    egui::ComboBox::from_id_salt("state_select")
        .selected_text(&current_state)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for s in &states {
                if ui.selectable_label(current_state == *s, s).clicked() {
                    state.choose_state(s);
                }
            }
        });

    ui.strong("Choose a County");
    let current_county = state.chosen_county.clone();
    egui::ComboBox::from_id_salt("county_select")
        .selected_text(&current_county)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for c in &counties {
                if ui.selectable_label(current_county == *c, c).clicked() {
                    state.choose_county(c);
                }
            }
        });

    ui.add_space(4.0);
    if ui.button("Add to plot?").clicked() {
        state.add_current();
    }
    ui.separator();

    ui.strong("Start date");
    let mut start = state.start_date;
    ui.add(DatePickerButton::new(&mut start).id_salt("start_date"));
    if start != state.start_date {
        state.set_start_date(start);
    }
    ui.label(format!("through {}", state.as_of));
    ui.separator();

    ui.strong(format!("Plotted ({})", state.selection.len()));
    ScrollArea::vertical()
        .auto_shrink([false, true])
        .max_height(240.0)
        .show(ui, |ui: &mut Ui| {
            for region in state.selection.all() {
                let label = region.label();
                let color = state.color_map.color_for(&label);
                ui.label(RichText::new(label).color(color));
            }
        });

    if !state.selection.is_empty() {
        ui.add_space(4.0);
        if ui.button("Clear").clicked() {
            state.clear();
        }
        ui.add_space(8.0);
        ui.label("Add additional locations above to compare!");
    }

    ui.separator();
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.hyperlink_to(
            "Data: New York Times",
            "https://github.com/nytimes/covid-19-data/tree/master/rolling-averages",
        );
        ui.hyperlink_to("County mapping", "https://simplemaps.com/data/us-counties");
    });
    ui.small(
        "Data is subject to test availability, individual reporting and local \
         government reporting. Some areas are reported by city rather than county.",
    );
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
        });

        ui.separator();

        ui.label(format!(
            "{} counties loaded, data as of {}",
            state.store.region_count(),
            state.as_of
        ));
        if state.artifact.as_ref().is_some_and(|a| a.stale) {
            ui.label(RichText::new("(no recent data found)").color(Color32::YELLOW));
        }

        for msg in [&state.status_message, &state.chart_warning].into_iter().flatten() {
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
        .set_title("Open case data")
        .add_filter("Supported files", &["parquet", "pq", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_artifact(&path);
    }
}
