use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use covid_cities::data::chart::{x_to_date, ChartError};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Case-rate plot (central panel)
// ---------------------------------------------------------------------------

/// Render the case-rate chart, or an empty state when there is nothing to
/// draw.
pub fn case_rate_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let chart = match &state.chart {
        Ok(chart) => chart,
        Err(ChartError::NoData) => {
            let msg = if state.selection.is_empty() {
                "Pick a state and county, then press \"Add to plot?\""
            } else {
                "No data for the selected locations in this date range."
            };
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(msg);
            });
            return;
        }
        Err(e) => {
            // Already logged when the chart was prepared.
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(RichText::new(format!("Chart unavailable: {e}")).weak());
            });
            return;
        }
    };

    ui.heading("Cases per 100,000 population, 7-day rolling average");

    Plot::new("case_rate_plot")
        .legend(Legend::default())
        .height(height)
        .include_y(0.0)
        .include_y(chart.y_max)
        .x_axis_formatter(|mark, _range| {
            x_to_date(mark.value)
                .map(|d| d.format("%b %d %Y").to_string())
                .unwrap_or_default()
        })
        .label_formatter(|name, value| {
            let date = x_to_date(value.x)
                .map(|d| d.to_string())
                .unwrap_or_default();
            if name.is_empty() {
                date
            } else {
                format!("{name}\n{date}: {:.1} cases", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for line in &chart.lines {
                let points: PlotPoints = line.points.iter().copied().collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&line.label)
                        .color(state.color_map.color_for(&line.label))
                        .width(2.0),
                );
            }
        });
}
