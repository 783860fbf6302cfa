use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDateTime};
use eframe::egui::{vec2, Ui};
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Price chart (central panel, under the table)
// ---------------------------------------------------------------------------

/// x position of a timestamp: seconds since the Unix epoch.
fn x_of(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

fn format_date(x: f64) -> String {
    DateTime::from_timestamp(x as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn date_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    format_date(mark.value)
}

/// Render the long table as one line per region.
pub fn price_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let output = &state.output;
    if output.long.is_empty() {
        let size = vec2(ui.available_width(), height);
        ui.allocate_ui(size, |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("No auctions match the current selection.");
            });
        });
        return;
    }

    Plot::new("price_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Adjudication Price (€)")
        .x_axis_formatter(date_label)
        .label_formatter(|name, value| {
            let date = format_date(value.x);
            if name.is_empty() {
                format!("{date}\n{:.2}", value.y)
            } else {
                format!("{name}\n{date}\n{:.2}", value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for region in &output.wide.regions {
                // Long rows arrive newest first; lines are drawn left to right.
                let mut points: Vec<[f64; 2]> = output
                    .long
                    .series(region)
                    .map(|r| [x_of(r.parsed_timestamp), r.adjudication_price])
                    .collect();
                points.reverse();

                let mut line = Line::new(PlotPoints::from(points)).name(region).width(1.5);
                if let Some(colors) = &state.colors {
                    line = line.color(colors.color_for(region));
                }
                plot_ui.line(line);
            }
        });
}
