use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::pivot::WideTable;

const ROW_HEIGHT: f32 = 18.0;

/// Render the wide table: a "Year" column holding the timestamp, then one
/// column per region. An empty table shows only the header.
pub fn wide_table(ui: &mut Ui, table: &WideTable) {
    TableBuilder::new(ui)
        .id_salt("wide_table")
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .max_scroll_height(260.0)
        .column(Column::auto().at_least(150.0))
        .columns(Column::remainder().at_least(90.0), table.regions.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            header.col(|ui| {
                ui.strong("Year");
            });
            for region in &table.regions {
                header.col(|ui| {
                    ui.strong(region);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, table.row_count(), |mut row| {
                let i = row.index();
                row.col(|ui| {
                    ui.label(table.timestamps[i].to_string());
                });
                for value in &table.cells[i] {
                    row.col(|ui| {
                        ui.label(format!("{value:.2}"));
                    });
                }
            });
        });
}
