use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::{PAGE_DESCRIPTION, PAGE_TITLE};
use crate::state::{AppState, SelectionChange};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the selection panel. Returns the changes the user made this frame;
/// the caller applies them.
pub fn side_panel(ui: &mut Ui, state: &AppState) -> Vec<SelectionChange> {
    let mut changes = Vec::new();

    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return changes;
    };

    // ---- Date: inclusive year range ----
    if let Some((lo, hi)) = state.year_bounds() {
        ui.strong("Date");
        let range = state.selection.year_range;
        let mut from = range.min;
        let mut to = range.max;
        let from_changed = ui
            .add(egui::Slider::new(&mut from, lo..=hi).step_by(1.0).text("from"))
            .changed();
        let to_changed = ui
            .add(egui::Slider::new(&mut to, lo..=hi).step_by(1.0).text("to"))
            .changed();
        if from_changed || to_changed {
            // Dragging one handle past the other pushes it along.
            if from_changed && from > to {
                to = from;
            } else if to_changed && to < from {
                from = to;
            }
            changes.push(SelectionChange::SetYearRange(from, to));
        }
        ui.separator();
    }

    // ---- Region: multi-select ----
    let n_selected = state.selection.categories.len();
    let n_total = dataset.regions.len();
    ui.strong(format!("Region  ({n_selected}/{n_total})"));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            changes.push(SelectionChange::SelectAllRegions);
        }
        if ui.small_button("None").clicked() {
            changes.push(SelectionChange::ClearRegions);
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for region in &dataset.regions {
                let mut checked = state.selection.categories.contains(region);
                let mut text = RichText::new(region);
                if let Some(colors) = &state.colors {
                    text = text.color(colors.color_for(region));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    changes.push(SelectionChange::ToggleRegion(region.clone()));
                }
            }
        });

    changes
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the page header and status line. Returns `true` when the user asked
/// for a reload.
pub fn top_bar(ui: &mut Ui, state: &AppState) -> bool {
    let mut reload = false;

    ui.heading(format!("🏠 {PAGE_TITLE}"));
    ui.label(PAGE_DESCRIPTION);

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Reload data").clicked() {
            reload = true;
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} auctions loaded, {} matching, {} timestamps × {} regions",
                ds.len(),
                state.output.matched,
                state.output.wide.row_count(),
                state.output.wide.regions.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    reload
}
