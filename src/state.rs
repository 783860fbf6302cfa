use std::sync::Arc;

use crate::color::RegionColors;
use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::filter::{Selection, YearRange};
use crate::data::model::AuctionDataset;
use crate::data::pivot::{run_pipeline, PipelineOutput};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Selection events
// ---------------------------------------------------------------------------

/// A user interaction that changes the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    ToggleRegion(String),
    SelectAllRegions,
    ClearRegions,
    SetYearRange(i32, i32),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every [`SelectionChange`] goes through [`AppState::apply`], which re-runs
/// the pipeline; the UI only ever reads `output`.
pub struct AppState {
    cache: DatasetCache,

    /// Loaded dataset (None before the first load or after a failed reload).
    pub dataset: Option<Arc<AuctionDataset>>,

    pub selection: Selection,

    /// Result of the last pipeline run.
    pub output: PipelineOutput,

    pub colors: Option<RegionColors>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    default_regions: Vec<String>,
    default_year_range: (i32, i32),
    /// Whether the defaults have been applied to a dataset yet.
    seeded: bool,
}

impl AppState {
    pub fn new(cache: DatasetCache, config: &DashboardConfig) -> Self {
        Self {
            cache,
            dataset: None,
            selection: Selection::new(config.default_regions.clone(), config.default_year_range),
            output: PipelineOutput::default(),
            colors: None,
            status_message: None,
            default_regions: config.default_regions.clone(),
            default_year_range: config.default_year_range,
            seeded: false,
        }
    }

    /// Fetch the dataset through the cache and ingest it.
    pub fn load(&mut self) -> Result<(), LoadError> {
        let dataset = self.cache.get()?;
        let unchanged = self
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &dataset));
        if !unchanged {
            self.set_dataset(dataset);
        }
        Ok(())
    }

    /// Drop the cached dataset and read the source again. A failure clears
    /// the view and leaves the error in `status_message`.
    pub fn reload(&mut self) {
        self.cache.clear();
        match self.load() {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::error!("Failed to reload {}: {e}", self.cache.path().display());
                self.dataset = None;
                self.colors = None;
                self.output = PipelineOutput::default();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset. The first dataset seeds the default
    /// selection; later ones (reloads) keep the user's selection, restricted
    /// to the regions the new data still has.
    pub fn set_dataset(&mut self, dataset: Arc<AuctionDataset>) {
        if self.seeded {
            self.selection = self.selection.normalized(&dataset);
        } else {
            let missing: Vec<&str> = self
                .default_regions
                .iter()
                .filter(|r| !dataset.regions.contains(*r))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                log::warn!("Default regions not present in the data: {missing:?}");
            }
            self.selection =
                Selection::new(self.default_regions.iter().cloned(), self.default_year_range)
                    .normalized(&dataset);
            self.seeded = true;
        }

        self.colors = Some(RegionColors::new(&dataset.regions));
        self.dataset = Some(dataset);
        self.refresh();
    }

    /// Handle one selection change and recompute the tables.
    pub fn apply(&mut self, change: SelectionChange) {
        log::debug!("selection change: {change:?}");
        match change {
            SelectionChange::ToggleRegion(region) => {
                if !self.selection.categories.remove(&region) {
                    self.selection.categories.insert(region);
                }
            }
            SelectionChange::SelectAllRegions => {
                if let Some(ds) = &self.dataset {
                    self.selection.categories = ds.regions.clone();
                }
            }
            SelectionChange::ClearRegions => self.selection.categories.clear(),
            SelectionChange::SetYearRange(min, max) => {
                self.selection.year_range = YearRange::new(min, max);
            }
        }
        if let Some(ds) = &self.dataset {
            self.selection = self.selection.normalized(ds);
        }
        self.refresh();
    }

    /// Re-run the pipeline for the current selection.
    pub fn refresh(&mut self) {
        self.output = match &self.dataset {
            Some(ds) => run_pipeline(ds, &self.selection),
            None => PipelineOutput::default(),
        };
    }

    /// Slider bounds: the observed year span of the dataset, widened to
    /// include the default window so it can be shown as selected.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let (lo, hi) = self.dataset.as_ref().and_then(|ds| ds.year_span)?;
        let (def_lo, def_hi) = self.default_year_range;
        Some((lo.min(def_lo.min(def_hi)), hi.max(def_lo.max(def_hi))))
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }
}
