use std::collections::BTreeSet;

use super::model::{AuctionDataset, AuctionRecord};

// ---------------------------------------------------------------------------
// Selection: which regions and which years are shown
// ---------------------------------------------------------------------------

/// Inclusive year window. `min <= max` once normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// User selection: an empty `categories` set selects nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub categories: BTreeSet<String>,
    pub year_range: YearRange,
}

impl Selection {
    pub fn new<I, S>(categories: I, year_range: (i32, i32)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection {
            categories: categories.into_iter().map(Into::into).collect(),
            year_range: YearRange::new(year_range.0, year_range.1),
        }
    }

    /// Restrict to regions present in `dataset`. The year window is left as
    /// is: a window outside the observed span is valid and selects nothing.
    pub fn normalized(&self, dataset: &AuctionDataset) -> Selection {
        Selection {
            categories: self
                .categories
                .intersection(&dataset.regions)
                .cloned()
                .collect(),
            year_range: YearRange::new(self.year_range.min, self.year_range.max),
        }
    }

    pub fn matches(&self, record: &AuctionRecord) -> bool {
        self.categories.contains(&record.region) && self.year_range.contains(record.year())
    }
}

/// Return indices of records that pass the selection, in file order.
pub fn filtered_indices(dataset: &AuctionDataset, selection: &Selection) -> Vec<usize> {
    if selection.categories.is_empty() {
        return Vec::new();
    }
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
