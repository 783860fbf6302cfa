use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDateTime};

// ---------------------------------------------------------------------------
// AuctionRecord – one row of the source CSV
// ---------------------------------------------------------------------------

/// A single auction event.
#[derive(Debug, Clone, PartialEq)]
pub struct AuctionRecord {
    pub region: String,
    pub parsed_timestamp: NaiveDateTime,
    /// `None` when the source cell is empty.
    pub adjudication_price: Option<f64>,
    /// Every other source column, verbatim: column_name → raw cell.
    pub extra: BTreeMap<String, String>,
}

impl AuctionRecord {
    pub fn new(region: impl Into<String>, parsed_timestamp: NaiveDateTime, price: f64) -> Self {
        AuctionRecord {
            region: region.into(),
            parsed_timestamp,
            adjudication_price: Some(price),
            extra: BTreeMap::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.parsed_timestamp.year()
    }
}

// ---------------------------------------------------------------------------
// AuctionDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AuctionDataset {
    /// All records, in file order.
    pub records: Vec<AuctionRecord>,
    /// Source header, in file order.
    pub column_names: Vec<String>,
    /// Sorted set of distinct regions.
    pub regions: BTreeSet<String>,
    /// Observed (min, max) year, `None` for an empty dataset.
    pub year_span: Option<(i32, i32)>,
}

impl AuctionDataset {
    /// Build indices from the loaded records.
    pub fn from_records(records: Vec<AuctionRecord>, column_names: Vec<String>) -> Self {
        let regions: BTreeSet<String> = records.iter().map(|r| r.region.clone()).collect();

        let years = records.iter().map(AuctionRecord::year);
        let year_span = years.clone().min().zip(years.max());

        AuctionDataset {
            records,
            column_names,
            regions,
            year_span,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
