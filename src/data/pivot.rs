use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;

use super::filter::{filtered_indices, Selection};
use super::model::AuctionDataset;

// ---------------------------------------------------------------------------
// WideTable – timestamp × region matrix of summed prices
// ---------------------------------------------------------------------------

/// Aggregated prices: one row per distinct timestamp (newest first), one
/// column per region (sorted by name). Absent combinations hold `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub regions: Vec<String>,
    /// `cells[row][col]` – row indexes `timestamps`, col indexes `regions`.
    pub cells: Vec<Vec<f64>>,
}

impl WideTable {
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Cell lookup by key, `None` if either key is absent.
    #[cfg(test)]
    pub fn value(&self, timestamp: NaiveDateTime, region: &str) -> Option<f64> {
        let row = self.timestamps.iter().position(|t| *t == timestamp)?;
        let col = self.regions.iter().position(|r| r == region)?;
        Some(self.cells[row][col])
    }

    /// Pivot an arbitrary stream of (timestamp, region, value) triples.
    /// Duplicate keys are summed.
    fn from_triples<'a, I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDateTime, &'a str, f64)>,
    {
        let mut sums: BTreeMap<NaiveDateTime, BTreeMap<&'a str, f64>> = BTreeMap::new();
        let mut regions: BTreeSet<&'a str> = BTreeSet::new();

        for (ts, region, value) in triples {
            regions.insert(region);
            *sums.entry(ts).or_default().entry(region).or_insert(0.0) += value;
        }

        let regions: Vec<String> = regions.into_iter().map(str::to_string).collect();
        let mut timestamps = Vec::with_capacity(sums.len());
        let mut cells = Vec::with_capacity(sums.len());

        for (ts, by_region) in sums.into_iter().rev() {
            timestamps.push(ts);
            cells.push(
                regions
                    .iter()
                    .map(|r| by_region.get(r.as_str()).copied().unwrap_or(0.0))
                    .collect(),
            );
        }

        WideTable {
            timestamps,
            regions,
            cells,
        }
    }

    /// Rebuild a wide table from its long form.
    pub fn from_long(long: &LongTable) -> Self {
        Self::from_triples(
            long.rows
                .iter()
                .map(|r| (r.parsed_timestamp, r.region.as_str(), r.adjudication_price)),
        )
    }
}

/// Group the selected records by exact `(parsed_timestamp, region)` and sum
/// their prices. Timestamps are not truncated to years.
pub fn pivot(dataset: &AuctionDataset, indices: &[usize]) -> WideTable {
    WideTable::from_triples(indices.iter().map(|&i| {
        let rec = &dataset.records[i];
        (
            rec.parsed_timestamp,
            rec.region.as_str(),
            rec.adjudication_price.unwrap_or(0.0),
        )
    }))
}

// ---------------------------------------------------------------------------
// LongTable – one row per (timestamp, region) for charting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub parsed_timestamp: NaiveDateTime,
    pub region: String,
    pub adjudication_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongTable {
    pub rows: Vec<LongRow>,
}

impl LongTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of one region, in table order.
    pub fn series<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a LongRow> + 'a {
        self.rows.iter().filter(move |r| r.region == region)
    }
}

/// Unpivot column by column: every timestamp of the first region, then the
/// next region, each in the wide table's row order.
pub fn melt(wide: &WideTable) -> LongTable {
    let mut rows = Vec::with_capacity(wide.timestamps.len() * wide.regions.len());
    for (col, region) in wide.regions.iter().enumerate() {
        for (row, ts) in wide.timestamps.iter().enumerate() {
            rows.push(LongRow {
                parsed_timestamp: *ts,
                region: region.clone(),
                adjudication_price: wide.cells[row][col],
            });
        }
    }
    LongTable { rows }
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub wide: WideTable,
    pub long: LongTable,
    /// Number of records that passed the filter.
    pub matched: usize,
}

/// Filter → pivot → sort → melt. Pure: `dataset` is never modified.
pub fn run_pipeline(dataset: &AuctionDataset, selection: &Selection) -> PipelineOutput {
    let indices = filtered_indices(dataset, selection);
    let wide = pivot(dataset, &indices);
    let long = melt(&wide);
    log::debug!(
        "pipeline: {} records matched, {} timestamps x {} regions",
        indices.len(),
        wide.row_count(),
        wide.regions.len()
    );
    PipelineOutput {
        wide,
        long,
        matched: indices.len(),
    }
}
