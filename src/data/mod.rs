/// Data layer: core types, loading, caching, filtering and reshaping.
///
/// Architecture:
/// ```text
///   data/Result ….csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AuctionDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<AuctionDataset>, reloaded on clear / mtime change
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection (regions, years) → matching indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  pivot    │  sum by (timestamp, region) → WideTable → melt → LongTable
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pivot;
