use std::path::PathBuf;

/// Source file read at startup, relative to the working directory.
pub const DATA_PATH: &str = "data/Result 2025-01-07 12-40-19.csv";

/// Column names the pipeline depends on. Exact, case-sensitive match.
pub mod columns {
    pub const REGION: &str = "region";
    pub const TIMESTAMP: &str = "parsed_timestamp";
    pub const PRICE: &str = "adjudication_price";
}

/// Regions pre-selected in the region picker.
pub const DEFAULT_REGIONS: [&str; 6] = [
    "ile-de-france",
    "outre-mer",
    "centre-loire-limousin",
    "bretagne-grand-ouest",
    "sud-ouest-pyrenees",
    "sud-est-mediterrannee",
];

/// Year window selected on startup (inclusive).
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2000, 2016);

/// Chart height in points.
pub const CHART_HEIGHT: f32 = 320.0;

pub const PAGE_TITLE: &str = "Oction Database";

pub const PAGE_DESCRIPTION: &str = "This app visualizes data from a real estate auction dataset. \
It shows the performance of different regions over the years. Just click on the widgets below \
to explore!";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub default_regions: Vec<String>,
    pub default_year_range: (i32, i32),
    pub chart_height: f32,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DATA_PATH),
            default_regions: DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect(),
            default_year_range: DEFAULT_YEAR_RANGE,
            chart_height: CHART_HEIGHT,
            window_size: [1200.0, 900.0],
            min_window_size: [600.0, 400.0],
        }
    }
}
