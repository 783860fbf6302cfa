use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

#[allow(dead_code)]
#[path = "../config.rs"]
mod config;

/// One output row. Field order is the CSV column order.
#[derive(Debug, Serialize)]
struct AuctionRow<'a> {
    lot_id: u64,
    region: &'a str,
    city: &'a str,
    parsed_timestamp: String,
    adjudication_price: f64,
}

/// Region, a city in it, and its median price in euros.
const REGIONS: [(&str, &str, f64); 8] = [
    ("ile-de-france", "Paris", 310_000.0),
    ("outre-mer", "Saint-Denis", 95_000.0),
    ("centre-loire-limousin", "Orléans", 80_000.0),
    ("bretagne-grand-ouest", "Rennes", 120_000.0),
    ("sud-ouest-pyrenees", "Toulouse", 140_000.0),
    ("sud-est-mediterrannee", "Marseille", 190_000.0),
    ("nord-est", "Lille", 90_000.0),
    ("rhone-alpes-auvergne", "Lyon", 170_000.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_u64() % u64::from(hi - lo + 1)) as u32
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DATA_PATH));

    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let lots = write_sample(&output_path)?;
    println!("Wrote {lots} auction lots to {}", output_path.display());
    Ok(())
}

/// Write the synthetic dataset to `path`, returning the number of lots.
fn write_sample(path: &Path) -> Result<u64> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut rng = SimpleRng::new(42);
    let mut lot_id: u64 = 0;

    for year in 1995..=2024 {
        // Prices drift upward roughly 3% a year from 1995.
        let trend = 1.03_f64.powi(year - 1995);

        for &(region, city, median) in &REGIONS {
            // A handful of auction sessions per region and year, several lots each.
            let sessions = rng.range(2, 6);
            for _ in 0..sessions {
                let month = rng.range(1, 12);
                let day = rng.range(1, 28);
                let hour = rng.range(9, 16);
                let timestamp = NaiveDate::from_ymd_opt(year, month, day)
                    .and_then(|d| d.and_hms_opt(hour, 0, 0))
                    .context("generated an invalid date")?;

                for _ in 0..rng.range(1, 4) {
                    let price =
                        (median * trend * rng.gauss(0.0, 0.35).exp() / 100.0).round() * 100.0;
                    lot_id += 1;
                    writer.serialize(AuctionRow {
                        lot_id,
                        region,
                        city,
                        parsed_timestamp: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                        adjudication_price: price,
                    })?;
                }
            }
        }
    }

    writer.flush().context("flushing CSV")?;
    Ok(lot_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_has_the_columns_the_dashboard_reads() {
        let path = std::env::temp_dir().join(format!(
            "oction-dashboard-{}-generated.csv",
            std::process::id()
        ));
        let lots = write_sample(&path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        for column in [config::columns::REGION, config::columns::TIMESTAMP, config::columns::PRICE] {
            assert!(headers.iter().any(|h| h == column), "missing {column}");
        }
        assert_eq!(reader.records().count() as u64, lots);

        // Every default region gets auctions.
        let text = std::fs::read_to_string(&path).unwrap();
        for region in config::DEFAULT_REGIONS {
            assert!(text.contains(&format!(",{region},")), "no rows for {region}");
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn same_seed_same_file() {
        let dir = std::env::temp_dir();
        let a = dir.join(format!("oction-dashboard-{}-gen-a.csv", std::process::id()));
        let b = dir.join(format!("oction-dashboard-{}-gen-b.csv", std::process::id()));
        write_sample(&a).unwrap();
        write_sample(&b).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
        std::fs::remove_file(a).ok();
        std::fs::remove_file(b).ok();
    }
}
