use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;

use super::model::{AuctionDataset, AuctionRecord};
use crate::config::columns;
use crate::error::{LoadError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the auction dataset from a CSV file.
///
/// Required columns: `region`, `parsed_timestamp`, `adjudication_price`.
/// Every other column is kept verbatim on each record.
pub fn load_csv(path: &Path) -> Result<AuctionDataset> {
    let file = File::open(path).map_err(|e| LoadError::from_io(path, e))?;
    let dataset = read_csv(file)?;
    log::info!(
        "Loaded {} auction records from {} ({} regions, years {:?})",
        dataset.len(),
        path.display(),
        dataset.regions.len(),
        dataset.year_span
    );
    Ok(dataset)
}

/// Parse CSV content from any reader.
pub fn read_csv<R: Read>(source: R) -> Result<AuctionDataset> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let region_idx = column_index(&headers, columns::REGION)?;
    let ts_idx = column_index(&headers, columns::TIMESTAMP)?;
    let price_idx = column_index(&headers, columns::PRICE)?;

    let mut records = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = line_of(&record);

        let raw_ts = record.get(ts_idx).unwrap_or("");
        let parsed_timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::Timestamp {
            line,
            value: raw_ts.to_string(),
        })?;

        let raw_price = record.get(price_idx).unwrap_or("");
        let adjudication_price = parse_price(raw_price).map_err(|_| LoadError::Price {
            line,
            value: raw_price.to_string(),
        })?;

        let mut extra = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == region_idx || col_idx == ts_idx || col_idx == price_idx {
                continue;
            }
            if let Some(name) = headers.get(col_idx) {
                extra.insert(name.clone(), value.to_string());
            }
        }

        records.push(AuctionRecord {
            region: record.get(region_idx).unwrap_or("").to_string(),
            parsed_timestamp,
            adjudication_price,
            extra,
        });
    }

    Ok(AuctionDataset::from_records(records, headers))
}

fn column_index(headers: &[String], column: &'static str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or(LoadError::MissingColumn { column })
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Cells read as a missing value rather than a number.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// `Ok(None)` for a missing price, `Err(())` for anything that is not a
/// finite number.
fn parse_price(raw: &str) -> std::result::Result<Option<f64>, ()> {
    let s = raw.trim();
    if NA_TOKENS.contains(&s) {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(()),
    }
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a raw timestamp cell. An offset, if present, is dropped and the
/// wall-clock time kept, so the year is the one written in the cell.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
pub(crate) mod test_files {
    use std::path::PathBuf;

    /// Write `contents` to a per-process file in the OS temp directory.
    pub fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "oction-dashboard-{}-{name}.csv",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("write fixture");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::test_files::write_fixture;
    use super::*;
    use crate::data::filter::Selection;
    use crate::data::model::fixtures::ts;
    use crate::data::pivot::{run_pipeline, WideTable};

    const SAMPLE: &str = "\
lot_id,region,parsed_timestamp,adjudication_price,city
1,ile-de-france,2005-03-01,100,Paris
2,ile-de-france,2005-03-01 00:00:00,50,Paris
3,bretagne-grand-ouest,2010-01-01T00:00:00,200,Rennes
";

    #[test]
    fn reads_required_and_extra_columns() {
        let ds = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.column_names,
            vec!["lot_id", "region", "parsed_timestamp", "adjudication_price", "city"]
        );

        let first = &ds.records[0];
        assert_eq!(first.region, "ile-de-france");
        assert_eq!(first.parsed_timestamp, ts(2005, 3, 1));
        assert_eq!(first.adjudication_price, Some(100.0));
        assert_eq!(first.extra.get("city").map(String::as_str), Some("Paris"));
        assert_eq!(first.extra.get("lot_id").map(String::as_str), Some("1"));
        assert!(!first.extra.contains_key("region"));

        // All three spellings of midnight parse to the same instant.
        assert_eq!(ds.records[1].parsed_timestamp, ts(2005, 3, 1));
        assert_eq!(ds.records[2].parsed_timestamp, ts(2010, 1, 1));
    }

    #[test]
    fn keeps_time_of_day() {
        let parsed = parse_timestamp("2012-06-30 14:05:09.250").unwrap();
        assert_eq!(parsed.to_string(), "2012-06-30 14:05:09.250");

        assert_eq!(parse_timestamp(" 2012/06/30 "), Some(ts(2012, 6, 30)));
    }

    #[test]
    fn offsets_keep_the_wall_clock_time() {
        let parsed = parse_timestamp("2017-01-01T00:30:00+01:00").unwrap();
        assert_eq!(parsed.to_string(), "2017-01-01 00:30:00");

        assert_eq!(parse_timestamp("2005-03-01 00:00:00+00"), Some(ts(2005, 3, 1)));
        assert_eq!(parse_timestamp("2005-03-01T00:00:00-0500"), Some(ts(2005, 3, 1)));
        assert_eq!(
            parse_timestamp("2012-06-30 14:05:09.5+02:00").map(|t| t.to_string()),
            Some("2012-06-30 14:05:09.500".to_string())
        );
    }

    #[test]
    fn offset_timestamp_is_filtered_by_its_written_year() {
        let csv = "region,parsed_timestamp,adjudication_price\n\
                   ile-de-france,2017-01-01T00:30:00+01:00,100\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.year_span, Some((2017, 2017)));
        let out = run_pipeline(&ds, &Selection::new(["ile-de-france"], (2017, 2017)));
        assert_eq!(out.wide.row_count(), 1);
        assert_eq!(out.matched, 1);
    }

    #[test]
    fn bad_timestamp_fails_whole_load() {
        let csv = "region,parsed_timestamp,adjudication_price\n\
                   ile-de-france,2005-03-01,100\n\
                   ile-de-france,not-a-date,50\n";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::Timestamp { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected timestamp error, got {other:?}"),
        }
    }

    #[test]
    fn empty_timestamp_is_a_parse_error() {
        let csv = "region,parsed_timestamp,adjudication_price\noutre-mer,,10\n";
        assert!(matches!(
            read_csv(csv.as_bytes()),
            Err(LoadError::Timestamp { line: 2, .. })
        ));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let csv = "region,Parsed_Timestamp,adjudication_price\nx,2005-01-01,1\n";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::MissingColumn { column }) => assert_eq!(column, "parsed_timestamp"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn empty_price_is_missing_but_garbage_is_an_error() {
        let csv = "region,parsed_timestamp,adjudication_price\nx,2005-01-01,\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].adjudication_price, None);

        let csv = "region,parsed_timestamp,adjudication_price\nx,2005-01-01,12k\n";
        assert!(matches!(
            read_csv(csv.as_bytes()),
            Err(LoadError::Price { line: 2, .. })
        ));
    }

    #[test]
    fn na_tokens_are_missing_prices() {
        let csv = "region,parsed_timestamp,adjudication_price\n\
                   a,2005-01-01,NaN\n\
                   a,2005-01-01,5\n\
                   a,2005-01-01,N/A\n\
                   a,2005-01-01,null\n";
        let ds = read_csv(csv.as_bytes()).unwrap();
        let prices: Vec<_> = ds.records.iter().map(|r| r.adjudication_price).collect();
        assert_eq!(prices, vec![None, Some(5.0), None, None]);

        let out = run_pipeline(&ds, &Selection::new(["a"], (2005, 2005)));
        assert_eq!(out.wide.cells, vec![vec![5.0]]);
        assert_eq!(WideTable::from_long(&out.long), out.wide);
    }

    #[test]
    fn non_finite_prices_are_rejected() {
        for bad in ["inf", "-inf", "infinity"] {
            let csv = format!("region,parsed_timestamp,adjudication_price\na,2005-01-01,{bad}\n");
            assert!(
                matches!(read_csv(csv.as_bytes()), Err(LoadError::Price { line: 2, .. })),
                "{bad} should not load"
            );
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = std::env::temp_dir().join("oction-dashboard-does-not-exist.csv");
        assert!(matches!(load_csv(&path), Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn loads_from_disk() {
        let path = write_fixture("loader", SAMPLE);
        let ds = load_csv(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.year_span, Some((2005, 2010)));
        std::fs::remove_file(path).ok();
    }
}
