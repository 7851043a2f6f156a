//! Clock runoff CSV import
//!
//! Reads the grouped runoff export
//! (`qtr_bucket,time_bucket,score_bucket,play_type_detail,mean,count`)
//! into `ClockRow`s. Thin buckets and play details the engine never looks
//! up (e.g. `pass_intercepted`, `qb_kneel`) are skipped.

use anyhow::{Context, Result};
use gridiron_core::engine::ClockRow;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Rows need strictly more samples than this to be imported.
pub const DEFAULT_MIN_COUNT: u64 = 10;

#[derive(Debug, Deserialize)]
struct RawClockRow {
    qtr_bucket: String,
    time_bucket: String,
    score_bucket: String,
    play_type_detail: String,
    mean: f64,
    count: u64,
}

/// CSV import statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClockImportStats {
    pub total_rows: u32,
    pub imported: u32,
    pub below_min_count: u32,
    pub unknown_label: u32,
    pub failed: u32,
}

/// Bucket labels share the engine's serde names.
fn parse_label<T: DeserializeOwned>(label: &str) -> Option<T> {
    let de: StrDeserializer<'_, ValueError> = label.trim().into_deserializer();
    T::deserialize(de).ok()
}

impl RawClockRow {
    fn into_clock_row(self) -> Option<ClockRow> {
        Some(ClockRow {
            qtr_bucket: parse_label(&self.qtr_bucket)?,
            time_bucket: parse_label(&self.time_bucket)?,
            score_bucket: parse_label(&self.score_bucket)?,
            play_type_detail: parse_label(&self.play_type_detail)?,
            mean: self.mean,
        })
    }
}

/// Parse runoff rows from any reader (header row required).
pub fn read_clock_csv<R: Read>(reader: R, min_count: u64) -> Result<(Vec<ClockRow>, ClockImportStats)> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    let mut stats = ClockImportStats::default();

    for (i, record) in reader.deserialize::<RawClockRow>().enumerate() {
        stats.total_rows += 1;
        // +2: 1-based, after the header
        let line = i + 2;
        let raw = match record {
            Ok(raw) => raw,
            Err(e) => {
                stats.failed += 1;
                log::warn!("Line {line} - unreadable clock row: {e}");
                continue;
            }
        };

        if raw.count <= min_count {
            stats.below_min_count += 1;
            continue;
        }
        if !(raw.mean.is_finite() && raw.mean > 0.0) {
            stats.failed += 1;
            log::warn!("Line {line} - invalid mean runoff: {}", raw.mean);
            continue;
        }

        let detail = raw.play_type_detail.clone();
        match raw.into_clock_row() {
            Some(row) => {
                rows.push(row);
                stats.imported += 1;
            }
            None => {
                stats.unknown_label += 1;
                log::debug!("Line {line} - skipping bucket '{detail}'");
            }
        }
    }

    Ok((rows, stats))
}

/// Parse a runoff CSV file.
pub fn parse_clock_csv(csv_path: &Path, min_count: u64) -> Result<(Vec<ClockRow>, ClockImportStats)> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;
    read_clock_csv(file, min_count)
        .with_context(|| format!("Failed to parse clock CSV: {}", csv_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridiron_core::engine::clock::{PlayDetail, QuarterBucket, ScoreBucket, TimeBucket};

    const SAMPLE: &str = "\
qtr_bucket,time_bucket,score_bucket,play_type_detail,mean,count
OT,high,tied,pass_complete,31.2,54
Q4,low,leading_big,run,38.9,402
Q4,low,trailing_close,pass_incomplete,5.6,311
regulation,high,tied,pass_intercepted,12.0,77
regulation,mid,tied,punt,9.1,8
regulation,high,leading_close,field_goal,abc,90
";

    #[test]
    fn test_imports_known_rows() {
        let (rows, stats) = read_clock_csv(SAMPLE.as_bytes(), DEFAULT_MIN_COUNT).unwrap();

        assert_eq!(stats.total_rows, 6);
        assert_eq!(stats.imported, 3);
        assert_eq!(stats.unknown_label, 1);
        assert_eq!(stats.below_min_count, 1);
        assert_eq!(stats.failed, 1);

        assert_eq!(rows[0].qtr_bucket, QuarterBucket::Overtime);
        assert_eq!(rows[1].qtr_bucket, QuarterBucket::Fourth);
        assert_eq!(rows[1].time_bucket, TimeBucket::Low);
        assert_eq!(rows[1].score_bucket, ScoreBucket::LeadingBig);
        assert_eq!(rows[1].play_type_detail, PlayDetail::Run);
        assert!((rows[1].mean - 38.9).abs() < 1e-9);
        assert_eq!(rows[2].play_type_detail, PlayDetail::PassIncomplete);
    }

    #[test]
    fn test_min_count_is_exclusive() {
        let csv = "\
qtr_bucket,time_bucket,score_bucket,play_type_detail,mean,count
regulation,high,tied,run,36.0,10
regulation,high,tied,punt,8.0,11
";
        let (rows, stats) = read_clock_csv(csv.as_bytes(), 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].play_type_detail, PlayDetail::Punt);
        assert_eq!(stats.below_min_count, 1);

        let (rows, _) = read_clock_csv(csv.as_bytes(), 0).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_rows_feed_clock_table() {
        let (rows, _) = read_clock_csv(SAMPLE.as_bytes(), DEFAULT_MIN_COUNT).unwrap();
        let table = gridiron_core::ClockTable::from_rows(&rows);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = parse_clock_csv(Path::new("/nonexistent/clock_runoff.csv"), 10);
        assert!(result.is_err());
    }
}
