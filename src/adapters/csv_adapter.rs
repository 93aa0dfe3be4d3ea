//! CSV file market-data adapter.
//!
//! One file per instrument, `<base_path>/<CODE>.csv`, with a header row and
//! columns `date,open,high,low,close,volume` (dates as `YYYY-MM-DD`).

use crate::domain::error::BandtraderError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<&'r str, BandtraderError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| BandtraderError::Data {
            reason: format!("missing {} column", name),
        })
}

fn parse_field<T>(record: &csv::StringRecord, idx: usize, name: &str) -> Result<T, BandtraderError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    field(record, idx, name)?
        .parse()
        .map_err(|e| BandtraderError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

/// Volumes are whole units but some feeds write them as floats.
fn parse_volume(record: &csv::StringRecord) -> Result<i64, BandtraderError> {
    parse_field::<i64>(record, 5, "volume")
        .or_else(|_| parse_field::<f64>(record, 5, "volume").map(|v| v.round() as i64))
}

/// Parses CSV content for `code`. Bars come back sorted by date.
pub fn parse_bars(code: &str, content: &str) -> Result<Vec<PriceBar>, BandtraderError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut bars = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| BandtraderError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;

        let date = NaiveDate::parse_from_str(field(&record, 0, "date")?, "%Y-%m-%d").map_err(
            |e| BandtraderError::Data {
                reason: format!("invalid date format: {}", e),
            },
        )?;

        bars.push(PriceBar {
            code: code.to_string(),
            date,
            open: parse_field(&record, 1, "open")?,
            high: parse_field(&record, 2, "high")?,
            low: parse_field(&record, 3, "low")?,
            close: parse_field(&record, 4, "close")?,
            volume: parse_volume(&record)?,
        });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

impl MarketDataPort for CsvAdapter {
    fn fetch_bars(&self, code: &str) -> Result<Vec<PriceBar>, BandtraderError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| BandtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        parse_bars(code, &content)
    }

    fn list_instruments(&self) -> Result<Vec<String>, BandtraderError> {
        let entries = fs::read_dir(&self.base_path)?;
        let mut codes: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        codes.sort();
        Ok(codes)
    }
}
