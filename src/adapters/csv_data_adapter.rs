//! CSV file market data adapter.
//!
//! Serves the most recent `window` bars for a symbol from
//! `<base_path>/<SYMBOL>.csv` with the header
//! `timestamp,open,high,low,close,volume` (RFC 3339 timestamps). Used for
//! replay runs and integration tests; reads are local so the port timeout is
//! trivially satisfied.

use crate::domain::bar::PriceBar;
use crate::domain::error::TradeLoopError;
use crate::ports::market_data_port::MarketDataPort;
use chrono::DateTime;
use std::path::PathBuf;
use std::time::Duration;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn parse_field(
        symbol: &str,
        record: &csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<f64, TradeLoopError> {
        record
            .get(index)
            .ok_or_else(|| TradeLoopError::FetchFailed {
                symbol: symbol.to_string(),
                reason: format!("missing {} column", name),
            })?
            .parse()
            .map_err(|e| TradeLoopError::FetchFailed {
                symbol: symbol.to_string(),
                reason: format!("invalid {} value: {}", name, e),
            })
    }
}

impl MarketDataPort for CsvDataAdapter {
    fn fetch_ohlc(
        &self,
        symbol: &str,
        window: usize,
        _timeout: Duration,
    ) -> Result<Vec<PriceBar>, TradeLoopError> {
        let path = self.csv_path(symbol);
        let mut reader =
            csv::Reader::from_path(&path).map_err(|e| TradeLoopError::FetchFailed {
                symbol: symbol.to_string(),
                reason: format!("failed to open {}: {}", path.display(), e),
            })?;

        let mut bars = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| TradeLoopError::FetchFailed {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp_str =
                record.get(0).ok_or_else(|| TradeLoopError::FetchFailed {
                    symbol: symbol.to_string(),
                    reason: "missing timestamp column".into(),
                })?;
            let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
                .map_err(|e| TradeLoopError::FetchFailed {
                    symbol: symbol.to_string(),
                    reason: format!("invalid timestamp: {}", e),
                })?
                .to_utc();

            bars.push(PriceBar {
                timestamp,
                open: Self::parse_field(symbol, &record, 1, "open")?,
                high: Self::parse_field(symbol, &record, 2, "high")?,
                low: Self::parse_field(symbol, &record, 3, "low")?,
                close: Self::parse_field(symbol, &record, 4, "close")?,
                volume: Self::parse_field(symbol, &record, 5, "volume")?,
            });
        }

        if bars.len() > window {
            bars.drain(..bars.len() - window);
        }
        Ok(bars)
    }
}
