use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::domain::{
    errors::AcquisitionError,
    market_data::{DailyBar, DateRange, OHLCV, Price, PriceHistory, Symbol, Volume},
};

/// Error code the chart API uses for unknown or delisted symbols
pub const NOT_FOUND_CODE: &str = "Not Found";

/// DTO for the Yahoo Finance chart response
#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartApiError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Seconds since epoch, one per row
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    pub symbol: Option<String>,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
    #[serde(default)]
    pub adjclose: Vec<AdjCloseBlock>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdjCloseBlock {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

fn at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

impl ChartResult {
    /// Exchange-local trading date of a row
    fn row_date(&self, timestamp: i64) -> Option<NaiveDate> {
        DateTime::from_timestamp(timestamp + self.meta.gmtoffset, 0).map(|dt| dt.date_naive())
    }

    /// Converts the rows to domain bars.
    ///
    /// Rows without a close are skipped, as are rows dated outside `range`.
    /// Missing open/high/low fall back to the close, missing volume to 0.
    pub fn to_domain_bars(&self, range: DateRange) -> Vec<DailyBar> {
        let empty = QuoteBlock::default();
        let quote = self.indicators.quote.first().unwrap_or(&empty);
        let adjclose = self
            .indicators
            .adjclose
            .first()
            .map(|block| block.adjclose.as_slice())
            .unwrap_or(&[]);

        self.timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let close = at(&quote.close, i)?;
                let date = self.row_date(*ts)?;
                if !range.contains(date) {
                    return None;
                }
                let ohlcv = OHLCV::new(
                    Price::from(at(&quote.open, i).unwrap_or(close)),
                    Price::from(at(&quote.high, i).unwrap_or(close)),
                    Price::from(at(&quote.low, i).unwrap_or(close)),
                    Price::from(close),
                    Volume::from(at(&quote.volume, i).unwrap_or(0.0)),
                );
                // inconsistent high/low envelopes are provider glitches
                if !ohlcv.is_valid() {
                    return None;
                }
                Some(DailyBar::new(date, ohlcv).with_adj_close(at(adjclose, i).map(Price::from)))
            })
            .collect()
    }
}

impl ChartEnvelope {
    /// Domain history for `symbol`, or the "no data" condition when the
    /// provider knows nothing about it in `range`.
    pub fn into_history(self, symbol: &Symbol, range: DateRange) -> Result<PriceHistory, AcquisitionError> {
        let no_data = || AcquisitionError::NoData {
            symbol: symbol.clone(),
            start: range.start(),
            end: range.end(),
        };

        if let Some(error) = self.chart.error {
            if error.code == NOT_FOUND_CODE {
                return Err(no_data());
            }
            return Err(AcquisitionError::Provider {
                symbol: symbol.clone(),
                code: error.code,
                description: error.description,
            });
        }

        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(no_data)?;

        let bars = result.to_domain_bars(range);
        if bars.is_empty() {
            return Err(no_data());
        }
        Ok(PriceHistory::new(symbol.clone(), bars))
    }
}

/// Parses a chart response body
pub fn parse_chart_response(
    symbol: &Symbol,
    range: DateRange,
    body: &str,
) -> Result<PriceHistory, AcquisitionError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| AcquisitionError::Parse {
            symbol: symbol.clone(),
            message: e.to_string(),
        })?;
    envelope.into_history(symbol, range)
}
