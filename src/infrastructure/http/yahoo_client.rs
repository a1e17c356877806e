use chrono::{NaiveDate, NaiveTime};
use futures::future::try_join_all;

use super::dto::parse_chart_response;
use super::{GlooHttpClient, HttpResponseText, HttpUtils};
use crate::domain::{
    errors::AcquisitionError,
    logging::LogComponent,
    market_data::{DateRange, PriceHistory, PriceHistoryRepository, Symbol},
};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Daily history from the Yahoo Finance chart API
#[derive(Debug, Clone)]
pub struct YahooChartClient {
    http: GlooHttpClient,
}

impl Default for YahooChartClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl YahooChartClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: GlooHttpClient::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Chart endpoint for `symbol`. The range end is inclusive, so the
    /// upper bound is midnight UTC of the following day.
    pub fn chart_endpoint(symbol: &Symbol, range: DateRange) -> String {
        let end = range.end().succ_opt().unwrap_or(range.end());
        HttpUtils::build_url_with_params(
            &format!("/v8/finance/chart/{}", HttpUtils::url_encode(symbol.value())),
            &[
                ("period1", unix_midnight(range.start()).to_string()),
                ("period2", unix_midnight(end).to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ],
        )
    }

    /// Maps a raw response to a history. A body that is not a chart
    /// payload is reported as an HTTP failure when the status says so.
    pub fn decode(
        symbol: &Symbol,
        range: DateRange,
        response: &HttpResponseText,
    ) -> Result<PriceHistory, AcquisitionError> {
        match parse_chart_response(symbol, range, &response.body) {
            Err(AcquisitionError::Parse { .. }) if !HttpUtils::is_success_status(response.status) => {
                Err(AcquisitionError::Http {
                    symbol: symbol.clone(),
                    message: format!("HTTP {}", response.status),
                })
            }
            other => other,
        }
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

impl PriceHistoryRepository for YahooChartClient {
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        range: DateRange,
    ) -> Result<PriceHistory, AcquisitionError> {
        let endpoint = Self::chart_endpoint(symbol, range);
        let response = self
            .http
            .get_text(&endpoint)
            .await
            .map_err(|message| AcquisitionError::Http {
                symbol: symbol.clone(),
                message,
            })?;

        let history = Self::decode(symbol, range, &response)?;
        crate::log_info!(
            LogComponent::Infrastructure("YahooChartClient"),
            "{}: {} bars",
            symbol,
            history.len()
        );
        Ok(history)
    }

    /// All symbols requested at once; fails with the first error.
    async fn fetch_batch(
        &self,
        symbols: &[Symbol],
        range: DateRange,
    ) -> Result<Vec<PriceHistory>, AcquisitionError> {
        try_join_all(symbols.iter().map(|symbol| self.fetch_history(symbol, range))).await
    }
}
