#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;
use stock_returns_wasm::domain::{
    errors::AcquisitionError,
    market_data::{
        DailyBar, DateRange, OHLCV, Price, PriceHistory, PriceHistoryRepository, Symbol, Volume,
    },
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// March 2024: the 4th is a Monday
pub fn march(d: u32) -> NaiveDate {
    date(2024, 3, d)
}

pub fn bar(date: NaiveDate, close: f64) -> DailyBar {
    DailyBar::new(
        date,
        OHLCV::new(
            Price::from(close),
            Price::from(close),
            Price::from(close),
            Price::from(close),
            Volume::from(1000.0),
        ),
    )
}

pub fn history(symbol: &str, closes: &[(NaiveDate, f64)]) -> PriceHistory {
    PriceHistory::new(
        Symbol::from(symbol),
        closes.iter().map(|(d, c)| bar(*d, *c)).collect(),
    )
}

/// In-memory provider recording every call it receives
#[derive(Default)]
pub struct MockRepository {
    closes: HashMap<Symbol, Vec<(NaiveDate, f64)>>,
    pub calls: RefCell<Vec<String>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: &str, closes: &[(NaiveDate, f64)]) -> Self {
        self.closes.insert(Symbol::from(symbol), closes.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn history_in(&self, symbol: &Symbol, range: DateRange) -> PriceHistory {
        let closes: Vec<(NaiveDate, f64)> = self
            .closes
            .get(symbol)
            .map(|rows| rows.iter().copied().filter(|(d, _)| range.contains(*d)).collect())
            .unwrap_or_default();
        history(symbol.value(), &closes)
    }
}

impl PriceHistoryRepository for MockRepository {
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        range: DateRange,
    ) -> Result<PriceHistory, AcquisitionError> {
        self.calls.borrow_mut().push(format!("history:{}", symbol));
        Ok(self.history_in(symbol, range))
    }

    async fn fetch_batch(
        &self,
        symbols: &[Symbol],
        range: DateRange,
    ) -> Result<Vec<PriceHistory>, AcquisitionError> {
        let names: Vec<&str> = symbols.iter().map(Symbol::value).collect();
        self.calls.borrow_mut().push(format!("batch:{}", names.join(",")));
        Ok(symbols.iter().map(|s| self.history_in(s, range)).collect())
    }
}

/// QQQ and ARKK over the first two March 2024 weeks
pub fn two_symbol_repository() -> MockRepository {
    MockRepository::new()
        .with(
            "QQQ",
            &[
                (march(4), 100.0),
                (march(5), 102.0),
                (march(6), 101.0),
                (march(7), 103.0),
                (march(8), 104.0),
                (march(11), 105.0),
            ],
        )
        .with(
            "ARKK",
            &[
                (march(4), 50.0),
                (march(5), 49.0),
                (march(6), 51.0),
                (march(7), 52.0),
                (march(8), 50.0),
                (march(11), 48.0),
            ],
        )
}

pub fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).unwrap()
}
