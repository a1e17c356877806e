use chrono::{Datelike, Months, NaiveDate};
use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::domain::errors::InputError;

/// Value Object - Price
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - Volume
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - one day of OHLCV data
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct OHLCV {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

impl OHLCV {
    /// Checks the high/low envelope and a non-negative volume
    pub fn is_valid(&self) -> bool {
        self.high >= self.open
            && self.high >= self.close
            && self.high >= self.low
            && self.low <= self.open
            && self.low <= self.close
            && self.volume.value() >= 0.0
    }
}

/// Value Object - ticker symbol, always upper-case
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display, Serialize, Deserialize,
)]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: String) -> Result<Self, InputError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(InputError::EmptySymbol);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

/// Parses the free-text ticker box.
///
/// Symbols are separated by whitespace or commas, upper-cased, and
/// de-duplicated keeping the first occurrence.
pub fn parse_tickers(text: &str) -> Result<Vec<Symbol>, InputError> {
    let mut symbols: Vec<Symbol> = Vec::new();
    for raw in text.split(|c: char| c.is_whitespace() || c == ',') {
        if raw.is_empty() {
            continue;
        }
        let symbol = Symbol::new(raw.to_string())?;
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(InputError::NoSymbols);
    }
    Ok(symbols)
}

/// Column selector for a price table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    #[strum(serialize = "Adj Close")]
    AdjClose,
    Volume,
}

impl Default for PriceField {
    fn default() -> Self {
        PriceField::Close
    }
}

/// Inclusive calendar range, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InputError> {
        if end < start {
            return Err(InputError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Parses a `YYYY-MM-DD` date as produced by `<input type="date">`
pub fn parse_date(text: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| InputError::InvalidDate(text.to_string()))
}

/// Period presets offered in the sidebar
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString,
    AsRefStr, Serialize, Deserialize,
)]
pub enum PeriodPreset {
    #[default]
    #[strum(serialize = "YTD")]
    #[serde(rename = "YTD")]
    YearToDate,
    #[strum(serialize = "3 Months")]
    #[serde(rename = "3 Months")]
    ThreeMonths,
    #[strum(serialize = "6 Months")]
    #[serde(rename = "6 Months")]
    SixMonths,
    #[strum(serialize = "1 Year")]
    #[serde(rename = "1 Year")]
    OneYear,
    #[strum(serialize = "2 Years")]
    #[serde(rename = "2 Years")]
    TwoYears,
    #[strum(serialize = "3 Years")]
    #[serde(rename = "3 Years")]
    ThreeYears,
}

impl PeriodPreset {
    /// Parses a preset by its display label, e.g. `"6 Months"`
    pub fn parse(label: &str) -> Result<Self, InputError> {
        label
            .parse()
            .map_err(|_| InputError::UnknownPeriod(label.to_string()))
    }

    fn months_back(&self) -> Option<u32> {
        match self {
            Self::YearToDate => None,
            Self::ThreeMonths => Some(3),
            Self::SixMonths => Some(6),
            Self::OneYear => Some(12),
            Self::TwoYears => Some(24),
            Self::ThreeYears => Some(36),
        }
    }

    /// First day of the period ending `today`.
    ///
    /// YTD starts on January 2nd, or on `today` itself when that is earlier;
    /// the others step back whole calendar months, clamping the day to the
    /// end of the target month.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        match self.months_back() {
            None => NaiveDate::from_ymd_opt(today.year(), 1, 2)
                .map_or(today, |jan_2| jan_2.min(today)),
            Some(months) => today
                .checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tickers_split_on_whitespace_and_commas() {
        let symbols = parse_tickers("qqq  arkk,005930.ks\tspy").unwrap();
        let names: Vec<&str> = symbols.iter().map(|s| s.value()).collect();
        assert_eq!(names, vec!["QQQ", "ARKK", "005930.KS", "SPY"]);
    }

    #[test]
    fn duplicate_tickers_keep_first_occurrence() {
        let symbols = parse_tickers("QQQ arkk qqq").unwrap();
        assert_eq!(symbols, vec![Symbol::from("QQQ"), Symbol::from("ARKK")]);
    }

    #[test]
    fn blank_ticker_text_is_rejected() {
        assert_eq!(parse_tickers("  , "), Err(InputError::NoSymbols));
    }

    #[test]
    fn date_range_rejects_end_before_start() {
        let err = DateRange::new(date(2024, 5, 2), date(2024, 5, 1)).unwrap_err();
        assert_eq!(
            err,
            InputError::EndBeforeStart {
                start: date(2024, 5, 2),
                end: date(2024, 5, 1)
            }
        );
        assert!(DateRange::new(date(2024, 5, 1), date(2024, 5, 1)).is_ok());
    }

    #[test]
    fn presets_step_back_calendar_months() {
        let today = date(2024, 8, 31);
        assert_eq!(PeriodPreset::YearToDate.start_date(today), date(2024, 1, 2));
        assert_eq!(PeriodPreset::ThreeMonths.start_date(today), date(2024, 5, 31));
        assert_eq!(PeriodPreset::SixMonths.start_date(today), date(2024, 2, 29));
        assert_eq!(PeriodPreset::OneYear.start_date(today), date(2023, 8, 31));
        assert_eq!(PeriodPreset::ThreeYears.start_date(today), date(2021, 8, 31));
    }

    #[test]
    fn presets_round_trip_through_their_labels() {
        let labels: Vec<String> = PeriodPreset::iter().map(|p| p.to_string()).collect();
        assert_eq!(
            labels,
            vec!["YTD", "3 Months", "6 Months", "1 Year", "2 Years", "3 Years"]
        );
        for label in labels {
            assert_eq!(PeriodPreset::parse(&label).unwrap().to_string(), label);
        }
    }

    #[test]
    fn unknown_period_label_is_an_input_error() {
        assert_eq!(
            PeriodPreset::parse("5 Weeks"),
            Err(InputError::UnknownPeriod("5 Weeks".to_string()))
        );
    }

    #[test]
    fn year_to_date_never_starts_after_today() {
        let new_year = date(2025, 1, 1);
        assert_eq!(PeriodPreset::YearToDate.start_date(new_year), new_year);
        assert!(DateRange::new(PeriodPreset::YearToDate.start_date(new_year), new_year).is_ok());
        assert_eq!(PeriodPreset::YearToDate.start_date(date(2025, 1, 2)), date(2025, 1, 2));
    }

    #[test]
    fn html_dates_parse() {
        assert_eq!(parse_date("2024-03-15").unwrap(), date(2024, 3, 15));
        assert!(matches!(parse_date("15/03/2024"), Err(InputError::InvalidDate(_))));
    }
}
