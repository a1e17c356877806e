use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::market_data::Symbol;

/// Rejected user input. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Enter at least one ticker symbol")]
    NoSymbols,
    #[error("Ticker symbol cannot be empty")]
    EmptySymbol,
    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Unknown period '{0}'")]
    UnknownPeriod(String),
}

/// Failures of the market-data provider or of its payloads.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcquisitionError {
    #[error("No data for {symbol} between {start} and {end} (delisted or invalid ticker?)")]
    NoData {
        symbol: Symbol,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Request for {symbol} failed: {message}")]
    Http { symbol: Symbol, message: String },
    #[error("Provider rejected {symbol}: {code} {description}")]
    Provider {
        symbol: Symbol,
        code: String,
        description: String,
    },
    #[error("Malformed data for {symbol}: {message}")]
    Parse { symbol: Symbol, message: String },
}

/// Failures of the returns pipeline that abort the current render pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnsError {
    #[error("No prices between {start} and {end}; widen the selected range")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Malformed(String),
}

/// Root error type; its Display text is what the status line shows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error(transparent)]
    Returns(#[from] ReturnsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Rendering Error: {0}")]
    Rendering(String),
}

impl AppError {
    /// Short tag for log lines and notifications
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Input(_) => "input",
            AppError::Acquisition(AcquisitionError::NoData { .. }) => "no-data",
            AppError::Acquisition(_) => "network",
            AppError::Returns(ReturnsError::EmptyWindow { .. }) => "empty-window",
            AppError::Config(_) => "config",
            AppError::Rendering(_) => "rendering",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
