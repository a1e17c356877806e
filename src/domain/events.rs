use chrono::NaiveDate;
use std::fmt::Debug;

use crate::domain::market_data::{PeriodPreset, PriceField, Symbol};

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
}

/// One user interaction with the dashboard controls
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// Raw text of the ticker input
    TickersEdited(String),
    PeriodSelected(PeriodPreset),
    StartDatePicked(NaiveDate),
    EndDatePicked(NaiveDate),
    FieldSelected(PriceField),
    /// Slider handles, as indexes into the loaded dates
    WindowMoved { low: usize, high: usize },
}

impl DomainEvent for DashboardEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::TickersEdited(_) => "TickersEdited",
            DashboardEvent::PeriodSelected(_) => "PeriodSelected",
            DashboardEvent::StartDatePicked(_) => "StartDatePicked",
            DashboardEvent::EndDatePicked(_) => "EndDatePicked",
            DashboardEvent::FieldSelected(_) => "FieldSelected",
            DashboardEvent::WindowMoved { .. } => "WindowMoved",
        }
    }
}

/// Outcomes of talking to the market-data provider
#[derive(Debug, Clone, PartialEq)]
pub enum MarketDataEvent {
    PricesLoaded {
        symbols: Vec<Symbol>,
        rows: usize,
        from_cache: bool,
    },
    LoadFailed {
        kind: &'static str,
        message: String,
    },
}

impl DomainEvent for MarketDataEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MarketDataEvent::PricesLoaded { .. } => "PricesLoaded",
            MarketDataEvent::LoadFailed { .. } => "LoadFailed",
        }
    }
}
