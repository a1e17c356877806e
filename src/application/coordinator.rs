use chrono::NaiveDate;

use super::use_cases::FetchRequest;
use crate::domain::{
    errors::AppResult,
    events::{DashboardEvent, DomainEvent},
    logging::LogComponent,
    market_data::{DateRange, PeriodPreset, PriceField, PriceTable, parse_tickers},
};
use crate::view_state::ViewState;

/// What the UI has to do after an event
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Symbol set or outer range changed: load (or reuse) a table
    Refetch(FetchRequest),
    /// Only the view changed: rerun the returns pipeline on the loaded table
    Recompute {
        field: PriceField,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Nothing to do yet, e.g. the slider moved before any data arrived
    Idle,
}

/// Dashboard controls and the explicit event dispatch over them.
///
/// Every event maps to exactly one [`Command`]. The new control value is
/// stored before it is validated, so input that cannot be turned into a
/// request is returned as an error and keeps failing later refetches until
/// that control is corrected.
#[derive(Debug, Clone)]
pub struct DashboardCoordinator {
    today: NaiveDate,
    tickers: String,
    period: PeriodPreset,
    start: NaiveDate,
    end: NaiveDate,
    field: PriceField,
    view: ViewState,
}

impl DashboardCoordinator {
    pub fn new(today: NaiveDate, tickers: &str, period: PeriodPreset) -> Self {
        Self {
            today,
            tickers: tickers.to_string(),
            period,
            start: period.start_date(today),
            end: today,
            field: PriceField::default(),
            view: ViewState::default(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn tickers(&self) -> &str {
        &self.tickers
    }

    pub fn period(&self) -> PeriodPreset {
        self.period
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn field(&self) -> PriceField {
        self.field
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Request built from the current controls
    pub fn fetch_request(&self) -> AppResult<FetchRequest> {
        Ok(FetchRequest {
            symbols: parse_tickers(&self.tickers)?,
            range: DateRange::new(self.start, self.end)?,
        })
    }

    pub fn dispatch(&mut self, event: DashboardEvent) -> AppResult<Command> {
        crate::log_debug!(LogComponent::Application("Dashboard"), "event {}", event.event_type());

        match event {
            DashboardEvent::TickersEdited(text) => {
                self.tickers = text;
                self.refetch()
            }
            DashboardEvent::PeriodSelected(period) => {
                self.period = period;
                self.start = period.start_date(self.today);
                self.end = self.today;
                self.refetch()
            }
            DashboardEvent::StartDatePicked(date) => {
                self.start = date;
                self.refetch()
            }
            DashboardEvent::EndDatePicked(date) => {
                self.end = date;
                self.refetch()
            }
            DashboardEvent::FieldSelected(field) => {
                self.field = field;
                Ok(self.recompute())
            }
            DashboardEvent::WindowMoved { low, high } => {
                self.view.move_handles(low, high);
                Ok(self.recompute())
            }
        }
    }

    /// A table arrived: rebind the slider to its dates and show all of them.
    pub fn on_table_loaded(&mut self, table: &PriceTable) -> Command {
        self.view.reset(table.dates());
        self.recompute()
    }

    /// The load failed: nothing is plotted, so the slider has no dates to move over.
    pub fn on_load_failed(&mut self) {
        self.view.reset(Vec::new());
    }

    fn refetch(&self) -> AppResult<Command> {
        self.fetch_request().map(Command::Refetch)
    }

    fn recompute(&self) -> Command {
        match self.view.visible_range() {
            Some((start, end)) => Command::Recompute {
                field: self.field,
                start,
                end,
            },
            None => Command::Idle,
        }
    }
}
