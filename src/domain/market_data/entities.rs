pub use super::value_objects::{OHLCV, Price, PriceField, Symbol, Volume};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Domain entity - one trading day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub ohlcv: OHLCV,
    /// Split/dividend adjusted close as reported upstream, if any
    pub adj_close: Option<Price>,
}

impl DailyBar {
    pub fn new(date: NaiveDate, ohlcv: OHLCV) -> Self {
        Self { date, ohlcv, adj_close: None }
    }

    pub fn with_adj_close(mut self, adj_close: Option<Price>) -> Self {
        self.adj_close = adj_close;
        self
    }

    pub fn value(&self, field: PriceField) -> Option<f64> {
        let value = match field {
            PriceField::Open => self.ohlcv.open.value(),
            PriceField::High => self.ohlcv.high.value(),
            PriceField::Low => self.ohlcv.low.value(),
            PriceField::Close => self.ohlcv.close.value(),
            PriceField::AdjClose => self.adj_close?.value(),
            PriceField::Volume => self.ohlcv.volume.value(),
        };
        value.is_finite().then_some(value)
    }
}

/// A single column of a price table, addressable per symbol
#[derive(Debug, Clone, PartialEq)]
pub struct PriceColumn {
    pub symbol: Symbol,
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

/// Domain entity - daily history of one symbol, sorted by date, one bar per date
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    symbol: Symbol,
    bars: Vec<DailyBar>,
}

impl PriceHistory {
    pub fn new(symbol: Symbol, bars: Vec<DailyBar>) -> Self {
        let mut history = Self { symbol, bars: Vec::with_capacity(bars.len()) };
        for bar in bars {
            history.add_bar(bar);
        }
        history
    }

    /// Adds a bar, replacing any existing bar for the same date
    pub fn add_bar(&mut self, bar: DailyBar) {
        if let Some(last) = self.bars.last_mut() {
            if last.date == bar.date {
                *last = bar;
                return;
            }
            if bar.date < last.date {
                self.insert_bar_sorted(bar);
                return;
            }
        }
        self.bars.push(bar);
    }

    fn insert_bar_sorted(&mut self, bar: DailyBar) {
        let insert_pos = self.bars.partition_point(|b| b.date < bar.date);
        if insert_pos < self.bars.len() && self.bars[insert_pos].date == bar.date {
            self.bars[insert_pos] = bar;
        } else {
            self.bars.insert(insert_pos, bar);
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.bars.first()?.date, self.bars.last()?.date))
    }

    pub fn column(&self, field: PriceField) -> PriceColumn {
        PriceColumn {
            symbol: self.symbol.clone(),
            points: self.bars.iter().map(|b| (b.date, b.value(field))).collect(),
        }
    }
}

/// Wide table keyed by date with one column group per company.
///
/// `cells[c][d]` holds company `c` on `dates[d]`; a company without a bar
/// on a date has `None` there. Dates are strictly increasing and companies
/// are unique, so every (date, company) pair occurs at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPriceTable {
    dates: Vec<NaiveDate>,
    companies: Vec<Symbol>,
    cells: Vec<Vec<Option<DailyBar>>>,
}

impl MergedPriceTable {
    pub(crate) fn from_parts(
        dates: Vec<NaiveDate>,
        companies: Vec<Symbol>,
        cells: Vec<Vec<Option<DailyBar>>>,
    ) -> Self {
        debug_assert_eq!(companies.len(), cells.len());
        debug_assert!(cells.iter().all(|c| c.len() == dates.len()));
        Self { dates, companies, cells }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn companies(&self) -> &[Symbol] {
        &self.companies
    }

    pub fn cell(&self, date: NaiveDate, company: &Symbol) -> Option<&DailyBar> {
        let c = self.companies.iter().position(|s| s == company)?;
        let d = self.dates.binary_search(&date).ok()?;
        self.cells[c][d].as_ref()
    }

    /// `field` for `company`, one entry per table date
    pub fn column(&self, company: &Symbol, field: PriceField) -> Option<PriceColumn> {
        let c = self.companies.iter().position(|s| s == company)?;
        let points = self
            .dates
            .iter()
            .zip(&self.cells[c])
            .map(|(date, bar)| (*date, bar.as_ref().and_then(|b| b.value(field))))
            .collect();
        Some(PriceColumn { symbol: company.clone(), points })
    }

    /// Long-form rows `(date, company, bar)` for every populated cell
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &Symbol, &DailyBar)> + '_ {
        self.dates.iter().enumerate().flat_map(move |(d, date)| {
            self.companies
                .iter()
                .zip(&self.cells)
                .filter_map(move |(company, cells)| cells[d].as_ref().map(|bar| (*date, company, bar)))
        })
    }
}

/// Result of an acquisition: a plain history for one symbol, or a merged
/// wide table when several symbols were requested.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceTable {
    Single(PriceHistory),
    Merged(MergedPriceTable),
}

impl PriceTable {
    /// Company labels of a merged table; `None` for a single-symbol table
    pub fn companies(&self) -> Option<&[Symbol]> {
        match self {
            PriceTable::Single(_) => None,
            PriceTable::Merged(table) => Some(table.companies()),
        }
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        match self {
            PriceTable::Single(history) => vec![history.symbol().clone()],
            PriceTable::Merged(table) => table.companies().to_vec(),
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        match self {
            PriceTable::Single(history) => history.bars().iter().map(|b| b.date).collect(),
            PriceTable::Merged(table) => table.dates().to_vec(),
        }
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            PriceTable::Single(history) => history.date_range(),
            PriceTable::Merged(table) => {
                Some((*table.dates().first()?, *table.dates().last()?))
            }
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            PriceTable::Single(history) => history.len(),
            PriceTable::Merged(table) => table.dates().len(),
        }
    }

    /// One column per symbol, in table order
    pub fn columns(&self, field: PriceField) -> Vec<PriceColumn> {
        match self {
            PriceTable::Single(history) => vec![history.column(field)],
            PriceTable::Merged(table) => table
                .companies()
                .iter()
                .filter_map(|company| table.column(company, field))
                .collect(),
        }
    }
}
