use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::errors::InputError;
use crate::domain::market_data::{DailyBar, MergedPriceTable, PriceHistory, Symbol};

/// Character that the provider's batch endpoint cannot carry inside a
/// symbol (exchange suffixes such as `005930.KS`).
pub const DEFAULT_BATCH_SEPARATOR: char = '.';

/// How a set of symbols is sent to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// One symbol, one call, no Company dimension in the result
    Single(Symbol),
    /// Several symbols handed to the provider as one batch
    Batched(Vec<Symbol>),
    /// Several symbols, at least one of them batch-unsafe: one call per
    /// symbol, issued one after another
    Individual(Vec<Symbol>),
}

impl FetchPlan {
    pub fn route(symbols: &[Symbol], separator: char) -> Result<Self, InputError> {
        match symbols {
            [] => Err(InputError::NoSymbols),
            [single] => Ok(FetchPlan::Single(single.clone())),
            many if many.iter().any(|s| s.value().contains(separator)) => {
                Ok(FetchPlan::Individual(many.to_vec()))
            }
            many => Ok(FetchPlan::Batched(many.to_vec())),
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        match self {
            FetchPlan::Single(symbol) => std::slice::from_ref(symbol),
            FetchPlan::Batched(symbols) | FetchPlan::Individual(symbols) => symbols,
        }
    }
}

/// Merges per-symbol histories into one wide table.
///
/// Each history becomes the column group of its symbol; the row index is
/// the sorted union of all dates. A symbol that occurs twice shares one
/// column group, later bars replacing earlier ones on the same date.
pub fn merge_histories(histories: Vec<PriceHistory>) -> MergedPriceTable {
    let dates: Vec<NaiveDate> = histories
        .iter()
        .flat_map(|h| h.bars().iter().map(|b| b.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut companies: Vec<Symbol> = Vec::with_capacity(histories.len());
    let mut cells: Vec<Vec<Option<DailyBar>>> = Vec::with_capacity(histories.len());

    for history in histories {
        let column = match companies.iter().position(|s| s == history.symbol()) {
            Some(existing) => existing,
            None => {
                companies.push(history.symbol().clone());
                cells.push(vec![None; dates.len()]);
                cells.len() - 1
            }
        };

        for bar in history.bars() {
            if let Ok(row) = dates.binary_search(&bar.date) {
                cells[column][row] = Some(bar.clone());
            }
        }
    }

    MergedPriceTable::from_parts(dates, companies, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{OHLCV, Price, PriceField, Volume};

    fn history(symbol: &str, days: &[(u32, f64)]) -> PriceHistory {
        let bars = days
            .iter()
            .map(|(day, close)| {
                DailyBar::new(
                    NaiveDate::from_ymd_opt(2024, 1, *day).unwrap(),
                    OHLCV::new(
                        Price::from(*close),
                        Price::from(*close),
                        Price::from(*close),
                        Price::from(*close),
                        Volume::from(1.0),
                    ),
                )
            })
            .collect();
        PriceHistory::new(Symbol::from(symbol), bars)
    }

    #[test]
    fn routing_distinguishes_single_batched_and_individual() {
        let qqq = Symbol::from("QQQ");
        let arkk = Symbol::from("ARKK");
        let samsung = Symbol::from("005930.KS");

        assert_eq!(
            FetchPlan::route(&[qqq.clone()], '.').unwrap(),
            FetchPlan::Single(qqq.clone())
        );
        assert_eq!(
            FetchPlan::route(&[qqq.clone(), arkk.clone()], '.').unwrap(),
            FetchPlan::Batched(vec![qqq.clone(), arkk.clone()])
        );
        assert_eq!(
            FetchPlan::route(&[qqq.clone(), samsung.clone()], '.').unwrap(),
            FetchPlan::Individual(vec![qqq, samsung])
        );
        assert_eq!(FetchPlan::route(&[], '.'), Err(InputError::NoSymbols));
    }

    #[test]
    fn a_single_dotted_symbol_is_still_a_single_fetch() {
        let samsung = Symbol::from("005930.KS");
        assert_eq!(
            FetchPlan::route(&[samsung.clone()], '.').unwrap(),
            FetchPlan::Single(samsung)
        );
    }

    #[test]
    fn merge_unions_dates_and_leaves_gaps_empty() {
        let table = merge_histories(vec![
            history("QQQ", &[(2, 10.0), (3, 11.0), (4, 12.0)]),
            history("005930.KS", &[(3, 70.0), (5, 72.0)]),
        ]);

        assert_eq!(table.dates().len(), 4);
        assert_eq!(table.companies(), &[Symbol::from("QQQ"), Symbol::from("005930.KS")]);

        let ks = table.column(&Symbol::from("005930.KS"), PriceField::Close).unwrap();
        let values: Vec<Option<f64>> = ks.points.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![None, Some(70.0), None, Some(72.0)]);
        assert_eq!(table.rows().count(), 5);
    }

    #[test]
    fn merge_keeps_close_columns_independent() {
        let table = merge_histories(vec![
            history("QQQ", &[(2, 10.0)]),
            history("ARKK", &[(2, 50.0)]),
        ]);
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(
            table.cell(day, &Symbol::from("QQQ")).unwrap().value(PriceField::Close),
            Some(10.0)
        );
        assert_eq!(
            table.cell(day, &Symbol::from("ARKK")).unwrap().value(PriceField::Close),
            Some(50.0)
        );
    }
}
