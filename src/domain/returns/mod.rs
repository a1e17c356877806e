//! Cumulative returns pipeline.
//!
//! window -> business-day regularization -> day-over-day change ->
//! compounding -> percentage rescale. Every step is a pure function over
//! plain vectors so each one can be checked on its own.

pub mod calendar;

use chrono::NaiveDate;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::domain::errors::ReturnsError;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{PriceColumn, PriceField, PriceTable, Symbol};

/// Fractional day-over-day change, one value per business day.
/// `None` where the change is undefined (first day, missing or zero price).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    pub label: Symbol,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// Compounded return in percent, 0 at the start of the window.
/// `None` marks points that cannot be plotted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeReturn {
    pub label: Symbol,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl CumulativeReturn {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Last plotted value
    pub fn latest(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }
}

/// Step 1: keep points dated inside `[start, end]`.
///
/// Fails when the window selects no row at all.
pub fn window_columns(
    columns: Vec<PriceColumn>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PriceColumn>, ReturnsError> {
    if start > end {
        return Err(ReturnsError::EmptyWindow { start, end });
    }

    let windowed: Vec<PriceColumn> = columns
        .into_iter()
        .map(|column| PriceColumn {
            symbol: column.symbol,
            points: column
                .points
                .into_iter()
                .filter(|(date, _)| start <= *date && *date <= end)
                .collect(),
        })
        .collect();

    if windowed.iter().all(|c| c.points.is_empty()) {
        return Err(ReturnsError::EmptyWindow { start, end });
    }
    Ok(windowed)
}

/// Business days from the first to the last windowed row.
fn window_calendar(columns: &[PriceColumn]) -> Option<Vec<NaiveDate>> {
    let first = columns.iter().filter_map(|c| c.points.first()).map(|(d, _)| *d).min()?;
    let last = columns.iter().filter_map(|c| c.points.last()).map(|(d, _)| *d).max()?;
    let days = calendar::business_days(first, last);
    (!days.is_empty()).then_some(days)
}

/// Step 2: one price per calendar day, carrying the last known price forward.
///
/// A day takes the most recent defined price dated on or before it;
/// days before the first defined price stay `None`. `points` must be sorted.
pub fn regularize(points: &[(NaiveDate, Option<f64>)], calendar: &[NaiveDate]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(calendar.len());
    let mut cursor = 0;
    let mut last_known: Option<f64> = None;

    for day in calendar {
        while cursor < points.len() && points[cursor].0 <= *day {
            if let Some(price) = points[cursor].1 {
                last_known = Some(price);
            }
            cursor += 1;
        }
        out.push(last_known);
    }
    out
}

/// Step 3: `r[t] = p[t] / p[t-1] - 1`.
///
/// The first element has no predecessor and is `None`; so is any step
/// touching a missing or zero price.
pub fn daily_returns(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }
    out.push(None);
    for pair in prices.windows(2) {
        let change = match (pair[0], pair[1]) {
            (Some(prev), Some(curr)) if prev != 0.0 && curr != 0.0 => Some(curr / prev - 1.0),
            _ => None,
        };
        out.push(change);
    }
    out
}

/// Steps 4 and 5: running product of `1 + r`, rescaled to `c * 100 - 100`.
///
/// Undefined returns are skipped by the product. Before the first defined
/// return the output is the baseline 0; after it, an undefined return
/// yields `None` for that point only.
pub fn compound(returns: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut product = 1.0_f64;
    let mut started = false;

    returns
        .iter()
        .map(|r| match r {
            Some(r) => {
                started = true;
                product *= 1.0 + r;
                Some(product * 100.0 - 100.0)
            }
            None if !started => Some(0.0),
            None => None,
        })
        .collect()
}

fn returns_for_column(column: &PriceColumn, calendar: &[NaiveDate]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let prices = regularize(&column.points, calendar);
    let returns = daily_returns(&prices);
    (prices, returns)
}

fn cumulate_column(column: &PriceColumn, calendar: &[NaiveDate]) -> CumulativeReturn {
    let (prices, returns) = returns_for_column(column, calendar);
    let values = compound(&returns)
        .into_iter()
        .zip(&prices)
        // nothing to plot before the symbol's first known price
        .map(|(value, price)| price.and(value))
        .collect();

    CumulativeReturn {
        label: column.symbol.clone(),
        dates: calendar.to_vec(),
        values,
    }
}

fn prepare(
    table: &PriceTable,
    field: PriceField,
    visible_start: NaiveDate,
    visible_end: NaiveDate,
) -> Result<(Vec<PriceColumn>, Vec<NaiveDate>), ReturnsError> {
    let windowed = window_columns(table.columns(field), visible_start, visible_end)?;
    let calendar = window_calendar(&windowed).ok_or(ReturnsError::EmptyWindow {
        start: visible_start,
        end: visible_end,
    })?;
    Ok((windowed, calendar))
}

/// Daily return series for every symbol of `table` inside the window.
pub fn compute_daily_returns(
    table: &PriceTable,
    field: PriceField,
    visible_start: NaiveDate,
    visible_end: NaiveDate,
) -> Result<Vec<ReturnSeries>, ReturnsError> {
    let (windowed, calendar) = prepare(table, field, visible_start, visible_end)?;
    Ok(windowed
        .iter()
        .map(|column| ReturnSeries {
            label: column.symbol.clone(),
            dates: calendar.clone(),
            values: returns_for_column(column, &calendar).1,
        })
        .collect())
}

/// Cumulative percentage return for every symbol of `table` inside
/// `[visible_start, visible_end]`, in table order.
///
/// Output has one point per business day from the first to the last
/// windowed row.
pub fn compute_cumulative_returns(
    table: &PriceTable,
    field: PriceField,
    visible_start: NaiveDate,
    visible_end: NaiveDate,
) -> Result<Vec<CumulativeReturn>, ReturnsError> {
    let (windowed, calendar) = prepare(table, field, visible_start, visible_end)?;
    crate::log_trace!(
        LogComponent::Domain("Returns"),
        "{} column(s) on {} business days",
        windowed.len(),
        calendar.len()
    );

    #[cfg(feature = "parallel")]
    let series = windowed
        .par_iter()
        .map(|column| cumulate_column(column, &calendar))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let series = windowed
        .iter()
        .map(|column| cumulate_column(column, &calendar))
        .collect();

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn regularize_carries_last_known_price_over_gaps() {
        // Mon, Wed (Tue missing), Fri price missing
        let points = vec![
            (date(2024, 3, 4), Some(10.0)),
            (date(2024, 3, 6), Some(11.0)),
            (date(2024, 3, 8), None),
        ];
        let calendar = calendar::business_days(date(2024, 3, 4), date(2024, 3, 8));
        assert_eq!(
            regularize(&points, &calendar),
            vec![Some(10.0), Some(10.0), Some(11.0), Some(11.0), Some(11.0)]
        );
    }

    #[test]
    fn regularize_uses_weekend_rows_for_monday() {
        let points = vec![(date(2024, 3, 8), Some(10.0)), (date(2024, 3, 10), Some(12.0))];
        let calendar = calendar::business_days(date(2024, 3, 8), date(2024, 3, 11));
        assert_eq!(regularize(&points, &calendar), vec![Some(10.0), Some(12.0)]);
    }

    #[test]
    fn zero_price_breaks_only_adjacent_steps() {
        let returns = daily_returns(&[Some(10.0), Some(0.0), Some(5.0), Some(10.0)]);
        assert_eq!(returns, vec![None, None, None, Some(1.0)]);
    }

    #[test]
    fn compound_baselines_leading_gaps_and_drops_interior_ones() {
        let values = compound(&[None, Some(0.1), None, Some(0.1)]);
        assert_eq!(values[0], Some(0.0));
        assert!((values[1].unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(values[2], None);
        assert!((values[3].unwrap() - 21.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_window_is_empty() {
        let err = window_columns(Vec::new(), date(2024, 3, 8), date(2024, 3, 4)).unwrap_err();
        assert_eq!(
            err,
            ReturnsError::EmptyWindow { start: date(2024, 3, 8), end: date(2024, 3, 4) }
        );
    }

    #[test]
    fn latest_skips_trailing_gaps() {
        let series = CumulativeReturn {
            label: Symbol::from("QQQ"),
            dates: vec![date(2024, 3, 4), date(2024, 3, 5), date(2024, 3, 6)],
            values: vec![Some(0.0), Some(-3.5), None],
        };
        assert_eq!(series.latest(), Some(-3.5));
    }
}
