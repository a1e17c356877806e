use super::value_objects::{Color, SERIES_PALETTE};
use crate::domain::returns::CumulativeReturn;
use chrono::NaiveDate;

pub const CHART_TITLE: &str = "Cumulative Returns";

/// One plotted line
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub color: Color,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
    /// Last plotted value, shown in the legend
    pub latest: Option<f64>,
}

impl ChartSeries {
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Domain entity - the cumulative returns chart
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsChart {
    pub title: String,
    pub series: Vec<ChartSeries>,
}

impl ReturnsChart {
    pub fn from_returns(returns: Vec<CumulativeReturn>) -> Self {
        let series = returns
            .into_iter()
            .enumerate()
            .map(|(i, r)| ChartSeries {
                label: r.label.value().to_string(),
                color: SERIES_PALETTE[i % SERIES_PALETTE.len()],
                latest: r.latest(),
                dates: r.dates,
                values: r.values,
            })
            .collect();

        Self { title: CHART_TITLE.to_string(), series }
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.series.iter().filter_map(|s| s.dates.first()).min()?;
        let last = self.series.iter().filter_map(|s| s.dates.last()).max()?;
        Some((*first, *last))
    }

    /// Smallest and largest plotted value across all series
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(None, |acc, v| match acc {
                None => Some((*v, *v)),
                Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
            })
    }
}
