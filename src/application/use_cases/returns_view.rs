use chrono::NaiveDate;

use super::price_acquisition::{FetchOutcome, PriceAcquisition};
use crate::domain::{
    chart::ReturnsChart,
    errors::AppResult,
    logging::{LogComponent, get_logger},
    market_data::{DateRange, PriceField, PriceHistoryRepository, PriceTable, Symbol},
    returns::compute_cumulative_returns,
};

/// What to load: the symbol set and the outer date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub symbols: Vec<Symbol>,
    pub range: DateRange,
}

/// Loads the table for `request`, hitting the network only for a symbol
/// set and range not seen before in this session.
pub async fn refetch<R>(acquisition: &PriceAcquisition<R>, request: &FetchRequest) -> AppResult<FetchOutcome>
where
    R: PriceHistoryRepository,
{
    get_logger().info(
        LogComponent::Application("Refetch"),
        &format!(
            "{} from {} to {}",
            request
                .symbols
                .iter()
                .map(Symbol::value)
                .collect::<Vec<_>>()
                .join(" "),
            request.range.start(),
            request.range.end()
        ),
    );
    acquisition.fetch(&request.symbols, request.range).await
}

/// Cumulative returns chart for the visible window of an already loaded table.
pub fn recompute(
    table: &PriceTable,
    field: PriceField,
    visible_start: NaiveDate,
    visible_end: NaiveDate,
) -> AppResult<ReturnsChart> {
    let returns = compute_cumulative_returns(table, field, visible_start, visible_end)?;
    crate::log_debug!(
        LogComponent::Application("Recompute"),
        "{} series over {}..{}",
        returns.len(),
        visible_start,
        visible_end
    );
    Ok(ReturnsChart::from_returns(returns))
}
