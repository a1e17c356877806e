use crate::domain::errors::AcquisitionError;
use crate::domain::market_data::{DateRange, PriceHistory, Symbol};

/// Upstream market-data provider.
///
/// Implementations return bars for trading dates inside `range`
/// (inclusive). A symbol without any bar in range is reported as
/// [`AcquisitionError::NoData`] rather than as an empty history.
#[allow(async_fn_in_trait)]
pub trait PriceHistoryRepository {
    /// Daily history for one symbol
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        range: DateRange,
    ) -> Result<PriceHistory, AcquisitionError>;

    /// Histories for several symbols in one provider round, in input order.
    /// The default issues the single-symbol calls one after another.
    async fn fetch_batch(
        &self,
        symbols: &[Symbol],
        range: DateRange,
    ) -> Result<Vec<PriceHistory>, AcquisitionError> {
        let mut histories = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            histories.push(self.fetch_history(symbol, range).await?);
        }
        Ok(histories)
    }
}
