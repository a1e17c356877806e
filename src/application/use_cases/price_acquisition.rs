use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::domain::{
    errors::{AcquisitionError, AppResult},
    logging::{LogComponent, LogLevel, get_logger},
    market_data::{
        DEFAULT_BATCH_SEPARATOR, DateRange, FetchPlan, PriceHistory, PriceHistoryRepository,
        PriceTable, Symbol, merge_histories,
    },
};

/// Cache key: the symbol list as requested and the outer date range
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub symbols: Vec<Symbol>,
    pub range: DateRange,
}

/// Result of [`PriceAcquisition::fetch`]
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub table: Rc<PriceTable>,
    pub from_cache: bool,
}

/// Data acquisition adapter.
///
/// Sends symbols to the provider the way [`FetchPlan`] routes them, merges
/// multi-symbol results into one table and memoizes every table for the
/// rest of the session. Tables are shared read-only through `Rc`.
pub struct PriceAcquisition<R> {
    repository: R,
    batch_separator: char,
    cache: RefCell<HashMap<FetchKey, Rc<PriceTable>>>,
}

impl<R> PriceAcquisition<R>
where
    R: PriceHistoryRepository,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            batch_separator: DEFAULT_BATCH_SEPARATOR,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_batch_separator(mut self, separator: char) -> Self {
        self.batch_separator = separator;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn is_cached(&self, symbols: &[Symbol], range: DateRange) -> bool {
        self.cache.borrow().contains_key(&FetchKey {
            symbols: symbols.to_vec(),
            range,
        })
    }

    pub fn cached_tables(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Price table for `symbols` over `range`, from the cache when possible.
    ///
    /// One symbol yields [`PriceTable::Single`]; several yield a
    /// [`PriceTable::Merged`] with one company per symbol in input order.
    /// Any symbol without data fails the whole request.
    pub async fn fetch(&self, symbols: &[Symbol], range: DateRange) -> AppResult<FetchOutcome> {
        let plan = FetchPlan::route(symbols, self.batch_separator)?;
        let key = FetchKey {
            symbols: symbols.to_vec(),
            range,
        };

        let cached = self.cache.borrow().get(&key).cloned();
        if let Some(table) = cached {
            get_logger().debug(
                LogComponent::Application("PriceAcquisition"),
                &format!("cache hit for {} symbol(s)", symbols.len()),
            );
            return Ok(FetchOutcome {
                table,
                from_cache: true,
            });
        }

        let table = Rc::new(self.fetch_plan(&plan, range).await?);

        get_logger().log_with_metadata(
            LogLevel::Info,
            LogComponent::Application("PriceAcquisition"),
            &format!("loaded {} rows", table.row_count()),
            &format!(
                "plan={} range={}..{}",
                plan_name(&plan),
                range.start(),
                range.end()
            ),
        );

        self.cache.borrow_mut().insert(key, Rc::clone(&table));
        Ok(FetchOutcome {
            table,
            from_cache: false,
        })
    }

    async fn fetch_plan(&self, plan: &FetchPlan, range: DateRange) -> AppResult<PriceTable> {
        match plan {
            FetchPlan::Single(symbol) => {
                let history = self.repository.fetch_history(symbol, range).await?;
                Ok(PriceTable::Single(require_rows(history, range)?))
            }
            FetchPlan::Batched(symbols) => {
                let histories = self.repository.fetch_batch(symbols, range).await?;
                let histories = histories
                    .into_iter()
                    .map(|h| require_rows(h, range))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(PriceTable::Merged(merge_histories(histories)))
            }
            FetchPlan::Individual(symbols) => {
                let mut histories = Vec::with_capacity(symbols.len());
                for symbol in symbols {
                    let history = self.repository.fetch_history(symbol, range).await?;
                    histories.push(require_rows(history, range)?);
                }
                Ok(PriceTable::Merged(merge_histories(histories)))
            }
        }
    }
}

fn require_rows(history: PriceHistory, range: DateRange) -> Result<PriceHistory, AcquisitionError> {
    if history.is_empty() {
        return Err(AcquisitionError::NoData {
            symbol: history.symbol().clone(),
            start: range.start(),
            end: range.end(),
        });
    }
    Ok(history)
}

fn plan_name(plan: &FetchPlan) -> &'static str {
    match plan {
        FetchPlan::Single(_) => "single",
        FetchPlan::Batched(_) => "batched",
        FetchPlan::Individual(_) => "individual",
    }
}
