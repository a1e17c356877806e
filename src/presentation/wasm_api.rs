use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::application::use_cases::{FetchRequest, PriceAcquisition, refetch};
use crate::domain::{
    errors::{AppError, AppResult},
    logging::{LogComponent, get_logger},
    market_data::{DateRange, PriceField, PriceHistoryRepository, parse_date, parse_tickers},
    returns::compute_cumulative_returns,
};
use crate::infrastructure::{config::AppConfig, http::YahooChartClient};

// One acquisition adapter per page, so JS callers share the session cache
thread_local! {
    static ACQUISITION: Rc<PriceAcquisition<YahooChartClient>> = {
        let config = AppConfig::load_from_document();
        Rc::new(
            PriceAcquisition::new(YahooChartClient::new(config.base_url))
                .with_batch_separator(config.batch_separator),
        )
    };
}

/// Cumulative close-to-close returns of `tickers` over `[start, end]`
/// as a JSON array of `{label, dates, values}` objects.
pub async fn cumulative_returns_json<R>(
    acquisition: &PriceAcquisition<R>,
    tickers: &str,
    start: &str,
    end: &str,
) -> AppResult<String>
where
    R: PriceHistoryRepository,
{
    let request = FetchRequest {
        symbols: parse_tickers(tickers)?,
        range: DateRange::new(parse_date(start)?, parse_date(end)?)?,
    };
    let outcome = refetch(acquisition, &request).await?;
    let series = compute_cumulative_returns(
        &outcome.table,
        PriceField::Close,
        request.range.start(),
        request.range.end(),
    )?;
    serde_json::to_string(&series).map_err(|e| AppError::Rendering(e.to_string()))
}

/// JS entry point. Resolves with the parsed JSON array, rejects with the
/// error message.
#[wasm_bindgen(js_name = cumulativeReturns)]
pub fn cumulative_returns(tickers: String, start: String, end: String) -> Promise {
    let acquisition = ACQUISITION.with(Rc::clone);

    future_to_promise(async move {
        match cumulative_returns_json(&acquisition, &tickers, &start, &end).await {
            Ok(json) => js_sys::JSON::parse(&json),
            Err(e) => {
                get_logger().error(
                    LogComponent::Presentation("WasmApi"),
                    &format!("cumulativeReturns failed [{}]: {}", e.kind(), e),
                );
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    })
}
