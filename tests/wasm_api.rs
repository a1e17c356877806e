mod common;

use common::two_symbol_repository;
use futures::executor::block_on;
use serde_json::Value;
use stock_returns_wasm::application::use_cases::PriceAcquisition;
use stock_returns_wasm::presentation::wasm_api::cumulative_returns_json;

#[test]
fn json_has_one_object_per_symbol() {
    let acquisition = PriceAcquisition::new(two_symbol_repository());
    let json = block_on(cumulative_returns_json(&acquisition, "qqq arkk", "2024-03-04", "2024-03-08"))
        .unwrap();

    let parsed: Value = serde_json::from_str(&json).unwrap();
    let series = parsed.as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["label"], "QQQ");
    assert_eq!(series[1]["label"], "ARKK");
    assert_eq!(series[0]["dates"][0], "2024-03-04");
    assert_eq!(series[0]["dates"].as_array().unwrap().len(), 5);
    assert_eq!(series[0]["values"][0].as_f64(), Some(0.0));
    assert!((series[0]["values"][1].as_f64().unwrap() - 2.0).abs() < 1e-9);
}

#[test]
fn bad_input_is_rejected_before_fetching() {
    let acquisition = PriceAcquisition::new(two_symbol_repository());
    let err = block_on(cumulative_returns_json(&acquisition, "QQQ", "2024-03-08", "2024-03-04"))
        .unwrap_err();
    assert_eq!(err.kind(), "input");

    let err = block_on(cumulative_returns_json(&acquisition, "QQQ", "March 4", "2024-03-08"))
        .unwrap_err();
    assert_eq!(err.kind(), "input");
    assert!(acquisition.repository().calls().is_empty());
}
