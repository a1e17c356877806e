mod common;

use std::collections::HashSet;

use common::{MockRepository, march, range, two_symbol_repository};
use futures::executor::block_on;
use stock_returns_wasm::application::use_cases::PriceAcquisition;
use stock_returns_wasm::domain::{
    errors::{AcquisitionError, AppError, InputError},
    market_data::{PriceTable, Symbol},
};

fn symbols(names: &[&str]) -> Vec<Symbol> {
    names.iter().map(|n| Symbol::from(*n)).collect()
}

#[test]
fn single_symbol_has_no_company_dimension() {
    let acquisition = PriceAcquisition::new(two_symbol_repository());
    let outcome = block_on(acquisition.fetch(&symbols(&["QQQ"]), range(march(4), march(8)))).unwrap();

    assert!(matches!(*outcome.table, PriceTable::Single(_)));
    assert_eq!(outcome.table.companies(), None);
    assert_eq!(outcome.table.row_count(), 5);
    assert_eq!(acquisition.repository().calls(), vec!["history:QQQ"]);
}

#[test]
fn several_symbols_merge_into_unique_company_rows() {
    let acquisition = PriceAcquisition::new(two_symbol_repository());
    let outcome =
        block_on(acquisition.fetch(&symbols(&["QQQ", "ARKK"]), range(march(4), march(11)))).unwrap();

    let PriceTable::Merged(merged) = outcome.table.as_ref() else {
        panic!("expected a merged table");
    };
    assert_eq!(merged.companies(), &symbols(&["QQQ", "ARKK"])[..]);
    assert!(merged.dates().windows(2).all(|w| w[0] < w[1]));

    let pairs: Vec<_> = merged.rows().map(|(d, s, _)| (d, s.clone())).collect();
    let unique: HashSet<_> = pairs.iter().cloned().collect();
    assert_eq!(pairs.len(), 12);
    assert_eq!(unique.len(), pairs.len());
}

#[test]
fn plain_symbols_go_out_as_one_batch() {
    let acquisition = PriceAcquisition::new(two_symbol_repository());
    block_on(acquisition.fetch(&symbols(&["QQQ", "ARKK"]), range(march(4), march(8)))).unwrap();
    assert_eq!(acquisition.repository().calls(), vec!["batch:QQQ,ARKK"]);
}

#[test]
fn separator_in_any_symbol_forces_individual_calls() {
    let repository = two_symbol_repository().with("005930.KS", &[(march(4), 70000.0), (march(5), 71000.0)]);
    let acquisition = PriceAcquisition::new(repository);

    let outcome = block_on(acquisition.fetch(
        &symbols(&["QQQ", "005930.KS"]),
        range(march(4), march(8)),
    ))
    .unwrap();

    assert_eq!(
        acquisition.repository().calls(),
        vec!["history:QQQ", "history:005930.KS"]
    );
    assert_eq!(outcome.table.companies().map(<[Symbol]>::len), Some(2));
}

#[test]
fn custom_separator_changes_routing() {
    let acquisition = PriceAcquisition::new(two_symbol_repository()).with_batch_separator('-');
    block_on(acquisition.fetch(&symbols(&["QQQ", "BRK-B"]), range(march(4), march(8)))).ok();
    assert_eq!(acquisition.repository().calls(), vec!["history:QQQ", "history:BRK-B"]);
}

#[test]
fn unknown_symbol_fails_the_whole_request() {
    let acquisition = PriceAcquisition::new(two_symbol_repository());
    let err = block_on(acquisition.fetch(&symbols(&["QQQ", "ZZZZ"]), range(march(4), march(8))))
        .unwrap_err();

    assert_eq!(
        err,
        AppError::Acquisition(AcquisitionError::NoData {
            symbol: Symbol::from("ZZZZ"),
            start: march(4),
            end: march(8),
        })
    );
    assert_eq!(err.kind(), "no-data");
    assert_eq!(acquisition.cached_tables(), 0);
}

#[test]
fn range_without_rows_is_no_data() {
    let acquisition = PriceAcquisition::new(two_symbol_repository());
    let err = block_on(acquisition.fetch(&symbols(&["QQQ"]), range(march(18), march(22)))).unwrap_err();
    assert_eq!(err.kind(), "no-data");
}

#[test]
fn empty_symbol_list_is_rejected_before_any_call() {
    let acquisition = PriceAcquisition::new(MockRepository::new());
    let err = block_on(acquisition.fetch(&[], range(march(4), march(8)))).unwrap_err();
    assert_eq!(err, AppError::Input(InputError::NoSymbols));
    assert!(acquisition.repository().calls().is_empty());
}

#[test]
fn tables_are_memoized_per_symbols_and_range() {
    let acquisition = PriceAcquisition::new(two_symbol_repository());
    let qqq = symbols(&["QQQ"]);

    let first = block_on(acquisition.fetch(&qqq, range(march(4), march(8)))).unwrap();
    let second = block_on(acquisition.fetch(&qqq, range(march(4), march(8)))).unwrap();
    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert!(std::rc::Rc::ptr_eq(&first.table, &second.table));
    assert_eq!(acquisition.repository().calls().len(), 1);

    block_on(acquisition.fetch(&qqq, range(march(4), march(11)))).unwrap();
    assert_eq!(acquisition.repository().calls().len(), 2);
    assert!(acquisition.is_cached(&qqq, range(march(4), march(11))));

    acquisition.clear_cache();
    assert_eq!(acquisition.cached_tables(), 0);
}
