use state_scatter::models::Field;
use state_scatter::stats::{field_summary, summarize};
use state_scatter::storage;

#[test]
fn summary_of_fixture() {
    let rows =
        storage::load_csv(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/three_states.csv"))
            .unwrap();
    let all = field_summary(&rows);
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].field, Field::Poverty);

    let income = summarize(&rows, Field::Income);
    assert_eq!(income.count, 3);
    assert_eq!(income.min, Some(40000.0));
    assert_eq!(income.max, Some(60000.0));
    assert_eq!(income.mean, Some(50000.0));
    assert_eq!(income.median, Some(50000.0));
}

#[test]
fn empty_summary_has_no_values() {
    let s = summarize(&[], Field::Age);
    assert_eq!(s.count, 0);
    assert_eq!(s.min, None);
    assert_eq!(s.median, None);
}
