//! Three known states through load → scales → marker positions → axis switch.

use state_scatter::models::Axis;
use state_scatter::view::{ChartLayout, LABEL_OFFSET_PX, Margin};
use state_scatter::{AxisField, AxisSelection, ViewModel, XField, YField, storage};

fn fixture() -> Vec<state_scatter::StateRecord> {
    storage::load_csv(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/three_states.csv"))
        .unwrap()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

// 770 x 670 canvas with interactive margins leaves a 600 x 400 plotting area.
fn layout() -> ChartLayout {
    ChartLayout::new(770.0, 670.0, Margin::INTERACTIVE)
}

#[test]
fn initial_scales_and_marker_pixels() {
    let records = fixture();
    let view = ViewModel::interactive(&records, layout(), AxisSelection::default()).unwrap();

    assert_close(view.x_scale.domain.0, 8.0);
    assert_close(view.x_scale.domain.1, 24.0);
    assert_eq!(view.x_scale.range, (0.0, 600.0));
    assert_close(view.y_scale.domain.0, 4.0);
    assert_close(view.y_scale.domain.1, 24.0);
    assert_eq!(view.y_scale.range, (400.0, 0.0));

    let expected = [("AL", 75.0, 380.0), ("AK", 262.5, 280.0), ("AZ", 450.0, 80.0)];
    let markers = view.markers(&records);
    assert_eq!(markers.len(), 3);
    for (m, (abbr, cx, cy)) in markers.iter().zip(expected) {
        assert_eq!(m.abbr, abbr);
        assert_close(m.cx, cx);
        assert_close(m.cy, cy);
        assert_close(m.text_x, cx);
        assert_close(m.text_y, cy + LABEL_OFFSET_PX);
    }

    // Canvas position of the first marker
    let (x, y) = view.layout.to_canvas((markers[0].cx, markers[0].cy));
    assert_close(x, 205.0);
    assert_close(y, 400.0);
}

#[test]
fn domain_is_padded_extent_for_every_field() {
    let records = fixture();
    let view = ViewModel::interactive(&records, layout(), AxisSelection::default()).unwrap();
    for &x in [XField::Poverty, XField::Age, XField::Income].iter() {
        let v = view.select_x(&records, x).unwrap().view;
        let vals: Vec<f64> = records.iter().map(|r| x.value(r)).collect();
        let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(v.x_scale.domain, (min * 0.8, max * 1.2));
    }
    for &y in [YField::Healthcare, YField::Smokes, YField::Obesity].iter() {
        let v = view.select_y(&records, y).unwrap().view;
        let vals: Vec<f64> = records.iter().map(|r| y.value(r)).collect();
        let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(v.y_scale.domain, (min * 0.8, max * 1.2));
    }
}

#[test]
fn switching_axes_moves_every_marker() {
    let records = fixture();
    let view = ViewModel::interactive(&records, layout(), AxisSelection::default()).unwrap();

    let update = view.select_x(&records, XField::Income).unwrap();
    assert_eq!(update.changed, Some(Axis::X));
    let view = update.view;
    // income 40000..60000 → domain 32000..72000
    assert_close(view.x_scale.domain.0, 32000.0);
    assert_close(view.x_scale.domain.1, 72000.0);

    let update = view.select_y(&records, YField::Smokes).unwrap();
    assert_eq!(update.changed, Some(Axis::Y));
    let view = update.view;

    for (m, r) in view.markers(&records).iter().zip(&records) {
        assert_eq!(m.cx, view.x_scale.apply(r.income));
        assert_eq!(m.cy, view.y_scale.apply(r.smokes));
    }

    let tip = view.tooltip(&records[1]);
    assert_eq!(tip.lines, vec!["Alaska", "Median Income: 60000", "Smokes: 18"]);
}
