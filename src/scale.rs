//! Linear scales mapping a field's numeric domain onto a pixel range.

use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;

use crate::error::ScaleError;
use crate::models::{AxisField, Field, StateRecord, XField, YField};

/// Lower padding factor applied to the observed minimum.
pub const DOMAIN_PAD_LOW: f64 = 0.8;
/// Upper padding factor applied to the observed maximum.
pub const DOMAIN_PAD_HIGH: f64 = 1.2;

/// A continuous linear map from `domain` to `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map a domain value to the range.
    ///
    /// A degenerate domain (both ends equal) maps everything to the middle of the range.
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let t = if d1 - d0 == 0.0 { 0.5 } else { (v - d0) / (d1 - d0) };
        let (r0, r1) = self.range;
        r0 + t * (r1 - r0)
    }

    /// Scale whose domain and range lie `t` of the way from `self` to `to`.
    pub fn lerp(&self, to: &LinearScale, t: f64) -> LinearScale {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        LinearScale {
            domain: (mix(self.domain.0, to.domain.0), mix(self.domain.1, to.domain.1)),
            range: (mix(self.range.0, to.range.0), mix(self.range.1, to.range.1)),
        }
    }

    /// At most `count` evenly spaced, human-friendly tick values inside the domain.
    ///
    /// Steps are 1, 2 or 5 times a power of ten, as chosen by plotters for its axes.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }
        RangedCoordf64::from(lo..hi).key_points(count)
    }

    /// Distance between consecutive values returned by [`ticks`](Self::ticks).
    pub fn tick_step(&self, count: usize) -> f64 {
        match self.ticks(count).as_slice() {
            [a, b, ..] => snap_nice(b - a),
            _ => 0.0,
        }
    }
}

/// Round a tick spacing to the 1-2-5 value it approximates.
fn snap_nice(raw: f64) -> f64 {
    if !(raw > 0.0 && raw.is_finite()) {
        return 0.0;
    }
    let pow = 10f64.powf(raw.log10().floor());
    let mantissa = raw / pow;
    let nice = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .min_by(|a: &f64, b: &f64| (a - mantissa).abs().total_cmp(&(b - mantissa).abs()))
        .unwrap_or(1.0);
    nice * pow
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Observed `(min, max)` of `field` across `records`.
pub fn extent_domain(records: &[StateRecord], field: Field) -> Result<(f64, f64), ScaleError> {
    let mut values = records.iter().map(|r| field.value(r));
    let first = values.next().ok_or(ScaleError::Empty(field))?;
    Ok(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Observed extent widened to `[min * 0.8, max * 1.2]`.
pub fn padded_domain(records: &[StateRecord], field: Field) -> Result<(f64, f64), ScaleError> {
    let (lo, hi) = extent_domain(records, field)?;
    Ok((lo * DOMAIN_PAD_LOW, hi * DOMAIN_PAD_HIGH))
}

/// Horizontal scale for the chosen X field, mapped to `[0, width]`.
pub fn x_scale(
    records: &[StateRecord],
    field: XField,
    width: f64,
) -> Result<LinearScale, ScaleError> {
    Ok(LinearScale::new(padded_domain(records, field.field())?, (0.0, width)))
}

/// Vertical scale for the chosen Y field, mapped to `[height, 0]` so larger values plot higher.
pub fn y_scale(
    records: &[StateRecord],
    field: YField,
    height: f64,
) -> Result<LinearScale, ScaleError> {
    Ok(LinearScale::new(padded_domain(records, field.field())?, (height, 0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(poverty: f64, healthcare: f64) -> StateRecord {
        StateRecord {
            state: "S".into(),
            abbr: "S".into(),
            poverty,
            income: 50000.0,
            age: 38.0,
            healthcare,
            smokes: 18.0,
            obesity: 30.0,
        }
    }

    #[test]
    fn apply_maps_domain_onto_range() {
        let s = LinearScale::new((10.0, 20.0), (0.0, 100.0));
        assert_eq!(s.apply(10.0), 0.0);
        assert_eq!(s.apply(15.0), 50.0);
        assert_eq!(s.apply(20.0), 100.0);

        let inverted = LinearScale::new((0.0, 10.0), (400.0, 0.0));
        assert_eq!(inverted.apply(10.0), 0.0);
        assert_eq!(inverted.apply(0.0), 400.0);
    }

    #[test]
    fn degenerate_domain_maps_to_middle() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 300.0));
        assert_eq!(s.apply(5.0), 150.0);
        assert_eq!(s.apply(99.0), 150.0);
    }

    #[test]
    fn padded_domain_extends_extremes() {
        let rows = vec![rec(10.0, 5.0), rec(20.0, 15.0), rec(12.5, 9.0)];
        let (lo, hi) = padded_domain(&rows, Field::Poverty).unwrap();
        assert_eq!(lo, 10.0 * 0.8);
        assert_eq!(hi, 20.0 * 1.2);
        let (lo, hi) = extent_domain(&rows, Field::Healthcare).unwrap();
        assert_eq!((lo, hi), (5.0, 15.0));
    }

    #[test]
    fn empty_records_have_no_domain() {
        assert_eq!(
            padded_domain(&[], Field::Age),
            Err(ScaleError::Empty(Field::Age))
        );
    }

    #[test]
    fn y_scale_is_inverted() {
        let rows = vec![rec(10.0, 5.0), rec(20.0, 15.0)];
        let y = y_scale(&rows, YField::Healthcare, 300.0).unwrap();
        assert_eq!(y.range, (300.0, 0.0));
        assert!(y.apply(15.0) < y.apply(5.0));
    }

    fn is_nice(step: f64) -> bool {
        let mantissa = step / 10f64.powf(step.log10().floor());
        [1.0, 2.0, 5.0, 10.0]
            .iter()
            .any(|m| (mantissa - m).abs() < 1e-6)
    }

    #[test]
    fn ticks_use_nice_steps_inside_domain() {
        for (domain, count) in [
            ((0.0, 10.0), 10),
            ((8.0, 24.0), 10),
            ((0.0, 1.0), 5),
            ((31000.0, 89000.0), 10),
            ((3.2, 40.8), 10),
        ] {
            let s = LinearScale::new(domain, (0.0, 1.0));
            let ticks = s.ticks(count);
            assert!(ticks.len() >= 2 && ticks.len() <= count, "{domain:?}: {ticks:?}");
            let step = s.tick_step(count);
            assert!(is_nice(step), "{domain:?}: step {step}");
            for t in &ticks {
                assert!(*t >= domain.0 - 1e-9 && *t <= domain.1 + 1e-9, "{t} outside {domain:?}");
            }
            for w in ticks.windows(2) {
                assert!((w[1] - w[0] - step).abs() < step * 1e-6);
            }
        }
    }

    #[test]
    fn ticks_of_degenerate_or_empty_requests() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 1.0));
        assert_eq!(s.ticks(10), vec![5.0]);
        assert_eq!(s.tick_step(10), 0.0);
        let s = LinearScale::new((0.0, 10.0), (0.0, 1.0));
        assert!(s.ticks(0).is_empty());
    }

    #[test]
    fn lerp_between_scales() {
        let a = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        let b = LinearScale::new((10.0, 30.0), (0.0, 100.0));
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5).domain, (5.0, 20.0));
    }
}
