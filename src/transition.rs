//! Animated move between two view models after an axis change.
//!
//! The target view (scales, selection, labels, tooltip mapping) is adopted in one step;
//! only marker and tick positions are interpolated, and a finished transition yields
//! exactly the target frame.

use std::time::Duration;

use crate::models::StateRecord;
use crate::view::{Frame, Marker, ViewModel};

/// Default duration of an axis transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(1000);

/// Symmetric cubic easing on `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    from: Frame,
    to: Frame,
    duration: Duration,
}

impl Transition {
    /// Transition from what is on screen (`from`) to the frame of `target`.
    pub fn new(
        from: Frame,
        target: &ViewModel,
        records: &[StateRecord],
        duration: Duration,
    ) -> Self {
        Self {
            from,
            to: target.frame(records),
            duration,
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        ease_cubic_in_out(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    /// Frame to draw `elapsed` after the transition started.
    pub fn sample(&self, elapsed: Duration) -> Frame {
        if self.is_finished(elapsed) {
            return self.to.clone();
        }
        let t = self.progress(elapsed);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        let markers = self
            .from
            .markers
            .iter()
            .zip(&self.to.markers)
            .map(|(a, b)| Marker {
                abbr: b.abbr.clone(),
                cx: mix(a.cx, b.cx),
                cy: mix(a.cy, b.cy),
                r: b.r,
                text_x: mix(a.text_x, b.text_x),
                text_y: mix(a.text_y, b.text_y),
            })
            .collect();
        Frame {
            x_scale: self.from.x_scale.lerp(&self.to.x_scale, t),
            y_scale: self.from.y_scale.lerp(&self.to.y_scale, t),
            markers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AxisSelection, XField};
    use crate::view::{ChartLayout, Margin};

    fn rows() -> Vec<StateRecord> {
        [(10.0, 30.0, 5.0), (20.0, 45.0, 12.0), (14.0, 38.0, 9.0)]
            .into_iter()
            .enumerate()
            .map(|(i, (poverty, age, healthcare))| StateRecord {
                state: format!("S{i}"),
                abbr: format!("S{i}"),
                poverty,
                income: 50000.0,
                age,
                healthcare,
                smokes: 17.0,
                obesity: 28.0,
            })
            .collect()
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
        assert_eq!(ease_cubic_in_out(3.0), 1.0);
    }

    #[test]
    fn finished_transition_lands_on_target() {
        let data = rows();
        let layout = ChartLayout::new(800.0, 700.0, Margin::INTERACTIVE);
        let vm = ViewModel::interactive(&data, layout, AxisSelection::default()).unwrap();
        let next = vm.select_x(&data, XField::Age).unwrap().view;
        let tr = Transition::new(vm.frame(&data), &next, &data, TRANSITION_DURATION);

        let start = tr.sample(Duration::ZERO);
        assert_eq!(start.markers, vm.markers(&data));

        let mid = tr.sample(Duration::from_millis(500));
        for ((a, m), b) in vm.markers(&data).iter().zip(&mid.markers).zip(next.markers(&data)) {
            let lo = a.cx.min(b.cx);
            let hi = a.cx.max(b.cx);
            assert!(m.cx >= lo && m.cx <= hi);
            assert_eq!(m.cy, b.cy);
        }

        let end = tr.sample(TRANSITION_DURATION);
        assert_eq!(end, next.frame(&data));
        assert!(tr.is_finished(Duration::from_millis(1500)));
    }
}
