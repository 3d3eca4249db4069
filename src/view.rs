//! Pure view model of the scatterplot: layout, scales, markers, axis labels, tooltips.
//!
//! Nothing here touches a drawing backend. Renderers (SVG/PNG in [`crate::viz`], the
//! desktop app) take a [`ViewModel`] and draw what it describes. Selecting a field never
//! mutates a view model; it returns a new one together with the axis that changed.

use std::fmt;

use crate::error::ScaleError;
use crate::models::{Axis, AxisField, AxisSelection, StateRecord, XField, YField};
use crate::scale::{self, LinearScale};
use crate::viz::text::estimate_text_width_px;

/// Vertical nudge that centers a marker's abbreviation inside its circle.
pub const LABEL_OFFSET_PX: f64 = 6.0;
/// Font size of the clickable axis labels.
pub const AXIS_LABEL_FONT_PX: u32 = 16;
/// Spacing between stacked axis labels.
const LABEL_STEP_PX: f64 = 20.0;
/// Ticks requested per axis.
pub const TICK_COUNT: usize = 10;

/// Space around the plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const STATIC: Margin = Margin {
        top: 30.0,
        right: 40.0,
        bottom: 150.0,
        left: 100.0,
    };
    pub const INTERACTIVE: Margin = Margin {
        top: 20.0,
        right: 40.0,
        bottom: 250.0,
        left: 130.0,
    };
}

/// Canvas size plus margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl ChartLayout {
    pub fn new(width: f64, height: f64, margin: Margin) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// Width of the plotting area (never negative).
    pub fn chart_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Height of the plotting area (never negative).
    pub fn chart_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Translate a point from plotting-area coordinates to canvas coordinates.
    pub fn to_canvas(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x + self.margin.left, y + self.margin.top)
    }

    /// Inverse of [`to_canvas`](Self::to_canvas).
    pub fn to_chart(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x - self.margin.left, y - self.margin.top)
    }
}

/// The two chart variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Poverty vs. healthcare, plain extent scales, drawn once.
    Static,
    /// Selectable fields, padded scales, animated switching.
    Interactive,
}

impl ChartKind {
    pub fn marker_radius(self) -> f64 {
        match self {
            ChartKind::Static => 15.0,
            ChartKind::Interactive => 14.0,
        }
    }

    fn label_offset(self) -> f64 {
        match self {
            ChartKind::Static => 0.0,
            ChartKind::Interactive => LABEL_OFFSET_PX,
        }
    }
}

/// One data point as drawn: circle center plus the position of its abbreviation.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub abbr: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub text_x: f64,
    pub text_y: f64,
}

impl Marker {
    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        let (dx, dy) = (x - self.cx, y - self.cy);
        dx * dx + dy * dy <= self.r * self.r
    }
}

/// Axis-aligned box in plotting-area coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: (f64, f64),
    pub max: (f64, f64),
}

impl Bounds {
    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        x >= self.min.0 && x <= self.max.0 && y >= self.min.1 && y <= self.max.1
    }
}

/// Which field a clickable label selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTarget {
    X(XField),
    Y(YField),
}

impl LabelTarget {
    pub fn axis(self) -> Axis {
        match self {
            LabelTarget::X(_) => Axis::X,
            LabelTarget::Y(_) => Axis::Y,
        }
    }
}

/// A clickable axis label.
///
/// `baseline` is the middle of the text baseline in plotting-area coordinates. Rotated
/// labels read bottom to top, so their glyphs extend to the left of the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub target: LabelTarget,
    pub text: &'static str,
    pub active: bool,
    pub baseline: (f64, f64),
    pub rotated: bool,
}

impl AxisLabel {
    pub fn axis(&self) -> Axis {
        self.target.axis()
    }

    /// Approximate box covered by the text.
    pub fn bounds(&self) -> Bounds {
        let font = AXIS_LABEL_FONT_PX as f64;
        let half = estimate_text_width_px(self.text, AXIS_LABEL_FONT_PX) as f64 / 2.0;
        let (bx, by) = self.baseline;
        if self.rotated {
            Bounds {
                min: (bx - font, by - half),
                max: (bx + font * 0.25, by + half),
            }
        } else {
            Bounds {
                min: (bx - half, by - font),
                max: (bx + half, by + font * 0.25),
            }
        }
    }
}

/// Hover text for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub lines: Vec<String>,
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Print a value in its shortest round-trip form (`42830`, `19.3`).
pub fn format_value(v: f64) -> String {
    format!("{v}")
}

/// Scales, marker positions and tick values at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub markers: Vec<Marker>,
}

impl Frame {
    pub fn x_ticks(&self) -> Vec<f64> {
        self.x_scale.ticks(TICK_COUNT)
    }

    pub fn y_ticks(&self) -> Vec<f64> {
        self.y_scale.ticks(TICK_COUNT)
    }
}

/// Result of a selection: the updated view and the axis whose scale was rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub view: ViewModel,
    pub changed: Option<Axis>,
}

/// Everything needed to draw the chart for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub kind: ChartKind,
    pub layout: ChartLayout,
    pub selection: AxisSelection,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
}

impl ViewModel {
    /// Interactive chart for `selection`, scales padded 20% past the data.
    pub fn interactive(
        records: &[StateRecord],
        layout: ChartLayout,
        selection: AxisSelection,
    ) -> Result<Self, ScaleError> {
        Self::build(ChartKind::Interactive, records, layout, selection)
    }

    /// Static chart: poverty vs. healthcare over their observed extents.
    pub fn fixed(records: &[StateRecord], layout: ChartLayout) -> Result<Self, ScaleError> {
        Self::build(ChartKind::Static, records, layout, AxisSelection::default())
    }

    fn build(
        kind: ChartKind,
        records: &[StateRecord],
        layout: ChartLayout,
        selection: AxisSelection,
    ) -> Result<Self, ScaleError> {
        let x_scale = Self::make_x_scale(kind, records, &layout, selection.x)?;
        let y_scale = Self::make_y_scale(kind, records, &layout, selection.y)?;
        Ok(Self {
            kind,
            layout,
            selection,
            x_scale,
            y_scale,
        })
    }

    fn make_x_scale(
        kind: ChartKind,
        records: &[StateRecord],
        layout: &ChartLayout,
        field: XField,
    ) -> Result<LinearScale, ScaleError> {
        let width = layout.chart_width();
        match kind {
            ChartKind::Interactive => scale::x_scale(records, field, width),
            ChartKind::Static => Ok(LinearScale::new(
                scale::extent_domain(records, field.field())?,
                (0.0, width),
            )),
        }
    }

    fn make_y_scale(
        kind: ChartKind,
        records: &[StateRecord],
        layout: &ChartLayout,
        field: YField,
    ) -> Result<LinearScale, ScaleError> {
        let height = layout.chart_height();
        match kind {
            ChartKind::Interactive => scale::y_scale(records, field, height),
            ChartKind::Static => Ok(LinearScale::new(
                scale::extent_domain(records, field.field())?,
                (height, 0.0),
            )),
        }
    }

    /// Rebuild both scales for a new canvas size.
    pub fn relayout(
        &self,
        records: &[StateRecord],
        layout: ChartLayout,
    ) -> Result<Self, ScaleError> {
        Self::build(self.kind, records, layout, self.selection)
    }

    /// Choose a new X field. Only the X scale is recomputed. The static chart keeps its axes.
    pub fn select_x(
        &self,
        records: &[StateRecord],
        field: XField,
    ) -> Result<Update, ScaleError> {
        if self.kind == ChartKind::Static || field == self.selection.x {
            return Ok(self.unchanged());
        }
        let view = ViewModel {
            selection: self.selection.with_x(field),
            x_scale: Self::make_x_scale(self.kind, records, &self.layout, field)?,
            ..self.clone()
        };
        Ok(Update {
            view,
            changed: Some(Axis::X),
        })
    }

    /// Choose a new Y field. Only the Y scale is recomputed. The static chart keeps its axes.
    pub fn select_y(
        &self,
        records: &[StateRecord],
        field: YField,
    ) -> Result<Update, ScaleError> {
        if self.kind == ChartKind::Static || field == self.selection.y {
            return Ok(self.unchanged());
        }
        let view = ViewModel {
            selection: self.selection.with_y(field),
            y_scale: Self::make_y_scale(self.kind, records, &self.layout, field)?,
            ..self.clone()
        };
        Ok(Update {
            view,
            changed: Some(Axis::Y),
        })
    }

    pub fn select(
        &self,
        records: &[StateRecord],
        target: LabelTarget,
    ) -> Result<Update, ScaleError> {
        match target {
            LabelTarget::X(f) => self.select_x(records, f),
            LabelTarget::Y(f) => self.select_y(records, f),
        }
    }

    /// Handle a click at `point` (plotting-area coordinates). Clicks that miss every
    /// label, or hit the active one, leave the view unchanged.
    pub fn click(
        &self,
        records: &[StateRecord],
        point: (f64, f64),
    ) -> Result<Update, ScaleError> {
        match self.label_at(point) {
            Some(target) => self.select(records, target),
            None => Ok(self.unchanged()),
        }
    }

    fn unchanged(&self) -> Update {
        Update {
            view: self.clone(),
            changed: None,
        }
    }

    /// Marker position of every record under the current scales.
    pub fn markers(&self, records: &[StateRecord]) -> Vec<Marker> {
        let r = self.kind.marker_radius();
        let offset = self.kind.label_offset();
        records
            .iter()
            .map(|rec| {
                let cx = self.x_scale.apply(self.selection.x.value(rec));
                let cy = self.y_scale.apply(self.selection.y.value(rec));
                Marker {
                    abbr: rec.abbr.clone(),
                    cx,
                    cy,
                    r,
                    text_x: cx,
                    text_y: cy + offset,
                }
            })
            .collect()
    }

    pub fn frame(&self, records: &[StateRecord]) -> Frame {
        Frame {
            x_scale: self.x_scale,
            y_scale: self.y_scale,
            markers: self.markers(records),
        }
    }

    /// Index of the topmost record whose marker covers `point`.
    pub fn marker_at(&self, records: &[StateRecord], point: (f64, f64)) -> Option<usize> {
        self.markers(records).iter().rposition(|m| m.contains(point))
    }

    /// Clickable labels of both axes. Exactly one label per axis is active.
    pub fn axis_labels(&self) -> Vec<AxisLabel> {
        let w = self.layout.chart_width();
        let h = self.layout.chart_height();
        let m = self.layout.margin;
        let font = AXIS_LABEL_FONT_PX as f64;

        match self.kind {
            ChartKind::Static => vec![
                AxisLabel {
                    target: LabelTarget::X(XField::Poverty),
                    text: XField::Poverty.axis_label(),
                    active: true,
                    baseline: (w / 2.0, h + m.top + 30.0),
                    rotated: false,
                },
                AxisLabel {
                    target: LabelTarget::Y(YField::Healthcare),
                    text: YField::Healthcare.axis_label(),
                    active: true,
                    baseline: (-m.left + 40.0 + font, h / 2.0),
                    rotated: true,
                },
            ],
            ChartKind::Interactive => {
                let xs = XField::ALL.iter().enumerate().map(|(i, &f)| AxisLabel {
                    target: LabelTarget::X(f),
                    text: f.axis_label(),
                    active: f == self.selection.x,
                    baseline: (w / 2.0, h + LABEL_STEP_PX * (i as f64 + 2.0)),
                    rotated: false,
                });
                let ys = YField::ALL.iter().enumerate().map(|(i, &f)| AxisLabel {
                    target: LabelTarget::Y(f),
                    text: f.axis_label(),
                    active: f == self.selection.y,
                    baseline: (-m.left + LABEL_STEP_PX * i as f64 + font, h / 2.0),
                    rotated: true,
                });
                xs.chain(ys).collect()
            }
        }
    }

    /// The label under `point`, if any.
    pub fn label_at(&self, point: (f64, f64)) -> Option<LabelTarget> {
        self.axis_labels()
            .into_iter()
            .find(|l| l.bounds().contains(point))
            .map(|l| l.target)
    }

    /// Tooltip for `record` under the current selection.
    pub fn tooltip(&self, record: &StateRecord) -> Tooltip {
        let lines = match self.kind {
            ChartKind::Static => vec![
                format!("State: {}", record.abbr),
                format!("% In Poverty: {}", format_value(record.poverty)),
                format!("% W/O Healthcare: {}", format_value(record.healthcare)),
            ],
            ChartKind::Interactive => {
                let (x, y) = (self.selection.x, self.selection.y);
                vec![
                    record.state.clone(),
                    format!("{} {}", x.tooltip_label(), format_value(x.value(record))),
                    format!("{} {}", y.tooltip_label(), format_value(y.value(record))),
                ]
            }
        };
        Tooltip { lines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(abbr: &str, poverty: f64, age: f64, healthcare: f64) -> StateRecord {
        StateRecord {
            state: format!("State {abbr}"),
            abbr: abbr.into(),
            poverty,
            income: 40000.0 + poverty * 1000.0,
            age,
            healthcare,
            smokes: 20.0,
            obesity: 30.0,
        }
    }

    fn rows() -> Vec<StateRecord> {
        vec![
            rec("AA", 10.0, 30.0, 5.0),
            rec("BB", 20.0, 40.0, 10.0),
            rec("CC", 15.0, 35.0, 20.0),
        ]
    }

    fn layout() -> ChartLayout {
        // 600 x 400 plotting area
        ChartLayout::new(770.0, 670.0, Margin::INTERACTIVE)
    }

    #[test]
    fn layout_dimensions() {
        let l = layout();
        assert_eq!(l.chart_width(), 600.0);
        assert_eq!(l.chart_height(), 400.0);
        assert_eq!(l.to_canvas((0.0, 0.0)), (130.0, 20.0));
        assert_eq!(l.to_chart((130.0, 20.0)), (0.0, 0.0));
        let tiny = ChartLayout::new(50.0, 50.0, Margin::INTERACTIVE);
        assert_eq!(tiny.chart_width(), 0.0);
    }

    #[test]
    fn interactive_scales_come_from_scale_builders() {
        let data = rows();
        let vm = ViewModel::interactive(&data, layout(), AxisSelection::default()).unwrap();
        assert_eq!(vm.x_scale, scale::x_scale(&data, XField::Poverty, 600.0).unwrap());
        assert_eq!(vm.y_scale, scale::y_scale(&data, YField::Healthcare, 400.0).unwrap());
    }

    #[test]
    fn select_x_only_rebuilds_x_scale() {
        let data = rows();
        let vm = ViewModel::interactive(&data, layout(), AxisSelection::default()).unwrap();
        let up = vm.select_x(&data, XField::Age).unwrap();
        assert_eq!(up.changed, Some(Axis::X));
        assert_eq!(up.view.y_scale, vm.y_scale);
        assert_eq!(up.view.x_scale.domain, (30.0 * 0.8, 40.0 * 1.2));
        assert_eq!(up.view.selection.x, XField::Age);

        let same = up.view.select_x(&data, XField::Age).unwrap();
        assert_eq!(same.changed, None);
        assert_eq!(same.view, up.view);
    }

    #[test]
    fn markers_follow_chosen_fields() {
        let data = rows();
        let vm = ViewModel::interactive(&data, layout(), AxisSelection::default()).unwrap();
        let vm = vm.select_y(&data, YField::Obesity).unwrap().view;
        for (m, r) in vm.markers(&data).iter().zip(&data) {
            assert_eq!(m.cx, vm.x_scale.apply(r.poverty));
            assert_eq!(m.cy, vm.y_scale.apply(r.obesity));
            assert_eq!(m.text_y, m.cy + LABEL_OFFSET_PX);
            assert_eq!(m.r, 14.0);
        }
    }

    #[test]
    fn exactly_one_active_label_per_axis() {
        let data = rows();
        let mut vm = ViewModel::interactive(&data, layout(), AxisSelection::default()).unwrap();
        for (x, y) in [(XField::Income, YField::Smokes), (XField::Age, YField::Healthcare)] {
            vm = vm.select_x(&data, x).unwrap().view;
            vm = vm.select_y(&data, y).unwrap().view;
            let labels = vm.axis_labels();
            let active_x: Vec<_> = labels
                .iter()
                .filter(|l| l.axis() == Axis::X && l.active)
                .collect();
            let active_y: Vec<_> = labels
                .iter()
                .filter(|l| l.axis() == Axis::Y && l.active)
                .collect();
            assert_eq!(active_x.len(), 1);
            assert_eq!(active_y.len(), 1);
            assert_eq!(active_x[0].target, LabelTarget::X(x));
            assert_eq!(active_y[0].target, LabelTarget::Y(y));
            assert_eq!(labels.iter().filter(|l| !l.active).count(), 4);
        }
    }

    #[test]
    fn clicking_a_label_switches_axis() {
        let data = rows();
        let vm = ViewModel::interactive(&data, layout(), AxisSelection::default()).unwrap();
        let income = vm
            .axis_labels()
            .into_iter()
            .find(|l| l.target == LabelTarget::X(XField::Income))
            .unwrap();
        let up = vm.click(&data, income.baseline).unwrap();
        assert_eq!(up.changed, Some(Axis::X));
        assert_eq!(up.view.selection.x, XField::Income);

        let smokes = vm
            .axis_labels()
            .into_iter()
            .find(|l| l.target == LabelTarget::Y(YField::Smokes))
            .unwrap();
        let (bx, by) = smokes.baseline;
        let up = vm.click(&data, (bx - 4.0, by)).unwrap();
        assert_eq!(up.changed, Some(Axis::Y));
        assert_eq!(up.view.selection.y, YField::Smokes);

        let miss = vm.click(&data, (300.0, 200.0)).unwrap();
        assert_eq!(miss.changed, None);
    }

    #[test]
    fn label_boxes_do_not_overlap() {
        let data = rows();
        let vm = ViewModel::interactive(&data, layout(), AxisSelection::default()).unwrap();
        let labels = vm.axis_labels();
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(vm.label_at(a.baseline), Some(b.target));
            }
        }
    }

    #[test]
    fn tooltip_uses_display_labels() {
        let data = rows();
        let vm = ViewModel::interactive(&data, layout(), AxisSelection::default()).unwrap();
        let tip = vm.tooltip(&data[1]);
        assert_eq!(tip.to_string(), "State BB\nIn Poverty: 20\nLacks Healthcare: 10");

        let vm = vm.select_y(&data, YField::Obesity).unwrap().view;
        let vm = vm.select_x(&data, XField::Income).unwrap().view;
        let tip = vm.tooltip(&data[1]);
        assert_eq!(tip.lines, vec!["State BB", "Median Income: 60000", "Obese 30"]);
    }

    #[test]
    fn static_chart_uses_extent_scales() {
        let data = rows();
        let vm = ViewModel::fixed(&data, ChartLayout::new(740.0, 580.0, Margin::STATIC)).unwrap();
        assert_eq!(vm.x_scale.domain, (10.0, 20.0));
        assert_eq!(vm.y_scale.domain, (5.0, 20.0));
        assert_eq!(vm.x_scale.range, (0.0, 600.0));
        assert_eq!(vm.y_scale.range, (400.0, 0.0));
        let m = vm.markers(&data);
        assert_eq!((m[0].cx, m[0].cy), (0.0, 400.0));
        assert_eq!(m[0].text_y, m[0].cy);
        assert_eq!(vm.axis_labels().len(), 2);
        assert_eq!(
            vm.tooltip(&data[0]).to_string(),
            "State: AA\n% In Poverty: 10\n% W/O Healthcare: 5"
        );
    }

    #[test]
    fn static_chart_ignores_axis_selection() {
        let data = rows();
        let vm = ViewModel::fixed(&data, ChartLayout::new(740.0, 580.0, Margin::STATIC)).unwrap();

        let up = vm.select_x(&data, XField::Income).unwrap();
        assert_eq!(up.changed, None);
        assert_eq!(up.view, vm);

        let up = vm.select_y(&data, YField::Smokes).unwrap();
        assert_eq!(up.changed, None);
        assert_eq!(up.view.selection, AxisSelection::default());
        assert_eq!(up.view.y_scale, vm.y_scale);

        for label in vm.axis_labels() {
            let up = vm.click(&data, label.baseline).unwrap();
            assert_eq!(up.changed, None);
        }
    }

    #[test]
    fn marker_hit_testing() {
        let data = rows();
        let vm = ViewModel::interactive(&data, layout(), AxisSelection::default()).unwrap();
        let m = vm.markers(&data);
        assert_eq!(vm.marker_at(&data, (m[2].cx + 3.0, m[2].cy - 3.0)), Some(2));
        assert_eq!(vm.marker_at(&data, (-50.0, -50.0)), None);
    }

    #[test]
    fn relayout_rescales_ranges() {
        let data = rows();
        let vm = ViewModel::interactive(&data, layout(), AxisSelection::default()).unwrap();
        let bigger = vm
            .relayout(&data, ChartLayout::new(1170.0, 870.0, Margin::INTERACTIVE))
            .unwrap();
        assert_eq!(bigger.x_scale.range, (0.0, 1000.0));
        assert_eq!(bigger.y_scale.range, (600.0, 0.0));
        assert_eq!(bigger.x_scale.domain, vm.x_scale.domain);
    }
}
