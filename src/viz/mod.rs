//! Visualization: render the state scatterplot to **SVG** or **PNG**.
//!
//! - Axes with nice 1-2-5 ticks and locale-aware tick labels (`30,000` vs `30.000`)
//! - Translucent circles with the state abbreviation centered inside
//! - Stacked axis labels, the chosen one highlighted
//! - Optional tooltip overlay for one highlighted state

pub mod text;
pub mod util;

use crate::models::StateRecord;
use crate::view::{AXIS_LABEL_FONT_PX, Frame, TICK_COUNT, ViewModel};
use anyhow::{Result, anyhow};
use log::debug;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::ops::Range;
use std::path::Path;

use text::{estimate_text_width_px, truncate_to_width};
use util::{
    ACTIVE_LABEL, AXIS_COLOR, INACTIVE_LABEL, MARKER_FILL, MARKER_OPACITY, MARKER_STROKE,
    ensure_fonts_registered, format_tick,
};

const TICK_FONT_PX: u32 = 10;
const MARKER_FONT_PX: u32 = 10;
const TOOLTIP_FONT_PX: u32 = 12;
const TOOLTIP_OFFSET: i32 = 8;

/// Per-render switches that are not part of the view model.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Locale tag for tick labels (`en`, `de`, …).
    pub locale: String,
    /// Record whose tooltip is drawn over the chart.
    pub highlight: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            highlight: None,
        }
    }
}

/// Render `view` to `out_path`; `.svg` selects the SVG backend, anything else PNG.
pub fn render_chart<P: AsRef<Path>>(
    records: &[StateRecord],
    view: &ViewModel,
    out_path: P,
    opts: &RenderOptions,
) -> Result<()> {
    render_frame(records, view, &view.frame(records), out_path, opts)
}

/// Like [`render_chart`], drawing an explicit frame (e.g. mid-transition).
pub fn render_frame<P: AsRef<Path>>(
    records: &[StateRecord],
    view: &ViewModel,
    frame: &Frame,
    out_path: P,
    opts: &RenderOptions,
) -> Result<()> {
    if records.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = canvas_size(view);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_chart(&root, records, view, frame, opts)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_chart(&root, records, view, frame, opts)?;
    }
    debug!("wrote {}x{} chart to {}", size.0, size.1, out_path.display());
    Ok(())
}

/// Render `view` as an SVG document held in memory.
pub fn render_svg_string(
    records: &[StateRecord],
    view: &ViewModel,
    opts: &RenderOptions,
) -> Result<String> {
    if records.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    ensure_fonts_registered();
    let frame = view.frame(records);
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, canvas_size(view)).into_drawing_area();
        draw_chart(&root, records, view, &frame, opts)?;
    }
    Ok(buf)
}

/// Static chart: poverty vs. healthcare at `width` x `height`.
pub fn render_static<P: AsRef<Path>>(
    records: &[StateRecord],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let layout = crate::view::ChartLayout::new(
        width as f64,
        height as f64,
        crate::view::Margin::STATIC,
    );
    let view = ViewModel::fixed(records, layout)?;
    render_chart(records, &view, out_path, &RenderOptions::default())
}

/// Axis range for plotters; a degenerate domain is widened around its value.
fn axis_range((a, b): (f64, f64)) -> Range<f64> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == hi { lo - 1.0..hi + 1.0 } else { lo..hi }
}

fn canvas_size(view: &ViewModel) -> (u32, u32) {
    (
        view.layout.width.max(1.0) as u32,
        view.layout.height.max(1.0) as u32,
    )
}

/// Helper that draws to any Plotters backend.
fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    records: &[StateRecord],
    view: &ViewModel,
    frame: &Frame,
    opts: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let layout = view.layout;
    let px = |p: (f64, f64)| -> (i32, i32) {
        let (x, y) = layout.to_canvas(p);
        (x.round() as i32, y.round() as i32)
    };
    let margin = layout.margin;

    // ----------------------------
    // 1) Axes (plotting area = canvas minus margins)
    // ----------------------------
    let mut chart = ChartBuilder::on(root)
        .margin_top(margin.top as u32)
        .margin_right(margin.right as u32)
        .set_label_area_size(LabelAreaPosition::Left, margin.left as u32)
        .set_label_area_size(LabelAreaPosition::Bottom, margin.bottom as u32)
        .build_cartesian_2d(axis_range(frame.x_scale.domain), axis_range(frame.y_scale.domain))
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_step = frame.x_scale.tick_step(TICK_COUNT);
    let y_step = frame.y_scale.tick_step(TICK_COUNT);
    let x_label_fmt = |v: &f64| format_tick(*v, x_step, &opts.locale);
    let y_label_fmt = |v: &f64| format_tick(*v, y_step, &opts.locale);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(TICK_COUNT)
        .y_labels(TICK_COUNT)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .axis_style(AXIS_COLOR)
        .label_style(("sans-serif", TICK_FONT_PX).into_font().color(&AXIS_COLOR))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    // ----------------------------
    // 2) Markers and abbreviations
    // ----------------------------
    let fill = ShapeStyle {
        color: MARKER_FILL.mix(MARKER_OPACITY),
        filled: true,
        stroke_width: 0,
    };
    let outline = MARKER_STROKE.stroke_width(1);
    let abbr_font = ("sans-serif", MARKER_FONT_PX)
        .into_font()
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    for m in &frame.markers {
        let c = px((m.cx, m.cy));
        let r = m.r.round() as i32;
        root.draw(&Circle::new(c, r, fill)).map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Circle::new(c, r, outline)).map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(m.abbr.clone(), px((m.text_x, m.text_y)), abbr_font.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    // ----------------------------
    // 3) Axis labels
    // ----------------------------
    for label in view.axis_labels() {
        let color = if label.active { ACTIVE_LABEL } else { INACTIVE_LABEL };
        let mut font = ("sans-serif", AXIS_LABEL_FONT_PX).into_font();
        if label.rotated {
            font = font.transform(FontTransform::Rotate270);
        }
        let style = font.color(&color).pos(Pos::new(HPos::Center, VPos::Bottom));
        root.draw(&Text::new(label.text.to_string(), px(label.baseline), style))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    // ----------------------------
    // 4) Tooltip overlay
    // ----------------------------
    if let Some(idx) = opts.highlight {
        let record = records
            .get(idx)
            .ok_or_else(|| anyhow!("highlighted record {idx} out of range"))?;
        let marker = frame
            .markers
            .get(idx)
            .ok_or_else(|| anyhow!("no marker for record {idx}"))?;
        draw_tooltip(root, &view.tooltip(record).lines, px((marker.cx, marker.cy - marker.r)))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Dark box with white text, centered above `anchor` (the top of the marker).
fn draw_tooltip<DB>(
    root: &DrawingArea<DB, Shift>,
    lines: &[String],
    anchor: (i32, i32),
) -> Result<()>
where
    DB: DrawingBackend,
{
    let (canvas_w, canvas_h) = root.dim_in_pixel();
    let line_h = TOOLTIP_FONT_PX as i32 + 4;
    let pad = 6;
    let max_text = (canvas_w as i32 - 2 * pad).max(0) as u32;
    let lines: Vec<String> = lines
        .iter()
        .map(|l| truncate_to_width(l, TOOLTIP_FONT_PX, max_text))
        .collect();
    let text_w = lines
        .iter()
        .map(|l| estimate_text_width_px(l, TOOLTIP_FONT_PX) as i32)
        .max()
        .unwrap_or(0);
    let box_w = text_w + 2 * pad;
    let box_h = line_h * lines.len() as i32 + 2 * pad;

    let left = (anchor.0 - box_w / 2).clamp(0, (canvas_w as i32 - box_w).max(0));
    let top = (anchor.1 - TOOLTIP_OFFSET - box_h).clamp(0, (canvas_h as i32 - box_h).max(0));

    root.draw(&Rectangle::new(
        [(left, top), (left + box_w, top + box_h)],
        BLACK.mix(0.8).filled(),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let font = ("sans-serif", TOOLTIP_FONT_PX)
        .into_font()
        .color(&WHITE)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, line) in lines.iter().enumerate() {
        root.draw(&Text::new(
            line.clone(),
            (left + box_w / 2, top + pad + i as i32 * line_h),
            font.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}
