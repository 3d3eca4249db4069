/*!
 * Desktop viewer for the state scatterplot.
 *
 * - Loads the state CSV on a background thread
 * - Click an axis label to switch that axis; markers glide to their new positions
 * - Hover a marker for its tooltip
 * - Resizing the window reloads the data and redraws the chart at the initial axes
 *
 * Platform support: Windows, macOS, Linux
 */

use clap::Parser;
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Sense, Stroke};
use log::{debug, info, warn};
use state_scatter::config::ChartConfig;
use state_scatter::loader::BackgroundLoad;
use state_scatter::transition::Transition;
use state_scatter::view::{AXIS_LABEL_FONT_PX, ChartLayout, Frame, Margin, TICK_COUNT};
use state_scatter::viz::RenderOptions;
use state_scatter::viz::util::format_tick;
use state_scatter::{StateRecord, ViewModel, viz};
use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "statescatter-gui", version, about = "Interactive state scatterplot")]
struct GuiArgs {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// State CSV to open at startup.
    #[arg(long)]
    data: Option<PathBuf>,
}

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let args = GuiArgs::parse();
    let mut cfg = match ChartConfig::load_or_default(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!("{err:#}; using defaults");
            ChartConfig::default()
        }
    };
    if let Some(data) = args.data {
        cfg.data = data;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cfg.width as f32, cfg.height as f32 + 40.0])
            .with_min_inner_size([600.0, 500.0])
            .with_title("State Health & Demographics"),
        ..Default::default()
    };

    eframe::run_native(
        "State Scatter",
        options,
        Box::new(|_cc| Ok(Box::new(ScatterApp::new(cfg)))),
    )
}

/// A transition in flight and the UI time it started at.
struct RunningTransition {
    transition: Transition,
    started_at: f64,
}

/// Seconds the canvas size must stay put before the chart is reloaded.
const RESIZE_SETTLE_SECS: f64 = 0.25;

/// Main application state
struct ScatterApp {
    cfg: ChartConfig,
    data_path: String,

    records: Vec<StateRecord>,
    view: Option<ViewModel>,
    transition: Option<RunningTransition>,

    // Canvas size seen on the last frame, and when it last changed.
    canvas: Option<ChartLayout>,
    resized_at: Option<f64>,

    // UI state
    status_message: String,
    error_message: String,

    loader: BackgroundLoad,
}

impl ScatterApp {
    fn new(cfg: ChartConfig) -> Self {
        let data_path = cfg.data.to_string_lossy().to_string();
        let mut app = Self {
            cfg,
            data_path,
            records: Vec::new(),
            view: None,
            transition: None,
            canvas: None,
            resized_at: None,
            status_message: String::new(),
            error_message: String::new(),
            loader: BackgroundLoad::new(),
        };
        app.start_load();
        app
    }

    fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    fn start_load(&mut self) {
        let path = PathBuf::from(self.data_path.trim());
        if path.as_os_str().is_empty() {
            self.error_message = "Please choose a CSV file".to_string();
            return;
        }

        self.error_message.clear();
        self.status_message = format!("Loading {}...", path.display());
        self.loader.start(path);
    }

    fn check_load_result(&mut self) {
        let Some(result) = self.loader.poll() else {
            return;
        };
        match result {
            Ok(records) => {
                info!("{} states loaded", records.len());
                self.status_message = format!("{} states loaded", records.len());
                self.error_message.clear();
                self.records = records;
                // Rebuilt for the canvas on the next paint.
                self.view = None;
                self.transition = None;
            }
            Err(error) => {
                self.error_message = format!("Failed to load data: {error}");
                self.status_message.clear();
            }
        }
    }

    /// A canvas size change discards the chart and its records. Once the size has
    /// settled the CSV is fetched again and the chart restarts at the initial axes.
    fn track_canvas(&mut self, layout: ChartLayout, now: f64) {
        if self.canvas.is_some_and(|prev| prev != layout) {
            debug!("canvas resized to {}x{}", layout.width, layout.height);
            self.records.clear();
            self.view = None;
            self.transition = None;
            self.loader.cancel();
            self.resized_at = Some(now);
        }
        self.canvas = Some(layout);

        if let Some(changed_at) = self.resized_at
            && now - changed_at >= RESIZE_SETTLE_SECS
        {
            self.resized_at = None;
            self.start_load();
        }
    }

    /// Build the view model for the loaded records at the initial selection.
    fn ensure_view(&mut self, layout: ChartLayout) {
        if self.view.is_some() || self.records.is_empty() {
            return;
        }
        match ViewModel::interactive(&self.records, layout, self.cfg.selection) {
            Ok(view) => {
                debug!("chart built at {}x{}", layout.width, layout.height);
                self.view = Some(view);
            }
            Err(err) => self.error_message = err.to_string(),
        }
    }

    /// What is on screen at UI time `now`.
    fn current_frame(&mut self, view: &ViewModel, now: f64) -> Frame {
        if let Some(running) = &self.transition {
            let elapsed = Duration::from_secs_f64((now - running.started_at).max(0.0));
            let frame = running.transition.sample(elapsed);
            if running.transition.is_finished(elapsed) {
                self.transition = None;
            }
            return frame;
        }
        view.frame(&self.records)
    }

    fn save_snapshot(&mut self) {
        let Some(view) = &self.view else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .add_filter("PNG", &["png"])
            .set_file_name("state_scatter.svg")
            .save_file()
        else {
            return;
        };
        let opts = RenderOptions {
            locale: self.cfg.locale.clone(),
            highlight: None,
        };
        match viz::render_chart(&self.records, view, &path, &opts) {
            Ok(()) => self.status_message = format!("Saved {}", path.display()),
            Err(err) => self.error_message = format!("Failed to save chart: {err}"),
        }
    }

    fn chart_ui(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        let origin = response.rect.min;
        let layout = ChartLayout::new(
            response.rect.width() as f64,
            response.rect.height() as f64,
            Margin::INTERACTIVE,
        );
        let now = ui.ctx().input(|i| i.time);
        self.track_canvas(layout, now);
        if self.resized_at.is_some() {
            ui.ctx().request_repaint_after(Duration::from_secs_f64(RESIZE_SETTLE_SECS));
        }
        self.ensure_view(layout);
        let Some(view) = self.view.clone() else {
            return;
        };

        let frame = self.current_frame(&view, now);
        if self.transition.is_some() {
            ui.ctx().request_repaint();
        }

        paint_chart(&painter, origin, &view, &frame, &self.cfg.locale);

        let to_chart = |pos: Pos2| {
            view.layout.to_chart(((pos.x - origin.x) as f64, (pos.y - origin.y) as f64))
        };

        if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            match view.click(&self.records, to_chart(pos)) {
                Ok(update) if update.changed.is_some() => {
                    debug!("axis {:?} switched", update.changed);
                    self.transition = Some(RunningTransition {
                        transition: Transition::new(
                            frame.clone(),
                            &update.view,
                            &self.records,
                            self.cfg.transition(),
                        ),
                        started_at: now,
                    });
                    self.view = Some(update.view);
                    ui.ctx().request_repaint();
                }
                Ok(_) => {}
                Err(err) => self.error_message = err.to_string(),
            }
        }

        if let Some(pos) = response.hover_pos() {
            let p = to_chart(pos);
            if view.label_at(p).is_some() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            } else if let Some(idx) = frame.markers.iter().rposition(|m| m.contains(p)) {
                let tip = view.tooltip(&self.records[idx]).to_string();
                response.on_hover_text_at_pointer(tip);
            }
        }
    }
}

/// Draw axes, markers and axis labels of `frame` with the labels of `view`.
fn paint_chart(
    painter: &egui::Painter,
    origin: Pos2,
    view: &ViewModel,
    frame: &Frame,
    locale: &str,
) {
    let layout = view.layout;
    let at = |p: (f64, f64)| {
        let (x, y) = layout.to_canvas(p);
        Pos2::new(origin.x + x as f32, origin.y + y as f32)
    };
    let w = layout.chart_width();
    let h = layout.chart_height();
    let axis = Stroke::new(1.0, Color32::BLACK);
    let tick_font = FontId::proportional(10.0);

    // X axis
    painter.line_segment([at((0.0, h)), at((w, h))], axis);
    let x_step = frame.x_scale.tick_step(TICK_COUNT);
    for t in frame.x_ticks() {
        let p = at((frame.x_scale.apply(t), h));
        painter.line_segment([p, p + egui::vec2(0.0, 6.0)], axis);
        painter.text(
            p + egui::vec2(0.0, 9.0),
            Align2::CENTER_TOP,
            format_tick(t, x_step, locale),
            tick_font.clone(),
            Color32::BLACK,
        );
    }

    // Y axis
    painter.line_segment([at((0.0, 0.0)), at((0.0, h))], axis);
    let y_step = frame.y_scale.tick_step(TICK_COUNT);
    for t in frame.y_ticks() {
        let p = at((0.0, frame.y_scale.apply(t)));
        painter.line_segment([p - egui::vec2(6.0, 0.0), p], axis);
        painter.text(
            p - egui::vec2(9.0, 0.0),
            Align2::RIGHT_CENTER,
            format_tick(t, y_step, locale),
            tick_font.clone(),
            Color32::BLACK,
        );
    }

    // Markers
    let fill = Color32::from_rgba_unmultiplied(51, 102, 153, 178);
    let outline = Stroke::new(1.0, Color32::GRAY);
    for m in &frame.markers {
        painter.circle(at((m.cx, m.cy)), m.r as f32, fill, outline);
        painter.text(
            at((m.text_x, m.text_y)),
            Align2::CENTER_BOTTOM,
            &m.abbr,
            FontId::proportional(10.0),
            Color32::WHITE,
        );
    }

    // Axis labels
    let label_font = FontId::proportional(AXIS_LABEL_FONT_PX as f32);
    for label in view.axis_labels() {
        let color = if label.active {
            Color32::BLACK
        } else {
            Color32::from_rgb(201, 201, 201)
        };
        let anchor = at(label.baseline);
        if label.rotated {
            let galley = painter.layout_no_wrap(label.text.to_string(), label_font.clone(), color);
            let size = galley.size();
            // Rotated about its top-left corner, the text runs upwards from `pos`.
            let pos = Pos2::new(anchor.x - size.y, anchor.y + size.x / 2.0);
            painter.add(egui::epaint::TextShape::new(pos, galley, color).with_angle(-FRAC_PI_2));
        } else {
            painter.text(anchor, Align2::CENTER_BOTTOM, label.text, label_font.clone(), color);
        }
    }
}

impl eframe::App for ScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for a completed background load
        self.check_load_result();

        // Request repaint if loading (for spinner animation)
        if self.is_loading() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Data:");
                ui.text_edit_singleline(&mut self.data_path).on_hover_text(
                    "CSV with state, abbr, poverty, income, age, healthcare, smokes, obesity",
                );
                if ui.button("Browse").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("CSV", &["csv"])
                        .set_directory(dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
                        .pick_file()
                {
                    self.data_path = path.to_string_lossy().to_string();
                    self.start_load();
                }
                if ui.add_enabled(!self.is_loading(), egui::Button::new("Reload")).clicked() {
                    self.start_load();
                }
                let can_save = self.view.is_some();
                if ui.add_enabled(can_save, egui::Button::new("Save snapshot")).clicked() {
                    self.save_snapshot();
                }

                if self.is_loading() {
                    ui.spinner();
                }
                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }
                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::WHITE))
            .show(ctx, |ui| self.chart_ui(ui));
    }
}
