//! state_scatter
//!
//! A small Rust library for charting U.S. state demographic and health statistics
//! (poverty, income, age, obesity, smoking, lack of healthcare) as a scatterplot.
//! Pairs with the `statescatter` CLI and the `statescatter-gui` desktop app.
//!
//! ### Features
//! - Load the state CSV, coercing the six numeric columns, in the foreground or on a worker
//! - Padded linear scales per chosen field, recomputed on every axis change
//! - A pure view model: markers, clickable axis labels, tooltips
//! - Animated transitions between axis selections
//! - Render SVG/PNG snapshots of either chart variant
//!
//! ### Example
//! ```no_run
//! use state_scatter::{AxisSelection, ViewModel, XField};
//! use state_scatter::view::{ChartLayout, Margin};
//!
//! let records = state_scatter::storage::load_csv("assets/data/stateData.csv")?;
//! let layout = ChartLayout::new(960.0, 660.0, Margin::INTERACTIVE);
//! let view = ViewModel::interactive(&records, layout, AxisSelection::default())?;
//! let view = view.select_x(&records, XField::Income)?.view;
//! state_scatter::viz::render_chart(&records, &view, "income.svg", &Default::default())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod scale;
pub mod stats;
pub mod storage;
pub mod transition;
pub mod view;
pub mod viz;

pub use error::{LoadError, ScaleError};
pub use models::{Axis, AxisField, AxisSelection, Field, StateRecord, XField, YField};
pub use view::ViewModel;
